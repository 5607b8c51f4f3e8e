//! 控制面板导航栏（dashboard 与 profile 共用）

use crate::components::icons::{CloudShield, LogOut};
use crate::session::{logout, use_session};
use crate::web::router::{Link, use_router};
use keeply_shared::{AppRoute, Section};
use leptos::prelude::*;

#[component]
pub fn DashboardNavbar() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let session_view = session.view;

    let section_links = move || {
        let current_path = router.current_route().get().to_path();
        let active = router.current_section().get();
        Section::ALL
            .into_iter()
            .map(|section| {
                let class = if section == active {
                    "font-semibold active"
                } else {
                    ""
                };
                view! {
                    <li>
                        <Link href=section.href(current_path) class=class>
                            {section.label()}
                        </Link>
                    </li>
                }
            })
            .collect_view()
    };

    let on_logout = move |_| logout(&session);

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl" aria-label="Navegação da dashboard">
            <div class="navbar-start gap-2">
                <div class="dropdown lg:hidden">
                    <div tabindex="0" role="button" class="btn btn-ghost" aria-label="Abrir menu">
                        <svg xmlns="http://www.w3.org/2000/svg" class="h-5 w-5" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 6h16M4 12h16M4 18h16" /></svg>
                    </div>
                    <ul tabindex="0" class="menu menu-sm dropdown-content bg-base-100 rounded-box z-10 mt-3 w-52 p-2 shadow">
                        {section_links}
                    </ul>
                </div>
                <Link href=AppRoute::Dashboard.to_path() class="btn btn-ghost text-xl gap-2">
                    <CloudShield attr:class="text-primary h-6 w-6" />
                    "Keeply"
                </Link>
            </div>

            <div class="navbar-center hidden lg:flex">
                <ul class="menu menu-horizontal px-1">{section_links}</ul>
            </div>

            <div class="navbar-end">
                <div class="dropdown dropdown-end">
                    <div tabindex="0" role="button" class="btn btn-ghost gap-2" aria-label="Menu do usuário">
                        <div class="avatar placeholder">
                            <div class="bg-primary text-primary-content w-9 rounded-full">
                                <span class="text-sm">{move || session_view.with(|v| v.initials.clone())}</span>
                            </div>
                        </div>
                        <span class="hidden md:inline">{move || session_view.with(|v| v.short_name.clone())}</span>
                    </div>
                    <ul tabindex="0" class="menu dropdown-content bg-base-100 rounded-box z-10 mt-3 w-64 p-2 shadow">
                        <li class="menu-title">
                            <span class="truncate">{move || session_view.with(|v| v.email.clone())}</span>
                        </li>
                        <li>
                            <Link href=AppRoute::Profile.to_path()>"Meu perfil"</Link>
                        </li>
                        <li>
                            <button on:click=on_logout class="text-error">
                                <LogOut attr:class="h-4 w-4" /> "Sair"
                            </button>
                        </li>
                    </ul>
                </div>
            </div>
        </div>
    }
}
