use crate::components::icons::{AlertCircle, CheckCircle, CloudShield};
use crate::session::{login, use_session};
use crate::web::router::{Link, use_router};
use keeply_shared::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

/// 登录成功后跳转前的停留时间
const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_millis(700);

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);
        set_success_msg.set(None);

        spawn_local(async move {
            match login(&session, email.get_untracked(), password.get_untracked()).await {
                Ok(()) => {
                    set_success_msg.set(Some("Login realizado com sucesso.".to_string()));
                    set_timeout(
                        move || router.navigate(AppRoute::login_success_redirect().to_path()),
                        SUCCESS_REDIRECT_DELAY,
                    );
                }
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <CloudShield attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Entrar na Keeply"</h1>
                        <p class="text-base-content/70">"Acesse sua conta para acompanhar seus backups"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <AlertCircle attr:class="h-5 w-5 shrink-0" />
                                <span>{msg}</span>
                            </div>
                        })}
                        {move || success_msg.get().map(|msg| view! {
                            <div role="status" class="alert alert-success text-sm py-2">
                                <CheckCircle attr:class="h-5 w-5 shrink-0" />
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"E-mail"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="email"
                                placeholder="voce@exemplo.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Senha"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Entrando..." }.into_any()
                                } else {
                                    "Entrar".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center text-base-content/70 mt-2">
                            "Ainda não tem conta? "
                            <Link href=AppRoute::Register.to_path() class="link link-primary">"Criar conta"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
