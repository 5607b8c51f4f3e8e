use crate::components::icons::{LogOut, RefreshCw};
use crate::components::navbar::DashboardNavbar;
use crate::session::{logout, use_session};
use keeply_shared::jwt::decode_payload;
use keeply_shared::session::ExpiryBadge;
use keeply_shared::SessionView;
use leptos::prelude::*;

fn yes_no(value: bool) -> &'static str {
    if value { "Sim" } else { "Não" }
}

fn badge_class(badge: ExpiryBadge) -> &'static str {
    match badge {
        ExpiryBadge::Expired => "badge badge-error gap-2",
        ExpiryBadge::Active => "badge badge-success gap-2",
        ExpiryBadge::Undefined => "badge badge-ghost gap-2",
    }
}

/// 一行键值
#[component]
fn ProfileRow(label: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <tr>
            <th class="w-1/3">{label}</th>
            <td class="break-all">{value}</td>
        </tr>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();
    let session_view = session.view;

    let field = move |f: fn(&SessionView) -> String| Signal::derive(move || session_view.with(f));

    let has_token = move || session.tokens.with(|t| t.has_access_token());
    let payload_valid = move || {
        session
            .tokens
            .with(|t| decode_payload(t.access_token.as_deref()).is_some())
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <DashboardNavbar />

                <div class="flex flex-col md:flex-row md:items-end justify-between gap-4">
                    <div>
                        <h1 class="text-3xl font-bold">"Perfil"</h1>
                        <p class="text-base-content/70">"Dados carregados do token atual."</p>
                    </div>
                    <div class="flex gap-2">
                        <button on:click=move |_| session.refresh() class="btn btn-outline gap-2">
                            <RefreshCw attr:class="h-4 w-4" /> "Recarregar dados"
                        </button>
                        <button on:click=move |_| logout(&session) class="btn btn-outline btn-error gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Sair"
                        </button>
                    </div>
                </div>

                <section id="perfil" class="space-y-6">
                    <article class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="flex flex-col sm:flex-row sm:items-center gap-4">
                                <div class="avatar placeholder" aria-hidden="true">
                                    <div class="bg-primary text-primary-content w-16 rounded-full">
                                        <span class="text-xl">{move || session_view.with(|v| v.initials.clone())}</span>
                                    </div>
                                </div>
                                <div class="flex-1">
                                    <span class="badge badge-outline">"Conta"</span>
                                    <h2 class="text-2xl font-bold">{move || session_view.with(|v| v.full_name.clone())}</h2>
                                    <p class="text-base-content/70">{move || session_view.with(|v| v.email.clone())}</p>
                                </div>
                                <div
                                    class=move || badge_class(session_view.with(|v| v.expiry_badge))
                                    aria-label="Status do token"
                                >
                                    {move || session_view.with(|v| v.expiry_badge.label())}
                                </div>
                            </div>
                            <div class="stats stats-vertical md:stats-horizontal bg-base-200 mt-4">
                                <div class="stat">
                                    <div class="stat-title">"User ID"</div>
                                    <div class="stat-value text-sm break-all">{move || session_view.with(|v| v.user_id.clone())}</div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"Role"</div>
                                    <div class="stat-value text-sm">{move || session_view.with(|v| v.role.clone())}</div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"Expira em"</div>
                                    <div class="stat-value text-sm">{move || session_view.with(|v| v.expires_at_display.clone())}</div>
                                </div>
                            </div>
                        </div>
                    </article>

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                        <article class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <div class="text-xs uppercase tracking-wide text-primary font-semibold">"Dados do Perfil"</div>
                                <h2 class="card-title">"Informações principais"</h2>
                                <table class="table table-sm">
                                    <tbody>
                                        <ProfileRow label="Nome completo" value=field(|v| v.full_name.clone()) />
                                        <ProfileRow label="E-mail" value=field(|v| v.email.clone()) />
                                        <ProfileRow label="Telefone" value=field(|v| v.phone_number.clone()) />
                                        <ProfileRow label="CPF" value=field(|v| v.cpf_display.clone()) />
                                        <ProfileRow label="Nascimento" value=field(|v| v.birth_date_display.clone()) />
                                    </tbody>
                                </table>
                            </div>
                        </article>

                        <article class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <div class="text-xs uppercase tracking-wide text-primary font-semibold">"Sessão"</div>
                                <h2 class="card-title">"Diagnóstico rápido"</h2>
                                <table class="table table-sm">
                                    <tbody>
                                        <tr>
                                            <th class="w-1/3">"Token presente"</th>
                                            <td>{move || yes_no(has_token())}</td>
                                        </tr>
                                        <tr>
                                            <th>"Payload válido"</th>
                                            <td>{move || yes_no(payload_valid())}</td>
                                        </tr>
                                        <tr>
                                            <th>"Expirado"</th>
                                            <td>{move || yes_no(session_view.with(|v| v.is_expired))}</td>
                                        </tr>
                                    </tbody>
                                </table>
                                <p class="text-sm text-base-content/60">
                                    "Se “Payload válido” = Não, geralmente é token corrompido, storage bloqueado, ou backend emitindo JWT fora do padrão."
                                </p>
                            </div>
                        </article>
                    </div>
                </section>
            </div>
        </div>
    }
}
