use crate::components::icons::RefreshCw;
use crate::components::navbar::DashboardNavbar;
use crate::session::{keeply_api, use_session};
use crate::web::router::use_router;
use keeply_shared::protocol::AGENT_STATUS_PATH;
use keeply_shared::{AgentProbe, AppRoute, ProbeResult, ProbeState};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 状态指示点的样式
fn status_dot_class(state: ProbeState) -> &'static str {
    match state {
        ProbeState::Online => "badge badge-success badge-xs",
        ProbeState::Loading => "badge badge-info badge-xs animate-pulse",
        ProbeState::Pending => "badge badge-warning badge-xs",
        ProbeState::Error => "badge badge-error badge-xs",
        ProbeState::Idle => "badge badge-ghost badge-xs",
    }
}

fn presence(value: bool) -> &'static str {
    if value { "Presente" } else { "Ausente" }
}

/// 将当前分区滚动到可视区域
fn scroll_to_section(id: &str) {
    if let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        el.scroll_into_view();
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let session_view = session.view;
    let base_url = keeply_api().config().base_url().to_string();

    let (probe, set_probe) = signal(ProbeResult::idle());

    let run_probe = move |access_token: Option<String>| {
        spawn_local(async move {
            let api = keeply_api();
            let result = AgentProbe::new(&api)
                .run(access_token.as_deref(), |r| set_probe.set(r))
                .await;
            tracing::debug!(state = result.state.as_str(), "agent probe finished");
        });
    };

    // 令牌变化时重新探测（包括首次挂载）
    let access_token = Memo::new(move |_| session.tokens.with(|t| t.access_token.clone()));
    Effect::new(move |_| run_probe(access_token.get()));

    Effect::new(move |_| {
        let section = router.current_section().get();
        if router.current_route().get_untracked() == AppRoute::Dashboard {
            scroll_to_section(section.key());
        }
    });

    let is_loading = move || probe.with(|p| p.state == ProbeState::Loading);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <DashboardNavbar />

                <div class="flex flex-col md:flex-row md:items-end justify-between gap-4">
                    <div>
                        <h1 class="text-3xl font-bold">"Dashboard"</h1>
                        <p class="text-base-content/70">
                            "Painel pós-login para integrar o frontend com o backend Spring e, em seguida, acompanhar a ponte segura com o agente local."
                        </p>
                    </div>
                    <button
                        on:click=move |_| run_probe(session.tokens.with_untracked(|t| t.access_token.clone()))
                        disabled=is_loading
                        class="btn btn-outline gap-2"
                    >
                        <RefreshCw attr:class=move || if is_loading() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                        {move || if is_loading() { "Verificando..." } else { "Atualizar status" }}
                    </button>
                </div>

                <section id="inicio" class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                    <article id="perfil" class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="text-xs uppercase tracking-wide text-primary font-semibold">"Sessão"</div>
                            <h2 class="card-title">"Autenticação do usuário"</h2>
                            <table class="table table-sm">
                                <tbody>
                                    <tr>
                                        <th>"Access token"</th>
                                        <td>{move || presence(session.tokens.with(|t| t.has_access_token()))}</td>
                                    </tr>
                                    <tr>
                                        <th>"Refresh token"</th>
                                        <td>{move || presence(session.tokens.with(|t| t.has_refresh_token()))}</td>
                                    </tr>
                                    <tr>
                                        <th>"E-mail (JWT)"</th>
                                        <td>{move || session_view.with(|v| v.email.clone())}</td>
                                    </tr>
                                    <tr>
                                        <th>"User ID (JWT)"</th>
                                        <td class="break-all">{move || session_view.with(|v| v.user_id.clone())}</td>
                                    </tr>
                                    <tr>
                                        <th>"Expira em"</th>
                                        <td>{move || session_view.with(|v| v.expires_at_display.clone())}</td>
                                    </tr>
                                </tbody>
                            </table>
                        </div>
                    </article>

                    <article id="agentes" class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="text-xs uppercase tracking-wide text-primary font-semibold">"Backend Spring"</div>
                            <h2 class="card-title">"Status da integração"</h2>
                            <div class="flex items-start gap-3 rounded-box bg-base-200 p-4">
                                <span class=move || status_dot_class(probe.with(|p| p.state)) aria-hidden="true"></span>
                                <div>
                                    <div class="font-semibold">{move || probe.with(|p| p.title.clone())}</div>
                                    <p class="text-sm text-base-content/70">{move || probe.with(|p| p.message.clone())}</p>
                                </div>
                            </div>
                            <table class="table table-sm">
                                <tbody>
                                    <tr>
                                        <th>"API base"</th>
                                        <td class="break-all">{base_url}</td>
                                    </tr>
                                    <tr>
                                        <th>"Endpoint esperado"</th>
                                        <td>{AGENT_STATUS_PATH}</td>
                                    </tr>
                                    <tr>
                                        <th>"HTTP status"</th>
                                        <td>
                                            {move || probe.with(|p| {
                                                p.status_code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
                                            })}
                                        </td>
                                    </tr>
                                    <tr>
                                        <th>"Última verificação"</th>
                                        <td>{move || probe.with(|p| p.checked_at_display())}</td>
                                    </tr>
                                </tbody>
                            </table>
                            {move || probe.with(|p| p.payload_preview.clone()).map(|preview| view! {
                                <pre class="mockup-code text-xs whitespace-pre-wrap px-4">{preview}</pre>
                            })}
                        </div>
                    </article>

                    <article id="configuracoes" class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="text-xs uppercase tracking-wide text-primary font-semibold">"Canal Seguro"</div>
                            <h2 class="card-title">"WebSocket do agente local (TLS)"</h2>
                            <p class="text-base-content/70">
                                "A dashboard foi preparada para refletir o estado da ponte segura entre o Spring e o agente local via WS/WSS com SSL/TLS. Quando o backend expor o endpoint de status, este painel pode mostrar:"
                            </p>
                            <ul class="list-disc list-inside text-sm space-y-1">
                                <li>"Estado do handshake TLS e certificado em uso"</li>
                                <li>"Último heartbeat do agente"</li>
                                <li>"Latência da conexão WS"</li>
                                <li>"Fila de comandos e respostas"</li>
                            </ul>
                        </div>
                    </article>

                    <article id="backups" class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="text-xs uppercase tracking-wide text-primary font-semibold">"Backups"</div>
                            <h2 class="card-title">"Operações mediadas pelo backend"</h2>
                            <p class="text-base-content/70">
                                "O fluxo esperado é: frontend autenticado → backend Spring → canal WS/TLS → agente local → APIs REST internas do agente."
                            </p>
                            <pre class="mockup-code text-xs px-4">
                                "GET  /api/agent/status\nGET  /api/agent/jobs\nPOST /api/agent/sync\nGET  /api/agent/rest-endpoints"
                            </pre>
                        </div>
                    </article>
                </section>
            </div>
        </div>
    }
}
