//! 连接探测状态机
//!
//! `Idle -> Loading -> {Online, Pending, Error}`。每次触发都重新进入
//! `Loading` 并产出新的终态，不合并并发探测，后完成的结果覆盖先前结果。

use chrono::{DateTime, Local, Utc};

use crate::api::{KeeplyApi, preview_payload, safe_json};
use crate::protocol::{AGENT_STATUS_PATH, MetricEvent};
use crate::request::{HttpClient, HttpMethod, HttpRequest};
use crate::session::DATE_TIME_FORMAT;

/// 探测状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeState {
    #[default]
    Idle,
    Loading,
    Online,
    Pending,
    Error,
}

impl ProbeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeState::Idle => "idle",
            ProbeState::Loading => "loading",
            ProbeState::Online => "online",
            ProbeState::Pending => "pending",
            ProbeState::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProbeState::Online | ProbeState::Pending | ProbeState::Error
        )
    }
}

/// 探测结果，每次探测整体覆盖
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub state: ProbeState,
    pub title: String,
    pub message: String,
    pub status_code: Option<u16>,
    pub payload_preview: Option<String>,
    pub checked_at: Option<DateTime<Utc>>,
}

impl ProbeResult {
    fn new(state: ProbeState, title: &str, message: impl Into<String>) -> Self {
        Self {
            state,
            title: title.to_string(),
            message: message.into(),
            status_code: None,
            payload_preview: None,
            checked_at: Some(Utc::now()),
        }
    }

    fn with_response(mut self, status: u16, preview: Option<String>) -> Self {
        self.status_code = Some(status);
        self.payload_preview = preview;
        self
    }

    /// 首次渲染时的初始状态
    pub fn idle() -> Self {
        Self {
            state: ProbeState::Idle,
            title: "Aguardando verificação".to_string(),
            message: "A dashboard está pronta para consultar o backend Spring e exibir o status da integração com o agente local.".to_string(),
            status_code: None,
            payload_preview: None,
            checked_at: None,
        }
    }

    pub fn loading() -> Self {
        Self::new(
            ProbeState::Loading,
            "Consultando backend Spring",
            format!(
                "Tentando buscar {} com o token da sessão.",
                AGENT_STATUS_PATH
            ),
        )
    }

    /// 最近一次检查时间（本地时区），未检查时为 "-"
    pub fn checked_at_display(&self) -> String {
        match self.checked_at {
            Some(at) => at.with_timezone(&Local).format(DATE_TIME_FORMAT).to_string(),
            None => "-".to_string(),
        }
    }

    pub fn session_missing() -> Self {
        Self::new(
            ProbeState::Error,
            "Sessão não encontrada",
            "Faça login novamente para acessar a dashboard.",
        )
    }
}

impl Default for ProbeResult {
    fn default() -> Self {
        Self::idle()
    }
}

/// 代理状态探测器
pub struct AgentProbe<'a, C> {
    api: &'a KeeplyApi<C>,
}

impl<'a, C: HttpClient> AgentProbe<'a, C> {
    pub fn new(api: &'a KeeplyApi<C>) -> Self {
        Self { api }
    }

    /// 执行一次探测，依次发布中间状态与终态，并返回终态
    pub async fn run<F>(&self, access_token: Option<&str>, mut publish: F) -> ProbeResult
    where
        F: FnMut(ProbeResult),
    {
        let Some(token) = access_token.filter(|t| !t.is_empty()) else {
            let result = ProbeResult::session_missing();
            publish(result.clone());
            return result;
        };

        publish(ProbeResult::loading());
        let result = self.probe(token).await;
        tracing::info!(
            state = result.state.as_str(),
            status = ?result.status_code,
            "agent status probe finished"
        );
        publish(result.clone());
        result
    }

    async fn probe(&self, token: &str) -> ProbeResult {
        let base_url = self.api.config().base_url();
        let req = HttpRequest::new(&self.api.config().api_url(AGENT_STATUS_PATH), HttpMethod::Get)
            .with_bearer(token)
            .with_header("Accept", "application/json");

        let res = match self.api.client().send(req).await {
            Ok(res) => res,
            Err(err) => {
                tracing::warn!(error = %err, "agent status request failed");
                let message = if err.is_network() {
                    format!(
                        "Não foi possível conectar ao backend em {}. Verifique se o Spring Boot está rodando e com CORS liberado para o frontend.",
                        base_url
                    )
                } else {
                    err.to_string()
                };
                return ProbeResult::new(ProbeState::Error, "Falha de conexão", message);
            }
        };

        let status = res.status;
        let preview = preview_payload(safe_json(&res.body).as_ref());

        if res.ok() {
            return ProbeResult::new(
                ProbeState::Online,
                "Integração online",
                "Backend respondeu com sucesso ao endpoint de status do agente. A dashboard já pode consumir dados reais.",
            )
            .with_response(status, preview);
        }

        match status {
            404 => {
                let result = if self.confirm_backend_reachability().await {
                    ProbeResult::new(
                        ProbeState::Pending,
                        "Backend online, endpoint pendente",
                        format!(
                            "O Spring está acessível, mas {} ainda não foi implementado. Quando você expuser esse endpoint, a dashboard passa a mostrar o status real.",
                            AGENT_STATUS_PATH
                        ),
                    )
                } else {
                    ProbeResult::new(
                        ProbeState::Error,
                        "Endpoint do agente não encontrado",
                        format!(
                            "O backend não respondeu ao teste alternativo de conectividade. Verifique se a API Spring está rodando em {}.",
                            base_url
                        ),
                    )
                };
                result.with_response(status, preview)
            }
            401 | 403 => ProbeResult::new(
                ProbeState::Error,
                "Token rejeitado",
                "O backend recusou o token da sessão. Faça login novamente ou ajuste a autenticação do endpoint protegido.",
            )
            .with_response(status, preview),
            _ => ProbeResult::new(
                ProbeState::Error,
                "Resposta inesperada do backend",
                "A comunicação com o backend aconteceu, mas o endpoint retornou um status não esperado para a dashboard.",
            )
            .with_response(status, preview),
        }
    }

    /// 二次可达性检查：向指标端点发送一次合成事件
    ///
    /// 任何失败都折算为 `false`，不单独产生错误状态。
    async fn confirm_backend_reachability(&self) -> bool {
        match self.api.post_metric(&MetricEvent::dashboard_probe()).await {
            Ok(res) => res.ok(),
            Err(err) => {
                tracing::debug!(error = %err, "reachability check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests;
