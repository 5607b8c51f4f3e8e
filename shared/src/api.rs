//! Keeply API 客户端
//!
//! 封装登录、注册与指标上报，以及响应体的容错解析规则。

use serde_json::{Value, json};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::protocol::{
    ApiRequest, LoginRequest, LoginResponse, MetricEvent, RegisterForm, RegisterRequest,
};
use crate::request::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::storage::{KeyValueStore, TokenStore};

/// 预览最大字符数
pub const PREVIEW_MAX_CHARS: usize = 320;

const LOGIN_FALLBACK: &str = "Falha no login";
const REGISTER_FALLBACK: &str = "Falha no cadastro";
const TERMS_REQUIRED: &str = "Você precisa aceitar os termos.";

/// API 错误
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// fetch 本身失败，无法连接到后端
    #[error("Não foi possível conectar ao backend. Verifique se a API está rodando em {base_url}.")]
    Unreachable { base_url: String },
    /// 非 2xx 响应
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// 客户端校验失败（未发出请求）
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Http(HttpError),
}

// =========================================================
// 响应体解析
// =========================================================

/// 容错解析响应体：空串为 `None`，非 JSON 包装为 `{ "message": text }`
pub fn safe_json(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(_) => Some(json!({ "message": text })),
    }
}

/// 生成有长度上限的格式化预览
pub fn preview_payload(data: Option<&Value>) -> Option<String> {
    let data = data.filter(|v| !v.is_null())?;
    let raw = serde_json::to_string_pretty(data).ok()?;
    if raw.chars().count() > PREVIEW_MAX_CHARS {
        let head: String = raw.chars().take(PREVIEW_MAX_CHARS).collect();
        Some(format!("{}...", head))
    } else {
        Some(raw)
    }
}

/// 将 JSON 值转换为消息文本（空值与 false 视为无消息）
fn value_to_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 登录失败消息：`message` 字段，否则为通用提示
pub fn login_error_message(data: Option<&Value>) -> String {
    data.and_then(|d| d.get("message"))
        .and_then(value_to_message)
        .unwrap_or_else(|| LOGIN_FALLBACK.to_string())
}

/// 注册失败消息：第一个非空字段错误优先，其次 `message`，最后通用提示
pub fn register_error_message(data: Option<&Value>) -> String {
    let Some(data) = data.and_then(Value::as_object) else {
        return REGISTER_FALLBACK.to_string();
    };

    let field_error = data
        .get("fields")
        .and_then(Value::as_object)
        .and_then(|fields| fields.values().find_map(value_to_message));
    if let Some(message) = field_error {
        return message;
    }

    data.get("message")
        .and_then(value_to_message)
        .unwrap_or_else(|| REGISTER_FALLBACK.to_string())
}

/// 按请求声明的响应类型解析响应体，失败时返回 `None`
pub fn decode_response<R: ApiRequest>(data: Option<Value>) -> Option<R::Response> {
    data.and_then(|d| serde_json::from_value(d).ok())
}

// =========================================================
// API 客户端
// =========================================================

#[derive(Clone, Debug)]
pub struct KeeplyApi<C> {
    config: ApiConfig,
    client: C,
}

impl<C: HttpClient> KeeplyApi<C> {
    pub fn new(config: ApiConfig, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 构建带 JSON 请求体的请求
    pub fn build<R: ApiRequest>(&self, body: &R) -> Result<HttpRequest, HttpError> {
        HttpRequest::new(&self.config.api_url(R::PATH), R::METHOD).with_json(body)
    }

    fn map_http_error(&self, err: HttpError) -> ApiError {
        if err.is_network() {
            ApiError::Unreachable {
                base_url: self.config.base_url().to_string(),
            }
        } else {
            ApiError::Http(err)
        }
    }

    async fn send<R: ApiRequest>(&self, body: &R) -> Result<HttpResponse, ApiError> {
        let req = self.build(body).map_err(ApiError::Http)?;
        self.client
            .send(req)
            .await
            .map_err(|e| self.map_http_error(e))
    }

    /// 登录，返回令牌（不写入存储）
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let res = self.send(&LoginRequest::new(email, password)).await?;
        let data = safe_json(&res.body);

        if !res.ok() {
            let message = login_error_message(data.as_ref());
            tracing::warn!(status = res.status, %message, "login rejected");
            return Err(ApiError::Rejected {
                status: res.status,
                message,
            });
        }

        // 2xx 但响应体不是预期结构时视为没有令牌
        Ok(decode_response::<LoginRequest>(data).unwrap_or_default())
    }

    /// 登录并保存返回的令牌
    pub async fn login_and_store<S: KeyValueStore>(
        &self,
        store: &TokenStore<S>,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let tokens = self.login(email, password).await?;
        store.save(
            tokens.access_token.as_deref(),
            tokens.refresh_token.as_deref(),
        );
        tracing::info!(
            access = tokens.access_token.is_some(),
            refresh = tokens.refresh_token.is_some(),
            "login succeeded"
        );
        Ok(tokens)
    }

    /// 注册账户，任意 2xx 视为成功
    pub async fn register(&self, form: &RegisterForm) -> Result<(), ApiError> {
        if !form.accepted_terms {
            return Err(ApiError::Validation(TERMS_REQUIRED.to_string()));
        }

        let res = self.send(&RegisterRequest::from(form)).await?;
        if !res.ok() {
            let message = register_error_message(safe_json(&res.body).as_ref());
            tracing::warn!(status = res.status, %message, "register rejected");
            return Err(ApiError::Rejected {
                status: res.status,
                message,
            });
        }
        Ok(())
    }

    /// 发送指标事件并返回原始响应
    pub async fn post_metric(&self, event: &MetricEvent) -> Result<HttpResponse, ApiError> {
        self.send(event).await
    }
}
