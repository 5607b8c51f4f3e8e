use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// HTTP 错误类型
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// 连接层失败（fetch 本身抛出 TypeError，如连接被拒绝、CORS）
    #[error("网络错误: {0}")]
    Network(String),
    /// 请求构建失败
    #[error("{0}")]
    Request(String),
    /// 响应读取失败
    #[error("{0}")]
    Response(String),
}

impl HttpError {
    pub fn is_network(&self) -> bool {
        matches!(self, HttpError::Network(_))
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", &format!("Bearer {}", token))
    }

    /// 序列化 JSON 请求体并设置 Content-Type
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, HttpError> {
        let body = serde_json::to_string(body).map_err(|e| HttpError::Request(e.to_string()))?;
        self.body = Some(body);
        Ok(self.with_header("Content-Type", "application/json"))
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for &T {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

#[cfg(test)]
pub struct MockHttpClient {
    // URL -> 响应或错误
    responses: RefCell<HashMap<String, Result<HttpResponse, HttpError>>>,
    pub requests: RefCell<Vec<RecordedRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: &str) {
        self.responses.borrow_mut().insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn mock_json(&self, url: &str, status: u16, body: serde_json::Value) {
        self.mock_response(url, status, &body.to_string());
    }

    pub fn mock_error(&self, url: &str, error: HttpError) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn request(&self, index: usize) -> RecordedRequest {
        self.requests.borrow()[index].clone()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: req.url.clone(),
            method: req.method,
            headers: req.headers.clone(),
            body: req.body.clone(),
        });

        match self.responses.borrow().get(&req.url) {
            Some(result) => result.clone(),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
