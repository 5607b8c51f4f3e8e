//! 客户端配置模块
//!
//! API 基础地址在编译期通过 `KEEPLY_API_URL` 注入，未设置时使用本地开发地址。

/// 默认 API 地址（本地 Spring 后端）
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8081";

/// API 配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        Self { base_url }
    }

    /// 从编译期环境读取配置，读不到就用默认值
    pub fn from_env() -> Self {
        Self::new(option_env!("KEEPLY_API_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 拼接完整的 API URL
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
