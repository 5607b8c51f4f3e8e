//! Keeply 客户端核心
//!
//! 与平台无关的会话、探测与路由逻辑，前端（WASM）与原生测试共用：
//! - `storage`: 令牌存取
//! - `jwt` / `session`: 令牌解码与展示数据派生
//! - `request` / `api` / `protocol`: HTTP 抽象与 Keeply API
//! - `probe`: 代理状态探测状态机
//! - `route`: 页面与导航分区解析

pub mod api;
pub mod config;
pub mod jwt;
pub mod probe;
pub mod protocol;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;

pub use api::{ApiError, KeeplyApi};
pub use config::ApiConfig;
pub use probe::{AgentProbe, ProbeResult, ProbeState};
pub use route::{AppRoute, Section};
pub use session::{SessionGate, SessionView};
pub use storage::{KeyValueStore, TokenPair, TokenStore};
