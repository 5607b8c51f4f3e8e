//! 会话模块
//!
//! 唯一持有令牌读写与订阅的上下文，组件不直接访问存储。
//! 路由服务通过注入的会话有效性信号来执行守卫。

use keeply_shared::jwt::decode_payload;
use keeply_shared::{
    ApiConfig, ApiError, KeeplyApi, SessionGate, SessionView, TokenPair, TokenStore,
};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use crate::web::{FetchHttpClient, LocalStorage};

/// 当前 Unix 秒
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 使用编译期配置构建 API 客户端
pub fn keeply_api() -> KeeplyApi<FetchHttpClient> {
    KeeplyApi::new(ApiConfig::from_env(), FetchHttpClient)
}

fn token_store() -> TokenStore<LocalStorage> {
    TokenStore::new(LocalStorage)
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 令牌（只读）
    pub tokens: ReadSignal<TokenPair>,
    set_tokens: WriteSignal<TokenPair>,
    /// 派生的展示数据
    pub view: Memo<SessionView>,
}

impl SessionContext {
    /// 创建新的会话上下文，并从存储加载令牌
    pub fn new() -> Self {
        let (tokens, set_tokens) = signal(token_store().read());
        let view = Memo::new(move |_| {
            let payload = decode_payload(tokens.get().access_token.as_deref());
            SessionView::derive(payload.as_ref(), now_secs())
        });
        Self {
            tokens,
            set_tokens,
            view,
        }
    }

    /// 会话有效性信号（用于路由服务注入）
    ///
    /// 令牌缺失、无法解码或已过期时为 `false`。
    pub fn has_session_signal(&self) -> Signal<bool> {
        let tokens = self.tokens;
        Signal::derive(move || SessionGate::evaluate(&tokens.get(), now_secs()).is_allowed())
    }

    /// 从存储重新读取令牌
    pub fn refresh(&self) {
        self.set_tokens.set(token_store().read());
    }

    /// 监听其他标签页对令牌的修改
    pub fn init_storage_listener(&self) {
        let ctx = *self;
        let closure = Closure::<dyn Fn(web_sys::StorageEvent)>::new(
            move |event: web_sys::StorageEvent| {
                let Some(key) = event.key() else {
                    return;
                };
                if TokenPair::is_token_key(&key) {
                    tracing::debug!(%key, "token changed in another tab");
                    ctx.refresh();
                }
            },
        );

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

/// 初始化会话上下文并注册跨标签页同步
pub fn provide_session() -> SessionContext {
    let ctx = SessionContext::new();
    ctx.init_storage_listener();
    provide_context(ctx);
    ctx
}

/// 登录并保存令牌
pub async fn login(ctx: &SessionContext, email: String, password: String) -> Result<(), ApiError> {
    keeply_api()
        .login_and_store(&token_store(), &email, &password)
        .await?;
    ctx.refresh();
    Ok(())
}

/// 注销：清除两个令牌
///
/// 导航由路由服务的会话状态监听自动处理。
pub fn logout(ctx: &SessionContext) {
    token_store().clear();
    ctx.refresh();
    tracing::info!("logged out");
}
