//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History / Location API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 同时跟踪控制面板导航栏的激活分区（path + hash）。

use keeply_shared::{AppRoute, Section};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 获取当前 hash
fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 仅在值变化时写入信号，返回是否写入
///
/// 信号的 `set` 不比较新旧值，相同的值也会通知所有订阅者。
fn set_if_changed<T>(read: ReadSignal<T>, write: WriteSignal<T>, value: T) -> bool
where
    T: PartialEq + Send + Sync + 'static,
{
    if read.with_untracked(|current| *current == value) {
        return false;
    }
    write.set(value);
    true
}

/// 注册 window 事件监听并泄漏闭包以保持监听器存活
fn listen_window(event: &str, callback: impl Fn() + 'static) {
    let closure = Closure::<dyn Fn()>::new(callback);
    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话有效性信号实现与会话系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 当前导航分区
    current_section: ReadSignal<Section>,
    set_section: WriteSignal<Section>,
    /// 浏览器实际路径（未知路径不会被归一化）
    current_pathname: ReadSignal<String>,
    set_pathname: WriteSignal<String>,
    /// 会话是否有效（注入的信号，实现解耦）
    has_session: Signal<bool>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `has_session` - 会话有效性信号，由外部注入实现解耦
    fn new(has_session: Signal<bool>) -> Self {
        // 1. 从 URL 解析初始路由
        let path = current_path();
        let mut initial_route = AppRoute::from_path(&path);

        // 2. 初始页面同样经过守卫
        if initial_route.requires_session() && !has_session.get_untracked() {
            tracing::info!(route = %initial_route, "[Router] No valid session. Redirecting to login.");
            initial_route = AppRoute::session_failure_redirect();
            replace_history_state(initial_route.to_path());
        }

        let (current_route, set_route) = signal(initial_route);
        let (current_section, set_section) = signal(Section::from_location(
            initial_route.to_path(),
            &current_hash(),
        ));
        let (current_pathname, set_pathname) = signal(current_path());

        Self {
            current_route,
            set_route,
            current_section,
            set_section,
            current_pathname,
            set_pathname,
            has_session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 获取浏览器路径信号，只在路径改变时通知
    pub fn current_pathname(&self) -> ReadSignal<String> {
        self.current_pathname
    }

    /// 获取当前分区信号
    pub fn current_section(&self) -> ReadSignal<Section> {
        self.current_section
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载。`to` 可以携带 hash，
    /// 例如 `/dashboard#agentes`。
    pub fn navigate(&self, to: &str) {
        let (path, hash) = match to.split_once('#') {
            Some((path, hash)) => (path, Some(hash)),
            None => (to, None),
        };
        // 仅有 hash 时停留在当前页面
        let target_route = if path.is_empty() {
            self.current_route.get_untracked()
        } else {
            AppRoute::from_path(path)
        };

        // --- Step 1: 验证目标路由 ---
        if target_route.requires_session() && !self.has_session.get_untracked() {
            tracing::info!(route = %target_route, "[Router] Access denied. Redirecting to login.");
            let redirect = AppRoute::session_failure_redirect();
            push_history_state(redirect.to_path());
            self.load(redirect, "");
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        let hash = hash.map(|h| format!("#{}", h)).unwrap_or_default();
        push_history_state(&format!("{}{}", target_route.to_path(), hash));
        self.load(target_route, &hash);
    }

    /// 更新路由与分区信号
    ///
    /// 同一页面内的 hash 变化只更新分区，页面不会重新挂载。
    fn load(&self, route: AppRoute, hash: &str) {
        set_if_changed(self.current_route, self.set_route, route);
        set_if_changed(self.current_pathname, self.set_pathname, current_path());
        self.set_section
            .set(Section::from_location(route.to_path(), hash));
    }

    /// 初始化浏览器后退/前进与 hash 变化监听
    fn init_location_listeners(&self) {
        let router = *self;
        let sync = move || {
            let target_route = AppRoute::from_path(&current_path());

            // popstate 时也执行守卫逻辑
            if target_route.requires_session() && !router.has_session.get_untracked() {
                let redirect = AppRoute::session_failure_redirect();
                replace_history_state(redirect.to_path());
                router.load(redirect, "");
            } else {
                router.load(target_route, &current_hash());
            }
        };

        listen_window("popstate", sync);
        listen_window("hashchange", sync);
    }

    /// 会话状态变化时的自动重定向（注销、令牌过期、其他标签页清除令牌）
    fn setup_session_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let has_session = router.has_session.get();
            let route = router.current_route.get_untracked();

            if !has_session && route.requires_session() {
                let redirect = AppRoute::session_failure_redirect();
                push_history_state(redirect.to_path());
                router.load(redirect, "");
                tracing::info!("[Router] Session ended, redirecting to login.");
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(has_session: Signal<bool>) -> RouterService {
    let router = RouterService::new(has_session);

    router.init_location_listeners();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话有效性信号
    has_session: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(has_session);

    children()
}

/// 应用内链接
///
/// 拦截点击并交给路由服务处理，避免整页刷新。
#[component]
pub fn Link(
    /// 目标地址，可以是 `/path`、`/path#hash` 或 `#hash`
    #[prop(into)]
    href: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let target = href.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

#[cfg(test)]
mod tests;
