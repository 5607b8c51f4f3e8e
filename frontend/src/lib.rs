//! Keeply 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话上下文（令牌读写与跨标签页同步）
//! - `components`: UI 组件层

mod components {
    mod icons;
    pub mod dashboard;
    pub mod landing;
    pub mod login;
    pub mod navbar;
    pub mod profile;
    pub mod register;
}
pub mod session;

use crate::components::dashboard::DashboardPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::session::provide_session;

use keeply_shared::{ApiConfig, AppRoute};
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub mod web {
    pub mod beacon;
    pub mod console;
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::LocalStorage;
}

use web::router::{Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
    }
}

/// 浏览器路径变化时上报 page_view（hash 变化不上报）
#[component]
fn PageViewReporter() -> impl IntoView {
    let router = use_router();
    let config = ApiConfig::from_env();

    Effect::new(move |_| {
        let path = router.current_pathname().get();
        web::beacon::report_page_view(&config, &path);
    });
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文（从 LocalStorage 加载令牌并监听其他标签页）
    let session = provide_session();

    // 2. 获取会话有效性信号，用于注入路由服务
    let has_session = session.has_session_signal();

    view! {
        // 3. 路由器组件：注入会话信号实现守卫
        <Router has_session=has_session>
            <PageViewReporter />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
