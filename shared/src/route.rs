//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有页面、导航分区及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页 (默认路由)
    #[default]
    Landing,
    Login,
    Register,
    /// 控制面板 (需要有效会话)
    Dashboard,
    /// 个人资料 (需要有效会话)
    Profile,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举，未知路径回退到落地页
    pub fn from_path(path: &str) -> Self {
        match path {
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            _ => Self::Landing,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要有效会话**
    pub fn requires_session(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Profile)
    }

    /// 获取会话无效时的重定向目标
    pub fn session_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录成功后的跳转目标
    pub fn login_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 是否渲染控制面板导航栏（带分区）
    pub fn has_sections(&self) -> bool {
        self.requires_session()
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 控制面板导航分区（按声明顺序，第一个为默认）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Inicio,
    Agentes,
    Backups,
    Configuracoes,
    Perfil,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Inicio,
        Section::Agentes,
        Section::Backups,
        Section::Configuracoes,
        Section::Perfil,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Inicio => "inicio",
            Section::Agentes => "agentes",
            Section::Backups => "backups",
            Section::Configuracoes => "configuracoes",
            Section::Perfil => "perfil",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Inicio => "Inicio",
            Section::Agentes => "Agentes",
            Section::Backups => "Backups",
            Section::Configuracoes => "Configurações",
            Section::Perfil => "Perfil",
        }
    }

    pub fn default_section() -> Self {
        Self::ALL[0]
    }

    /// 解析 hash（忽略大小写，去掉前导 `#`），无法识别时返回 `None`
    pub fn from_hash(hash: &str) -> Option<Self> {
        let value = hash.strip_prefix('#').unwrap_or(hash).trim().to_lowercase();
        if value.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|section| section.key() == value)
    }

    /// 根据当前位置确定激活分区；资料页始终为 `perfil`
    pub fn from_location(path: &str, hash: &str) -> Self {
        if path == AppRoute::Profile.to_path() {
            return Section::Perfil;
        }
        Self::from_hash(hash).unwrap_or_else(Self::default_section)
    }

    /// 构建分区链接
    pub fn href(&self, current_path: &str) -> String {
        if *self == Section::Perfil {
            return AppRoute::Profile.to_path().to_string();
        }
        if current_path == AppRoute::Dashboard.to_path() {
            format!("#{}", self.key())
        } else {
            format!("{}#{}", AppRoute::Dashboard.to_path(), self.key())
        }
    }
}
