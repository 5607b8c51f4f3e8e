//! 会话派生模块
//!
//! 从 JWT 载荷派生只读的展示数据（`SessionView`），并提供页面守卫判定。
//! 载荷中的每个字段都可能缺失或类型不符，逐个做类型检查。

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::jwt::{TokenPayload, decode_payload};
use crate::storage::TokenPair;

pub const NOT_AVAILABLE: &str = "Não disponível";
pub const NOT_INFORMED: &str = "Não informado";
pub const DEFAULT_NAME: &str = "Usuário";
pub const DEFAULT_INITIALS: &str = "US";

pub(crate) const DATE_TIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";
const DATE_FORMAT: &str = "%d/%m/%Y";

// =========================================================
// 字段读取
// =========================================================

fn claim_str<'a>(payload: Option<&'a TokenPayload>, key: &str) -> Option<&'a str> {
    payload?.get(key)?.as_str()
}

/// `user_metadata` 对象（非对象时视为缺失）
pub fn user_metadata(payload: Option<&TokenPayload>) -> Option<&Map<String, Value>> {
    payload?.get("user_metadata")?.as_object()
}

fn metadata_str<'a>(payload: Option<&'a TokenPayload>, key: &str) -> Option<&'a str> {
    user_metadata(payload)?.get(key)?.as_str()
}

/// `exp` 声明（Unix 秒），仅接受数字
pub fn expiry_secs(payload: Option<&TokenPayload>) -> Option<f64> {
    payload?
        .get("exp")?
        .as_f64()
        .filter(|exp| exp.is_finite())
}

/// 令牌是否已过期：缺失 `exp` 视为未过期
pub fn is_expired(exp: Option<f64>, now_secs: i64) -> bool {
    match exp {
        Some(exp) => exp <= now_secs as f64,
        None => false,
    }
}

// =========================================================
// 名称派生
// =========================================================

fn email_local_part(email: &str) -> Option<&str> {
    if email.is_empty() || email == NOT_AVAILABLE {
        return None;
    }
    email.split('@').next().filter(|local| !local.is_empty())
}

/// 展示名称：full_name > 邮箱本地部分 > "Usuário"
pub fn display_name(payload: Option<&TokenPayload>, email: &str) -> String {
    let full_name = metadata_str(payload, "full_name").map(str::trim).unwrap_or("");
    if !full_name.is_empty() {
        return full_name.to_string();
    }
    email_local_part(email)
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

fn strip_diacritics(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// 头像缩写：去除变音符号后取前两个单词的首字母
pub fn initials(name: &str) -> String {
    if name.trim().is_empty() {
        return DEFAULT_INITIALS.to_string();
    }
    let base = strip_diacritics(name);

    let letters: String = base
        .split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();

    if letters.is_empty() {
        DEFAULT_INITIALS.to_string()
    } else {
        letters
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower == "usuário" || lower == "usuario"
}

/// 导航栏短名称：名称的第一个单词，占位名称时改用邮箱本地部分
pub fn short_name(name: &str, email: &str) -> String {
    let name = name.trim();
    let base = if !name.is_empty() && !is_placeholder_name(name) {
        name
    } else {
        email_local_part(email).unwrap_or(DEFAULT_NAME)
    };
    base.split_whitespace()
        .next()
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

// =========================================================
// 格式化
// =========================================================

/// CPF 掩码：恰好 11 位数字时格式化，否则原样返回
pub fn mask_cpf(value: Option<&Value>) -> String {
    let Some(raw) = value.and_then(Value::as_str) else {
        return NOT_INFORMED.to_string();
    };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 11 {
        return raw.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..]
    )
}

/// 将 Unix 秒格式化为指定时区的日期时间
pub fn format_unix_date_in<Tz>(value: Option<&Value>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(secs) = value.and_then(Value::as_f64).filter(|v| v.is_finite()) else {
        return NOT_INFORMED.to_string();
    };
    match DateTime::from_timestamp_millis((secs * 1000.0) as i64) {
        Some(utc) => utc.with_timezone(tz).format(DATE_TIME_FORMAT).to_string(),
        None => NOT_INFORMED.to_string(),
    }
}

/// 将 Unix 秒格式化为本地日期时间
pub fn format_unix_date(value: Option<&Value>) -> String {
    format_unix_date_in(value, &Local)
}

/// 出生日期：接受 `YYYY-MM-DD` 或完整的 RFC 3339，无法解析时原样返回
pub fn format_birth_date(value: Option<&Value>) -> String {
    let Some(raw) = value.and_then(Value::as_str).filter(|v| !v.trim().is_empty()) else {
        return NOT_INFORMED.to_string();
    };
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format(DATE_FORMAT).to_string();
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return date_time
            .with_timezone(&Local)
            .format(DATE_FORMAT)
            .to_string();
    }
    raw.to_string()
}

// =========================================================
// SessionView
// =========================================================

/// 令牌状态徽章
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryBadge {
    Expired,
    Active,
    Undefined,
}

impl ExpiryBadge {
    pub fn label(&self) -> &'static str {
        match self {
            ExpiryBadge::Expired => "Expirado",
            ExpiryBadge::Active => "Ativo",
            ExpiryBadge::Undefined => "Indefinido",
        }
    }
}

/// 令牌的只读展示投影，每次令牌变化时重新计算
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub name: String,
    pub short_name: String,
    pub initials: String,
    pub email: String,
    pub user_id: String,
    pub role: String,
    pub expires_at_display: String,
    pub is_expired: bool,
    pub expiry_badge: ExpiryBadge,
    /// full_name 原值，缺失时回退为展示名称
    pub full_name: String,
    pub phone_number: String,
    pub cpf_display: String,
    pub birth_date_display: String,
}

impl SessionView {
    /// 从载荷派生（载荷缺失时所有字段都是占位值）
    pub fn derive(payload: Option<&TokenPayload>, now_secs: i64) -> Self {
        Self::derive_in(payload, now_secs, &Local)
    }

    pub fn derive_in<Tz>(payload: Option<&TokenPayload>, now_secs: i64, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let email = claim_str(payload, "email").unwrap_or(NOT_AVAILABLE).to_string();
        let user_id = claim_str(payload, "sub").unwrap_or(NOT_AVAILABLE).to_string();
        let role = claim_str(payload, "role").unwrap_or(NOT_INFORMED).to_string();
        let name = display_name(payload, &email);

        let exp = expiry_secs(payload);
        let is_expired = is_expired(exp, now_secs);
        let expiry_badge = if is_expired {
            ExpiryBadge::Expired
        } else if exp.is_some() {
            ExpiryBadge::Active
        } else {
            ExpiryBadge::Undefined
        };

        let full_name = metadata_str(payload, "full_name")
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());
        let phone_number = metadata_str(payload, "phone_number")
            .unwrap_or(NOT_INFORMED)
            .to_string();
        let metadata = user_metadata(payload);

        Self {
            short_name: short_name(&name, &email),
            initials: initials(&name),
            expires_at_display: format_unix_date_in(payload.and_then(|p| p.get("exp")), tz),
            cpf_display: mask_cpf(metadata.and_then(|m| m.get("cpf"))),
            birth_date_display: format_birth_date(metadata.and_then(|m| m.get("birth_date"))),
            name,
            email,
            user_id,
            role,
            is_expired,
            expiry_badge,
            full_name,
            phone_number,
        }
    }
}

// =========================================================
// 页面守卫
// =========================================================

/// 受保护页面的守卫结果
#[derive(Debug, Clone, PartialEq)]
pub enum SessionGate {
    /// 会话有效，附带派生数据
    Allowed(Box<SessionView>),
    /// 令牌缺失、无法解码或已过期
    RedirectToLogin,
}

impl SessionGate {
    pub fn evaluate(tokens: &TokenPair, now_secs: i64) -> Self {
        let Some(payload) = decode_payload(tokens.access_token.as_deref()) else {
            return SessionGate::RedirectToLogin;
        };
        let view = SessionView::derive(Some(&payload), now_secs);
        if view.is_expired {
            return SessionGate::RedirectToLogin;
        }
        SessionGate::Allowed(Box::new(view))
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, SessionGate::Allowed(_))
    }
}

#[cfg(test)]
mod tests;
