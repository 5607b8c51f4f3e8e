//! JWT 载荷解码
//!
//! 仅用于展示与页面守卫：不校验签名，解码结果绝不能作为授权依据。

use base64::{Engine as _, engine::general_purpose};
use serde_json::{Map, Value};

/// 解码后的 JWT 载荷
pub type TokenPayload = Map<String, Value>;

/// 解码紧凑格式令牌的第二段
///
/// 任何失败（段数不足、base64 非法、JSON 非法、非对象）都返回 `None`。
pub fn decode_payload(token: Option<&str>) -> Option<TokenPayload> {
    let token = token.filter(|t| !t.is_empty())?;
    let mut parts = token.split('.');
    let segment = match (parts.next(), parts.next()) {
        (Some(_), Some(segment)) => segment,
        _ => return None,
    };

    let mut base64 = segment.replace('-', "+").replace('_', "/");
    while base64.len() % 4 != 0 {
        base64.push('=');
    }

    let bytes = general_purpose::STANDARD.decode(base64).ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
