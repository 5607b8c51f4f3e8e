use super::*;
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

const NOW: i64 = 1_760_000_000;

fn payload(value: Value) -> TokenPayload {
    match value {
        Value::Object(map) => map,
        _ => panic!("payload must be an object"),
    }
}

fn token_for(value: Value) -> String {
    let body = general_purpose::URL_SAFE_NO_PAD.encode(value.to_string());
    format!("header.{}.signature", body)
}

fn tokens_with(access: Option<String>) -> TokenPair {
    TokenPair {
        access_token: access,
        refresh_token: Some("refresh".to_string()),
    }
}

// =========================================================
// 名称派生
// =========================================================

#[test]
fn test_display_name_prefers_full_name() {
    let p = payload(json!({
        "email": "ana@keeply.com",
        "user_metadata": { "full_name": "  Ana Souza  " }
    }));
    assert_eq!(display_name(Some(&p), "ana@keeply.com"), "Ana Souza");
}

#[test]
fn test_display_name_falls_back_to_email_local_part() {
    let p = payload(json!({ "user_metadata": { "full_name": "   " } }));
    assert_eq!(display_name(Some(&p), "bruno.lima@keeply.com"), "bruno.lima");
}

#[test]
fn test_display_name_ignores_sentinel_email() {
    assert_eq!(display_name(None, NOT_AVAILABLE), DEFAULT_NAME);
    assert_eq!(display_name(None, "@keeply.com"), DEFAULT_NAME);
}

#[test]
fn test_display_name_ignores_non_string_full_name() {
    let p = payload(json!({ "user_metadata": { "full_name": 42 } }));
    assert_eq!(display_name(Some(&p), "carla@keeply.com"), "carla");
}

#[test]
fn test_initials_strip_diacritics() {
    assert_eq!(initials("Élio Çarvalho"), "EC");
    assert_eq!(initials("joão"), "J");
}

#[test]
fn test_initials_use_first_two_words() {
    assert_eq!(initials("maria da silva santos"), "MD");
}

#[test]
fn test_initials_fallback() {
    assert_eq!(initials(""), DEFAULT_INITIALS);
    assert_eq!(initials("   "), DEFAULT_INITIALS);
    assert_eq!(initials("\t\n"), DEFAULT_INITIALS);
    // 只有组合符号时同样回退
    assert_eq!(initials("\u{0301}"), DEFAULT_INITIALS);
}

#[test]
fn test_short_name() {
    assert_eq!(short_name("Ana Souza", "ana@keeply.com"), "Ana");
    assert_eq!(short_name("Usuário", "bruno@keeply.com"), "bruno");
    assert_eq!(short_name("usuario", NOT_AVAILABLE), DEFAULT_NAME);
}

// =========================================================
// 过期判定
// =========================================================

#[test]
fn test_expiry_rules() {
    assert!(is_expired(Some((NOW - 1) as f64), NOW));
    assert!(is_expired(Some(NOW as f64), NOW));
    assert!(!is_expired(Some((NOW + 1) as f64), NOW));
    assert!(!is_expired(None, NOW));
}

#[test]
fn test_non_numeric_exp_is_ignored() {
    let p = payload(json!({ "exp": "1700000000" }));
    assert_eq!(expiry_secs(Some(&p)), None);

    let view = SessionView::derive_in(Some(&p), NOW, &Utc);
    assert!(!view.is_expired);
    assert_eq!(view.expiry_badge, ExpiryBadge::Undefined);
    assert_eq!(view.expires_at_display, NOT_INFORMED);
}

#[test]
fn test_expiry_badges() {
    let active = payload(json!({ "exp": NOW + 3600 }));
    let expired = payload(json!({ "exp": NOW - 1 }));

    let view = SessionView::derive_in(Some(&active), NOW, &Utc);
    assert_eq!(view.expiry_badge.label(), "Ativo");

    let view = SessionView::derive_in(Some(&expired), NOW, &Utc);
    assert!(view.is_expired);
    assert_eq!(view.expiry_badge.label(), "Expirado");

    let view = SessionView::derive_in(None, NOW, &Utc);
    assert_eq!(view.expiry_badge.label(), "Indefinido");
}

// =========================================================
// 格式化
// =========================================================

#[test]
fn test_cpf_mask() {
    assert_eq!(mask_cpf(Some(&json!("12345678901"))), "123.456.789-01");
    assert_eq!(mask_cpf(Some(&json!("123.456.789-01"))), "123.456.789-01");
    assert_eq!(mask_cpf(Some(&json!("123"))), "123");
    assert_eq!(mask_cpf(Some(&json!(12345678901u64))), NOT_INFORMED);
    assert_eq!(mask_cpf(None), NOT_INFORMED);
}

#[test]
fn test_unix_date_formatting() {
    // 2025-10-09 08:53:20 UTC
    assert_eq!(
        format_unix_date_in(Some(&json!(NOW)), &Utc),
        "09/10/2025, 08:53:20"
    );
    assert_eq!(format_unix_date_in(Some(&json!("soon")), &Utc), NOT_INFORMED);
    assert_eq!(format_unix_date_in(None, &Utc), NOT_INFORMED);
}

#[test]
fn test_birth_date_formatting() {
    assert_eq!(format_birth_date(Some(&json!("1990-04-21"))), "21/04/1990");
    assert_eq!(format_birth_date(Some(&json!("ontem"))), "ontem");
    assert_eq!(format_birth_date(Some(&json!("  "))), NOT_INFORMED);
    assert_eq!(format_birth_date(Some(&json!(19900421))), NOT_INFORMED);
}

// =========================================================
// SessionView
// =========================================================

#[test]
fn test_full_session_view() {
    let p = payload(json!({
        "sub": "user-123",
        "email": "ana@keeply.com",
        "role": "authenticated",
        "exp": NOW + 60,
        "user_metadata": {
            "full_name": "Ana Souza",
            "phone_number": "11987654321",
            "cpf": "12345678901",
            "birth_date": "1990-04-21"
        }
    }));

    let view = SessionView::derive_in(Some(&p), NOW, &Utc);
    assert_eq!(view.name, "Ana Souza");
    assert_eq!(view.short_name, "Ana");
    assert_eq!(view.initials, "AS");
    assert_eq!(view.email, "ana@keeply.com");
    assert_eq!(view.user_id, "user-123");
    assert_eq!(view.role, "authenticated");
    assert_eq!(view.full_name, "Ana Souza");
    assert_eq!(view.phone_number, "11987654321");
    assert_eq!(view.cpf_display, "123.456.789-01");
    assert_eq!(view.birth_date_display, "21/04/1990");
    assert!(!view.is_expired);
}

#[test]
fn test_missing_payload_uses_placeholders() {
    let view = SessionView::derive_in(None, NOW, &Utc);
    assert_eq!(view.name, DEFAULT_NAME);
    assert_eq!(view.initials, "U");
    assert_eq!(view.email, NOT_AVAILABLE);
    assert_eq!(view.user_id, NOT_AVAILABLE);
    assert_eq!(view.role, NOT_INFORMED);
    assert_eq!(view.phone_number, NOT_INFORMED);
    assert_eq!(view.cpf_display, NOT_INFORMED);
    assert_eq!(view.birth_date_display, NOT_INFORMED);
}

#[test]
fn test_metadata_must_be_an_object() {
    let p = payload(json!({
        "email": "davi@keeply.com",
        "user_metadata": "Davi"
    }));
    let view = SessionView::derive_in(Some(&p), NOW, &Utc);
    assert_eq!(view.name, "davi");
    assert_eq!(view.full_name, "davi");
}

// =========================================================
// 页面守卫
// =========================================================

#[test]
fn test_gate_redirects_without_token() {
    let gate = SessionGate::evaluate(&tokens_with(None), NOW);
    assert_eq!(gate, SessionGate::RedirectToLogin);
}

#[test]
fn test_gate_redirects_on_malformed_token() {
    let gate = SessionGate::evaluate(&tokens_with(Some("not-a-jwt".to_string())), NOW);
    assert_eq!(gate, SessionGate::RedirectToLogin);
}

#[test]
fn test_gate_redirects_when_expired() {
    let token = token_for(json!({ "sub": "1", "exp": NOW - 1 }));
    let gate = SessionGate::evaluate(&tokens_with(Some(token)), NOW);
    assert_eq!(gate, SessionGate::RedirectToLogin);
}

#[test]
fn test_gate_allows_valid_session() {
    let token = token_for(json!({ "sub": "1", "email": "eva@keeply.com", "exp": NOW + 10 }));
    let gate = SessionGate::evaluate(&tokens_with(Some(token)), NOW);
    assert!(gate.is_allowed());
    match gate {
        SessionGate::Allowed(view) => assert_eq!(view.name, "eva"),
        SessionGate::RedirectToLogin => panic!("expected an allowed session"),
    }
}

#[test]
fn test_gate_allows_token_without_exp() {
    let token = token_for(json!({ "sub": "1" }));
    assert!(SessionGate::evaluate(&tokens_with(Some(token)), NOW).is_allowed());
}
