use crate::request::HttpMethod;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

/// Agent bridge status, probed with the session's bearer token.
pub const AGENT_STATUS_PATH: &str = "/api/agent/status";

// =========================================================
// Request Definitions
// =========================================================

/// Exchange email/password for tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }
}

/// Either token may be missing; a missing one is simply not stored.
///
/// Each field is read on its own: a non-string or empty value counts as
/// missing without discarding the other token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "non_empty_token")]
    pub access_token: Option<String>,
    #[serde(default, deserialize_with = "non_empty_token")]
    pub refresh_token: Option<String>,
}

fn non_empty_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(token)) if !token.is_empty() => Some(token),
        _ => None,
    })
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Account creation payload (camelCase on the wire)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub cpf: String,
    pub phone_number: String,
    pub birth_date: String,
    pub email: String,
    pub password: String,
    pub accepted_terms: bool,
    pub accepted_privacy_policy: bool,
}

impl ApiRequest for RegisterRequest {
    // Any 2xx is success; the body is not interpreted.
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Raw register form as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub full_name: String,
    pub cpf: String,
    pub phone_number: String,
    pub birth_date: String,
    pub email: String,
    pub password: String,
    pub accepted_terms: bool,
}

fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

impl From<&RegisterForm> for RegisterRequest {
    fn from(form: &RegisterForm) -> Self {
        Self {
            full_name: form.full_name.trim().to_string(),
            cpf: only_digits(&form.cpf),
            phone_number: only_digits(&form.phone_number),
            birth_date: form.birth_date.clone(),
            email: form.email.trim().to_lowercase(),
            password: form.password.clone(),
            accepted_terms: form.accepted_terms,
            // the form has a single consent checkbox covering both documents
            accepted_privacy_policy: form.accepted_terms,
        }
    }
}

/// Tags attached to every frontend metric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricTags {
    pub path: String,
    pub source: String,
}

/// Frontend telemetry event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricEvent {
    pub metric: String,
    pub value: f64,
    pub tags: MetricTags,
}

pub const DEFAULT_METRIC_SOURCE: &str = "web";

impl MetricEvent {
    pub fn new(metric: &str, value: f64, path: &str) -> Self {
        Self {
            metric: metric.to_string(),
            value,
            tags: MetricTags {
                path: path.to_string(),
                source: DEFAULT_METRIC_SOURCE.to_string(),
            },
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.tags.source = source.to_string();
        self
    }

    pub fn page_view(path: &str) -> Self {
        Self::new("page_view", 1.0, path)
    }

    pub fn page_load(path: &str, millis: f64) -> Self {
        Self::new("page_load_ms", millis, path)
    }

    pub fn largest_contentful_paint(path: &str, millis: f64) -> Self {
        Self::new("lcp_ms", millis, path)
    }

    /// Synthetic event used by the dashboard to check backend reachability
    pub fn dashboard_probe() -> Self {
        Self::new("dashboard_probe", 1.0, "/dashboard").with_source("web-dashboard")
    }
}

/// Page load time from a navigation timing entry: `loadEventEnd`, else the
/// entry `duration`. `None` while the load event has not completed.
pub fn navigation_load_millis(load_event_end: f64, duration: f64) -> Option<f64> {
    [load_event_end, duration]
        .into_iter()
        .find(|ms| ms.is_finite() && *ms > 0.0)
}

impl ApiRequest for MetricEvent {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/metrics/frontend";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_normalizes_form() {
        let form = RegisterForm {
            full_name: "  Ana Souza ".to_string(),
            cpf: "123.456.789-01".to_string(),
            phone_number: "(11) 98765-4321".to_string(),
            birth_date: "1990-04-21".to_string(),
            email: " Ana@Keeply.COM ".to_string(),
            password: "segredo123".to_string(),
            accepted_terms: true,
        };

        let body = serde_json::to_value(RegisterRequest::from(&form)).unwrap();
        assert_eq!(
            body,
            json!({
                "fullName": "Ana Souza",
                "cpf": "12345678901",
                "phoneNumber": "11987654321",
                "birthDate": "1990-04-21",
                "email": "ana@keeply.com",
                "password": "segredo123",
                "acceptedTerms": true,
                "acceptedPrivacyPolicy": true
            })
        );
    }

    #[test]
    fn test_login_response_tolerates_missing_tokens() {
        let resp: LoginResponse =
            serde_json::from_value(json!({ "access_token": "a", "expires_in": 3600 })).unwrap();
        assert_eq!(resp.access_token.as_deref(), Some("a"));
        assert_eq!(resp.refresh_token, None);
    }

    #[test]
    fn test_login_response_reads_each_token_independently() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": 42
        }))
        .unwrap();
        assert_eq!(resp.access_token.as_deref(), Some("a"));
        assert_eq!(resp.refresh_token, None);

        let resp: LoginResponse = serde_json::from_value(json!({
            "access_token": "",
            "refresh_token": "r"
        }))
        .unwrap();
        assert_eq!(resp.access_token, None);
        assert_eq!(resp.refresh_token.as_deref(), Some("r"));

        let resp: LoginResponse =
            serde_json::from_value(json!({ "access_token": null })).unwrap();
        assert_eq!(resp, LoginResponse::default());
    }

    #[test]
    fn test_navigation_load_millis() {
        assert_eq!(navigation_load_millis(812.5, 900.0), Some(812.5));
        assert_eq!(navigation_load_millis(0.0, 640.0), Some(640.0));
        assert_eq!(navigation_load_millis(0.0, 0.0), None);
        assert_eq!(navigation_load_millis(f64::NAN, 0.0), None);
    }

    #[test]
    fn test_lcp_event_shape() {
        let event = MetricEvent::largest_contentful_paint("/", 1234.5);
        assert_eq!(event.metric, "lcp_ms");
        assert_eq!(event.value, 1234.5);
        assert_eq!(event.tags.source, DEFAULT_METRIC_SOURCE);
    }

    #[test]
    fn test_dashboard_probe_event_shape() {
        let body = serde_json::to_value(MetricEvent::dashboard_probe()).unwrap();
        assert_eq!(
            body,
            json!({
                "metric": "dashboard_probe",
                "value": 1.0,
                "tags": { "path": "/dashboard", "source": "web-dashboard" }
            })
        );
    }
}
