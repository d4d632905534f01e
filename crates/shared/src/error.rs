use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            400..=499 => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Error payload returned by the storage service.
///
/// Handlers answer with `{"error": "..."}`; framework-generated failures
/// carry the detail in `message` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Picks the most specific non-empty message out of a raw response body.
    pub fn extract_message(raw: &str) -> Option<String> {
        let body: ApiErrorBody = serde_json::from_str(raw).ok()?;
        body.error
            .into_iter()
            .chain(body.message)
            .map(|message| message.trim().to_string())
            .find(|message| !message.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_error_field_over_message() {
        let raw = r#"{"error":"Unauthorized","message":"Please authenticate with YouTube first"}"#;
        assert_eq!(
            ApiErrorBody::extract_message(raw).as_deref(),
            Some("Unauthorized")
        );
    }

    #[test]
    fn falls_back_to_message_when_error_is_blank() {
        let raw = r#"{"error":"  ","message":"token_exchange_failed"}"#;
        assert_eq!(
            ApiErrorBody::extract_message(raw).as_deref(),
            Some("token_exchange_failed")
        );
    }

    #[test]
    fn non_json_body_yields_none() {
        assert_eq!(ApiErrorBody::extract_message("<html>502</html>"), None);
    }

    #[test]
    fn maps_http_status_to_error_code() {
        assert_eq!(ErrorCode::from_status(401), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::from_status(413), ErrorCode::Validation);
        assert_eq!(ErrorCode::from_status(503), ErrorCode::Internal);
    }
}
