use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: AuthUser,
}

#[derive(Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Error payloads differ between the auth and the REST endpoints, so every
/// known message field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn message_from(body: &str) -> String {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or(parsed.error)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "Unexpected response from server".to_string()
                } else {
                    body.trim().to_string()
                }
            })
    }
}
