use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(max = 64, message = "Username must be at most 64 characters"))]
    pub username: String,
    #[validate(length(max = 256, message = "Password must be at most 256 characters"))]
    pub password: String,
}

/// `token` stays an untyped JSON value so every shape reaches normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimRequest {
    pub user_id: u64,
    #[serde(default)]
    pub token: Value,
}
