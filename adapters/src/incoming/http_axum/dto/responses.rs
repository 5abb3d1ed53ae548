use serde::Serialize;
use time::OffsetDateTime;

use domain::auth::{LoginOutcome, UserId};
use domain::redemption::Redemption;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
            data: None,
        }
    }

    #[must_use]
    pub fn success_with_data(data: T) -> Self {
        Self {
            ok: true,
            error: None,
            data: Some(data),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: UserId,
    pub username: String,
    pub balance: u64,
    pub session_token: String,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            user_id: outcome.user.id,
            username: outcome.user.username,
            balance: outcome.user.balance,
            session_token: outcome.session.token,
            expires_at: outcome.session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub user_id: UserId,
    pub balance: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub success: bool,
    pub new_balance: u64,
    pub amount_credited: u64,
    pub tx_id: u64,
    pub block_hash: String,
    pub description: String,
}

impl From<Redemption> for ClaimResponse {
    fn from(redemption: Redemption) -> Self {
        Self {
            success: redemption.result.success,
            new_balance: redemption.result.new_balance,
            amount_credited: redemption.result.amount_credited,
            tx_id: redemption.receipt.tx_id,
            block_hash: redemption.receipt.block_hash,
            description: redemption.receipt.description,
        }
    }
}
