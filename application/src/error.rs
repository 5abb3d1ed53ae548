use thiserror::Error;

use domain::error::{DomainError, MalformedTokenError};
use domain::reward::Ineligible;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Malformed token: {0}")]
    MalformedToken(#[from] MalformedTokenError),

    #[error("User not found")]
    UserNotFound,

    #[error("Reward token not found")]
    TokenNotFound,

    #[error("Reward token has already been claimed")]
    TokenAlreadyClaimed,

    #[error("Reward token has expired")]
    TokenExpired,

    #[error("Reward token has been revoked")]
    TokenRevoked,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Concurrent update conflict, retry the request")]
    Conflict,

    #[error("Balance overflow")]
    BalanceOverflow,

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error")]
    InternalServerError,
}

impl AppError {
    /// Stable identifier callers can branch on.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::MalformedToken(_)) | AppError::MalformedToken(_) => {
                "malformed_token"
            }
            AppError::UserNotFound => "user_not_found",
            AppError::TokenNotFound => "token_not_found",
            AppError::TokenAlreadyClaimed => "token_already_claimed",
            AppError::TokenExpired => "token_expired",
            AppError::TokenRevoked => "token_revoked",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Conflict => "conflict",
            AppError::BalanceOverflow => "balance_overflow",
            AppError::ValidationError { .. } | AppError::Domain(DomainError::InvalidReward(_)) => {
                "validation_error"
            }
            AppError::ConfigError { .. } => "config_error",
            AppError::Domain(DomainError::Ledger(_)) | AppError::InternalServerError => {
                "internal_error"
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Conflict)
    }
}

impl From<Ineligible> for AppError {
    fn from(reason: Ineligible) -> Self {
        match reason {
            Ineligible::AlreadyClaimed => AppError::TokenAlreadyClaimed,
            Ineligible::Revoked => AppError::TokenRevoked,
            Ineligible::Expired => AppError::TokenExpired,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
