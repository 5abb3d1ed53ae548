use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use classmint_application::error::AppError;
use domain::error::DomainError;

pub struct HttpError(pub AppError);

fn status_for(app_error: &AppError) -> StatusCode {
    match app_error {
        AppError::MalformedToken(_) | AppError::Domain(DomainError::MalformedToken(_)) => {
            StatusCode::BAD_REQUEST
        }

        AppError::ValidationError { .. } | AppError::Domain(DomainError::InvalidReward(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }

        AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,

        AppError::UserNotFound | AppError::TokenNotFound => StatusCode::NOT_FOUND,

        AppError::TokenAlreadyClaimed | AppError::TokenRevoked | AppError::Conflict => {
            StatusCode::CONFLICT
        }

        AppError::TokenExpired => StatusCode::GONE,

        AppError::BalanceOverflow
        | AppError::ConfigError { .. }
        | AppError::InternalServerError
        | AppError::Domain(DomainError::Ledger(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status_code = status_for(app_error);

        let message = if status_code.is_server_error() {
            error!("Server error response generated: {}", app_error);
            "Internal server error".to_string()
        } else {
            debug!("Client error response generated: {}", app_error);
            app_error.to_string()
        };

        let error_response = json!({
            "ok": false,
            "error": message,
            "kind": app_error.kind(),
            "retryable": app_error.is_retryable(),
            "status": status_code.as_u16()
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}
