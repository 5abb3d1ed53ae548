use axum::{Json, extract::State};
use validator::Validate;

use classmint_application::error::AppError;

use crate::incoming::http_axum::{
    dto::{
        requests::LoginRequest,
        responses::{ApiResponse, LoginResponse, VerifyResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, HttpError> {
    if let Err(e) = request.validate() {
        return Err(HttpError(AppError::ValidationError {
            message: format!("Validation failed: {}", e),
        }));
    }

    let outcome = state
        .auth_use_case
        .login(request.username, request.password)
        .await?;

    Ok(Json(ApiResponse::success_with_data(LoginResponse::from(
        outcome,
    ))))
}

pub async fn logout_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<()>>, HttpError> {
    state.auth_use_case.logout().await?;
    Ok(Json(ApiResponse::success()))
}

pub async fn verify_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<VerifyResponse>>, HttpError> {
    let valid = state.auth_use_case.verify().await?;
    Ok(Json(ApiResponse::success_with_data(VerifyResponse { valid })))
}
