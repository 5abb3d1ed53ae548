use axum::{Json, extract::State};

use classmint_application::error::AppError;
use domain::auth::UserId;
use domain::token::RawToken;

use crate::incoming::http_axum::{
    dto::{
        requests::ClaimRequest,
        responses::{ApiResponse, ClaimResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

pub async fn claim_handler(
    State(state): State<AppState>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<ApiResponse<ClaimResponse>>, HttpError> {
    let raw_token =
        RawToken::try_from(request.token).map_err(|e| HttpError(AppError::MalformedToken(e)))?;

    let redemption = state
        .redemption_use_case
        .claim(UserId::new(request.user_id), raw_token)
        .await?;

    Ok(Json(ApiResponse::success_with_data(ClaimResponse::from(
        redemption,
    ))))
}
