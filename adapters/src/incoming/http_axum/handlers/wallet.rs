use axum::{
    Json,
    extract::{Path, State},
};

use domain::auth::UserId;

use crate::incoming::http_axum::{
    dto::responses::{ApiResponse, BalanceResponse},
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

pub async fn balance_handler(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<ApiResponse<BalanceResponse>>, HttpError> {
    let user_id = UserId::new(user_id);
    let balance = state.wallet_use_case.balance(user_id).await?;

    Ok(Json(ApiResponse::success_with_data(BalanceResponse {
        user_id,
        balance,
    })))
}
