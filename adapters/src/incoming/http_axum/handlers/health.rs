use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::incoming::http_axum::dto::responses::ApiResponse;
use crate::shared::app_state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success_with_data(json!({
        "status": "ok",
        "environment": state.config.environment.env,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
