use axum::{
    Router,
    routing::{get, post},
};

use crate::incoming::http_axum::{
    handlers::{
        auth::{login_handler, logout_handler, verify_handler},
        claim::claim_handler,
        health::health_check,
        wallet::balance_handler,
    },
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;

pub fn build_application_router() -> Router<AppState> {
    let wallet_routes = Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/verify", get(verify_handler))
        .route("/users/{user_id}/balance", get(balance_handler))
        .route("/claim", post(claim_handler));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", wallet_routes)
        .with_request_id()
}
