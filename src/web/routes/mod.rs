//! Contains all the routes that this application can handle.

mod api;
mod home;

// re-export errors
pub use api::subscribe::{SubscribeError, SUCCESS_MESSAGE};
pub use home::PRODUCT_NAME;

use crate::AppState;
use home::home;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route(
            "/subscribe",
            post(api::subscribe).layer(DefaultBodyLimit::disable()),
        )
        .with_state(app_state.clone())
        .nest("/api", api_routes(app_state))
        .route("/health-check", get(health_check))
}

/// API - Routes nested under "/api" path, the landing page form posts here.
/// Signups have no size limit, `feedback` can be as long as the user likes.
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/subscribe",
            post(api::subscribe).layer(DefaultBodyLimit::disable()),
        )
        .with_state(app_state)
}
