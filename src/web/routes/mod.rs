//! Contains all the routes that this application can handle.

mod api;

// re-export errors
pub use api::{posts::PostsError, subscribe::SubscribeError, subscribers::SubscribersError};

use crate::AppState;

use axum::{
    routing::{get, post},
    Router,
};

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new().nest("/api", api_routes(app_state))
}

/// API - Routes nested under "/api" path
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/subscribe", post(api::subscribe))
        .route("/subscribers", get(api::subscribers))
        .route("/posts", get(api::posts_list).post(api::post_create))
        .route("/posts/{id}", get(api::post_fetch))
        .with_state(app_state)
}
