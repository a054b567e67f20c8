pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advice::handlers::handle_chat;
use crate::auth::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/signup", post(handlers::handle_signup))
        .route("/login", post(handlers::handle_login))
        .route("/logout", get(handlers::handle_logout))
        .route("/check_session", get(handlers::handle_check_session))
        // Advice
        .route("/chat", post(handle_chat))
        .with_state(state)
}
