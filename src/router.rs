use axum::{
    Router,
    routing::{delete, post},
};

use crate::handlers;
use crate::state::AppState;

/// Router の構築
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // 認証
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route(
            "/password-reset-request",
            post(handlers::request_password_reset),
        )
        .route("/password-reset", post(handlers::reset_password))
        // 主催者管理
        .route(
            "/organizadores",
            post(handlers::create_organizer)
                .get(handlers::list_organizers)
                .delete(handlers::delete_all_organizers),
        )
        .route("/organizadores/{id}", delete(handlers::delete_organizer))
        .with_state(state)
}
