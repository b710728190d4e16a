pub mod admin;
pub mod auth;
pub mod health;
pub mod security;

use axum::{Json, Router, http::StatusCode, middleware};
use serde::Serialize;

use crate::bootstrap::app_context::AppContext;

#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub error: &'static str,
}

async fn not_found() -> (StatusCode, Json<NotFoundBody>) {
    (StatusCode::NOT_FOUND, Json(NotFoundBody { error: "not_found" }))
}

/// Application routes behind the route policy. The fallback sits behind it too,
/// so unknown paths are challenged before they 404.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .nest("/api", auth::routes(ctx.clone()))
        .nest("/api/admin", admin::routes())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            ctx,
            security::enforce_route_policy,
        ))
}
