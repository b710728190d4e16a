use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: &'static str,
    pub database: bool,
}

/// Liveness plus a `SELECT 1` round trip to Postgres.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    security(()),
    responses((status = 200, body = HealthResp))
)]
pub async fn health(State(db): State<PgPool>) -> Json<HealthResp> {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&db)
        .await
        .is_ok();
    Json(HealthResp {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}

/// Mounted outside the route policy so probes need no credentials.
pub fn routes(db: PgPool) -> Router {
    Router::new().route("/health", get(health)).with_state(db)
}
