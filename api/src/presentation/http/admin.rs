use axum::{Json, Router, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PingResp {
    pub status: &'static str,
}

#[utoipa::path(get, path = "/api/admin/ping", tag = "Admin", security(()), responses((status = 200, body = PingResp)))]
pub async fn ping() -> Json<PingResp> {
    Json(PingResp { status: "pong" })
}

pub fn routes() -> Router {
    Router::new().route("/ping", get(ping))
}
