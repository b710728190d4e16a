use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use consult_api::application::use_cases::auth::seed_admin::SeedOutcome;
use consult_api::bootstrap::app_context::{AppContext, AppServices};
use consult_api::bootstrap::config::Config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            consult_api::presentation::http::auth::register_user,
            consult_api::presentation::http::auth::register_doctor,
            consult_api::presentation::http::auth::login,
            consult_api::presentation::http::auth::logout,
            consult_api::presentation::http::auth::me,
            consult_api::presentation::http::admin::ping,
            consult_api::presentation::http::health::health,
        ),
        components(schemas(
            consult_api::presentation::http::auth::RegisterRequest,
            consult_api::presentation::http::auth::UserResponse,
            consult_api::presentation::http::auth::LoginRequest,
            consult_api::presentation::http::auth::LoginResponse,
            consult_api::presentation::http::auth::PrincipalResponse,
            consult_api::presentation::http::admin::PingResp,
            consult_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Registration, login and current user"),
            (name = "Admin", description = "Administration"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn build_cors(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // Production requires FRONTEND_URL (checked in Config), so only a malformed value lands here.
        _ if cfg.is_production => {
            base.allow_origin(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
        }
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "consult_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting consultation API");

    // Database
    let pool = consult_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    consult_api::infrastructure::db::migrate(&pool).await?;

    let user_repo = Arc::new(
        consult_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository::new(
            pool.clone(),
        ),
    );

    // Seed runs before the listener binds.
    match consult_api::bootstrap::seed::ensure_admin(&cfg, user_repo.as_ref()).await? {
        SeedOutcome::Created => info!(email = %cfg.admin_email, "Default admin account created"),
        SeedOutcome::AlreadyPresent => {
            info!(email = %cfg.admin_email, "Default admin account already present")
        }
    }

    let ctx = AppContext::new(cfg.clone(), AppServices::new(user_repo));

    let app = Router::new()
        .nest(
            "/api",
            consult_api::presentation::http::health::routes(pool.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .merge(consult_api::presentation::http::router(ctx))
        .layer(build_cors(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}
