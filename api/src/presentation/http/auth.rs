use crate::application::security::Principal;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterError, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::{Role, User};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const ACCESS_COOKIE: &str = "access_token";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// `ADMIN`, `DOCTOR` or `USER`
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            role: user.role.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: PrincipalResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrincipalResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

impl From<Principal> for PrincipalResponse {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            role: p.role.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/user/register", post(register_user))
        .route("/doctor/register", post(register_doctor))
        .with_state(ctx)
}

async fn register_with_role(
    ctx: &AppContext,
    req: RegisterRequest,
    role: Role,
) -> Result<(StatusCode, Json<UserResponse>), StatusCode> {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        full_name: req.full_name,
        email: req.email,
        password: req.password,
        phone: req.phone,
        role,
    };
    let user = uc.execute(&dto).await.map_err(|e| match e {
        RegisterError::Invalid(_) => StatusCode::BAD_REQUEST,
        RegisterError::DuplicateEmail => StatusCode::CONFLICT,
        RegisterError::Other(err) => {
            tracing::error!(error = ?err, "register_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    })?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(post, path = "/api/user/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 201, body = UserResponse),
    (status = 409, description = "Email already registered")
))]
pub async fn register_user(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), StatusCode> {
    register_with_role(&ctx, req, Role::User).await
}

#[utoipa::path(post, path = "/api/doctor/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 201, body = UserResponse),
    (status = 409, description = "Email already registered")
))]
pub async fn register_doctor(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), StatusCode> {
    register_with_role(&ctx, req, Role::Doctor).await
}

#[utoipa::path(post, path = "/api/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, description = "Bad credentials")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), StatusCode> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: req.email,
        password: req.password,
    };
    let principal = uc
        .execute(&dto)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let token = issue_token(&ctx.cfg, principal.id).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(&token, ctx.cfg.jwt_expires_secs, secure_cookies(&ctx.cfg));
    if let Ok(v) = axum::http::HeaderValue::from_str(&cookie) {
        headers.insert(axum::http::header::SET_COOKIE, v);
    }
    tracing::info!(user_id = %principal.id, "login_succeeded");

    Ok((
        headers,
        Json(LoginResponse {
            access_token: token,
            user: principal.into(),
        }),
    ))
}

#[utoipa::path(get, path = "/api/me", tag = "Auth", responses(
    (status = 200, body = UserResponse),
    (status = 401, description = "Authentication required")
))]
pub async fn me(
    State(ctx): State<AppContext>,
    principal: Option<Extension<Principal>>,
) -> Result<Json<UserResponse>, StatusCode> {
    let Extension(principal) = principal.ok_or(StatusCode::UNAUTHORIZED)?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(principal.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(user.into()))
}

#[utoipa::path(post, path = "/api/logout", tag = "Auth", responses((status = 204)))]
pub async fn logout(State(ctx): State<AppContext>) -> (HeaderMap, StatusCode) {
    let mut headers = HeaderMap::new();
    let cookie = if secure_cookies(&ctx.cfg) {
        "access_token=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=Lax"
    } else {
        "access_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"
    };
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_static(cookie),
    );
    (headers, StatusCode::NO_CONTENT)
}

// --- JWT utils ---

pub fn issue_token(cfg: &Config, user_id: Uuid) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + (cfg.jwt_expires_secs.max(0) as usize),
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Returns the user id carried by a valid, unexpired token.
pub fn validate_token(cfg: &Config, token: &str) -> Option<Uuid> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    Uuid::parse_str(&data.claims.sub).ok()
}

// --- Cookie helpers ---

fn secure_cookies(cfg: &Config) -> bool {
    cfg.frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false)
}

pub(crate) fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        ACCESS_COOKIE,
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;

    #[test]
    fn token_round_trips_user_id() {
        let cfg = test_config();
        let id = Uuid::new_v4();
        let token = issue_token(&cfg, id).unwrap();
        assert_eq!(validate_token(&cfg, &token), Some(id));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let cfg = test_config();
        let mut other = test_config();
        other.jwt_secret = "a-completely-different-secret".into();
        let token = issue_token(&other, Uuid::new_v4()).unwrap();
        assert_eq!(validate_token(&cfg, &token), None);
        assert_eq!(validate_token(&cfg, "garbage"), None);
    }

    #[test]
    fn cookie_lookup_by_name() {
        let header = "theme=dark; access_token=abc.def ; other=1";
        assert_eq!(get_cookie(header, "access_token").as_deref(), Some("abc.def"));
        assert_eq!(get_cookie(header, "missing"), None);
    }

    #[test]
    fn access_cookie_attributes() {
        let c = build_access_cookie("tok", 60, true);
        assert_eq!(c, "access_token=tok; HttpOnly; Secure; Path=/; Max-Age=60; SameSite=Lax");
        let c = build_access_cookie("tok", -5, false);
        assert!(c.contains("Max-Age=0"));
        assert!(!c.contains("Secure"));
    }
}
