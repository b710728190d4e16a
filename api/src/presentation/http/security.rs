//! Request filter: resolves the caller from Basic or bearer credentials and
//! enforces the route policy before any handler (or the fallback) runs.

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine as _;
use serde::Serialize;

use crate::application::security::route_policy::Decision;
use crate::application::security::{AuthError, Principal};
use crate::application::use_cases::auth::authenticate::Authenticate;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{ACCESS_COOKIE, get_cookie, validate_token};

#[derive(Debug, Serialize)]
pub struct AuthErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub async fn enforce_route_policy(
    State(ctx): State<AppContext>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // Bad credentials are refused before the policy is consulted, public paths included.
    let principal = match resolve_principal(&ctx, req.headers()).await {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(%path, error = %err, "authentication_failed");
            return auth_error_response(&err, &ctx.cfg.auth_realm);
        }
    };

    match ctx.route_policy().decide(&path, principal.as_ref()) {
        Decision::Permit => {
            if let Some(p) = principal {
                req.extensions_mut().insert(p);
            }
            next.run(req).await
        }
        Decision::Challenge => {
            tracing::debug!(%path, "authentication_required");
            auth_error_response(&AuthError::Unauthenticated, &ctx.cfg.auth_realm)
        }
        Decision::Deny => {
            tracing::debug!(%path, user_id = ?principal.map(|p| p.id), "access_denied");
            auth_error_response(&AuthError::Forbidden, &ctx.cfg.auth_realm)
        }
    }
}

enum Credentials {
    Basic { email: String, password: String },
    Token(String),
}

/// `Ok(None)` means anonymous. A stale `access_token` cookie is treated as anonymous
/// so it cannot lock a browser out of public pages; an explicit bad header is an error.
pub async fn resolve_principal(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Result<Option<Principal>, AuthError> {
    let repo = ctx.user_repo();
    let auth = Authenticate {
        repo: repo.as_ref(),
    };

    if let Some(creds) = credentials_from_header(headers)? {
        let principal = match creds {
            Credentials::Basic { email, password } => {
                auth.with_password(&email, &password).await?
            }
            Credentials::Token(token) => match validate_token(&ctx.cfg, &token) {
                Some(id) => auth.with_user_id(id).await?,
                None => None,
            },
        };
        return principal.map(Some).ok_or(AuthError::InvalidCredentials);
    }

    let cookie_token = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|c| get_cookie(c, ACCESS_COOKIE));
    if let Some(id) = cookie_token.and_then(|t| validate_token(&ctx.cfg, &t)) {
        return Ok(auth.with_user_id(id).await?);
    }
    Ok(None)
}

/// Parses `Authorization`. Schemes other than Basic and Bearer are ignored.
fn credentials_from_header(headers: &HeaderMap) -> Result<Option<Credentials>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidCredentials)?;
    let value = value.trim();
    let Some((scheme, rest)) = value.split_once(' ') else {
        // A bare `Basic` carries no token at all.
        if value.eq_ignore_ascii_case("basic") {
            return Err(AuthError::InvalidCredentials);
        }
        return Ok(None);
    };
    let rest = rest.trim();
    if scheme.eq_ignore_ascii_case("basic") {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(rest)
            .map_err(|_| AuthError::InvalidCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidCredentials)?;
        let (email, password) = decoded
            .split_once(':')
            .ok_or(AuthError::InvalidCredentials)?;
        Ok(Some(Credentials::Basic {
            email: email.to_string(),
            password: password.to_string(),
        }))
    } else if scheme.eq_ignore_ascii_case("bearer") {
        Ok(Some(Credentials::Token(rest.to_string())))
    } else {
        Ok(None)
    }
}

pub fn auth_error_response(err: &AuthError, realm: &str) -> Response {
    let (status, code) = match err {
        AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthorized"),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
        AuthError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        AuthError::Internal(e) => {
            tracing::error!(error = ?e, "authentication_backend_failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };
    let message = match err {
        AuthError::Internal(_) => "internal error".to_string(),
        other => other.to_string(),
    };
    let body = Json(AuthErrorBody {
        error: code,
        message,
    });
    if status == StatusCode::UNAUTHORIZED {
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{realm}\""))
            .unwrap_or(HeaderValue::from_static("Basic"));
        (status, [(header::WWW_AUTHENTICATE, challenge)], body).into_response()
    } else {
        (status, body).into_response()
    }
}
