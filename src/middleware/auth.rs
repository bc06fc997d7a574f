use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::jwt::AuthContext;
use crate::util::extract_bearer_token;

/// Authenticate the caller from the bearer token.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthContext> {
    let token = extract_bearer_token(headers).ok_or_else(|| {
        tracing::debug!("Missing bearer token");
        AppError::Unauthorized
    })?;
    let claims = state.tokens.verify(token)?;
    Ok(claims.into())
}

/// Check the caller's stored user record has the admin role.
/// The connection is released before the handler runs.
fn authorize_admin(state: &AppState, ctx: &AuthContext) -> Result<()> {
    let conn = state.db.get()?;
    let user = queries::get_user_by_email(&conn, &ctx.email)?;
    if user.is_some_and(|u| u.is_admin()) {
        Ok(())
    } else {
        tracing::debug!(email = %ctx.email, "Non-admin caller rejected");
        Err(AppError::Forbidden)
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let ctx = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Authentication followed by the admin role check.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let ctx = authenticate(&state, request.headers())?;
    authorize_admin(&state, &ctx)?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
