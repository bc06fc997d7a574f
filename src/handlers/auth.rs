use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::extractors::Json;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /jwt - issue an identity token for the given email.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    let email = request
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("email is required".into()))?;

    let token = state.tokens.issue(&email)?;
    Ok(Json(TokenResponse { token }))
}
