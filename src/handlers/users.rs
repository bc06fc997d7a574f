use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::db::{AppState, Collection, Document, Filter, collection, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::jwt::AuthContext;
use crate::models::{AdminStatus, DeleteResult, Role, UpdateResult, UserAlreadyExists};

/// GET /users/admin/{email} - whether the user with this email is an admin.
pub async fn check_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>> {
    if state.policy.admin_check_identity_match && email != ctx.email {
        tracing::debug!(caller = %ctx.email, requested = %email, "Admin check for another user");
        return Err(AppError::Unauthorized);
    }

    let conn = state.db.get()?;
    let admin = queries::get_user_by_email(&conn, &email)?.is_some_and(|u| u.is_admin());
    Ok(Json(AdminStatus { admin }))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    let conn = state.db.get()?;
    let users = collection::find_all(&conn, Collection::Users)?;
    Ok(Json(users))
}

/// POST /users - save a user on first sign-in. Existing emails are left alone.
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<Document>,
) -> Result<Response> {
    let email = user
        .get("email")
        .and_then(Value::as_str)
        .filter(|e| !e.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::BadRequest("email is required".into()))?;

    let conn = state.db.get()?;
    match queries::create_user_if_absent(&conn, &email, user)? {
        Some(result) => {
            tracing::info!(email = %email, "User created");
            Ok(Json(result).into_response())
        }
        None => Ok(Json(UserAlreadyExists::default()).into_response()),
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let conn = state.db.get()?;
    let result = collection::delete_one(&conn, Collection::Users, &Filter::by_id(&id))?;
    Ok(Json(result))
}

/// PATCH /users/{id} - promote a user to admin. There is no demotion.
pub async fn make_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>> {
    let conn = state.db.get()?;
    let mut set = Document::new();
    set.insert("role".to_string(), Value::from(Role::Admin.as_ref()));
    let result = collection::update_one(&conn, Collection::Users, &Filter::by_id(&id), set, false)?;

    if result.modified_count > 0 {
        tracing::info!(user_id = %id, by = %ctx.email, "User promoted to admin");
    }
    Ok(Json(result))
}
