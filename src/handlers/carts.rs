use axum::extract::State;

use crate::db::{AppState, Collection, Document, Filter, collection};
use crate::error::Result;
use crate::extractors::{Json, Path, Query};
use crate::models::{DeleteResult, EmailQuery, InsertOneResult};

/// GET /carts?email= - a missing or empty email yields an empty list.
pub async fn list_cart(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>> {
    let Some(email) = query.email.filter(|e| !e.is_empty()) else {
        return Ok(Json(Vec::new()));
    };

    let conn = state.db.get()?;
    let items = collection::find_many(&conn, Collection::Carts, &Filter::new().eq("email", email))?;
    Ok(Json(items))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(item): Json<Document>,
) -> Result<Json<InsertOneResult>> {
    let conn = state.db.get()?;
    let result = collection::insert_one(&conn, Collection::Carts, item)?;
    Ok(Json(result))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let conn = state.db.get()?;
    let result = collection::delete_one(&conn, Collection::Carts, &Filter::by_id(&id))?;
    Ok(Json(result))
}
