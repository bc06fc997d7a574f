use axum::extract::State;

use crate::db::{AppState, Collection, Document, Filter, collection};
use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::models::{DeleteResult, InsertOneResult, UpdateMenuItem, UpdateResult};

pub async fn list_menu(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    let conn = state.db.get()?;
    let items = collection::find_all(&conn, Collection::Menus)?;
    Ok(Json(items))
}

/// GET /menu/{id} - the item, or `null` if there is none.
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>> {
    let conn = state.db.get()?;
    let item = collection::find_one(&conn, Collection::Menus, &Filter::by_id(&id))?;
    Ok(Json(item))
}

pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(item): Json<Document>,
) -> Result<Json<InsertOneResult>> {
    let conn = state.db.get()?;
    let result = collection::insert_one(&conn, Collection::Menus, item)?;
    Ok(Json(result))
}

fn update_menu_item(
    state: &AppState,
    id: &str,
    update: UpdateMenuItem,
    upsert: bool,
) -> Result<UpdateResult> {
    let conn = state.db.get()?;
    collection::update_one(&conn, Collection::Menus, &Filter::by_id(id), update.into_set(), upsert)
}

/// PATCH /menu/{id} - update an existing item.
pub async fn patch_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<UpdateMenuItem>,
) -> Result<Json<UpdateResult>> {
    Ok(Json(update_menu_item(&state, &id, update, false)?))
}

/// PUT /menu/{id} - update, creating the item under this id if missing.
pub async fn put_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<UpdateMenuItem>,
) -> Result<Json<UpdateResult>> {
    Ok(Json(update_menu_item(&state, &id, update, true)?))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let conn = state.db.get()?;
    let result = collection::delete_one(&conn, Collection::Menus, &Filter::by_id(&id))?;
    Ok(Json(result))
}

pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    let conn = state.db.get()?;
    let reviews = collection::find_all(&conn, Collection::Reviews)?;
    Ok(Json(reviews))
}
