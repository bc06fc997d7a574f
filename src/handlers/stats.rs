use axum::extract::State;

use crate::db::{AppState, Document, queries};
use crate::error::Result;
use crate::extractors::Json;
use crate::models::AdminStats;

pub async fn admin_stats(State(state): State<AppState>) -> Result<Json<AdminStats>> {
    let conn = state.db.get()?;
    let stats = queries::admin_stats(&conn)?;
    Ok(Json(stats))
}

pub async fn order_stats(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    let conn = state.db.get()?;
    let rows = queries::order_stats(&conn)?;
    Ok(Json(rows))
}
