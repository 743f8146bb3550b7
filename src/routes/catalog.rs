use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::MoodTag,
    routes::AppState,
    services::statistics::CatalogStatistics,
};

/// Attribute statistics over the active catalog
pub async fn statistics(State(state): State<Arc<AppState>>) -> AppResult<Json<CatalogStatistics>> {
    let snapshot = state.snapshot().await?;
    CatalogStatistics::from_books(snapshot.books())
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Catalog has no active books".to_string()))
}

/// Mood tags readers can select, ordered by id
pub async fn mood_tags(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<MoodTag>>> {
    let mut tags = state.catalog.list_mood_tags().await?;
    tags.sort_by_key(|t| t.id);
    Ok(Json(tags))
}
