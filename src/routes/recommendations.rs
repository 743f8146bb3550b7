use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{BookId, EnergyLevel, SituationalContext, TagId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub energy_level: EnergyLevel,
    /// Minutes available; values outside 15/30/60/90/120 are scored as 30
    pub time_available: u32,
    /// Mood tags the reader wants
    #[serde(default)]
    pub selected_tag_ids: Vec<TagId>,
    pub max_recommendations: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationItem {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub relevance_score: f64,
    pub match_reasons: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub context: SituationalContext,
    pub recommendations: Vec<RecommendationItem>,
    pub generated_at: DateTime<Utc>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let limit = state.config.max_recommendations_limit;
    let max_recommendations = request
        .max_recommendations
        .unwrap_or(state.config.default_max_recommendations);

    if max_recommendations > limit {
        return Err(AppError::InvalidInput(format!(
            "max_recommendations must be at most {}",
            limit
        )));
    }

    let context = SituationalContext::new(request.energy_level, request.time_available)
        .with_tags(request.selected_tag_ids);

    tracing::info!(
        request_id = %request_id,
        energy = %context.energy_level,
        time_available = context.time_available,
        selected_tags = context.selected_tag_ids.len(),
        max_recommendations,
        "Processing recommendation request"
    );

    let snapshot = state.snapshot().await?;
    let candidates = snapshot.recommend(&context, max_recommendations);

    let recommendations: Vec<RecommendationItem> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let book = snapshot.book(candidate.book_id)?;
            Some(RecommendationItem {
                book_id: candidate.book_id,
                title: book.title.clone(),
                author: book.author.clone(),
                relevance_score: candidate.relevance_score,
                match_reasons: candidate.match_reasons,
            })
        })
        .collect();

    tracing::info!(
        request_id = %request_id,
        catalog_size = snapshot.len(),
        returned = recommendations.len(),
        "Recommendations generated"
    );

    Ok(Json(RecommendationResponse {
        context,
        recommendations,
        generated_at: Utc::now(),
    }))
}
