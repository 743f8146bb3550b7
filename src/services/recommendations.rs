use std::collections::BTreeSet;

use crate::{
    models::{
        time_ordinal, BookRecord, EnergyLevel, ScoreBreakdown, ScoredCandidate,
        SituationalContext, TagId,
    },
    services::catalog::{CatalogSnapshot, TagNameResolver},
};

/// Weight of the pace against time budget component
pub const PACE_TIME_WEIGHT: f64 = 0.30;
/// Weight of the complexity against energy component
pub const COMPLEXITY_ENERGY_WEIGHT: f64 = 0.25;
/// Weight of the mood tag overlap component
pub const MOOD_OVERLAP_WEIGHT: f64 = 0.25;
/// Weight of the average rating component
pub const RATING_WEIGHT: f64 = 0.20;

/// Scores must be strictly above this to be recommended
pub const INCLUSION_THRESHOLD: f64 = 0.3;

/// Overlap score used when the reader selected no mood tags
pub const NEUTRAL_MOOD_SCORE: f64 = 0.5;

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 10;

const MAX_RATING: f64 = 5.0;

const REASON_FAST_PACE: &str = "fast pace suits a short session";
const REASON_SLOW_PACE: &str = "unhurried pace suits extended reading";
const REASON_LOW_COMPLEXITY: &str = "low complexity suits a tired state";
const REASON_HIGH_COMPLEXITY: &str = "challenging book suits an energized state";

/// Ordinal view of a situational context used for scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserVector {
    /// 1 = low, 2 = medium, 3 = high
    pub energy: u8,
    /// 1 = 15 min .. 5 = 120 min
    pub time: u8,
    pub selected_tag_ids: BTreeSet<TagId>,
}

impl From<&SituationalContext> for UserVector {
    fn from(context: &SituationalContext) -> Self {
        Self {
            energy: context.energy_level.ordinal(),
            time: time_ordinal(context.time_available),
            selected_tag_ids: context.selected_tag_ids.clone(),
        }
    }
}

/// Computes the weighted components of a book's relevance
///
/// Each raw component is clamped to [0, 1] before weighting.
pub fn score_book(user: &UserVector, book: &BookRecord) -> ScoreBreakdown {
    let pace = f64::from(book.pace);
    let pace_score = if user.time <= 2 {
        // Short sessions reward fast reads
        (pace - 3.0) / 2.0
    } else {
        1.0 - (pace - 3.0).abs() / 2.0
    };

    let complexity = f64::from(book.complexity);
    let complexity_score = match user.energy {
        1 => (3.0 - complexity) / 2.0,
        3 => (complexity - 2.0) / 3.0,
        _ => 1.0 - (complexity - 3.0).abs() / 2.0,
    };

    let mood_score = if user.selected_tag_ids.is_empty() {
        NEUTRAL_MOOD_SCORE
    } else {
        let matched = user
            .selected_tag_ids
            .intersection(&book.mood_tag_ids)
            .count();
        matched as f64 / user.selected_tag_ids.len() as f64
    };

    let rating_score = book.average_rating / MAX_RATING;

    ScoreBreakdown {
        pace_time: unit(pace_score) * PACE_TIME_WEIGHT,
        complexity_energy: unit(complexity_score) * COMPLEXITY_ENERGY_WEIGHT,
        mood_overlap: unit(mood_score) * MOOD_OVERLAP_WEIGHT,
        rating: unit(rating_score) * RATING_WEIGHT,
    }
}

fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Whether a total score clears the inclusion threshold
pub fn is_included(score: f64) -> bool {
    score > INCLUSION_THRESHOLD
}

/// Feature-level explanations for a book, in fixed order
///
/// Each rule is evaluated on its own; a book may collect zero to four reasons.
pub fn match_reasons<R>(context: &SituationalContext, book: &BookRecord, tags: &R) -> Vec<String>
where
    R: TagNameResolver + ?Sized,
{
    let mut reasons = Vec::new();
    let minutes = context.time_available;

    if book.pace >= 4 && minutes <= 30 {
        reasons.push(REASON_FAST_PACE.to_string());
    } else if book.pace <= 2 && minutes >= 60 {
        reasons.push(REASON_SLOW_PACE.to_string());
    }

    if book.complexity <= 2 && context.energy_level == EnergyLevel::Low {
        reasons.push(REASON_LOW_COMPLEXITY.to_string());
    } else if book.complexity >= 4 && context.energy_level == EnergyLevel::High {
        reasons.push(REASON_HIGH_COMPLEXITY.to_string());
    }

    let selected = tags.tag_names(&context.selected_tag_ids);
    let attached = tags.tag_names(&book.mood_tag_ids);
    let matching: Vec<&str> = selected.intersection(&attached).copied().collect();
    if !matching.is_empty() {
        reasons.push(format!("matches selected moods: {}", matching.join(", ")));
    }

    if book.average_rating >= 4.0 {
        reasons.push(format!("highly rated ({}/5)", display_rating(book.average_rating)));
    }

    reasons
}

/// Stored rating as shown to readers, unrounded; whole numbers keep ".0"
fn display_rating(rating: f64) -> String {
    format!("{:?}", rating)
}

/// Ranks the catalog against a reader's situation
///
/// Returns at most `max_recommendations` candidates scoring above
/// [`INCLUSION_THRESHOLD`], best first. Equal scores keep catalog order.
pub fn recommend<R>(
    context: &SituationalContext,
    books: &[BookRecord],
    tags: &R,
    max_recommendations: usize,
) -> Vec<ScoredCandidate>
where
    R: TagNameResolver + ?Sized,
{
    if books.is_empty() {
        return Vec::new();
    }

    let user = UserVector::from(context);

    let mut candidates: Vec<ScoredCandidate> = books
        .iter()
        .filter_map(|book| {
            let breakdown = score_book(&user, book);
            let relevance_score = breakdown.total();
            if !is_included(relevance_score) {
                return None;
            }
            Some(ScoredCandidate {
                book_id: book.id,
                relevance_score,
                match_reasons: match_reasons(context, book, tags),
                breakdown,
            })
        })
        .collect();

    let matched = candidates.len();

    // sort_by is stable, so ties stay in catalog order
    candidates.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    candidates.truncate(max_recommendations);

    tracing::debug!(
        energy = %context.energy_level,
        time_available = context.time_available,
        selected_tags = context.selected_tag_ids.len(),
        catalog_size = books.len(),
        matched,
        returned = candidates.len(),
        "Scored catalog"
    );

    candidates
}

impl CatalogSnapshot {
    /// Runs [`recommend`] over this snapshot's books and tag names
    pub fn recommend(
        &self,
        context: &SituationalContext,
        max_recommendations: usize,
    ) -> Vec<ScoredCandidate> {
        recommend(context, self.books(), self, max_recommendations)
    }
}
