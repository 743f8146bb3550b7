use serde::{Deserialize, Serialize};

use super::BookId;

/// Weighted contribution of each scoring component
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub pace_time: f64,
    pub complexity_energy: f64,
    pub mood_overlap: f64,
    pub rating: f64,
}

impl ScoreBreakdown {
    /// Sum of the weighted components, clamped to [0, 1]
    pub fn total(&self) -> f64 {
        (self.pace_time + self.complexity_energy + self.mood_overlap + self.rating).clamp(0.0, 1.0)
    }
}

/// A book that passed the inclusion threshold, with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub book_id: BookId,
    pub relevance_score: f64,
    pub match_reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}
