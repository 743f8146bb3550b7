use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

use super::TagId;

/// Ordinal substituted for unrecognised energy levels and time budgets
pub const DEFAULT_ORDINAL: u8 = 2;

/// Time budgets offered to readers, in minutes, with their ordinals
const TIME_ORDINALS: [(u32, u8); 5] = [(15, 1), (30, 2), (60, 3), (90, 4), (120, 5)];

/// How much energy the reader has right now
///
/// Deserialization is lenient: any unrecognised value becomes `Medium`
/// instead of failing the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    /// Maps the level onto {low: 1, medium: 2, high: 3}
    pub fn ordinal(self) -> u8 {
        match self {
            EnergyLevel::Low => 1,
            EnergyLevel::Medium => 2,
            EnergyLevel::High => 3,
        }
    }

    /// Parses a level, falling back to `Medium` for unknown input
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => EnergyLevel::Low,
            "medium" => EnergyLevel::Medium,
            "high" => EnergyLevel::High,
            other => {
                tracing::debug!(value = %other, "Unrecognised energy level, using medium");
                EnergyLevel::Medium
            }
        }
    }
}

impl From<String> for EnergyLevel {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl Display for EnergyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnergyLevel::Low => write!(f, "low"),
            EnergyLevel::Medium => write!(f, "medium"),
            EnergyLevel::High => write!(f, "high"),
        }
    }
}

/// Maps a time budget in minutes onto its ordinal
///
/// Values outside the offered set map to [`DEFAULT_ORDINAL`].
pub fn time_ordinal(minutes: u32) -> u8 {
    TIME_ORDINALS
        .iter()
        .find(|(m, _)| *m == minutes)
        .map(|(_, ordinal)| *ordinal)
        .unwrap_or_else(|| {
            tracing::debug!(minutes, "Unrecognised time budget, using default ordinal");
            DEFAULT_ORDINAL
        })
}

/// A reader's stated situation for a single recommendation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationalContext {
    pub energy_level: EnergyLevel,
    /// Minutes available for reading
    pub time_available: u32,
    #[serde(default)]
    pub selected_tag_ids: BTreeSet<TagId>,
}

impl SituationalContext {
    pub fn new(energy_level: EnergyLevel, time_available: u32) -> Self {
        Self {
            energy_level,
            time_available,
            selected_tag_ids: BTreeSet::new(),
        }
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        self.selected_tag_ids = tag_ids.into_iter().collect();
        self
    }
}
