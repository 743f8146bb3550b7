mod book;
mod context;
mod recommendation;

pub use book::{BookId, BookRecord, BookRow, MoodTag, TagId, ATTRIBUTE_MAX, ATTRIBUTE_MIN};
pub use context::{time_ordinal, EnergyLevel, SituationalContext, DEFAULT_ORDINAL};
pub use recommendation::{ScoreBreakdown, ScoredCandidate};
