pub mod classify;
pub mod ko_checks;
pub mod pipeline;
pub mod scoring;
pub mod skills;
pub mod stopwords;

pub use classify::{MatchLevel, Recommendation};
pub use ko_checks::{evaluate_knockout, KnockoutResult};
pub use pipeline::{MatchEngine, MatchError, MatchResult, RankedBatch, ViewFilter};
pub use scoring::similarity_score;
pub use skills::extract_skills;
