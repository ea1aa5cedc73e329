// Core algorithm exports
pub mod geography;
pub mod matcher;
pub mod scoring;

pub use geography::state_distance;
pub use matcher::{Match, MatchRun, Matcher, DEFAULT_MIN_SCORE};
pub use scoring::{
    calculate_age, calculate_age_compatibility, calculate_interest_overlap,
    calculate_location_score, check_age_preferences, is_compatible_orientation, score_pair,
    MatchScore,
};
