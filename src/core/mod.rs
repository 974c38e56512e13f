// Core algorithm exports
pub mod compat;
pub mod distance;
pub mod matcher;
pub mod phone;
pub mod scoring;

pub use compat::{BloodType, InvalidBloodType, ALL_BLOOD_TYPES};
pub use distance::{calculate_bounding_box, checked_distance, haversine_distance, is_within_bounding_box};
pub use matcher::{MatchError, Matcher, MatchingParams, RankResult};
pub use phone::{mask_phone, normalize_phone};
pub use scoring::{reliability_score, LogisticScorer, MatchFeatures, MatchScorer};
