//! LifeLink Algo - Donor matching service for the LifeLink blood donation network
//!
//! This library provides the core matching algorithm used by the LifeLink
//! platform: ABO/Rh compatibility resolution, geospatial donor ranking around
//! low-stock hospitals, and one-time contact-reveal tokens.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{
    distance::{checked_distance, haversine_distance},
    BloodType, Matcher, MatchingParams,
};
pub use self::models::{Donor, Hospital, MatchRequest, MatchResponse, RankedMatch};
pub use self::services::{TokenError, TokenStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let distance = haversine_distance(20.2961, 85.8245, 20.4625, 85.8828);
        assert!(distance > 0.0);
        assert!(BloodType::ONeg.can_donate_to(BloodType::AbPos));
    }
}
