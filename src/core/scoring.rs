use crate::models::ScoringWeights;
use chrono::NaiveDate;

/// Feature vector handed to the pluggable scoring function
///
/// `hospital_distance_km` is already capped: donors with no qualifying
/// hospital are fed the configured cap rather than a sentinel, so scorers
/// never see infinities.
#[derive(Debug, Clone, Copy)]
pub struct MatchFeatures {
    pub compatible: f64,
    pub distance_km: f64,
    pub hospital_distance_km: f64,
    pub urgency: f64,
    pub reliability: f64,
}

/// Pluggable match-quality model
///
/// Implementations estimate donor suitability in [0, 1]. The ranking engine
/// treats a non-finite output as a scoring failure and degrades that match's
/// quality to 0.0 instead of propagating an error.
pub trait MatchScorer: Send + Sync {
    fn score(&self, features: &MatchFeatures) -> f64;
}

/// Logistic model over the match features
///
/// Stands in for the trained model from the data pipeline: a weighted linear
/// combination squashed through a sigmoid. Weights come from configuration so
/// a re-trained model only needs a config rollout.
#[derive(Debug, Clone)]
pub struct LogisticScorer {
    weights: ScoringWeights,
}

impl LogisticScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl Default for LogisticScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl MatchScorer for LogisticScorer {
    fn score(&self, features: &MatchFeatures) -> f64 {
        let w = &self.weights;
        let z = w.bias
            + w.compatibility * features.compatible
            + w.distance * features.distance_km
            + w.hospital_distance * features.hospital_distance_km
            + w.urgency * features.urgency
            + w.reliability * features.reliability;

        1.0 / (1.0 + (-z).exp())
    }
}

/// Reliability score from last-donation recency
///
/// `clamp(1 - days_since_donation / 365, 0, 1)`; a donor with no recorded
/// donation defaults to 0.5. Future-dated records clamp to 1.0 rather than
/// erroring on the bad data.
pub fn reliability_score(last_donation: Option<NaiveDate>, today: NaiveDate) -> f64 {
    match last_donation {
        Some(date) => {
            let days = (today - date).num_days() as f64;
            (1.0 - days / 365.0).clamp(0.0, 1.0)
        }
        None => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_logistic_scorer_in_unit_range() {
        let scorer = LogisticScorer::default();
        let features = MatchFeatures {
            compatible: 1.0,
            distance_km: 12.0,
            hospital_distance_km: 30.0,
            urgency: 8.0,
            reliability: 0.7,
        };
        let q = scorer.score(&features);
        assert!((0.0..=1.0).contains(&q), "quality {} out of range", q);
    }

    #[test]
    fn test_closer_donor_scores_higher() {
        let scorer = LogisticScorer::default();
        let near = MatchFeatures {
            compatible: 1.0,
            distance_km: 2.0,
            hospital_distance_km: 10.0,
            urgency: 5.0,
            reliability: 0.5,
        };
        let far = MatchFeatures { distance_km: 48.0, ..near };
        assert!(scorer.score(&near) > scorer.score(&far));
    }

    #[test]
    fn test_reliability_recent_donation() {
        let today = date(2025, 6, 1);
        // Donated ~36 days ago: 1 - 36/365 ≈ 0.90
        let score = reliability_score(Some(date(2025, 4, 26)), today);
        assert!((score - 0.90).abs() < 0.01, "got {}", score);
    }

    #[test]
    fn test_reliability_old_donation_clamps_to_zero() {
        let today = date(2025, 6, 1);
        let score = reliability_score(Some(date(2020, 1, 1)), today);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_reliability_future_date_clamps_to_one() {
        let today = date(2025, 6, 1);
        let score = reliability_score(Some(date(2026, 1, 1)), today);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_reliability_missing_date_defaults() {
        let today = date(2025, 6, 1);
        assert_eq!(reliability_score(None, today), 0.5);
    }
}
