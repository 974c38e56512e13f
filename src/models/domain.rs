use crate::core::compat::BloodType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Registered donor, loaded once at startup into the read-only snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donor {
    pub id: u32,
    #[serde(rename = "bloodType")]
    pub blood_type: BloodType,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "lastDonation", default)]
    pub last_donation: Option<NaiveDate>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Hospital blood stock line, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "bloodType")]
    pub blood_type: BloodType,
    pub stock: u32,
}

/// Validated recipient request, produced from the wire-level
/// [`MatchRequest`](crate::models::MatchRequest) before any donor is scanned
#[derive(Debug, Clone, Copy)]
pub struct RecipientRequest {
    pub blood_type: BloodType,
    pub latitude: f64,
    pub longitude: f64,
    pub urgency: u8,
}

/// One ranked donor match
///
/// Carries the unmasked phone for internal collaborators (SMS dispatch);
/// external callers only ever see the masked form plus the contact token,
/// via [`MatchView`](crate::models::MatchView).
#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub donor_id: u32,
    pub blood_type: BloodType,
    pub distance_km: f64,
    /// Minimum distance to a qualifying hospital; `None` when no hospital
    /// qualifies (sorted last in rule-based mode)
    pub hospital_distance_km: Option<f64>,
    pub urgency_score: u8,
    pub donor_latitude: f64,
    pub donor_longitude: f64,
    pub reliability: f64,
    pub match_quality: f64,
    pub phone: String,
    pub masked_phone: String,
    pub contact_token: String,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Weights for the logistic scoring model
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub bias: f64,
    pub compatibility: f64,
    pub distance: f64,
    pub hospital_distance: f64,
    pub urgency: f64,
    pub reliability: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            bias: -1.0,
            compatibility: 1.5,
            distance: -0.05,
            hospital_distance: -0.001,
            urgency: 0.25,
            reliability: 1.0,
        }
    }
}
