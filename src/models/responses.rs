use crate::core::compat::BloodType;
use crate::models::domain::RankedMatch;
use serde::{Deserialize, Serialize};

/// Externally visible view of a ranked match
///
/// Never carries the raw phone number: callers get the masked form and a
/// one-time contact token instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    #[serde(rename = "donorId")]
    pub donor_id: u32,
    #[serde(rename = "bloodType")]
    pub blood_type: BloodType,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    #[serde(rename = "urgencyScore")]
    pub urgency_score: u8,
    #[serde(rename = "donorLatitude")]
    pub donor_latitude: f64,
    #[serde(rename = "donorLongitude")]
    pub donor_longitude: f64,
    /// Null when no hospital qualifies or the figure is past the reporting cutoff
    #[serde(rename = "hospitalDistanceKm")]
    pub hospital_distance_km: Option<f64>,
    #[serde(rename = "maskedPhone")]
    pub masked_phone: String,
    #[serde(rename = "contactToken")]
    pub contact_token: String,
    /// Present only when the service runs with a scoring model
    #[serde(rename = "matchQuality", skip_serializing_if = "Option::is_none")]
    pub match_quality: Option<f64>,
}

impl MatchView {
    /// Build the external view, suppressing the hospital distance past the
    /// reporting cutoff and the quality figure outside quality mode
    pub fn from_ranked(m: &RankedMatch, quality_mode: bool, report_cutoff_km: f64) -> Self {
        let hospital_distance_km = m
            .hospital_distance_km
            .filter(|d| *d < report_cutoff_km);

        Self {
            donor_id: m.donor_id,
            blood_type: m.blood_type,
            distance_km: m.distance_km,
            urgency_score: m.urgency_score,
            donor_latitude: m.donor_latitude,
            donor_longitude: m.donor_longitude,
            hospital_distance_km,
            masked_phone: m.masked_phone.clone(),
            contact_token: m.contact_token.clone(),
            match_quality: quality_mode.then_some(m.match_quality),
        }
    }
}

/// Response for the find-matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchView>,
    #[serde(rename = "totalDonors")]
    pub total_donors: usize,
    #[serde(rename = "smsStatus")]
    pub sms_status: String,
}

/// Response for the contact-reveal endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealResponse {
    pub phone: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(hospital: Option<f64>) -> RankedMatch {
        RankedMatch {
            donor_id: 7,
            blood_type: BloodType::ONeg,
            distance_km: 3.2,
            hospital_distance_km: hospital,
            urgency_score: 8,
            donor_latitude: 20.3,
            donor_longitude: 85.8,
            reliability: 0.5,
            match_quality: 0.42,
            phone: "919876543210".to_string(),
            masked_phone: "******3210".to_string(),
            contact_token: "deadbeef".to_string(),
        }
    }

    #[test]
    fn test_view_hides_raw_phone() {
        let view = MatchView::from_ranked(&ranked(Some(10.0)), true, 1000.0);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("919876543210"));
        assert!(json.contains("******3210"));
    }

    #[test]
    fn test_view_suppresses_far_hospital_distance() {
        let view = MatchView::from_ranked(&ranked(Some(1200.0)), false, 1000.0);
        assert_eq!(view.hospital_distance_km, None);

        let view = MatchView::from_ranked(&ranked(None), false, 1000.0);
        assert_eq!(view.hospital_distance_km, None);

        let view = MatchView::from_ranked(&ranked(Some(12.0)), false, 1000.0);
        assert_eq!(view.hospital_distance_km, Some(12.0));
    }

    #[test]
    fn test_quality_only_in_quality_mode() {
        let with = MatchView::from_ranked(&ranked(None), true, 1000.0);
        assert_eq!(with.match_quality, Some(0.42));

        let without = MatchView::from_ranked(&ranked(None), false, 1000.0);
        assert_eq!(without.match_quality, None);
        let json = serde_json::to_string(&without).unwrap();
        assert!(!json.contains("matchQuality"));
    }
}
