use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to match donors to a recipient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "blood_type", rename = "bloodType")]
    pub blood_type: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = 1, max = 10))]
    pub urgency: u8,
}

/// Request to reveal a donor's contact number
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RevealRequest {
    #[validate(length(min = 1))]
    pub token: String,
}
