// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BoundingBox, Donor, Hospital, RankedMatch, RecipientRequest, ScoringWeights};
pub use requests::{MatchRequest, RevealRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchResponse, MatchView, RevealResponse};
