use crate::core::{MatchError, Matcher};
use crate::models::{
    ErrorResponse, HealthResponse, MatchRequest, MatchResponse, MatchView, RankedMatch,
    RevealRequest, RevealResponse,
};
use crate::services::{Snapshot, SmsClient, TokenError, TokenStore};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<Snapshot>,
    pub matcher: Matcher,
    pub tokens: Arc<TokenStore>,
    pub sms: Option<Arc<SmsClient>>,
}

/// Configure all matching-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/contacts/reveal", web::post().to(reveal_contact));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "bloodType": "O-",
///   "latitude": 20.2961,
///   "longitude": 85.8245,
///   "urgency": 8
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    tracing::info!(
        "matching request: blood type {}, urgency {}",
        req.blood_type,
        req.urgency
    );

    let result = match state.matcher.rank(
        &req,
        &state.snapshot.donors,
        &state.snapshot.hospitals,
        &state.tokens,
    ) {
        Ok(result) => result,
        Err(MatchError::InvalidRequest(message)) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid request".to_string(),
                message,
                status_code: 400,
            });
        }
    };

    // Alert the top-ranked donor, best-effort
    let sms_status = dispatch_alert(&state, &result.matches, &req).await;

    let quality_mode = state.matcher.quality_mode();
    let cutoff = state.matcher.params().hospital_distance_cap_km;
    let response = MatchResponse {
        matches: result
            .matches
            .iter()
            .map(|m| MatchView::from_ranked(m, quality_mode, cutoff))
            .collect(),
        total_donors: result.total_donors,
        sms_status,
    };

    tracing::info!(
        "returning {} matches (from {} donors)",
        response.matches.len(),
        result.total_donors
    );

    HttpResponse::Ok().json(response)
}

/// Send an SMS alert to the top-ranked donor, reporting the outcome as the
/// status string surfaced in the response
async fn dispatch_alert(state: &AppState, matches: &[RankedMatch], req: &MatchRequest) -> String {
    let (Some(sms), Some(top)) = (&state.sms, matches.first()) else {
        return "not_attempted".to_string();
    };

    let body = format!(
        "Urgent: {} blood needed at ({}, {}). Please contact the hospital.",
        req.blood_type, req.latitude, req.longitude
    );
    let to_phone = format!("+{}", top.phone);

    match sms.send_alert(&to_phone, &body).await {
        Ok(()) => "sent".to_string(),
        Err(e) => {
            tracing::warn!("SMS alert to donor {} failed: {}", top.donor_id, e);
            format!("failed: {}", e)
        }
    }
}

/// Reveal a donor's contact number
///
/// POST /api/v1/contacts/reveal
///
/// Request body:
/// ```json
/// {
///   "token": "opaque-token-from-a-match"
/// }
/// ```
///
/// Each token works exactly once within its five-minute window.
async fn reveal_contact(
    state: web::Data<AppState>,
    req: web::Json<RevealRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.tokens.reveal(&req.token) {
        Ok(phone) => HttpResponse::Ok().json(RevealResponse { phone }),
        Err(TokenError::NotFound) => HttpResponse::NotFound().json(ErrorResponse {
            error: "token_not_found".to_string(),
            message: "Contact token does not exist or was already used".to_string(),
            status_code: 404,
        }),
        Err(TokenError::Expired) => HttpResponse::Gone().json(ErrorResponse {
            error: "token_expired".to_string(),
            message: "Contact token has expired".to_string(),
            status_code: 410,
        }),
    }
}
