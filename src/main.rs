use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use lifelink_algo::config::Settings;
use lifelink_algo::core::{LogisticScorer, Matcher, MatchingParams};
use lifelink_algo::models::ScoringWeights;
use lifelink_algo::routes;
use lifelink_algo::routes::matches::AppState;
use lifelink_algo::services::{SmsClient, Snapshot, TokenStore, DEFAULT_TOKEN_TTL};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap_or_default())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Interval between expired-token sweeps
const TOKEN_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting LifeLink Algo matching service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Load the donor/hospital snapshot; the service is useless without it
    let snapshot = Arc::new(
        Snapshot::load(&settings.data.donors_path, &settings.data.hospitals_path).unwrap_or_else(
            |e| {
                error!("Failed to load data snapshot: {}", e);
                panic!("Snapshot load error: {}", e);
            },
        ),
    );

    info!(
        "Snapshot loaded: {} donors, {} hospital stock lines",
        snapshot.donors.len(),
        snapshot.hospitals.len()
    );

    // Assemble matching parameters
    let defaults = MatchingParams::default();
    let params = MatchingParams {
        max_distance_km: settings.matching.max_distance_km.unwrap_or(defaults.max_distance_km),
        max_results: settings.matching.max_results.unwrap_or(defaults.max_results),
        low_stock_threshold: settings
            .matching
            .low_stock_threshold
            .unwrap_or(defaults.low_stock_threshold),
        hospital_distance_cap_km: settings
            .matching
            .hospital_distance_cutoff_km
            .unwrap_or(defaults.hospital_distance_cap_km),
    };

    // Build the matcher in the configured scoring mode
    let matcher = if settings.scoring.mode == "quality" {
        let w = &settings.scoring.weights;
        let weights = ScoringWeights {
            bias: w.bias,
            compatibility: w.compatibility,
            distance: w.distance,
            hospital_distance: w.hospital_distance,
            urgency: w.urgency,
            reliability: w.reliability,
        };
        info!("Matcher initialized in quality mode with weights: {:?}", weights);
        Matcher::new(Arc::new(LogisticScorer::new(weights)), params)
    } else {
        info!("Matcher initialized in rule-based mode");
        Matcher::rule_based(params)
    };

    // Contact token store with a periodic sweep of expired entries
    let token_ttl = settings
        .tokens
        .ttl_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TOKEN_TTL);
    let tokens = Arc::new(TokenStore::with_ttl(token_ttl));

    info!("Token store initialized (TTL: {}s)", token_ttl.as_secs());

    {
        let tokens = Arc::clone(&tokens);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TOKEN_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let reclaimed = tokens.sweep_expired();
                if reclaimed > 0 {
                    tracing::debug!("reclaimed {} expired contact tokens", reclaimed);
                }
            }
        });
    }

    // SMS dispatch is optional; the service matches fine without it
    let sms = match &settings.sms {
        Some(sms_settings) => match SmsClient::new(
            sms_settings.base_url.clone(),
            sms_settings.account_sid.clone(),
            sms_settings.auth_token.clone(),
            sms_settings.from_number.clone(),
        ) {
            Ok(client) => {
                info!("SMS dispatch enabled (from {})", sms_settings.from_number);
                Some(Arc::new(client))
            }
            Err(e) => {
                error!("Failed to initialize SMS client ({}), continuing without SMS", e);
                None
            }
        },
        None => {
            info!("SMS dispatch not configured");
            None
        }
    };

    // Build application state
    let app_state = AppState {
        snapshot,
        matcher,
        tokens,
        sms,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
