use crate::core::distance::{
    calculate_bounding_box, checked_distance, is_valid_coordinate, is_within_bounding_box,
};
use crate::core::phone::{is_usable_phone, mask_phone, normalize_phone};
use crate::core::scoring::{reliability_score, MatchFeatures, MatchScorer};
use crate::models::{Donor, Hospital, MatchRequest, RankedMatch, RecipientRequest};
use crate::services::tokens::TokenStore;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the ranking engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Policy knobs for the ranking pipeline
///
/// The stock threshold and reporting cutoff are deliberate configuration,
/// not literals buried in the algorithm.
#[derive(Debug, Clone, Copy)]
pub struct MatchingParams {
    pub max_distance_km: f64,
    pub max_results: usize,
    pub low_stock_threshold: u32,
    pub hospital_distance_cap_km: f64,
}

impl Default for MatchingParams {
    fn default() -> Self {
        Self {
            max_distance_km: 50.0,
            max_results: 10,
            low_stock_threshold: 5,
            hospital_distance_cap_km: 1000.0,
        }
    }
}

/// Result of the ranking process
#[derive(Debug)]
pub struct RankResult {
    pub matches: Vec<RankedMatch>,
    pub total_donors: usize,
}

/// Main matching orchestrator
///
/// # Pipeline stages
/// 1. Request validation (blood type, urgency, coordinates)
/// 2. Qualifying low-stock hospital selection
/// 3. Compatibility + record-completeness + distance filtering
/// 4. Reliability and quality scoring, token minting
/// 5. Mode-dependent ordering and truncation
#[derive(Clone)]
pub struct Matcher {
    scorer: Option<Arc<dyn MatchScorer>>,
    params: MatchingParams,
}

impl Matcher {
    /// Quality mode: rank by the injected scoring model
    pub fn new(scorer: Arc<dyn MatchScorer>, params: MatchingParams) -> Self {
        Self {
            scorer: Some(scorer),
            params,
        }
    }

    /// Rule-based mode: no model, rank by (hospital distance, distance)
    pub fn rule_based(params: MatchingParams) -> Self {
        Self {
            scorer: None,
            params,
        }
    }

    pub fn quality_mode(&self) -> bool {
        self.scorer.is_some()
    }

    pub fn params(&self) -> &MatchingParams {
        &self.params
    }

    /// Validate the wire-level request before any donor is scanned
    pub fn validate_request(request: &MatchRequest) -> Result<RecipientRequest, MatchError> {
        let blood_type = request
            .blood_type
            .parse()
            .map_err(|e: crate::core::compat::InvalidBloodType| {
                MatchError::InvalidRequest(e.to_string())
            })?;

        if !(1..=10).contains(&request.urgency) {
            return Err(MatchError::InvalidRequest(format!(
                "urgency must be between 1 and 10, got {}",
                request.urgency
            )));
        }

        if !is_valid_coordinate(request.latitude, request.longitude) {
            return Err(MatchError::InvalidRequest(format!(
                "invalid coordinates ({}, {})",
                request.latitude, request.longitude
            )));
        }

        Ok(RecipientRequest {
            blood_type,
            latitude: request.latitude,
            longitude: request.longitude,
            urgency: request.urgency,
        })
    }

    /// Rank candidate donors for one recipient request
    ///
    /// Every returned match carries a freshly minted contact token bound to
    /// the donor's unmasked phone number. Malformed donor records are skipped
    /// with a warning; a broken scorer degrades quality to 0.0. Neither
    /// aborts the call.
    pub fn rank(
        &self,
        request: &MatchRequest,
        donors: &[Donor],
        hospitals: &[Hospital],
        tokens: &TokenStore,
    ) -> Result<RankResult, MatchError> {
        let recipient = Self::validate_request(request)?;
        let total_donors = donors.len();

        let qualifying = self.qualifying_hospitals(&recipient, hospitals);

        let bbox = calculate_bounding_box(
            recipient.latitude,
            recipient.longitude,
            self.params.max_distance_km,
        );
        let today = Utc::now().date_naive();

        let mut matches: Vec<RankedMatch> = Vec::new();

        for donor in donors {
            if !donor.blood_type.can_donate_to(recipient.blood_type) {
                continue;
            }

            let phone = match donor.phone.as_deref() {
                Some(p) if is_usable_phone(p) => p,
                _ => {
                    tracing::warn!("skipping donor {}: missing or unusable phone", donor.id);
                    continue;
                }
            };

            if !is_valid_coordinate(donor.latitude, donor.longitude) {
                tracing::warn!(
                    "skipping donor {}: invalid coordinates ({}, {})",
                    donor.id,
                    donor.latitude,
                    donor.longitude
                );
                continue;
            }

            // Cheap geospatial pre-filter before the exact distance
            if !is_within_bounding_box(donor.latitude, donor.longitude, &bbox) {
                continue;
            }

            let distance_km = checked_distance(
                recipient.latitude,
                recipient.longitude,
                donor.latitude,
                donor.longitude,
            );
            if distance_km > self.params.max_distance_km {
                continue;
            }

            let hospital_distance_km = qualifying
                .iter()
                .map(|h| checked_distance(donor.latitude, donor.longitude, h.latitude, h.longitude))
                .filter(|d| d.is_finite())
                .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

            let reliability = reliability_score(donor.last_donation, today);

            let features = MatchFeatures {
                compatible: 1.0,
                distance_km,
                hospital_distance_km: hospital_distance_km
                    .unwrap_or(self.params.hospital_distance_cap_km)
                    .min(self.params.hospital_distance_cap_km),
                urgency: recipient.urgency as f64,
                reliability,
            };

            let match_quality = match &self.scorer {
                Some(scorer) => {
                    let quality = scorer.score(&features);
                    if quality.is_finite() {
                        quality.clamp(0.0, 1.0)
                    } else {
                        tracing::warn!(
                            "scorer returned non-finite quality for donor {}, defaulting to 0.0",
                            donor.id
                        );
                        0.0
                    }
                }
                None => 0.0,
            };

            let normalized = normalize_phone(phone);
            let contact_token = tokens.issue(&normalized);

            matches.push(RankedMatch {
                donor_id: donor.id,
                blood_type: donor.blood_type,
                distance_km,
                hospital_distance_km,
                urgency_score: recipient.urgency,
                donor_latitude: donor.latitude,
                donor_longitude: donor.longitude,
                reliability,
                match_quality,
                phone: normalized,
                masked_phone: mask_phone(phone),
                contact_token,
            });
        }

        self.sort_matches(&mut matches);
        matches.truncate(self.params.max_results);

        Ok(RankResult {
            matches,
            total_donors,
        })
    }

    /// Hospital stock lines the recipient's matches should be routed toward
    ///
    /// Low-stock lines for a compatible blood type take priority; when none
    /// exist, every hospital is considered so each donor still receives a
    /// hospital-distance figure.
    fn qualifying_hospitals<'a>(
        &self,
        recipient: &RecipientRequest,
        hospitals: &'a [Hospital],
    ) -> Vec<&'a Hospital> {
        let compatible_sources = recipient.blood_type.compatible_donors();

        let low_stock: Vec<&Hospital> = hospitals
            .iter()
            .filter(|h| {
                compatible_sources.contains(&h.blood_type)
                    && h.stock < self.params.low_stock_threshold
            })
            .collect();

        if low_stock.is_empty() {
            hospitals.iter().collect()
        } else {
            low_stock
        }
    }

    fn sort_matches(&self, matches: &mut [RankedMatch]) {
        if self.scorer.is_some() {
            // Quality mode: best model score first, distance breaks ties
            matches.sort_by(|a, b| {
                b.match_quality
                    .partial_cmp(&a.match_quality)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| {
                        a.distance_km
                            .partial_cmp(&b.distance_km)
                            .unwrap_or(Ordering::Equal)
                    })
            });
        } else {
            // Rule-based mode: closest to a low-stock hospital first, then
            // closest to the recipient, then most urgent; donors with no
            // qualifying hospital sort last
            matches.sort_by(|a, b| {
                let ha = a.hospital_distance_km.unwrap_or(f64::INFINITY);
                let hb = b.hospital_distance_km.unwrap_or(f64::INFINITY);
                ha.partial_cmp(&hb)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| {
                        a.distance_km
                            .partial_cmp(&b.distance_km)
                            .unwrap_or(Ordering::Equal)
                    })
                    .then_with(|| b.urgency_score.cmp(&a.urgency_score))
            });
        }
    }
}
