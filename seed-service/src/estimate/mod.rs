//! Rough kg CO2e estimates for generated activity.
//!
//! Factors are approximate Chilean averages. Each estimate is jittered by
//! ±10% so seeded rows do not repeat exact values.

use std::ops::Range;

use footprint_client::domain::{ActivityInput, Category, DisposalMethod, TransportMode};
use rand::Rng;

use crate::generators::round_to;

pub const UNKNOWN_CATEGORY_KG_CO2E: f64 = 1.0;
const JITTER: Range<f64> = 0.9..1.1;
const DECIMALS: i32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub kg_co2e: f64,
    /// Opaque reference to the factor used, `mock_` plus 8 hex chars.
    pub factor_hash: String,
}

#[derive(Debug, Clone)]
pub struct EmissionFactors {
    pub electricity_kg_per_kwh: f64,
    pub transport_kg_per_km: Vec<(TransportMode, f64)>,
    /// Used for modes missing from `transport_kg_per_km`.
    pub transport_fallback: f64,
    pub waste_kg_per_kg: Vec<(DisposalMethod, f64)>,
    /// Used for methods missing from `waste_kg_per_kg`.
    pub waste_fallback: f64,
    pub unknown_category_kg: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            electricity_kg_per_kwh: 0.37,
            transport_kg_per_km: vec![
                (TransportMode::Car, 0.21),
                (TransportMode::Motorcycle, 0.15),
                (TransportMode::Bus, 0.08),
                (TransportMode::Metro, 0.04),
                (TransportMode::Bicycle, 0.0),
                (TransportMode::Walking, 0.0),
            ],
            transport_fallback: 0.1,
            waste_kg_per_kg: vec![
                (DisposalMethod::Landfill, 0.5),
                (DisposalMethod::Mixed, 0.3),
                (DisposalMethod::Recycling, 0.1),
                (DisposalMethod::Composting, 0.05),
            ],
            waste_fallback: 0.3,
            unknown_category_kg: UNKNOWN_CATEGORY_KG_CO2E,
        }
    }
}

impl EmissionFactors {
    pub fn transport_factor(&self, mode: TransportMode) -> f64 {
        self.transport_kg_per_km
            .iter()
            .find(|(m, _)| *m == mode)
            .map_or(self.transport_fallback, |(_, f)| *f)
    }

    pub fn waste_factor(&self, method: DisposalMethod) -> f64 {
        self.waste_kg_per_kg
            .iter()
            .find(|(m, _)| *m == method)
            .map_or(self.waste_fallback, |(_, f)| *f)
    }
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    let len = s.len() as u32;
    hasher.update(&len.to_le_bytes());
    hasher.update(s.as_bytes());
}

/// Stable token for a (category, subcategory, factor) triple.
pub fn factor_hash(category: &str, subcategory: &str, factor: f64) -> String {
    let mut h = blake3::Hasher::new();
    hash_str(&mut h, category);
    hash_str(&mut h, subcategory);
    h.update(&factor.to_bits().to_le_bytes());
    let hex = h.finalize().to_hex();
    format!("mock_{}", &hex.as_str()[..8])
}

#[derive(Debug, Clone, Default)]
pub struct Co2eEstimator {
    factors: EmissionFactors,
}

impl Co2eEstimator {
    pub fn new(factors: EmissionFactors) -> Self {
        Self { factors }
    }

    pub fn estimate<R: Rng + ?Sized>(&self, input: &ActivityInput, rng: &mut R) -> Estimate {
        let category = input.category().as_str();
        let (quantity, factor, subcategory) = match input {
            ActivityInput::Electricity(e) => (e.kwh, self.factors.electricity_kg_per_kwh, "grid"),
            ActivityInput::Transport(t) => (
                t.distance,
                self.factors.transport_factor(t.transport_mode),
                t.transport_mode.as_str(),
            ),
            ActivityInput::Waste(w) => (
                w.total_weight_kg(),
                self.factors.waste_factor(w.disposal_method),
                w.disposal_method.as_str(),
            ),
        };

        let jitter = rng.gen_range(JITTER);
        Estimate {
            kg_co2e: round_to((quantity * factor * jitter).max(0.0), DECIMALS),
            factor_hash: factor_hash(category, subcategory, factor),
        }
    }

    /// Estimate from a stored `(category, input_json)` pair.
    ///
    /// Unknown tags and payloads that do not match their tag get the fixed
    /// fallback value.
    pub fn estimate_payload<R: Rng + ?Sized>(
        &self,
        category: &str,
        payload: &serde_json::Value,
        rng: &mut R,
    ) -> Estimate {
        let parsed = Category::from_tag(category)
            .and_then(|c| match ActivityInput::from_tagged(c, payload.clone()) {
                Ok(input) => Some(input),
                Err(e) => {
                    tracing::warn!(error = %e, category, "payload does not match its category");
                    None
                }
            });

        match parsed {
            Some(input) => self.estimate(&input, rng),
            None => Estimate {
                kg_co2e: self.factors.unknown_category_kg,
                factor_hash: factor_hash(category, "fallback", self.factors.unknown_category_kg),
            },
        }
    }
}
