use std::ops::Range;

use footprint_client::domain::{FuelType, Period, TransportInput, TransportMode};
use rand::Rng;
use time::Date;

use super::{is_weekday, random_uuid, round_to, WeightError, WeightedTable};

/// Seasonal factors below this mark a low-travel season.
const LOW_TRAVEL_FACTOR: f64 = 1.0;
const WEEKEND_LOW_TRAVEL_MULTIPLIER: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct ModeProfile {
    pub mode: TransportMode,
    pub distance_km: Range<f64>,
}

pub fn mode_table() -> Vec<(ModeProfile, f64)> {
    let mode = |mode, distance_km, weight| (ModeProfile { mode, distance_km }, weight);
    vec![
        mode(TransportMode::Bus, 5.0..15.0, 0.35),
        mode(TransportMode::Metro, 8.0..20.0, 0.25),
        mode(TransportMode::Bicycle, 2.0..8.0, 0.15),
        mode(TransportMode::Walking, 0.5..3.0, 0.10),
        mode(TransportMode::Car, 5.0..25.0, 0.10),
        mode(TransportMode::Motorcycle, 5.0..20.0, 0.05),
    ]
}

#[derive(Debug, Clone)]
pub struct TransportGenerator {
    modes: WeightedTable<ModeProfile>,
}

impl TransportGenerator {
    pub fn new() -> Result<Self, WeightError> {
        Self::with_modes(mode_table())
    }

    pub fn with_modes(modes: Vec<(ModeProfile, f64)>) -> Result<Self, WeightError> {
        Ok(Self {
            modes: WeightedTable::new(modes)?,
        })
    }

    /// One trip. Distance scales with the season and halves on weekends of
    /// low-travel seasons.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        date: Date,
        factor: f64,
        country: &str,
        rng: &mut R,
    ) -> TransportInput {
        let profile = self.modes.sample(rng);

        let mut distance = rng.gen_range(profile.distance_km.clone()) * factor;
        if !is_weekday(date) && factor < LOW_TRAVEL_FACTOR {
            distance *= WEEKEND_LOW_TRAVEL_MULTIPLIER;
        }

        // Every motorized trip in the catalogue runs on gasoline.
        let motorized = profile.mode.is_motorized();
        TransportInput {
            distance: round_to(distance, 2),
            transport_mode: profile.mode,
            fuel_type: motorized.then_some(FuelType::Gasoline),
            occupancy: motorized.then_some(1),
            country: country.to_string(),
            period: Period::of(date),
            idempotency_key: random_uuid(rng),
        }
    }
}
