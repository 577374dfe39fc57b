use footprint_client::domain::{Appliance, ElectricityInput, Period, STUDENT_CAREER, STUDENT_SCHEDULE};
use rand::Rng;
use time::Date;

use super::{is_weekday, random_uuid, round_to};

/// Appliance that is always reported, even when not sampled.
pub const DEFAULT_APPLIANCE: Appliance = Appliance::Laptop;
pub const MAX_APPLIANCES: usize = 5;

const BASE_KWH: f64 = 5.0;
const WEEKDAY_MULTIPLIER: f64 = 1.3;
const MIN_KWH: f64 = 1.0;
const NOISE_KWH: (f64, f64) = (-2.0, 3.0);

#[derive(Debug, Clone, Copy)]
pub struct ApplianceProfile {
    pub appliance: Appliance,
    /// Daily inclusion probability before seasonal scaling.
    pub probability: f64,
    /// kWh for a full day of use.
    pub kwh_base: f64,
    /// Primary devices are used for longer stretches.
    pub primary: bool,
}

pub const APPLIANCES: [ApplianceProfile; 7] = [
    ApplianceProfile { appliance: Appliance::Laptop, probability: 0.95, kwh_base: 8.0, primary: true },
    ApplianceProfile { appliance: Appliance::Monitor, probability: 0.70, kwh_base: 3.5, primary: true },
    ApplianceProfile { appliance: Appliance::Desktop, probability: 0.40, kwh_base: 12.0, primary: false },
    ApplianceProfile { appliance: Appliance::Router, probability: 0.90, kwh_base: 2.0, primary: false },
    ApplianceProfile { appliance: Appliance::Lamp, probability: 0.85, kwh_base: 1.5, primary: false },
    ApplianceProfile { appliance: Appliance::Charger, probability: 0.80, kwh_base: 0.5, primary: false },
    ApplianceProfile { appliance: Appliance::Fan, probability: 0.30, kwh_base: 2.5, primary: false },
];

impl ApplianceProfile {
    fn usage_hours<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.primary {
            rng.gen_range(2.0..10.0)
        } else {
            rng.gen_range(1.0..6.0)
        }
    }
}

/// Daily electricity use for one student.
///
/// Inclusion compares a uniform draw against `probability * factor` without
/// clamping, so factors above 1 can make an appliance certain.
pub fn generate_electricity<R: Rng + ?Sized>(
    date: Date,
    factor: f64,
    country: &str,
    rng: &mut R,
) -> ElectricityInput {
    let mut base = BASE_KWH * factor;
    if is_weekday(date) {
        base *= WEEKDAY_MULTIPLIER;
    }

    let mut selected = Vec::with_capacity(APPLIANCES.len());
    let mut appliance_kwh = 0.0;
    for profile in &APPLIANCES {
        if rng.gen::<f64>() < profile.probability * factor {
            selected.push(profile.appliance);
            appliance_kwh += profile.kwh_base * profile.usage_hours(rng) / 24.0;
        }
    }

    if !selected.contains(&DEFAULT_APPLIANCE) {
        selected.insert(0, DEFAULT_APPLIANCE);
    }
    // Truncated appliances still count towards appliance_kwh.
    selected.truncate(MAX_APPLIANCES);

    let noise = rng.gen_range(NOISE_KWH.0..NOISE_KWH.1);
    let kwh = (base + appliance_kwh + noise).max(MIN_KWH);

    ElectricityInput {
        kwh: round_to(kwh, 2),
        country: country.to_string(),
        period: Period::of(date),
        idempotency_key: random_uuid(rng),
        selected_appliances: selected,
        career: STUDENT_CAREER.to_string(),
        schedule: STUDENT_SCHEDULE.to_string(),
    }
}
