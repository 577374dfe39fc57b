use crate::{
    generators::{electricity, waste},
    pipeline::{Envelope, PipelineError, Transform},
};
use footprint_client::domain::{ActivityInput, CalculationRow};
use time::macros::datetime;

fn reject(msg: &str) -> PipelineError {
    PipelineError::Transform(msg.to_string())
}

/// Pure validation of a `CalculationRow`.
///
/// Rules:
/// - result_kg_co2e must be finite and non-negative.
/// - created_at must be within [2000-01-01, 2100-01-01].
/// - electricity: kwh >= 1.0; 1-5 appliances including the laptop.
/// - transport: distance > 0; fuel type and occupancy = 1 exactly for motorized modes.
/// - waste: 1-3 items with positive weights.
pub fn validate_calculation(env: Envelope<CalculationRow>) -> Result<Envelope<CalculationRow>, PipelineError> {
    let row = &env.payload;

    if !row.result_kg_co2e.is_finite() || row.result_kg_co2e < 0.0 {
        return Err(reject("result_kg_co2e must be finite and non-negative"));
    }

    let min_ts = datetime!(2000-01-01 00:00:00);
    let max_ts = datetime!(2100-01-01 00:00:00);

    if row.created_at < min_ts || row.created_at > max_ts {
        return Err(reject("timestamp out of allowed range"));
    }

    match &row.input {
        ActivityInput::Electricity(e) => {
            if !e.kwh.is_finite() || e.kwh < 1.0 {
                return Err(reject("kwh must be at least 1.0"));
            }
            let n = e.selected_appliances.len();
            if n == 0 || n > electricity::MAX_APPLIANCES {
                return Err(reject("selected appliances must hold 1 to 5 entries"));
            }
            if !e.selected_appliances.contains(&electricity::DEFAULT_APPLIANCE) {
                return Err(reject("selected appliances must include the laptop"));
            }
        }
        ActivityInput::Transport(t) => {
            if !t.distance.is_finite() || t.distance <= 0.0 {
                return Err(reject("distance must be positive"));
            }
            let consistent = if t.transport_mode.is_motorized() {
                t.fuel_type.is_some() && t.occupancy == Some(1)
            } else {
                t.fuel_type.is_none() && t.occupancy.is_none()
            };
            if !consistent {
                return Err(reject("fuel type and occupancy must match the transport mode"));
            }
        }
        ActivityInput::Waste(w) => {
            let n = w.waste_items.len();
            if n == 0 || n > waste::MAX_ITEMS {
                return Err(reject("waste items must hold 1 to 3 entries"));
            }
            if w.waste_items.iter().any(|i| !i.weight_kg.is_finite() || i.weight_kg <= 0.0) {
                return Err(reject("waste item weights must be positive"));
            }
        }
    }

    Ok(env)
}

#[derive(Clone, Default)]
pub struct CalculationValidation;

#[async_trait::async_trait]
impl Transform<CalculationRow, CalculationRow> for CalculationValidation {
    async fn apply(
        &self,
        input: Envelope<CalculationRow>,
    ) -> Result<Envelope<CalculationRow>, PipelineError> {
        match validate_calculation(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("validation_calculation_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_client::domain::{
        Appliance, DisposalMethod, ElectricityInput, FuelType, Period, TransportInput, TransportMode,
        WasteInput,
    };
    use time::macros::date;
    use uuid::Uuid;

    fn row(input: ActivityInput) -> Envelope<CalculationRow> {
        Envelope::now(CalculationRow {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            input,
            result_kg_co2e: 1.5,
            factor_hash: "mock_00000000".to_string(),
            created_at: datetime!(2024-01-01 09:30:00),
        })
    }

    fn electricity(appliances: Vec<Appliance>, kwh: f64) -> ActivityInput {
        ActivityInput::Electricity(ElectricityInput {
            kwh,
            country: "CL".to_string(),
            period: Period::of(date!(2024 - 01 - 01)),
            idempotency_key: Uuid::nil(),
            selected_appliances: appliances,
            career: "x".to_string(),
            schedule: "diurna".to_string(),
        })
    }

    fn car(fuel_type: Option<FuelType>, occupancy: Option<u32>) -> ActivityInput {
        ActivityInput::Transport(TransportInput {
            distance: 10.0,
            transport_mode: TransportMode::Car,
            fuel_type,
            occupancy,
            country: "CL".to_string(),
            period: Period::of(date!(2024 - 01 - 01)),
            idempotency_key: Uuid::nil(),
        })
    }

    #[test]
    fn calculation_validation_accepts_valid_record() {
        let res = validate_calculation(row(electricity(vec![Appliance::Laptop, Appliance::Router], 4.2)));
        assert!(res.is_ok());
        assert!(validate_calculation(row(car(Some(FuelType::Gasoline), Some(1)))).is_ok());
    }

    #[test]
    fn calculation_validation_rejects_missing_laptop_and_low_kwh() {
        let res = validate_calculation(row(electricity(vec![Appliance::Router], 4.2)));
        assert!(matches!(res, Err(PipelineError::Transform(_))));

        let res = validate_calculation(row(electricity(vec![Appliance::Laptop], 0.5)));
        assert!(matches!(res, Err(PipelineError::Transform(_))));
    }

    #[test]
    fn calculation_validation_rejects_motorized_trip_without_fuel() {
        let res = validate_calculation(row(car(None, Some(1))));
        assert!(matches!(res, Err(PipelineError::Transform(_))));
    }

    #[test]
    fn calculation_validation_rejects_empty_waste_and_negative_result() {
        let empty = ActivityInput::Waste(WasteInput {
            waste_items: vec![],
            disposal_method: DisposalMethod::Mixed,
            country: "CL".to_string(),
            period: Period::of(date!(2024 - 01 - 01)),
            idempotency_key: Uuid::nil(),
        });
        assert!(matches!(validate_calculation(row(empty)), Err(PipelineError::Transform(_))));

        let mut negative = row(car(Some(FuelType::Gasoline), Some(1)));
        negative.payload.result_kg_co2e = -0.1;
        assert!(matches!(validate_calculation(negative), Err(PipelineError::Transform(_))));
    }

    #[test]
    fn calculation_validation_rejects_out_of_range_ts() {
        let mut env = row(car(Some(FuelType::Gasoline), Some(1)));
        env.payload.created_at = datetime!(1800-01-01 00:00:00);
        assert!(matches!(validate_calculation(env), Err(PipelineError::Transform(_))));
    }
}
