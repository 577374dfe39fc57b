use time::PrimitiveDateTime;
use uuid::Uuid;

use super::{ActivityInput, Category};

/// One row of the `calculation` table.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub input: ActivityInput,
    pub result_kg_co2e: f64,
    pub factor_hash: String,
    pub created_at: PrimitiveDateTime,
}

impl CalculationRow {
    pub fn category(&self) -> Category {
        self.input.category()
    }
}
