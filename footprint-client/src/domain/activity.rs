use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, Month};
use uuid::Uuid;

pub const DEFAULT_COUNTRY: &str = "CL";
pub const STUDENT_CAREER: &str = "Ingeniería en Informática";
pub const STUDENT_SCHEDULE: &str = "diurna";

/// Activity category, serialized with the tags stored in `calculation.category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "electricidad")]
    Electricity,
    #[serde(rename = "transporte")]
    Transport,
    #[serde(rename = "residuos")]
    Waste,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Electricity, Category::Transport, Category::Waste];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electricity => "electricidad",
            Self::Transport => "transporte",
            Self::Waste => "residuos",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid period '{0}', expected YYYY-MM")]
pub struct PeriodParseError(String);

/// Accounting period, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: Month,
}

impl Period {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn of(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let parsed = value.split_once('-').and_then(|(y, m)| {
            if y.len() != 4 || m.len() != 2 {
                return None;
            }
            let year: i32 = y.parse().ok()?;
            let month = Month::try_from(m.parse::<u8>().ok()?).ok()?;
            Some(Period::new(year, month))
        });
        parsed.ok_or(PeriodParseError(value))
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

/// Household device a student may run on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appliance {
    Laptop,
    Monitor,
    Desktop,
    Router,
    #[serde(rename = "lampara")]
    Lamp,
    #[serde(rename = "cargador")]
    Charger,
    #[serde(rename = "ventilador")]
    Fan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Bus,
    Metro,
    Bicycle,
    Walking,
    Car,
    Motorcycle,
}

impl TransportMode {
    pub const fn is_motorized(self) -> bool {
        matches!(self, Self::Car | Self::Motorcycle)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Metro => "metro",
            Self::Bicycle => "bicycle",
            Self::Walking => "walking",
            Self::Car => "car",
            Self::Motorcycle => "motorcycle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gasoline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasteType {
    Paper,
    Plastic,
    Organic,
    Glass,
    Metal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisposalMethod {
    Mixed,
    Recycling,
    Composting,
    Landfill,
}

impl DisposalMethod {
    pub const ALL: [DisposalMethod; 4] = [
        DisposalMethod::Mixed,
        DisposalMethod::Recycling,
        DisposalMethod::Composting,
        DisposalMethod::Landfill,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Recycling => "recycling",
            Self::Composting => "composting",
            Self::Landfill => "landfill",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityInput {
    pub kwh: f64,
    pub country: String,
    pub period: Period,
    pub idempotency_key: Uuid,
    pub selected_appliances: Vec<Appliance>,
    pub career: String,
    pub schedule: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportInput {
    pub distance: f64,
    pub transport_mode: TransportMode,
    /// Present only for motorized modes.
    pub fuel_type: Option<FuelType>,
    /// Present only for motorized modes.
    pub occupancy: Option<u32>,
    pub country: String,
    pub period: Period,
    pub idempotency_key: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteItem {
    pub waste_type: WasteType,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteInput {
    pub waste_items: Vec<WasteItem>,
    pub disposal_method: DisposalMethod,
    pub country: String,
    pub period: Period,
    pub idempotency_key: Uuid,
}

impl WasteInput {
    pub fn total_weight_kg(&self) -> f64 {
        self.waste_items.iter().map(|i| i.weight_kg).sum()
    }
}

/// Category-specific payload stored in `calculation.input_json`.
///
/// Serializes untagged: the category lives in its own column, so the JSON
/// object carries only the record's fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActivityInput {
    Electricity(ElectricityInput),
    Transport(TransportInput),
    Waste(WasteInput),
}

impl ActivityInput {
    pub fn category(&self) -> Category {
        match self {
            Self::Electricity(_) => Category::Electricity,
            Self::Transport(_) => Category::Transport,
            Self::Waste(_) => Category::Waste,
        }
    }

    pub fn idempotency_key(&self) -> Uuid {
        match self {
            Self::Electricity(e) => e.idempotency_key,
            Self::Transport(t) => t.idempotency_key,
            Self::Waste(w) => w.idempotency_key,
        }
    }

    pub fn period(&self) -> Period {
        match self {
            Self::Electricity(e) => e.period,
            Self::Transport(t) => t.period,
            Self::Waste(w) => w.period,
        }
    }

    /// Rebuild a payload from its category column and `input_json` value.
    pub fn from_tagged(category: Category, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match category {
            Category::Electricity => Self::Electricity(serde_json::from_value(value)?),
            Category::Transport => Self::Transport(serde_json::from_value(value)?),
            Category::Waste => Self::Waste(serde_json::from_value(value)?),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
