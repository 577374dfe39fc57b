mod activity;
mod calculation;
mod season;

pub use activity::{
    ActivityInput, Appliance, Category, DisposalMethod, ElectricityInput, FuelType, Period,
    PeriodParseError, TransportInput, TransportMode, WasteInput, WasteItem, WasteType,
    DEFAULT_COUNTRY, STUDENT_CAREER, STUDENT_SCHEDULE,
};
pub use calculation::CalculationRow;
pub use season::SeasonProfile;
