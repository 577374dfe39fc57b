//! Synthetic activity generators.
//!
//! Every generator takes the RNG explicitly so a seeded run is reproducible,
//! idempotency keys included.

pub mod electricity;
pub mod transport;
pub mod waste;
pub mod weighted;

use footprint_client::domain::{ActivityInput, Category, SeasonProfile};
use rand::Rng;
use time::{Date, Weekday};
use uuid::Uuid;

pub use electricity::generate_electricity;
pub use transport::TransportGenerator;
pub use waste::WasteGenerator;
pub use weighted::{WeightError, WeightedTable};

/// Share of generated rows per category.
pub const CATEGORY_WEIGHTS: [(Category, f64); 3] = [
    (Category::Electricity, 0.40),
    (Category::Transport, 0.35),
    (Category::Waste, 0.25),
];

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Monday through Friday: class days.
pub fn is_weekday(date: Date) -> bool {
    !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Version 4 UUID built from the supplied RNG rather than the OS source.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Picks a category and produces its record for a given day.
#[derive(Debug, Clone)]
pub struct ActivityGenerator {
    categories: WeightedTable<Category>,
    transport: TransportGenerator,
    waste: WasteGenerator,
    country: String,
}

impl ActivityGenerator {
    pub fn new(country: impl Into<String>) -> Result<Self, WeightError> {
        Ok(Self {
            categories: WeightedTable::new(CATEGORY_WEIGHTS)?,
            transport: TransportGenerator::new()?,
            waste: WasteGenerator::new()?,
            country: country.into(),
        })
    }

    pub fn sample_category<R: Rng + ?Sized>(&self, rng: &mut R) -> Category {
        *self.categories.sample(rng)
    }

    /// Generate a record of `category`, scaled by that category's factor in `season`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        category: Category,
        date: Date,
        season: SeasonProfile,
        rng: &mut R,
    ) -> ActivityInput {
        match category {
            Category::Electricity => ActivityInput::Electricity(generate_electricity(
                date,
                season.electricity_factor(),
                &self.country,
                rng,
            )),
            Category::Transport => ActivityInput::Transport(self.transport.generate(
                date,
                season.transport_factor(),
                &self.country,
                rng,
            )),
            Category::Waste => ActivityInput::Waste(self.waste.generate(
                date,
                season.waste_factor(),
                &self.country,
                rng,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use time::macros::date;

    #[test]
    fn round_to_keeps_requested_decimals() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(2.0, 2), 2.0);
    }

    #[test]
    fn weekday_detection() {
        assert!(is_weekday(date!(2024 - 04 - 03))); // Wednesday
        assert!(!is_weekday(date!(2024 - 04 - 06))); // Saturday
        assert!(!is_weekday(date!(2024 - 04 - 07))); // Sunday
    }

    #[test]
    fn seeded_uuids_are_reproducible_v4() {
        let a = random_uuid(&mut StdRng::seed_from_u64(9));
        let b = random_uuid(&mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        assert_eq!(a.get_version_num(), 4);
    }

    #[test]
    fn generated_input_matches_requested_category() {
        let gen = ActivityGenerator::new("CL").unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let day = date!(2024 - 07 - 10);
        for category in Category::ALL {
            let input = gen.generate(category, day, SeasonProfile::Winter, &mut rng);
            assert_eq!(input.category(), category);
            assert_eq!(input.period().to_string(), "2024-07");
        }
    }

    #[test]
    fn category_mix_follows_weights() {
        let gen = ActivityGenerator::new("CL").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let n = 20_000;
        let electricity = (0..n)
            .filter(|_| gen.sample_category(&mut rng) == Category::Electricity)
            .count();
        let share = electricity as f64 / n as f64;
        assert!((0.37..0.43).contains(&share), "share {share}");
    }
}
