use std::ops::RangeInclusive;

use footprint_client::domain::{DisposalMethod, Period, WasteInput, WasteItem, WasteType};
use rand::Rng;
use time::Date;

use super::{random_uuid, round_to, WeightError, WeightedTable};

pub const MAX_ITEMS: usize = 3;

/// Factors above this are exam season: more printed paper.
pub const EXAM_SEASON_FACTOR: f64 = 1.2;
pub const PAPER_BOOST: f64 = 1.5;

#[derive(Debug, Clone)]
pub struct WasteProfile {
    pub waste_type: WasteType,
    pub weight_kg: RangeInclusive<f64>,
}

pub fn waste_table() -> Vec<(WasteProfile, f64)> {
    let waste = |waste_type, weight_kg, weight| (WasteProfile { waste_type, weight_kg }, weight);
    vec![
        waste(WasteType::Paper, 0.5..=3.0, 0.40),
        waste(WasteType::Plastic, 0.2..=1.5, 0.30),
        waste(WasteType::Organic, 0.3..=2.0, 0.20),
        waste(WasteType::Glass, 0.2..=1.0, 0.05),
        waste(WasteType::Metal, 0.1..=0.5, 0.05),
    ]
}

pub const DISPOSAL_WEIGHTS: [(DisposalMethod, f64); 4] = [
    (DisposalMethod::Mixed, 0.30),
    (DisposalMethod::Recycling, 0.45),
    (DisposalMethod::Composting, 0.15),
    (DisposalMethod::Landfill, 0.10),
];

pub fn weight_range(waste_type: WasteType) -> Option<RangeInclusive<f64>> {
    waste_table()
        .into_iter()
        .find(|(p, _)| p.waste_type == waste_type)
        .map(|(p, _)| p.weight_kg)
}

#[derive(Debug, Clone)]
pub struct WasteGenerator {
    regular: WeightedTable<WasteProfile>,
    exam_season: WeightedTable<WasteProfile>,
    disposal: WeightedTable<DisposalMethod>,
}

impl WasteGenerator {
    pub fn new() -> Result<Self, WeightError> {
        let boosted = waste_table().into_iter().map(|(profile, weight)| {
            if profile.waste_type == WasteType::Paper {
                (profile, weight * PAPER_BOOST)
            } else {
                (profile, weight)
            }
        });

        Ok(Self {
            regular: WeightedTable::new(waste_table())?,
            exam_season: WeightedTable::new(boosted)?,
            disposal: WeightedTable::new(DISPOSAL_WEIGHTS)?,
        })
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        date: Date,
        factor: f64,
        country: &str,
        rng: &mut R,
    ) -> WasteInput {
        let table = if factor > EXAM_SEASON_FACTOR {
            &self.exam_season
        } else {
            &self.regular
        };

        let count = rng.gen_range(1..=MAX_ITEMS);
        let waste_items = (0..count)
            .map(|_| {
                let profile = table.sample(rng);
                let weight = rng.gen_range(profile.weight_kg.clone()) * factor;
                WasteItem {
                    waste_type: profile.waste_type,
                    weight_kg: round_to(weight, 2),
                }
            })
            .collect();

        // Disposal is independent of what was thrown away.
        let disposal_method = *self.disposal.sample(rng);

        WasteInput {
            waste_items,
            disposal_method,
            country: country.to_string(),
            period: Period::of(date),
            idempotency_key: random_uuid(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_client::domain::SeasonProfile;
    use rand::{rngs::StdRng, SeedableRng};
    use time::macros::date;

    #[test]
    fn records_hold_invariants_in_every_season() {
        let gen = WasteGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(31);

        for season in SeasonProfile::ALL {
            let factor = season.waste_factor();
            for _ in 0..500 {
                let rec = gen.generate(date!(2024 - 09 - 18), factor, "CL", &mut rng);
                assert!((1..=MAX_ITEMS).contains(&rec.waste_items.len()));
                assert!(DisposalMethod::ALL.contains(&rec.disposal_method));

                for item in &rec.waste_items {
                    let range = weight_range(item.waste_type).unwrap();
                    assert!(item.weight_kg >= range.start() * factor - 0.005, "{item:?}");
                    assert!(item.weight_kg <= range.end() * factor + 0.005, "{item:?}");
                    assert!(item.weight_kg > 0.0);
                }
            }
        }
    }

    #[test]
    fn exam_season_prints_more_paper() {
        let gen = WasteGenerator::new().unwrap();
        let paper_share = |factor: f64, seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut paper = 0usize;
            let mut total = 0usize;
            for _ in 0..5_000 {
                for item in gen.generate(date!(2024 - 10 - 02), factor, "CL", &mut rng).waste_items {
                    total += 1;
                    if item.waste_type == WasteType::Paper {
                        paper += 1;
                    }
                }
            }
            paper as f64 / total as f64
        };

        let regular = paper_share(1.1, 1);
        let exam = paper_share(1.5, 1);
        // 0.40 vs 0.60 / 1.20.
        assert!((0.37..0.43).contains(&regular), "regular {regular}");
        assert!((0.47..0.53).contains(&exam), "exam {exam}");
    }

    #[test]
    fn exam_season_still_reaches_rare_types() {
        let gen = WasteGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen_metal = false;
        for _ in 0..5_000 {
            let rec = gen.generate(date!(2024 - 10 - 02), 1.5, "CL", &mut rng);
            seen_metal |= rec.waste_items.iter().any(|i| i.waste_type == WasteType::Metal);
        }
        assert!(seen_metal);
    }

    #[test]
    fn all_disposal_methods_appear() {
        let gen = WasteGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            seen.insert(gen.generate(date!(2024 - 02 - 14), 0.7, "CL", &mut rng).disposal_method);
        }
        assert_eq!(seen.len(), DisposalMethod::ALL.len());
    }
}
