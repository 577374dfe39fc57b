use std::pin::Pin;

use footprint_client::domain::{CalculationRow, SeasonProfile};
use futures::Stream;
use rand::{rngs::StdRng, Rng, SeedableRng};
use time::{Date, Duration};
use uuid::Uuid;

use crate::{
    estimate::Co2eEstimator,
    generators::{is_weekday, random_uuid, ActivityGenerator, WeightError},
    pipeline::{Envelope, PipelineError, Source},
};

/// Activity is logged between 07:00 and 22:59.
const FIRST_HOUR: u8 = 7;
const LAST_HOUR: u8 = 22;

/// Rows per day: class days are busier.
fn daily_record_count<R: Rng + ?Sized>(date: Date, rng: &mut R) -> usize {
    if is_weekday(date) {
        rng.gen_range(2..=4)
    } else {
        rng.gen_range(1..=2)
    }
}

/// Day-by-day state machine producing calculation rows until the target is met.
#[derive(Debug, Clone)]
pub struct YearDriver {
    user_id: Uuid,
    generator: ActivityGenerator,
    estimator: Co2eEstimator,
    date: Date,
    day_started: bool,
    slots_left: usize,
    emitted: usize,
    target: usize,
}

impl YearDriver {
    pub fn new(
        user_id: Uuid,
        start: Date,
        target: usize,
        generator: ActivityGenerator,
        estimator: Co2eEstimator,
    ) -> Self {
        Self {
            user_id,
            generator,
            estimator,
            date: start,
            day_started: false,
            slots_left: 0,
            emitted: 0,
            target,
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn current_date(&self) -> Date {
        self.date
    }

    /// Next row, or `None` once the target is reached or the calendar runs out.
    pub fn next_row<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<CalculationRow> {
        if self.emitted >= self.target {
            return None;
        }

        while self.slots_left == 0 {
            if self.day_started {
                self.date = self.date.next_day()?;
            }
            self.day_started = true;
            self.slots_left = daily_record_count(self.date, rng);
        }

        let season = SeasonProfile::for_month(self.date.month());
        let category = self.generator.sample_category(rng);
        let input = self.generator.generate(category, self.date, season, rng);
        let estimate = self.estimator.estimate(&input, rng);

        let hour = rng.gen_range(FIRST_HOUR..=LAST_HOUR);
        let minute = rng.gen_range(0..=59u8);
        let created_at = self.date.midnight()
            + Duration::hours(i64::from(hour))
            + Duration::minutes(i64::from(minute));

        self.slots_left -= 1;
        self.emitted += 1;

        Some(CalculationRow {
            id: random_uuid(rng),
            user_id: self.user_id,
            input,
            result_kg_co2e: estimate.kg_co2e,
            factor_hash: estimate.factor_hash,
            created_at,
        })
    }
}

/// Synthetic academic year for one student, streamed row by row.
pub struct StudentYearSource {
    driver: YearDriver,
    seed: Option<u64>,
}

impl StudentYearSource {
    pub fn new(
        user_id: Uuid,
        start: Date,
        target: usize,
        country: &str,
        seed: Option<u64>,
    ) -> Result<Self, WeightError> {
        let driver = YearDriver::new(
            user_id,
            start,
            target,
            ActivityGenerator::new(country)?,
            Co2eEstimator::default(),
        );
        Ok(Self { driver, seed })
    }
}

#[async_trait::async_trait]
impl Source<CalculationRow> for StudentYearSource {
    async fn stream(
        &self,
    ) -> Pin<Box<dyn Stream<Item = Result<Envelope<CalculationRow>, PipelineError>> + Send>> {
        let mut driver = self.driver.clone();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let s = async_stream::stream! {
            while let Some(row) = driver.next_row(&mut rng) {
                metrics::counter!("seed_rows_generated_total").increment(1);
                yield Ok::<_, PipelineError>(Envelope::now(row));
            }

            tracing::info!(
                generated = driver.emitted(),
                last_day = %driver.current_date(),
                "synthetic year generation finished"
            );
        };

        Box::pin(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_client::domain::Category;
    use futures::StreamExt;
    use std::collections::{BTreeMap, HashSet};
    use time::macros::date;

    fn driver(target: usize) -> YearDriver {
        YearDriver::new(
            Uuid::nil(),
            date!(2023 - 12 - 01),
            target,
            ActivityGenerator::new("CL").unwrap(),
            Co2eEstimator::default(),
        )
    }

    fn collect(target: usize, seed: u64) -> Vec<CalculationRow> {
        let mut d = driver(target);
        let mut rng = StdRng::seed_from_u64(seed);
        std::iter::from_fn(|| d.next_row(&mut rng)).collect()
    }

    #[test]
    fn stops_exactly_at_target() {
        assert_eq!(collect(1000, 1).len(), 1000);
        assert_eq!(collect(7, 1).len(), 7);
        assert!(collect(0, 1).is_empty());
    }

    #[test]
    fn idempotency_keys_and_ids_are_unique() {
        let rows = collect(1000, 2);
        let keys: HashSet<_> = rows.iter().map(|r| r.input.idempotency_key()).collect();
        let ids: HashSet<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(keys.len(), rows.len());
        assert_eq!(ids.len(), rows.len());
    }

    #[test]
    fn rows_walk_forward_one_day_at_a_time_with_daily_limits() {
        let rows = collect(1000, 3);
        let mut per_day: BTreeMap<Date, usize> = BTreeMap::new();
        for r in &rows {
            *per_day.entry(r.created_at.date()).or_default() += 1;
        }

        let days: Vec<_> = per_day.keys().copied().collect();
        assert_eq!(days[0], date!(2023 - 12 - 01));
        for pair in days.windows(2) {
            assert_eq!(pair[0].next_day(), Some(pair[1]), "skipped a day");
        }

        let last = *days.last().unwrap();
        for (day, count) in per_day {
            let range = if is_weekday(day) { 2..=4 } else { 1..=2 };
            // The final day can be cut short by the target.
            if day == last {
                assert!(count <= *range.end());
            } else {
                assert!(range.contains(&count), "{day}: {count}");
            }
        }
    }

    #[test]
    fn timestamps_fall_in_daytime_hours() {
        for r in collect(500, 4) {
            let hour = r.created_at.hour();
            assert!((FIRST_HOUR..=LAST_HOUR).contains(&hour));
            assert_eq!(r.created_at.second(), 0);
        }
    }

    #[test]
    fn period_matches_row_date() {
        for r in collect(500, 5) {
            assert_eq!(r.input.period(), footprint_client::domain::Period::of(r.created_at.date()));
        }
    }

    #[test]
    fn every_category_shows_up() {
        let rows = collect(300, 6);
        for c in Category::ALL {
            assert!(rows.iter().any(|r| r.category() == c), "missing {c}");
        }
    }

    #[tokio::test]
    async fn seeded_source_streams_are_reproducible() {
        let source = StudentYearSource::new(Uuid::nil(), date!(2024 - 03 - 01), 50, "CL", Some(99)).unwrap();
        let a: Vec<_> = source.stream().await.map(|r| r.unwrap().payload).collect().await;
        let b: Vec<_> = source.stream().await.map(|r| r.unwrap().payload).collect().await;
        assert_eq!(a.len(), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn driver_stops_when_the_calendar_ends() {
        let mut d = YearDriver::new(
            Uuid::nil(),
            Date::MAX,
            1_000,
            ActivityGenerator::new("CL").unwrap(),
            Co2eEstimator::default(),
        );
        let mut rng = StdRng::seed_from_u64(1);
        let produced = std::iter::from_fn(|| d.next_row(&mut rng)).count();
        assert!((1..=4).contains(&produced));
    }
}
