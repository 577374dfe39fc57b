use rand::{
    distributions::{Distribution, WeightedError, WeightedIndex},
    Rng,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    /// Rejected before sampling: `Uniform` panics on infinite bounds.
    #[error("weight at index {index} is not finite: {weight}")]
    NonFinite { index: usize, weight: f64 },
    #[error("invalid weight table: {0}")]
    Table(#[from] WeightedError),
}

/// Entries paired with a `WeightedIndex` over their weights.
///
/// Weights need not sum to 1; draws are normalized over the table total.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T> WeightedTable<T> {
    pub fn new<I>(weighted: I) -> Result<Self, WeightError>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let (entries, weights): (Vec<T>, Vec<f64>) = weighted.into_iter().unzip();

        if let Some((index, &weight)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(WeightError::NonFinite { index, weight });
        }

        let index = WeightedIndex::new(&weights)?;
        Ok(Self { entries, index })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.entries[self.index.sample(rng)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rejects_malformed_tables() {
        assert_eq!(
            WeightedTable::<u8>::new(vec![]).unwrap_err(),
            WeightError::Table(WeightedError::NoItem)
        );
        assert_eq!(
            WeightedTable::new(vec![('a', 0.5), ('b', -0.1)]).unwrap_err(),
            WeightError::Table(WeightedError::InvalidWeight)
        );
        assert!(matches!(
            WeightedTable::new(vec![('a', 0.5), ('b', f64::NAN)]),
            Err(WeightError::NonFinite { index: 1, .. })
        ));
        assert!(matches!(
            WeightedTable::new(vec![('a', f64::INFINITY)]),
            Err(WeightError::NonFinite { index: 0, .. })
        ));
        assert_eq!(
            WeightedTable::new(vec![('a', 0.0), ('b', 0.0)]).unwrap_err(),
            WeightError::Table(WeightedError::AllWeightsZero)
        );
    }

    #[test]
    fn zero_weight_entries_are_never_sampled() {
        let table = WeightedTable::new(vec![('a', 0.0), ('b', 1.0), ('c', 0.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            assert_eq!(*table.sample(&mut rng), 'b');
        }
    }

    #[test]
    fn unnormalized_weights_are_skewed_but_every_entry_is_reachable() {
        // Sums to 1.2, like the exam-season waste table.
        let table = WeightedTable::new(vec![('p', 0.6), ('q', 0.3), ('r', 0.2), ('s', 0.1)]).unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let mut counts = [0usize; 4];
        for _ in 0..20_000 {
            let idx = match *table.sample(&mut rng) {
                'p' => 0,
                'q' => 1,
                'r' => 2,
                _ => 3,
            };
            counts[idx] += 1;
        }

        assert!(counts.iter().all(|&c| c > 0), "{counts:?}");
        // p should land near 0.6 / 1.2 = 50%.
        let share = counts[0] as f64 / 20_000.0;
        assert!((0.46..0.54).contains(&share), "share {share}");
    }
}
