//! Bounded best-K selection with lazy compaction.

use tracing::debug;

/// A buffered item with its score. Higher scores are better.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub score: f64,
    pub item: T,
}

/// Keeps the `max_results` highest-scoring items offered to it.
///
/// Offers are appended to a buffer that is only sorted and truncated when it
/// reaches its high-water mark. Once a compaction leaves the buffer holding
/// the full `max_results`, the lowest survivor's score becomes a rejection
/// threshold: later offers scoring below it are dropped without building
/// their item.
///
/// # Examples
///
/// ```
/// use buildforge_solver::TopKSelector;
///
/// let mut top = TopKSelector::new(2, 4);
/// for (score, name) in [(1.0, "a"), (5.0, "b"), (3.0, "c"), (4.0, "d"), (2.0, "e")] {
///     top.offer(score, || name);
/// }
///
/// let best: Vec<_> = top.finish().into_iter().map(|s| s.item).collect();
/// assert_eq!(best, vec!["b", "d"]);
/// ```
#[derive(Debug)]
pub struct TopKSelector<T> {
    max_results: usize,
    high_water: usize,
    threshold: f64,
    buffer: Vec<Scored<T>>,
    compactions: u64,
    rejected: u64,
}

impl<T> TopKSelector<T> {
    /// Creates a selector keeping `max_results` items.
    ///
    /// The buffer compacts at `max(compaction_threshold, 2 * max_results)`
    /// entries so every compaction frees space.
    pub fn new(max_results: usize, compaction_threshold: usize) -> Self {
        let high_water = compaction_threshold
            .max(max_results.saturating_mul(2))
            .max(1);
        Self {
            max_results,
            high_water,
            threshold: f64::NEG_INFINITY,
            buffer: Vec::new(),
            compactions: 0,
            rejected: 0,
        }
    }

    /// Offers an item. `make_item` runs only if the score is accepted.
    ///
    /// Returns false when the score is NaN or below the current threshold.
    pub fn offer<F>(&mut self, score: f64, make_item: F) -> bool
    where
        F: FnOnce() -> T,
    {
        if score.is_nan() || score < self.threshold || self.max_results == 0 {
            self.rejected += 1;
            return false;
        }
        self.buffer.push(Scored {
            score,
            item: make_item(),
        });
        if self.buffer.len() >= self.high_water {
            self.compact();
        }
        true
    }

    fn compact(&mut self) {
        self.buffer.sort_by(|a, b| b.score.total_cmp(&a.score));
        self.buffer.truncate(self.max_results);
        self.compactions += 1;

        if self.buffer.len() == self.max_results {
            if let Some(last) = self.buffer.last() {
                self.threshold = last.score;
            }
        }
        debug!(
            event = "compaction",
            kept = self.buffer.len(),
            threshold = self.threshold,
        );
    }

    /// Current rejection threshold (`-inf` until the buffer first fills).
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Number of buffered items, including ones a compaction would drop.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn compactions(&self) -> u64 {
        self.compactions
    }

    /// Offers rejected by the threshold.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Compacts a final time and drains the selection, best first.
    pub fn finish(&mut self) -> Vec<Scored<T>> {
        self.compact();
        std::mem::take(&mut self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scores(selected: &[Scored<usize>]) -> Vec<f64> {
        selected.iter().map(|s| s.score).collect()
    }

    #[test]
    fn test_keeps_best_in_descending_order() {
        let mut top = TopKSelector::new(3, 1000);
        for (i, score) in [4.0, 9.0, 1.0, 7.0, 3.0].into_iter().enumerate() {
            top.offer(score, || i);
        }

        assert_eq!(scores(&top.finish()), vec![9.0, 7.0, 4.0]);
    }

    #[test]
    fn test_fewer_than_max_results() {
        let mut top = TopKSelector::new(5, 1000);
        top.offer(1.0, || 0);
        top.offer(2.0, || 1);

        assert_eq!(scores(&top.finish()), vec![2.0, 1.0]);
    }

    #[test]
    fn test_threshold_set_only_when_full() {
        let mut top = TopKSelector::new(3, 4);
        assert_eq!(top.high_water, 6);

        for i in 0..6 {
            top.offer(i as f64, || i);
        }
        assert_eq!(top.compactions(), 1);
        assert_eq!(top.buffered(), 3);
        assert_eq!(top.threshold(), 3.0);

        // Below threshold: rejected without building the item
        assert!(!top.offer(2.5, || panic!("item built for a rejected score")));
        assert_eq!(top.rejected(), 1);

        // Ties with the threshold are still accepted
        assert!(top.offer(3.0, || 99));
    }

    #[test]
    fn test_threshold_unset_when_buffer_not_full() {
        let mut top = TopKSelector::new(10, 2);
        for i in 0..19 {
            top.offer(i as f64, || i);
        }
        // High water is 20, so nothing has compacted yet
        assert_eq!(top.compactions(), 0);
        assert_eq!(top.threshold(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_nan_is_rejected() {
        let mut top = TopKSelector::new(2, 1000);
        assert!(!top.offer(f64::NAN, || 0));
        assert!(top.offer(1.0, || 1));

        assert_eq!(scores(&top.finish()), vec![1.0]);
    }

    #[test]
    fn test_large_max_results_keeps_everything() {
        let mut top = TopKSelector::new(1500, 1000);
        for i in 0..1200 {
            top.offer(i as f64, || i);
        }
        let selected = top.finish();

        assert_eq!(selected.len(), 1200);
        assert_eq!(selected[0].score, 1199.0);
    }

    #[test]
    fn test_result_independent_of_order_and_cadence() {
        let values: Vec<usize> = (0..500).collect();
        let expected: Vec<f64> = (490..500).rev().map(|v| v as f64).collect();

        for seed in 0..10 {
            let mut shuffled = values.clone();
            shuffled.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

            for compaction_threshold in [1, 20, 64, 1000] {
                let mut top = TopKSelector::new(10, compaction_threshold);
                for &v in &shuffled {
                    top.offer(v as f64, || v);
                }
                assert_eq!(
                    scores(&top.finish()),
                    expected,
                    "seed {seed}, threshold {compaction_threshold}"
                );
            }
        }
    }
}
