//! Order-preserving partition of a ticker list into fixed-size batches.

/// Number of batches needed for `total` items at `batch_size` per batch.
///
/// A zero batch size is treated as one item per batch.
#[must_use]
pub const fn batch_count(total: usize, batch_size: usize) -> usize {
    total.div_ceil(if batch_size == 0 { 1 } else { batch_size })
}

/// Contiguous batches over a slice, preserving input order.
#[derive(Debug)]
pub struct BatchPlan<'a, T> {
    items: &'a [T],
    batch_size: usize,
}

impl<'a, T> BatchPlan<'a, T> {
    /// Plan batches of `batch_size` over `items` (zero is treated as one).
    #[must_use]
    pub const fn new(items: &'a [T], batch_size: usize) -> Self {
        Self {
            items,
            batch_size: if batch_size == 0 { 1 } else { batch_size },
        }
    }

    /// Number of batches.
    #[must_use]
    pub const fn len(&self) -> usize {
        batch_count(self.items.len(), self.batch_size)
    }

    /// Whether there is nothing to process.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the batches in order.
    pub fn batches(&self) -> std::slice::Chunks<'a, T> {
        self.items.chunks(self.batch_size)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn five_items_in_batches_of_two() {
        let items = ["T1", "T2", "T3", "T4", "T5"];
        let plan = BatchPlan::new(&items, 2);

        let sizes: Vec<usize> = plan.batches().map(<[&str]>::len).collect();
        assert_eq!(plan.len(), 3);
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(plan.batches().next().unwrap(), &["T1", "T2"]);
    }

    #[test]
    fn empty_input_has_no_batches() {
        let items: [u8; 0] = [];
        let plan = BatchPlan::new(&items, 100);
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan.batches().count(), 0);
    }

    #[test]
    fn zero_batch_size_degrades_to_singletons() {
        assert_eq!(batch_count(3, 0), 3);
        assert_eq!(BatchPlan::new(&[1, 2, 3], 0).batches().count(), 3);
    }

    proptest! {
        #[test]
        fn batches_cover_input_in_order(n in 0usize..500, b in 1usize..64) {
            let items: Vec<usize> = (0..n).collect();
            let plan = BatchPlan::new(&items, b);

            prop_assert_eq!(plan.len(), n.div_ceil(b));
            prop_assert_eq!(plan.batches().count(), plan.len());
            prop_assert_eq!(plan.batches().map(<[usize]>::len).sum::<usize>(), n);

            let flattened: Vec<usize> = plan.batches().flatten().copied().collect();
            prop_assert_eq!(flattened, items);
        }
    }
}
