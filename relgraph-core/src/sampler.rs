//! Weighted sampling with live weight updates.
//!
//! [`WeightedSampler`] keeps its weights in a Fenwick (binary indexed) tree
//! so that both [`WeightedSampler::put`] and [`WeightedSampler::sample`] run
//! in O(log n). The random source is always injected, so a seeded generator
//! reproduces the same draw sequence.

use std::{collections::HashMap, hash::Hash};

use rand::Rng;

use crate::{capacity::size_hint, error::SamplerError};

/// Draws keys with probability proportional to their weight.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use relgraph_core::WeightedSampler;
///
/// let mut sampler = WeightedSampler::new();
/// sampler.put("heavy", 9.0)?;
/// sampler.put("never", 0.0)?;
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// for _ in 0..16 {
///     assert_eq!(sampler.sample(&mut rng)?, &"heavy");
/// }
/// # Ok::<(), relgraph_core::SamplerError>(())
/// ```
#[derive(Clone, Debug)]
pub struct WeightedSampler<K> {
    keys: Vec<K>,
    positions: HashMap<K, usize>,
    weights: Vec<f64>,
    // One-based Fenwick tree; slot 0 is unused.
    tree: Vec<f64>,
    positive: usize,
}

impl<K> Default for WeightedSampler<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            positions: HashMap::new(),
            weights: Vec::new(),
            tree: vec![0.0],
            positive: 0,
        }
    }
}

impl<K: Clone + Eq + Hash> WeightedSampler<K> {
    /// Creates an empty sampler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sampler pre-sized for roughly `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = size_hint(capacity);
        let mut tree = Vec::with_capacity(capacity + 1);
        tree.push(0.0);
        Self {
            keys: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
            tree,
            positive: 0,
        }
    }

    /// Inserts `key` or overwrites its weight.
    ///
    /// A zero weight keeps the key registered but unreachable by
    /// [`WeightedSampler::sample`].
    ///
    /// # Errors
    /// Returns [`SamplerError::InvalidWeight`] when `weight` is negative, NaN
    /// or infinite, and [`SamplerError::TotalWeightOverflow`] when the new
    /// total would not be finite. The sampler is left unchanged in both
    /// cases.
    pub fn put(&mut self, key: K, weight: f64) -> Result<(), SamplerError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SamplerError::InvalidWeight { weight });
        }
        let position = self.positions.get(&key).copied();
        let previous = position
            .and_then(|position| self.weights.get(position))
            .copied()
            .unwrap_or_default();
        if !((self.total_weight() - previous) + weight).is_finite() {
            return Err(SamplerError::TotalWeightOverflow { weight });
        }
        match position {
            Some(position) => self.update(position, weight),
            None => self.append(key, weight),
        }
        Ok(())
    }

    fn update(&mut self, position: usize, weight: f64) {
        let Some(slot) = self.weights.get_mut(position) else {
            return;
        };
        let previous = std::mem::replace(slot, weight);
        match (previous > 0.0, weight > 0.0) {
            (false, true) => self.positive += 1,
            (true, false) => self.positive -= 1,
            _ => {}
        }
        let delta = weight - previous;
        let mut node = position + 1;
        while let Some(sum) = self.tree.get_mut(node) {
            *sum += delta;
            node += lowest_bit(node);
        }
        // Removing more weight than remains cancels the remainder's low bits.
        if -delta > self.total_weight() {
            self.rebuild();
        }
    }

    /// Recomputes every tree node from the stored weights in O(n).
    fn rebuild(&mut self) {
        self.tree.clear();
        self.tree.push(0.0);
        self.tree.extend(self.weights.iter().copied());
        for node in 1..self.tree.len() {
            let sum = self.tree.get(node).copied().unwrap_or_default();
            if let Some(parent) = self.tree.get_mut(node + lowest_bit(node)) {
                *parent += sum;
            }
        }
    }

    fn append(&mut self, key: K, weight: f64) {
        let node = self.keys.len() + 1;
        // A new node covers `(node - lowbit(node), node]`, so it starts with
        // the weights of its already-present children.
        let covered = self.prefix(node - 1) - self.prefix(node - lowest_bit(node));
        self.tree.push(covered + weight);
        self.weights.push(weight);
        self.positions.insert(key.clone(), node - 1);
        self.keys.push(key);
        if weight > 0.0 {
            self.positive += 1;
        }
    }

    /// Sum of the weights of the first `count` keys.
    fn prefix(&self, count: usize) -> f64 {
        let mut total = 0.0;
        let mut node = count;
        while node > 0 {
            total += self.tree.get(node).copied().unwrap_or_default();
            node -= lowest_bit(node);
        }
        total
    }

    /// Draws one key with probability proportional to its weight.
    ///
    /// # Errors
    /// Returns [`SamplerError::Empty`] when no key has been inserted and
    /// [`SamplerError::ZeroTotalWeight`] when every weight is zero.
    /// [`SamplerError::TotalWeightOverflow`] is reported if the total is not
    /// finite, which [`WeightedSampler::put`] prevents.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&K, SamplerError> {
        if self.keys.is_empty() {
            return Err(SamplerError::Empty);
        }
        let total = self.total_weight();
        if self.positive == 0 || total <= 0.0 {
            return Err(SamplerError::ZeroTotalWeight);
        }
        if !total.is_finite() {
            return Err(SamplerError::TotalWeightOverflow { weight: total });
        }
        let threshold = rng.gen_range(0.0..total);
        let position = self.nearest_positive(self.descend(threshold));
        position
            .and_then(|position| self.keys.get(position))
            .ok_or(SamplerError::ZeroTotalWeight)
    }

    /// Finds the first position whose running sum exceeds `threshold`.
    fn descend(&self, threshold: f64) -> usize {
        let len = self.keys.len();
        let mut position = 0;
        let mut remaining = threshold;
        let mut step = highest_power_of_two_at_most(len);
        while step > 0 {
            let next = position + step;
            if let Some(&sum) = self.tree.get(next)
                && sum <= remaining
            {
                position = next;
                remaining -= sum;
            }
            step >>= 1;
        }
        position.min(len - 1)
    }

    /// Floating-point drift can land the descent on a zero-weight key; move
    /// to the closest key that can actually be drawn.
    fn nearest_positive(&self, position: usize) -> Option<usize> {
        let reachable = |candidate: &usize| self.weights.get(*candidate).is_some_and(|w| *w > 0.0);
        if reachable(&position) {
            return Some(position);
        }
        (position + 1..self.keys.len())
            .find(reachable)
            .or_else(|| (0..position).rev().find(reachable))
    }

    /// Returns the weight of `key`, if present.
    #[must_use]
    pub fn weight(&self, key: &K) -> Option<f64> {
        let position = *self.positions.get(key)?;
        self.weights.get(position).copied()
    }

    /// Returns the sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.prefix(self.keys.len())
    }

    /// Returns `true` when `key` has been inserted.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// Returns the number of keys, including zero-weight ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` when no key has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

const fn lowest_bit(node: usize) -> usize {
    node & node.wrapping_neg()
}

const fn highest_power_of_two_at_most(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - value.leading_zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use crate::test_utils::suite_proptest_config;

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn put_rejects_invalid_weights(#[case] weight: f64) {
        let mut sampler = WeightedSampler::new();
        let err = sampler.put("a", weight).expect_err("weight must be rejected");
        assert!(matches!(err, SamplerError::InvalidWeight { .. }));
        assert!(sampler.is_empty());
    }

    #[test]
    fn sample_reports_empty_and_zero_total() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sampler = WeightedSampler::new();
        assert_eq!(sampler.sample(&mut rng), Err(SamplerError::Empty));

        sampler.put(1_u32, 0.0).expect("zero is legal");
        sampler.put(2_u32, 0.0).expect("zero is legal");
        assert_eq!(sampler.sample(&mut rng), Err(SamplerError::ZeroTotalWeight));
        assert_eq!(sampler.len(), 2);
    }

    #[test]
    fn overwriting_a_weight_updates_the_total() {
        let mut sampler = WeightedSampler::new();
        for (key, weight) in [('a', 1.0), ('b', 2.0), ('c', 4.0)] {
            sampler.put(key, weight).expect("valid weight");
        }
        sampler.put('b', 0.5).expect("valid weight");

        assert!((sampler.total_weight() - 5.5).abs() < 1e-12);
        assert_eq!(sampler.weight(&'b'), Some(0.5));
        assert_eq!(sampler.weight(&'z'), None);
    }

    #[test]
    fn sample_is_callable_right_after_put() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut sampler = WeightedSampler::new();
        sampler.put("only", 0.0).expect("zero is legal");
        sampler.put("only", 2.0).expect("valid weight");
        assert_eq!(sampler.sample(&mut rng), Ok(&"only"));

        sampler.put("only", 0.0).expect("zero is legal");
        sampler.put("other", 1.0).expect("valid weight");
        assert_eq!(sampler.sample(&mut rng), Ok(&"other"));
    }

    #[test]
    fn put_refuses_weights_that_overflow_the_total() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut sampler = WeightedSampler::new();
        sampler.put("a", f64::MAX).expect("finite total");

        let err = sampler.put("b", f64::MAX).expect_err("total must stay finite");

        assert_eq!(err, SamplerError::TotalWeightOverflow { weight: f64::MAX });
        assert!(!sampler.contains(&"b"));
        assert_eq!(sampler.total_weight(), f64::MAX);
        assert_eq!(sampler.sample(&mut rng), Ok(&"a"));
    }

    #[test]
    fn overwriting_a_large_weight_can_still_reach_the_total_limit() {
        let mut sampler = WeightedSampler::new();
        sampler.put("a", f64::MAX).expect("finite total");
        sampler.put("b", 1.0).expect("finite total");

        sampler.put("a", f64::MAX / 2.0).expect("replacing lowers the total");
        assert!(sampler.total_weight().is_finite());
        assert!(sampler.put("b", f64::MAX).is_err());
    }

    #[test]
    fn removing_a_dominant_weight_keeps_small_weights_reachable() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut sampler = WeightedSampler::new();
        sampler.put("a", 1e20).expect("valid weight");
        sampler.put("b", 1.0).expect("valid weight");
        sampler.put("a", 0.0).expect("zero is legal");

        assert_eq!(sampler.total_weight(), 1.0);
        assert_eq!(sampler.weight(&"b"), Some(1.0));
        assert_eq!(sampler.sample(&mut rng), Ok(&"b"));
    }

    #[test]
    fn same_seed_reproduces_the_same_draws() {
        let mut sampler = WeightedSampler::with_capacity(8);
        for key in 0..8_u32 {
            sampler.put(key, f64::from(key) + 0.1).expect("valid weight");
        }
        let draw = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..32)
                .map(|_| *sampler.sample(&mut rng).expect("non-empty"))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(11), draw(11));
    }

    #[test]
    fn frequencies_follow_the_weights() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        let mut sampler = WeightedSampler::new();
        sampler.put("light", 1.0).expect("valid weight");
        sampler.put("heavy", 3.0).expect("valid weight");

        let draws = 20_000;
        let heavy = (0..draws)
            .filter(|_| sampler.sample(&mut rng).expect("non-empty") == &"heavy")
            .count();
        let share = heavy as f64 / f64::from(draws);
        assert!((share - 0.75).abs() < 0.02, "heavy share was {share}");
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn tree_prefix_sums_match_a_linear_scan(
            weights in prop::collection::vec(0.0_f64..100.0, 1..40),
            updates in prop::collection::vec((0_usize..40, 0.0_f64..100.0), 0..20),
        ) {
            let mut sampler = WeightedSampler::new();
            let mut expected = weights.clone();
            for (key, weight) in weights.iter().enumerate() {
                sampler.put(key, *weight).expect("valid weight");
            }
            for (key, weight) in updates {
                let key = key % expected.len();
                sampler.put(key, weight).expect("valid weight");
                expected[key] = weight;
            }

            for count in 0..=expected.len() {
                let linear: f64 = expected[..count].iter().sum();
                prop_assert!((sampler.prefix(count) - linear).abs() < 1e-6);
            }
        }

        #[test]
        fn zero_weight_keys_are_never_drawn(
            weights in prop::collection::vec(prop_oneof![Just(0.0_f64), 0.5_f64..10.0], 1..24),
            seed in any::<u64>(),
        ) {
            prop_assume!(weights.iter().any(|weight| *weight > 0.0));
            let mut sampler = WeightedSampler::new();
            for (key, weight) in weights.iter().enumerate() {
                sampler.put(key, *weight).expect("valid weight");
            }
            let mut rng = SmallRng::seed_from_u64(seed);
            for _ in 0..64 {
                let key = *sampler.sample(&mut rng).expect("positive total");
                prop_assert!(weights[key] > 0.0);
            }
        }
    }
}
