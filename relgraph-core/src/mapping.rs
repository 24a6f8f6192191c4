//! Strategies that resolve node or key identities to numeric indices.
//!
//! An absent index is a legitimate answer: conversions skip entries whose
//! identity does not resolve, which is how callers extract sub-graphs with a
//! partial mapping. Every mapping also reports the size of the index space it
//! targets; indices at or past [`IndexMapping::dimension`] count as absent.
//!
//! Plain collections work as mappings too: slices and vectors behave like
//! [`ListMapping`] and `HashMap<N, u64>` behaves like [`MapMapping`].

use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
};

use crate::{
    capacity::size_hint,
    error::{RelgraphError, Result},
};

/// Resolves an identity to an index in `0..dimension()`.
pub trait IndexMapping<N: ?Sized> {
    /// Returns the index assigned to `key`, or `None` when it has none.
    fn index_of(&self, key: &N) -> Option<u64>;

    /// Returns the size of the index space targeted by this mapping.
    fn dimension(&self) -> u64;

    /// Returns the index of `key` when it lies inside the index space.
    fn resolve(&self, key: &N) -> Option<u64> {
        self.index_of(key).filter(|index| *index < self.dimension())
    }
}

/// Resolves an index back to the identity it stands for.
pub trait KeyLookup<N> {
    /// Returns the identity assigned to `index`.
    fn key_of(&self, index: u64) -> Option<&N>;
}

fn position_in<N: PartialEq>(keys: &[N], key: &N) -> Option<u64> {
    keys.iter()
        .position(|candidate| candidate == key)
        .map(|position| position as u64)
}

/// Linear-scan mapping over an ordered list of identities.
///
/// Each lookup is O(n); prefer [`MapMapping`] for large key sets or
/// repeated conversions.
///
/// # Examples
/// ```
/// use relgraph_core::{IndexMapping, KeyLookup, ListMapping};
///
/// let keys = ["a", "b", "c"];
/// let mapping = ListMapping::new(&keys);
/// assert_eq!(mapping.index_of(&"c"), Some(2));
/// assert_eq!(mapping.index_of(&"z"), None);
/// assert_eq!(mapping.key_of(1), Some(&"b"));
/// assert_eq!(mapping.dimension(), 3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ListMapping<'a, N> {
    keys: &'a [N],
}

impl<'a, N> ListMapping<'a, N> {
    /// Wraps an ordered list of identities.
    #[must_use]
    pub const fn new(keys: &'a [N]) -> Self {
        Self { keys }
    }

    /// Returns the underlying identities.
    #[must_use]
    #[rustfmt::skip]
    pub const fn keys(&self) -> &'a [N] { self.keys }
}

impl<'a, N> From<&'a [N]> for ListMapping<'a, N> {
    fn from(keys: &'a [N]) -> Self {
        Self::new(keys)
    }
}

impl<N: PartialEq> IndexMapping<N> for ListMapping<'_, N> {
    fn index_of(&self, key: &N) -> Option<u64> {
        position_in(self.keys, key)
    }

    fn dimension(&self) -> u64 {
        self.keys.len() as u64
    }
}

impl<N> KeyLookup<N> for ListMapping<'_, N> {
    fn key_of(&self, index: u64) -> Option<&N> {
        self.keys.get(usize::try_from(index).ok()?)
    }
}

/// Precomputed identity-to-index mapping with O(1) lookups both ways.
///
/// # Examples
/// ```
/// use relgraph_core::{IndexMapping, KeyLookup, MapMapping};
///
/// let mapping = MapMapping::from_keys(["x", "y"])?;
/// assert_eq!(mapping.index_of(&"y"), Some(1));
/// assert_eq!(mapping.key_of(0), Some(&"x"));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct MapMapping<N> {
    forward: HashMap<N, u64>,
    reverse: HashMap<u64, N>,
    dimension: u64,
}

impl<N: Clone + Eq + Hash> MapMapping<N> {
    /// Builds a mapping from an explicit identity-to-index table.
    ///
    /// The dimension is one past the largest index.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when two identities share an
    /// index.
    pub fn new(forward: HashMap<N, u64>) -> Result<Self> {
        let mut reverse = HashMap::with_capacity(size_hint(forward.len()));
        for (key, index) in &forward {
            if reverse.insert(*index, key.clone()).is_some() {
                return Err(RelgraphError::invalid_argument(format!(
                    "index {index} is assigned to more than one key"
                )));
            }
        }
        let dimension = forward
            .values()
            .max()
            .map_or(0, |largest| largest.saturating_add(1));
        Ok(Self {
            forward,
            reverse,
            dimension,
        })
    }

    /// Assigns consecutive indices to `keys` in iteration order.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when a key repeats.
    pub fn from_keys<I>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
    {
        let keys = keys.into_iter();
        let mut forward = HashMap::with_capacity(size_hint(keys.size_hint().0));
        for (position, key) in keys.enumerate() {
            if forward.insert(key, position as u64).is_some() {
                return Err(RelgraphError::invalid_argument(format!(
                    "key at position {position} duplicates an earlier key"
                )));
            }
        }
        Self::new(forward)
    }

    /// Returns the number of identities with an index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` when no identity has an index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl<N: Eq + Hash> IndexMapping<N> for MapMapping<N> {
    fn index_of(&self, key: &N) -> Option<u64> {
        self.forward.get(key).copied()
    }

    fn dimension(&self) -> u64 {
        self.dimension
    }
}

impl<N> KeyLookup<N> for MapMapping<N> {
    fn key_of(&self, index: u64) -> Option<&N> {
        self.reverse.get(&index)
    }
}

/// Maps `u64` indices to themselves within `0..dimension`.
///
/// Used when a matrix-keyed source is converted without re-indexing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IdentityMapping {
    dimension: u64,
}

impl IdentityMapping {
    /// Creates an identity mapping over `0..dimension`.
    #[must_use]
    pub const fn new(dimension: u64) -> Self {
        Self { dimension }
    }
}

impl IndexMapping<u64> for IdentityMapping {
    fn index_of(&self, key: &u64) -> Option<u64> {
        Some(*key)
    }

    fn dimension(&self) -> u64 {
        self.dimension
    }
}

impl<N: PartialEq> IndexMapping<N> for [N] {
    fn index_of(&self, key: &N) -> Option<u64> {
        position_in(self, key)
    }

    fn dimension(&self) -> u64 {
        self.len() as u64
    }
}

impl<N: PartialEq> IndexMapping<N> for Vec<N> {
    fn index_of(&self, key: &N) -> Option<u64> {
        position_in(self, key)
    }

    fn dimension(&self) -> u64 {
        self.len() as u64
    }
}

impl<N> KeyLookup<N> for [N] {
    fn key_of(&self, index: u64) -> Option<&N> {
        self.get(usize::try_from(index).ok()?)
    }
}

impl<N> KeyLookup<N> for Vec<N> {
    fn key_of(&self, index: u64) -> Option<&N> {
        self.get(usize::try_from(index).ok()?)
    }
}

impl<N: Eq + Hash, S: BuildHasher> IndexMapping<N> for HashMap<N, u64, S> {
    fn index_of(&self, key: &N) -> Option<u64> {
        self.get(key).copied()
    }

    fn dimension(&self) -> u64 {
        self.values()
            .max()
            .map_or(0, |largest| largest.saturating_add(1))
    }
}

impl<N: ?Sized, M: IndexMapping<N> + ?Sized> IndexMapping<N> for &M {
    fn index_of(&self, key: &N) -> Option<u64> {
        (**self).index_of(key)
    }

    fn dimension(&self) -> u64 {
        (**self).dimension()
    }
}
