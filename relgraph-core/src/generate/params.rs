//! Tunables shared by the random graph generators.

use crate::error::{RelgraphError, Result};

/// Default seed used by [`crate::generate::GraphGenerator`].
pub const DEFAULT_RNG_SEED: u64 = 0x5EED_CAFE;
/// Default weight added to every node's degree during preferential
/// attachment, so that isolated nodes stay reachable.
pub const DEFAULT_DEGREE_OFFSET: f64 = 0.1;
/// Default cap on consecutive rejected draws.
pub const DEFAULT_MAX_REJECTIONS: u64 = 1_000_000;

/// Configuration for the random graph generators.
///
/// # Examples
/// ```
/// use relgraph_core::generate::GeneratorParams;
///
/// let params = GeneratorParams::new()
///     .with_rng_seed(42)
///     .with_max_rejections(10_000);
/// params.validate()?;
/// assert_eq!(params.rng_seed(), 42);
/// assert!((params.degree_offset() - 0.1).abs() < f64::EPSILON);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorParams {
    rng_seed: u64,
    degree_offset: f64,
    max_rejections: u64,
}

impl GeneratorParams {
    /// Returns the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rng_seed: DEFAULT_RNG_SEED,
            degree_offset: DEFAULT_DEGREE_OFFSET,
            max_rejections: DEFAULT_MAX_REJECTIONS,
        }
    }

    /// Seeds the generator's RNG to make generation deterministic.
    #[must_use]
    pub const fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Overrides the weight added to every degree during preferential
    /// attachment.
    #[must_use]
    pub const fn with_degree_offset(mut self, offset: f64) -> Self {
        self.degree_offset = offset;
        self
    }

    /// Overrides the number of consecutive rejected draws tolerated before a
    /// preferential run gives up.
    #[must_use]
    pub const fn with_max_rejections(mut self, max_rejections: u64) -> Self {
        self.max_rejections = max_rejections;
        self
    }

    /// Checks that every tunable lies in its accepted domain.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when the degree offset is
    /// not a positive finite number or when `max_rejections` is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.degree_offset.is_finite() || self.degree_offset <= 0.0 {
            return Err(RelgraphError::invalid_argument(format!(
                "degree_offset ({}) must be a positive finite number",
                self.degree_offset
            )));
        }
        if self.max_rejections == 0 {
            return Err(RelgraphError::invalid_argument(
                "max_rejections must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Returns the RNG seed.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Returns the preferential degree offset.
    #[must_use]
    pub const fn degree_offset(&self) -> f64 {
        self.degree_offset
    }

    /// Returns the consecutive-rejection cap.
    #[must_use]
    pub const fn max_rejections(&self) -> u64 {
        self.max_rejections
    }
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self::new()
    }
}
