//! Error types for the relgraph core library.
//!
//! Defines the error enums exposed by the conversion engine, the weighted
//! sampler and the random graph generators, together with stable
//! machine-readable codes and a convenient result alias.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::WeightedSampler`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SamplerError {
    /// A weight was negative, NaN or infinite.
    #[error("weight {weight} must be a non-negative finite number")]
    InvalidWeight {
        /// The rejected weight.
        weight: f64,
    },
    /// Sampling was attempted before any key was inserted.
    #[error("cannot sample from an empty sampler")]
    Empty,
    /// Every key carries a zero weight, so no key is reachable.
    #[error("cannot sample when every weight is zero")]
    ZeroTotalWeight,
    /// The weights would sum past the largest finite `f64`.
    #[error("weight {weight} would push the total weight past the finite range")]
    TotalWeightOverflow {
        /// The rejected weight.
        weight: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`SamplerError`] variants.
    enum SamplerErrorCode for SamplerError {
        /// A weight was negative, NaN or infinite.
        InvalidWeight => InvalidWeight { .. } => "SAMPLER_INVALID_WEIGHT",
        /// Sampling was attempted before any key was inserted.
        Empty => Empty => "SAMPLER_EMPTY",
        /// Every key carries a zero weight.
        ZeroTotalWeight => ZeroTotalWeight => "SAMPLER_ZERO_TOTAL_WEIGHT",
        /// The weights would sum past the largest finite `f64`.
        TotalWeightOverflow => TotalWeightOverflow { .. } => "SAMPLER_TOTAL_WEIGHT_OVERFLOW",
    }
}

/// Error type produced by conversions and graph generators.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RelgraphError {
    /// A parameter was missing, malformed or outside the accepted domain.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        reason: String,
    },
    /// A square matrix was required but the source was not balanced.
    #[error("matrix must be balanced but has {rows} rows and {columns} columns")]
    ShapeMismatch {
        /// Row count of the offending matrix.
        rows: u64,
        /// Column count of the offending matrix.
        columns: u64,
    },
    /// A materialised size would not fit the indexing range of the target.
    #[error("{what} of {requested} exceeds the supported limit of {limit}")]
    CapacityExceeded {
        /// What was being sized (for example `"cardinality"`).
        what: &'static str,
        /// The size that was requested.
        requested: u64,
        /// The largest supported size.
        limit: u64,
    },
    /// More distinct edges were requested than the node set allows.
    #[error("requested {requested} edges but at most {available} can be placed")]
    Unsatisfiable {
        /// The requested final edge count.
        requested: u64,
        /// The largest final edge count the policy can reach.
        available: u64,
    },
    /// The rejection loop of a generator exceeded its configured cap.
    #[error("gave up after {attempts} consecutive rejected draws ({created} edges rolled back)")]
    RejectionLimitExceeded {
        /// Number of consecutive rejected draws.
        attempts: u64,
        /// Edges placed before the generator gave up. The graph no longer
        /// holds them when the error is returned.
        created: u64,
    },
    /// A [`crate::WeightedSampler`] operation failed.
    #[error("sampler failed: {error}")]
    Sampler {
        #[source]
        /// Underlying sampler error.
        error: SamplerError,
    },
}

define_error_codes! {
    /// Stable codes describing [`RelgraphError`] variants.
    enum RelgraphErrorCode for RelgraphError {
        /// A parameter was missing, malformed or outside the accepted domain.
        InvalidArgument => InvalidArgument { .. } => "RELGRAPH_INVALID_ARGUMENT",
        /// A square matrix was required but the source was not balanced.
        ShapeMismatch => ShapeMismatch { .. } => "RELGRAPH_SHAPE_MISMATCH",
        /// A materialised size would not fit the indexing range of the target.
        CapacityExceeded => CapacityExceeded { .. } => "RELGRAPH_CAPACITY_EXCEEDED",
        /// More distinct edges were requested than the node set allows.
        Unsatisfiable => Unsatisfiable { .. } => "RELGRAPH_UNSATISFIABLE",
        /// The rejection loop of a generator exceeded its configured cap.
        RejectionLimitExceeded => RejectionLimitExceeded { .. } => "RELGRAPH_REJECTION_LIMIT",
        /// A [`crate::WeightedSampler`] operation failed.
        SamplerFailure => Sampler { .. } => "RELGRAPH_SAMPLER_FAILURE",
    }
}

impl RelgraphError {
    /// Retrieve the inner [`SamplerErrorCode`] when the error originated in a
    /// [`crate::WeightedSampler`].
    #[must_use]
    pub const fn sampler_code(&self) -> Option<SamplerErrorCode> {
        match self {
            Self::Sampler { error } => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl From<SamplerError> for RelgraphError {
    fn from(error: SamplerError) -> Self {
        Self::Sampler { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RelgraphError>;
