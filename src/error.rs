use thiserror::Error;

/// Errors reported by hash primitives and tables.
///
/// Lookups never produce an error: a missing key is simply `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// The operating system's secure random source could not produce key
    /// material for a hash primitive.
    #[error("secure random source unavailable: {0}")]
    KeyGeneration(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A [`TableConfig`](crate::TableConfig) failed validation.
    #[error("invalid table configuration: {reason}")]
    InvalidConfig {
        /// Which setting was rejected.
        reason: &'static str,
    },

    /// A rebuild kept overflowing the end of the bucket array and gave up after
    /// enlarging its target `attempts` times.
    #[error("table could not grow past {length} buckets after {attempts} rebuild attempts")]
    GrowthExhausted {
        /// Physical length of the last attempted target.
        length: usize,
        /// Number of enlargements tried.
        attempts: usize,
    },

    /// The operation exists as an extension point but has no implementation.
    #[error("operation '{operation}' not supported")]
    Unsupported {
        /// Name of the refused operation.
        operation: &'static str,
    },
}

/// Crate result
pub type Result<T> = core::result::Result<T, Error>;
