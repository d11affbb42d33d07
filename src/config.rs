use crate::capacity::MIN_TABLE_LEN;
use crate::error::Error;
use crate::error::Result;

/// Default load factor (`load / length`) at which a table grows.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.8;

/// Default load factor at or below which a grown table would shrink.
pub const DEFAULT_MIN_LOAD_FACTOR: f64 = 0.25;

/// Default number of times a rebuild may enlarge its target before giving up.
pub const DEFAULT_MAX_REBUILD_ATTEMPTS: usize = 64;

/// Construction parameters for a [`Table`](crate::Table).
///
/// Load factors are measured against the physical array length, not the
/// usable capacity.
///
/// # Examples
///
/// ```rust
/// # use robin_table::TableConfig;
/// let config = TableConfig::default()
///     .initial_size(1024)
///     .max_load_factor(0.7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub(crate) initial_size: usize,
    pub(crate) max_load_factor: f64,
    pub(crate) min_load_factor: f64,
    pub(crate) max_rebuild_attempts: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_size: MIN_TABLE_LEN,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            min_load_factor: DEFAULT_MIN_LOAD_FACTOR,
            max_rebuild_attempts: DEFAULT_MAX_REBUILD_ATTEMPTS,
        }
    }
}

impl TableConfig {
    /// Sets the physical length of the initial bucket array. This is also the
    /// step by which an overflowing rebuild enlarges its target.
    #[must_use]
    pub fn initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    /// Sets the load factor that triggers growth before an insert.
    #[must_use]
    pub fn max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Sets the load factor that requests a shrink before an insert.
    #[must_use]
    pub fn min_load_factor(mut self, min_load_factor: f64) -> Self {
        self.min_load_factor = min_load_factor;
        self
    }

    /// Sets how many times a single rebuild may enlarge its target after
    /// running off the end of the array.
    #[must_use]
    pub fn max_rebuild_attempts(mut self, max_rebuild_attempts: usize) -> Self {
        self.max_rebuild_attempts = max_rebuild_attempts;
        self
    }

    /// Checks that the parameters describe a usable table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first rejected setting.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.initial_size < 2 {
            "initial_size must be at least 2"
        } else if !self.max_load_factor.is_finite() || !self.min_load_factor.is_finite() {
            "load factors must be finite"
        } else if self.max_load_factor <= 0.0 || self.max_load_factor > 1.0 {
            "max_load_factor must be in (0, 1]"
        } else if self.min_load_factor < 0.0 || self.min_load_factor >= self.max_load_factor {
            "min_load_factor must be in [0, max_load_factor)"
        } else if self.max_rebuild_attempts == 0 {
            "max_rebuild_attempts must be positive"
        } else {
            return Ok(());
        };

        Err(Error::InvalidConfig { reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TableConfig::default();
        assert_eq!(config.initial_size, 50);
        assert_eq!(config.max_load_factor, 0.8);
        assert_eq!(config.min_load_factor, 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_settings() {
        let cases = [
            TableConfig::default().initial_size(1),
            TableConfig::default().max_load_factor(f64::NAN),
            TableConfig::default().max_load_factor(0.0),
            TableConfig::default().max_load_factor(1.5),
            TableConfig::default().min_load_factor(-0.1),
            TableConfig::default().min_load_factor(0.8),
            TableConfig::default().max_rebuild_attempts(0),
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig { .. })),
                "{config:?}"
            );
        }
    }
}
