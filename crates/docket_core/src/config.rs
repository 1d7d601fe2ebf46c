//! Adapter configuration.

/// Configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether debug logs include record payloads.
    pub log_payloads: bool,

    /// How many generated identifiers an insert tries before giving up.
    pub generated_id_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_payloads: false,
            generated_id_attempts: 5,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether payloads are logged.
    #[must_use]
    pub const fn log_payloads(mut self, value: bool) -> Self {
        self.log_payloads = value;
        self
    }

    /// Sets the number of generated-id attempts per insert.
    #[must_use]
    pub const fn generated_id_attempts(mut self, attempts: u32) -> Self {
        self.generated_id_attempts = attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(!config.log_payloads);
        assert_eq!(config.generated_id_attempts, 5);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new().log_payloads(true).generated_id_attempts(2);
        assert!(config.log_payloads);
        assert_eq!(config.generated_id_attempts, 2);
    }
}
