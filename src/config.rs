use crate::error::{ChurnError, Result};
use crate::models::PackageSpec;

/// Default minimum delay between iterations, in seconds
pub const DEFAULT_MIN_DELAY_SECS: u64 = 1;
/// Default maximum delay between iterations, in seconds
pub const DEFAULT_MAX_DELAY_SECS: u64 = 5;

/// Validated, immutable parameters for one run
///
/// Constructed once before the loop starts; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Package to install/uninstall each iteration
    pub package: PackageSpec,
    /// Number of iterations to run (>= 1)
    pub iterations: u32,
    /// Minimum delay between iterations in seconds
    pub min_delay_secs: u64,
    /// Maximum delay between iterations in seconds (>= min)
    pub max_delay_secs: u64,
    /// Route each iteration's traffic through the proxy pool
    pub use_proxies: bool,
}

impl CycleConfig {
    pub fn new(
        package: PackageSpec,
        iterations: u32,
        min_delay_secs: u64,
        max_delay_secs: u64,
        use_proxies: bool,
    ) -> Result<Self> {
        if iterations < 1 {
            return Err(ChurnError::InvalidConfig(
                "iteration count must be at least 1".into(),
            ));
        }
        if max_delay_secs < min_delay_secs {
            return Err(ChurnError::InvalidConfig(
                "maximum delay must be greater than or equal to minimum delay".into(),
            ));
        }

        Ok(Self {
            package,
            iterations,
            min_delay_secs,
            max_delay_secs,
            use_proxies,
        })
    }
}

/// Parse a strictly decimal non-negative integer
///
/// Accepts only one or more ASCII digits after trimming surrounding
/// whitespace; anything else (signs, decimals, empty input) is `None`.
pub fn parse_strict_integer(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> PackageSpec {
        PackageSpec::parse("lodash").unwrap()
    }

    #[test]
    fn test_parse_strict_integer_accepts_digits() {
        assert_eq!(parse_strict_integer("0"), Some(0));
        assert_eq!(parse_strict_integer("42"), Some(42));
        assert_eq!(parse_strict_integer("007"), Some(7));
        assert_eq!(parse_strict_integer("  42  "), Some(42));
    }

    #[test]
    fn test_parse_strict_integer_rejects_non_digits() {
        assert_eq!(parse_strict_integer(""), None);
        assert_eq!(parse_strict_integer("   "), None);
        assert_eq!(parse_strict_integer("-1"), None);
        assert_eq!(parse_strict_integer("+1"), None);
        assert_eq!(parse_strict_integer("3.14"), None);
        assert_eq!(parse_strict_integer("abc"), None);
        assert_eq!(parse_strict_integer("1e3"), None);
    }

    #[test]
    fn test_config_accepts_valid_parameters() {
        let config = CycleConfig::new(package(), 3, 1, 5, false).unwrap();
        assert_eq!(config.iterations, 3);
        assert_eq!(config.min_delay_secs, 1);
        assert_eq!(config.max_delay_secs, 5);
        assert!(!config.use_proxies);
    }

    #[test]
    fn test_config_accepts_equal_delays() {
        let config = CycleConfig::new(package(), 1, 2, 2, false).unwrap();
        assert_eq!(config.min_delay_secs, config.max_delay_secs);
    }

    #[test]
    fn test_config_rejects_zero_iterations() {
        let err = CycleConfig::new(package(), 0, 1, 5, false).unwrap_err();
        assert!(matches!(err, ChurnError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_rejects_inverted_delays() {
        let err = CycleConfig::new(package(), 1, 5, 1, false).unwrap_err();
        assert!(matches!(err, ChurnError::InvalidConfig(_)));
    }
}
