//! Configuration validation.
//!
//! Collects every problem in one pass so a bad deployment fails at startup
//! with the full list rather than one error at a time.

use crate::{AppConfig, FilterBackend};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// URL is missing or malformed.
    InvalidUrl { url_type: String, message: String },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Timeout or TTL value must be positive.
    NonPositiveTimeout { name: String },
    /// Filter capacity must be non-zero.
    ZeroFilterCapacity,
    /// False-positive rate must lie strictly between 0 and 1.
    InvalidFalsePositiveRate { value: f64 },
    /// The Redis filter backend needs Redis.
    FilterBackendUnavailable,
    /// Sampling ratio must be between 0.0 and 1.0.
    InvalidSamplingRatio { value: f64 },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::NonPositiveTimeout { name } => {
                write!(f, "'{}' must be positive", name)
            }
            Self::ZeroFilterCapacity => write!(f, "filter.capacity must be greater than 0"),
            Self::InvalidFalsePositiveRate { value } => {
                write!(
                    f,
                    "Invalid filter.false_positive_rate: {} (must be between 0.0 and 1.0, exclusive)",
                    value
                )
            }
            Self::FilterBackendUnavailable => {
                write!(f, "filter.backend = \"redis\" requires redis.enabled = true")
            }
            Self::InvalidSamplingRatio { value } => {
                write!(
                    f,
                    "Invalid sampling ratio: {} (must be between 0.0 and 1.0)",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_database(config, &mut errors);
        Self::validate_redis(config, &mut errors);
        Self::validate_cache(config, &mut errors);
        Self::validate_filter(config, &mut errors);
        Self::validate_observability(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_database(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let database = &config.database;
        if database.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !database.url.starts_with("mysql://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with mysql://".to_string(),
            });
        }

        if database.min_connections > database.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: database.min_connections,
                max: database.max_connections,
            });
        }

        if database.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
    }

    fn validate_redis(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.redis.enabled {
            return;
        }

        if !config.redis.url.starts_with("redis://") && !config.redis.url.starts_with("rediss://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            });
        }
    }

    fn validate_cache(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.cache.terminal_ttl_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "cache.terminal_ttl_secs".to_string(),
            });
        }
    }

    fn validate_filter(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let filter = &config.filter;
        if filter.capacity == 0 {
            errors.push(ConfigValidationError::ZeroFilterCapacity);
        }

        if !(filter.false_positive_rate > 0.0 && filter.false_positive_rate < 1.0) {
            errors.push(ConfigValidationError::InvalidFalsePositiveRate {
                value: filter.false_positive_rate,
            });
        }

        if filter.backend == FilterBackend::Redis && !config.redis.enabled {
            errors.push(ConfigValidationError::FilterBackendUnavailable);
        }
    }

    fn validate_observability(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let observability = &config.observability;
        if !(0.0..=1.0).contains(&observability.sampling_ratio) {
            errors.push(ConfigValidationError::InvalidSamplingRatio {
                value: observability.sampling_ratio,
            });
        }

        if let Some(ref endpoint) = observability.otlp_endpoint {
            if Url::parse(endpoint).is_err() {
                errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "otlp_endpoint".to_string(),
                    message: format!("Invalid URL format: {}", endpoint),
                });
            }
        }
    }
}
