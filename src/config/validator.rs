//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Result, UpdateError};

/// Validate a loaded configuration.
///
/// Percent thresholds must lie in `0..=100` and the poll interval must
/// be non-zero.
pub fn validate(config: &Config) -> Result<()> {
    let thresholds = [
        ("min_battery_percent", config.checks.min_battery_percent),
        ("max_cpu_load_percent", config.checks.max_cpu_load_percent),
        ("max_mem_percent", config.checks.max_mem_percent),
    ];

    for (key, value) in thresholds {
        if let Some(value) = value {
            if !(0.0..=100.0).contains(&value) {
                return Err(UpdateError::ConfigValidationError {
                    message: format!("checks.{} must be between 0 and 100, got {}", key, value),
                });
            }
        }
    }

    if config.update.poll_interval_secs == 0 {
        return Err(UpdateError::ConfigValidationError {
            message: "update.poll_interval_secs must be greater than 0".to_string(),
        });
    }

    Ok(())
}
