//! Server startup utilities.

use tracing::{info, warn};
use trellis_config::AppConfig;
use trellis_core::{HealthCheck, HealthStatus, TrellisError, TrellisResult};

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
  _____         _ _ _
 |_   _| _ ___ | | (_)___
   | || '_/ -_)| | | (_-<
   |_||_| \___||_|_|_/__/
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment:   {}", config.app.environment);
    info!("Redis:         {}", if config.redis.enabled { config.redis.url.as_str() } else { "disabled" });
    info!("Name filter:   {:?}", config.filter.backend);
    info!("Terminal TTL:  {}s", config.cache.terminal_ttl_secs);
    info!("{}", separator);
}

/// Runs every health check and logs the outcome.
///
/// Fails if any check reports [`HealthStatus::Unhealthy`]; degraded
/// components are only warned about.
pub async fn report_health(checks: &[&dyn HealthCheck]) -> TrellisResult<()> {
    let mut failures = Vec::new();

    for check in checks {
        match check.check().await {
            HealthStatus::Healthy => info!(component = check.name(), "Health check passed"),
            HealthStatus::Degraded(reason) => {
                warn!(component = check.name(), reason = %reason, "Component degraded");
            }
            HealthStatus::Unhealthy(reason) => {
                warn!(component = check.name(), reason = %reason, "Health check failed");
                failures.push(format!("{}: {}", check.name(), reason));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(TrellisError::Internal(format!(
            "Startup health checks failed: {}",
            failures.join("; ")
        )))
    }
}
