//! Application lifecycle.

use crate::container::AppContainer;
use crate::startup;
use boxoffice_config::AppConfig;
use boxoffice_core::BoxOfficeResult;
use boxoffice_service::register_metrics;
use std::future::Future;
use tracing::info;

/// Builds the container, runs the background work and tears it down.
pub struct AppBuilder {
    config: Option<AppConfig>,
}

impl AppBuilder {
    /// Creates a new application builder.
    #[must_use]
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Runs until `shutdown` resolves, then stops the expiry sweeper.
    pub async fn run<F>(self, shutdown: F) -> BoxOfficeResult<()>
    where
        F: Future<Output = ()>,
    {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        if config.observability.metrics_enabled {
            startup::install_metrics_exporter(&config.observability)?;
        }
        register_metrics();

        let container = AppContainer::in_memory(config);
        let sweeper = container.spawn_sweeper();
        startup::print_startup_info(container.config());

        shutdown.await;

        if let Some(sweeper) = sweeper {
            sweeper.shutdown().await;
        }

        let stats = container.cache_stats();
        info!(
            events_hit_ratio = stats.events.hit_ratio(),
            users_hit_ratio = stats.users.hit_ratio(),
            bookings_hit_ratio = stats.bookings.hit_ratio(),
            "Server shutdown complete"
        );
        Ok(())
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::BoxOfficeError;

    fn quiet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.observability.metrics_enabled = false;
        config
    }

    #[test]
    fn test_app_builder_default() {
        let builder = AppBuilder::default();
        assert!(builder.config.is_none());
    }

    #[test]
    fn test_app_builder_with_config() {
        let builder = AppBuilder::new().with_config(AppConfig::default());
        assert!(builder.config.is_some());
    }

    #[tokio::test]
    async fn test_run_returns_after_shutdown() {
        let result = AppBuilder::new()
            .with_config(quiet_config())
            .run(async {})
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_rejects_zero_ttl() {
        let mut config = quiet_config();
        config.cache.users.ttl_secs = 0;
        let result = AppBuilder::new().with_config(config).run(async {}).await;
        assert!(matches!(result, Err(BoxOfficeError::Configuration(_))));
    }
}
