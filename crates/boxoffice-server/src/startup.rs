//! Server startup utilities.

use boxoffice_config::{AppConfig, ObservabilityConfig};
use boxoffice_core::{BoxOfficeError, BoxOfficeResult};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____                ____  ________
   / __ )____  _  __   / __ \/ __/ __(_)_______
  / __  / __ \| |/_/  / / / / /_/ /_/ / ___/ _ \
 / /_/ / /_/ />  <   / /_/ / __/ __/ / /__/  __/
/_____/\____/_/|_|   \____/_/ /_/ /_/\___/\___/
    "#);
}

/// Prints the effective cache settings.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("Cache:       {}", if config.cache.enabled { "enabled" } else { "disabled" });
    for (name, ns) in [
        ("events", &config.cache.events),
        ("users", &config.cache.users),
        ("bookings", &config.cache.bookings),
    ] {
        info!(
            "  {:<9} ttl {}s, sweep every {}s",
            name, ns.ttl_secs, ns.sweep_interval_secs
        );
    }
    if config.observability.metrics_enabled {
        info!("Metrics:     http://{}/metrics", config.observability.metrics_addr);
    }
    info!("{}", separator);
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &ObservabilityConfig) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},boxoffice=debug", config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.log_format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    if let Err(e) = installed {
        eprintln!("tracing subscriber already installed: {e}");
    }
}

/// Installs the Prometheus recorder and its HTTP scrape endpoint.
///
/// Must be called from within the tokio runtime.
pub fn install_metrics_exporter(config: &ObservabilityConfig) -> BoxOfficeResult<()> {
    let addr: SocketAddr = config.metrics_addr.parse().map_err(|e| {
        BoxOfficeError::configuration(format!(
            "observability.metrics_addr '{}' is not a socket address: {e}",
            config.metrics_addr
        ))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| BoxOfficeError::configuration(format!("Prometheus exporter: {e}")))?;

    info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
