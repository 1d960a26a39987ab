//! # Box Office Server
//!
//! Main entry point for the Box Office application.

use boxoffice_config::ConfigLoader;
use boxoffice_core::BoxOfficeResult;
use boxoffice_server::{startup, AppBuilder};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("boxoffice-server: {e}");
        std::process::exit(1);
    }
}

async fn run() -> BoxOfficeResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    startup::init_logging(&config.observability);
    startup::print_banner();
    info!("Starting {} v{}", config.app.name, config.app.version);

    AppBuilder::new()
        .with_config(config)
        .run(startup::shutdown_signal())
        .await
}
