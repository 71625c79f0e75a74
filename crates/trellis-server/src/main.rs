//! # Trellis Server
//!
//! Main entry point. Loads configuration, wires the layers together and
//! keeps the connection pools alive until a shutdown signal arrives.

use tokio::signal;
use tracing::{error, info, warn};
use trellis_config::{ConfigLoader, FilterBackend};
use trellis_core::telemetry::{init_telemetry, shutdown_telemetry};
use trellis_core::TrellisResult;
use trellis_repository::metrics::register_metrics;
use trellis_server::di::{build_module, ManagerResolver};
use trellis_server::startup::{print_banner, print_startup_info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Telemetry may not be up yet, so write to stderr as well.
        eprintln!("Application error: {}", e);
        error!("Application error: {}", e);
        shutdown_telemetry();
        std::process::exit(1);
    }
}

async fn run() -> TrellisResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_telemetry(&config.observability)?;
    register_metrics();

    print_banner();
    info!("Starting Trellis v{}", env!("CARGO_PKG_VERSION"));
    print_startup_info(&config);

    let module = build_module(&config).await?;

    if config.filter.backend == FilterBackend::Memory {
        let loaded = module.user_repository().warm_name_filter().await?;
        info!(names = loaded, "Username filter warmed from store");
    }

    // Managers are resolved up front so wiring errors surface at startup.
    let _terminal_manager = module.terminal_manager();
    let _user_manager = module.user_manager();

    info!("Trellis ready");
    shutdown_signal().await;

    module.database_pool().close().await;
    info!("Server shutdown complete");
    shutdown_telemetry();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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
