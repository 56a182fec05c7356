mod bootstrap;

use std::time::Duration;

use anyhow::Result;
use monitor_core::settings::Settings;
use monitor_runtime::{MonitorConfig, MonitorLoop, SessionLog};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Inventory Monitor v{} starting", env!("CARGO_PKG_VERSION"));

    // A missing port (none given, none remembered) is a configuration error;
    // so is a port that cannot be opened. Both exit non-zero without retry.
    let port = settings.require_port()?.to_string();

    println!("Starting Inventory Monitor on {port}...");
    println!("Saving data to {}", settings.display_output().display());

    let source = monitor_serial::open_port(&port, settings.baud)?;
    let log = SessionLog::open(&settings.output)?;

    // Ctrl+C flips the shutdown flag; the loop notices within one poll
    // interval, flushes the log, and releases the port before we return.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nStopping monitor...");
            let _ = shutdown_tx.send(true);
        }
    });

    let config = MonitorConfig {
        poll_interval: Duration::from_millis(settings.poll_interval_ms),
        max_line_bytes: settings.max_line_bytes as usize,
    };

    let mut monitor = MonitorLoop::new(source, log, config);
    let stats = monitor.run(shutdown_rx).await;

    tracing::info!(
        lines = stats.lines_seen,
        records = stats.records_written,
        errors = stats.line_errors,
        "monitor stopped"
    );

    Ok(())
}
