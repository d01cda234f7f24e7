//! APRS monitor binary
//!
//! Usage: `aprs-monitor [config.json]`

use std::path::PathBuf;

use aprs_monitor::{render_frame, run_monitor, MonitorConfig, MonitorEvent};
use tokio::sync::{mpsc, watch};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aprs_monitor=info,aprs_protocol=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match MonitorConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting APRS monitor for {}", config.server);

    let (event_tx, mut event_rx) = mpsc::channel::<MonitorEvent>(64);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor = tokio::spawn(run_monitor(config.clone(), event_tx, shutdown_rx));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
                break;
            }
            event = event_rx.recv() => match event {
                Some(MonitorEvent::Frame(frame)) => {
                    match render_frame(&frame, config.output, config.show_undecodable) {
                        Ok(Some(text)) => println!("{}", text),
                        Ok(None) => {}
                        Err(e) => tracing::warn!("Failed to render frame: {}", e),
                    }
                }
                Some(MonitorEvent::DecodeError { error, raw }) => {
                    tracing::debug!("Dropped {} byte frame: {}", raw.len(), error);
                }
                Some(MonitorEvent::Connected { server }) => {
                    tracing::info!("Listening on {}", server);
                }
                Some(MonitorEvent::Disconnected { reason }) => {
                    tracing::warn!("Disconnected: {}", reason);
                }
                None => break,
            },
        }
    }

    // Unblock any pending event send so the task can see the shutdown
    drop(event_rx);
    let _ = monitor.await;
}
