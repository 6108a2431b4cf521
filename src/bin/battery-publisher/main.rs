mod args;

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use args::Args;
use battery_telemetry::{battery::RandomReadings, mqtt, publisher::Publisher};
use clap::Parser as _;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "battery_telemetry=info,battery_publisher=info";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_tracing();

    if let Err(e) = run(args).await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(args: Args) -> Result<()> {
    let config = args.into_config();

    let sink = mqtt::connect(&config)
        .await
        .context("failed to start MQTT session")?;

    let mut publisher = Publisher::new(config, sink, RandomReadings::from_entropy());

    info!(
        topic = %publisher.config().topic,
        "publishing every {:?}", publisher.config().interval
    );

    publisher
        .run(shutdown_signal())
        .await
        .context("failed to publish battery telemetry")?;

    publisher
        .into_sink()
        .disconnect()
        .await
        .context("failed to disconnect from MQTT broker")?;

    info!("stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
