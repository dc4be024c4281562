use std::sync::Arc;

use clap::Parser;

use pixeltv::{cli, config};
use pixeltv::relay::Relay;
use pixeltv::session::PlayerSession;

/// Wait for the first Ctrl+C (graceful shutdown).
/// A second Ctrl+C while the relay drains force-exits immediately.
async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("error: failed to install Ctrl+C handler: {}", e);
        std::process::exit(1);
    }
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\npixeltv: forced exit");
            std::process::exit(1);
        }
    });
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .init();

    let args = cli::Args::parse();

    let file_config = config::find_config_file(args.config.as_deref())
        .and_then(|path| {
            match config::load_config(&path) {
                Ok(cfg) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    Some(cfg)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}", e);
                    None
                }
            }
        });

    let config = config::Config::resolve(file_config, &args);

    let relay = Arc::new(Relay::new(config.relay_config()));
    if let Err(e) = relay.ensure_started().await {
        eprintln!("error: couldn't start player relay: {}", e);
        std::process::exit(1);
    }

    if let Some(input) = config.video.as_deref() {
        let mut session = PlayerSession::new(Arc::clone(&relay));
        match session.open(input).await {
            Ok(url) => println!("{}", url),
            Err(e) => {
                eprintln!("error: {}", e);
                relay.stop().await;
                std::process::exit(1);
            }
        }
    }

    wait_for_shutdown().await;
    tracing::info!("Shutting down relay...");
    relay.stop().await;
    tracing::info!("Goodbye.");
}
