#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod commands;

use args::{Args, Command};
use clap::Parser;
use voiss_config::Config;
use voiss_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Serve(serve) => {
            let config = Config::load(&args.config)?;
            voiss_telemetry::init(&config.logging)?;

            tracing::info!(config_path = %args.config.display(), "starting voiss proxy");

            let mut server = Server::new(&config)?;
            if let Some(listen) = serve.listen {
                server = server.with_listen_address(listen);
            }

            let shutdown = CancellationToken::new();
            let shutdown_clone = shutdown.clone();

            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown_clone.cancel();
            });

            server.serve(shutdown).await?;

            tracing::info!("voiss stopped");
        }
        Command::Train(train) => {
            let config = Config::load_or_default(&args.config)?;
            voiss_telemetry::init(&config.logging)?;
            commands::train(&config.client, &train).await?;
        }
        Command::Speak(speak) => {
            let config = Config::load_or_default(&args.config)?;
            voiss_telemetry::init(&config.logging)?;
            commands::speak(&config.client, speak).await?;
        }
        Command::Model(model) => {
            let config = Config::load_or_default(&args.config)?;
            voiss_telemetry::init(&config.logging)?;
            commands::model(&config.client, model).await?;
        }
    }

    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
