//! alertsearch - Alertmanager webhook to OpenSearch bridge.
//!
//! Waits for the store to answer, then serves the webhook endpoint until
//! interrupted.

use alertsearch_server::{AlertServer, Opts, logging};
use alertsearch_store::connect;
use clap::Parser;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    logging::init(&opts.logger)?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting alertsearch");
    info!(options = %opts.to_json()?, "effective options");

    let server_config = opts.server_config()?;
    if !server_config.index_template.has_placeholders() {
        warn!(
            index = %server_config.index_template,
            "index template has no date placeholder, all documents go to one index"
        );
    }

    let store = match connect(&opts.store_config()?, &opts.retry_policy()).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "store is not reachable");
            return Err(e.into());
        }
    };

    AlertServer::new(server_config, store)
        .serve_with_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
