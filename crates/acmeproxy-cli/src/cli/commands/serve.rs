//! `acmeproxy serve` - Run the proxy.

use acmeproxy_srv::{server, ChallengeCoordinator};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use super::{load_model, Context};
use crate::cli::args::ServeArgs;

pub async fn execute(_ctx: Context, args: ServeArgs) -> Result<()> {
    let (config, model) = load_model(&args.config.path)?;
    let addr = args.listen.unwrap_or_else(|| config.listen_addr());
    info!(config = %args.config.path.display(), "configuration loaded");

    let coordinator = ChallengeCoordinator::new(Arc::new(model));
    server::run(&addr, coordinator, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
