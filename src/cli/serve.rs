//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::store::Stores;
use clap::Args;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on, overrides `server.bind_addr`
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let stores = Stores::from_config(&config.store)?;
        let app = create_router(AppState::new(stores.documents));

        let addr = self.bind.unwrap_or(config.server.bind_addr);
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "Price API listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Price API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
