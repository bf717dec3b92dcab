//! acmeproxy - DNS-01 challenge proxy
//!
//! Publishes ACME challenge records on behalf of clients that hold no DNS
//! credentials of their own.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    acmeproxy_cli::run().await
}
