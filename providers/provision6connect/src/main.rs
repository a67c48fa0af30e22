//! 6connect ProVision Terraform provider
//!
//! Exposes ProVision entities as Terraform types:
//! - Resources: generic resources, DNS zones, DNS records, smart-assigned netblocks
//! - Data sources: resource and netblock searches, first available IP, DNS/DHCP push and push status
//!
//! One JSON host request is read from stdin and the response is written to stdout.
//! Logs go to stderr.

mod config;
mod data_sources;
mod diagnostics;
mod error;
mod host;
mod models;
mod provider;
mod push;
mod resources;
mod selector;

#[cfg(test)]
mod test_utils;

use anyhow::Context;
use host::HostRequest;
use provider::PROVIDER_TYPE_NAME;
use std::io::{Read, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting {} provider", PROVIDER_TYPE_NAME);

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read host request from stdin")?;
    let request: HostRequest = serde_json::from_str(&input).context("Failed to decode host request")?;
    info!("Handling {} {} {}", request.operation, request.kind.as_str(), request.type_name);

    let response = provider::serve(request, |name| std::env::var(name).ok()).await;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response).context("Failed to write host response")?;
    writeln!(stdout)?;

    if response.diagnostics.has_error() {
        std::process::exit(1);
    }
    Ok(())
}
