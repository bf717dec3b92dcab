//! `acmeproxy present` / `acmeproxy cleanup` - Call a running proxy.

use acmeproxy_core::DnsRecord;
use acmeproxy_providers::{AcmeProxyClient, ChallengeResponse};
use anyhow::{Context as _, Result};
use colored::Colorize;
use std::time::Duration;

use super::Context;
use crate::cli::args::ChallengeArgs;
use crate::output;

pub async fn present(ctx: Context, args: ChallengeArgs) -> Result<()> {
    let response = client(&args)?
        .present(&args.fqdn, &args.value)
        .await
        .with_context(|| format!("present {} failed", args.fqdn))?;
    print_records(&ctx, "presented", &response)
}

pub async fn cleanup(ctx: Context, args: ChallengeArgs) -> Result<()> {
    let response = client(&args)?
        .cleanup(&args.fqdn, &args.value)
        .await
        .with_context(|| format!("cleanup {} failed", args.fqdn))?;
    print_records(&ctx, "removed", &response)
}

fn client(args: &ChallengeArgs) -> Result<AcmeProxyClient> {
    Ok(AcmeProxyClient::builder(&args.server, &args.user, &args.token)
        .timeout(Duration::from_secs(args.timeout))
        .build()?)
}

fn print_records(ctx: &Context, verb: &str, response: &ChallengeResponse) -> Result<()> {
    if let Some(text) = output::serialize(ctx.output_format, &response.records)? {
        println!("{text}");
        return Ok(());
    }
    println!(
        "{} {verb} {} record(s)",
        "✓".green().bold(),
        response.records.len()
    );
    for record in &response.records {
        println!("  {}", describe(record));
    }
    Ok(())
}

fn describe(record: &DnsRecord) -> String {
    format!(
        "{} {} {:?}{}",
        record.name.cyan(),
        record.record_type,
        record.value,
        record
            .id
            .as_deref()
            .map(|id| format!(" (id {id})"))
            .unwrap_or_default()
    )
}
