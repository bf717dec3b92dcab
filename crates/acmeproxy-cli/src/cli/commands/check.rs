//! `acmeproxy check` - Validate a config file.

use acmeproxy_srv::AuthorizationModel;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::{load_model, Context};
use crate::cli::args::CheckArgs;
use crate::output;

/// One resolved zone rule.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct Route {
    user: String,
    zone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    regex: Option<String>,
    provider: String,
}

#[derive(Debug, Serialize)]
struct Report {
    routes: Vec<Route>,
    unused_providers: Vec<String>,
}

pub fn execute(ctx: &Context, args: &CheckArgs) -> Result<()> {
    let (_, model) = load_model(&args.config.path)?;
    let report = report(&model);

    if let Some(text) = output::serialize(ctx.output_format, &report)? {
        println!("{text}");
        return Ok(());
    }

    println!(
        "{} {}",
        "✓".green().bold(),
        format!("{} is valid", args.config.path.display()).bold()
    );
    for route in &report.routes {
        let rule = match &route.regex {
            Some(regex) => format!("{} ~ /{regex}/", route.zone),
            None => route.zone.clone(),
        };
        println!(
            "  {:<16} {:<40} -> {}",
            route.user.cyan(),
            rule,
            route.provider.yellow()
        );
    }
    for provider in &report.unused_providers {
        println!(
            "  {} provider {} is not used by any user",
            "warning:".yellow().bold(),
            provider
        );
    }
    Ok(())
}

fn report(model: &AuthorizationModel) -> Report {
    let routes = model
        .users()
        .into_iter()
        .flat_map(|user| {
            user.rules().iter().map(move |rule| Route {
                user: user.name().to_string(),
                zone: rule.zone().to_string(),
                regex: rule.pattern().map(String::from),
                provider: rule.provider().to_string(),
            })
        })
        .collect();
    let unused_providers = model
        .unused_providers()
        .iter()
        .map(ToString::to_string)
        .collect();
    Report {
        routes,
        unused_providers,
    }
}
