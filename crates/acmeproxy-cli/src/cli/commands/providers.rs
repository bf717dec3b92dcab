//! `acmeproxy providers` - List available DNS backends.

use acmeproxy_providers::builtin_registry;
use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::output;

pub fn execute(ctx: &Context) -> Result<()> {
    let registry = builtin_registry();
    let backends: Vec<&str> = registry.backends().collect();

    match output::serialize(ctx.output_format, &backends)? {
        Some(text) => println!("{text}"),
        None => {
            for backend in backends {
                println!("{}", backend.cyan());
            }
        }
    }
    Ok(())
}
