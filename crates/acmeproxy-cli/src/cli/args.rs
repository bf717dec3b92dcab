//! Command-line argument definitions using clap.

use acmeproxy_srv::config::DEFAULT_CONFIG_PATH;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// DNS-01 challenge proxy
///
/// Lets ACME clients publish `_acme-challenge` TXT records through one
/// trusted service instead of holding DNS vendor credentials themselves.
#[derive(Parser, Debug)]
#[command(name = "acmeproxy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log filter when RUST_LOG is not set (e.g. "debug", "acmeproxy_srv=trace")
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the proxy
    Serve(ServeArgs),

    /// Validate the config and show how zones are routed
    Check(CheckArgs),

    /// Publish a challenge record through a running proxy
    Present(ChallengeArgs),

    /// Remove a challenge record through a running proxy
    Cleanup(ChallengeArgs),

    /// List available DNS backends
    Providers,
}

#[derive(Args, Debug)]
pub struct ConfigPathArgs {
    /// Config file (YAML, or TOML with a .toml extension)
    #[arg(short = 'c', long = "config", env = "CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigPathArgs,

    /// Listen address, overriding `server` from the config file
    #[arg(short, long)]
    pub listen: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigPathArgs,
}

#[derive(Args, Debug)]
pub struct ChallengeArgs {
    /// Record name, e.g. _acme-challenge.foo.example.com
    pub fqdn: String,

    /// Challenge value
    pub value: String,

    /// Proxy base URL
    #[arg(long, env = "ACMEPROXY_SERVER", default_value = "http://127.0.0.1:8088")]
    pub server: String,

    /// User name
    #[arg(short, long, env = "ACMEPROXY_USER")]
    pub user: String,

    /// User token
    #[arg(short, long, env = "ACMEPROXY_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["acmeproxy", "serve", "-c", "/etc/acmeproxy.toml"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config.path, PathBuf::from("/etc/acmeproxy.toml"));
                assert_eq!(args.listen, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_present() {
        let cli = Cli::try_parse_from([
            "acmeproxy",
            "present",
            "_acme-challenge.foo.example.com",
            "tok",
            "--user",
            "x",
            "--token",
            "secret",
            "-o",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Commands::Present(args) => {
                assert_eq!(args.fqdn, "_acme-challenge.foo.example.com");
                assert_eq!(args.user, "x");
                assert_eq!(args.timeout, 30);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
