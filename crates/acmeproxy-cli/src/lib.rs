//! # acmeproxy-cli
//!
//! The `acmeproxy` binary.
//!
//! ## Commands
//!
//! - **serve**: load the config and run the proxy
//! - **check**: validate the config and show how each user's zones route
//! - **present** / **cleanup**: call a running proxy, the way an ACME client would
//! - **providers**: list the DNS backends this build ships

pub mod cli;
pub mod output;

pub use cli::run;
