//! CLI module
//!
//! Command-line host for the connector.
//!
//! # Commands
//!
//! - `customers` - Sync the Customers table
//! - `invoices` - Sync the Invoices table (optionally with PDFs)
//! - `auth-url` - Print the OAuth2 consent URL

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` directives, INFO when unset or unparsable; `verbose` adds DEBUG
pub fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(Level::INFO.as_str()));
    if verbose {
        filter.add_directive(Level::DEBUG.into())
    } else {
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use tracing::level_filters::LevelFilter;

    #[test_case(None, false, LevelFilter::INFO; "default")]
    #[test_case(None, true, LevelFilter::DEBUG; "verbose")]
    #[test_case(Some("debug"), false, LevelFilter::DEBUG; "rust_log without verbose")]
    #[test_case(Some("warn"), false, LevelFilter::WARN; "rust_log quieter")]
    #[test_case(Some("trace"), true, LevelFilter::TRACE; "verbose never lowers")]
    fn test_log_filter_level(rust_log: Option<&str>, verbose: bool, expected: LevelFilter) {
        assert_eq!(log_filter(rust_log, verbose).max_level_hint(), Some(expected));
    }
}
