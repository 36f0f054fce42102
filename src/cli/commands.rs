//! CLI commands and argument parsing

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sync QuickBooks Online customers and invoices as JSON lines
#[derive(Parser, Debug)]
#[command(name = "qbo-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connector configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// QBO company (realm) id
    #[arg(long, global = true, env = "QBO_COMPANY_ID")]
    pub company_id: Option<String>,

    /// OAuth2 access token
    #[arg(long, global = true, env = "QBO_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// OAuth2 client id (refresh flow, consent URL)
    #[arg(long, global = true, env = "QBO_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth2 client secret (refresh flow)
    #[arg(long, global = true, env = "QBO_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth2 refresh token (refresh flow)
    #[arg(long, global = true, env = "QBO_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// OAuth2 token endpoint override (refresh flow)
    #[arg(long, global = true, env = "QBO_TOKEN_URL", hide = true)]
    pub token_url: Option<String>,

    /// Directory for downloaded PDFs (in-memory when omitted)
    #[arg(long, global = true)]
    pub blob_dir: Option<PathBuf>,

    /// Continuation JSON from a previous run, e.g. '{"startPosition":201}'
    #[arg(long, global = true)]
    pub continuation: Option<String>,

    /// Keep fetching pages until the stream is exhausted
    #[arg(long, global = true)]
    pub all: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync the Customers table
    Customers {
        /// Only active customers
        #[arg(long)]
        active_only: bool,
    },

    /// Sync the Invoices table
    Invoices {
        /// First transaction date (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last transaction date (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Download each invoice's PDF and attach its URL
        #[arg(long)]
        include_pdfs: bool,
    },

    /// Print the OAuth2 consent URL
    AuthUrl {
        /// Registered redirect URI
        #[arg(long)]
        redirect_uri: String,

        /// Opaque state echoed back to the redirect URI
        #[arg(long, default_value = "qbo-sync")]
        state: String,
    },
}
