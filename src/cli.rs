use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use crate::error::OrgPulseError;
use crate::github::DEFAULT_API_URL;

#[derive(Parser)]
#[command(name = "orgpulse")]
#[command(about = "Monthly developer activity and productivity reports for a GitHub organization")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Organization to scan")]
    pub org: String,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "API token (falls back to GITHUB_TOKEN)"
    )]
    pub token: Option<String>,

    #[arg(long, default_value = DEFAULT_API_URL, help = "Base URL of the hosting API")]
    pub api_url: String,

    #[arg(long, default_value_t = 30, help = "Per-request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, help = "Abort the whole run after this many seconds")]
    pub deadline: Option<u64>,
}

impl CommonArgs {
    pub fn require_org(&self) -> crate::error::Result<&str> {
        let org = self.org.trim();
        if org.is_empty() {
            return Err(OrgPulseError::Config(
                "organization must not be empty".to_string(),
            ));
        }
        Ok(org)
    }

    pub fn resolve_token(&self) -> crate::error::Result<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                OrgPulseError::Config(
                    "missing API token: pass --token or set GITHUB_TOKEN".to_string(),
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Comparative productivity report for one author and month
    Report {
        #[arg(long, help = "Author login to report on")]
        author: String,

        #[arg(long, help = "Calendar month to analyze (YYYY-MM, UTC)")]
        month: String,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// List the organization's repositories
    Repos {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Report {
                author,
                month,
                json,
            } => crate::report::exec(self.common, author, month, json),
            Commands::Repos { json } => crate::repos::exec(self.common, json),
        }
    }
}
