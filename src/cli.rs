use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tubecomy")]
#[command(author, version, about = "Telegram bot of the TubeComy community", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default when no subcommand is given)
    Run {
        /// Use webhook mode instead of long polling (needs WEBHOOK_URL)
        #[arg(long)]
        webhook: bool,
    },

    /// Write every captured e-mail as CSV
    ExportContacts {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
