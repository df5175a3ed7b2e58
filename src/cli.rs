use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Look up gluten-free products by barcode.
#[derive(Parser, Debug)]
#[command(name = "bezglutena", version, about)]
pub struct Cli {
    /// Config file (TOML, YAML or JSON); defaults to the platform config dir
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dataset URL or local file, overriding the configured one
    #[arg(long, global = true, value_name = "URL_OR_PATH")]
    pub dataset: Option<String>,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Less logging (-q errors only, -qq nothing)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up one or more barcodes
    Lookup {
        #[arg(required = true, value_name = "CODE")]
        codes: Vec<String>,
    },
    /// Read barcodes from a scanner attached as a keyboard, one per line
    Scan {
        /// Keep scanning after the first barcode
        #[arg(long)]
        continuous: bool,
    },
    /// Load the dataset and report what was indexed
    Stats,
    /// Stop showing the "check the packaging" disclaimer
    Dismiss,
    /// Rebuild the dataset from the product registry
    Scrape {
        /// Where to write the dataset; defaults to `scrape.output`
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Log level from `-v`/`-q`; `RUST_LOG` can still override per target.
    pub fn level(&self) -> LevelFilter {
        match (self.verbose, self.quiet) {
            (0, 0) => LevelFilter::WARN,
            (0, 1) => LevelFilter::ERROR,
            (0, _) => LevelFilter::OFF,
            (1, _) => LevelFilter::INFO,
            (2, _) => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Whether the disclaimer belongs on screen for this command.
    pub fn shows_disclaimer(&self) -> bool {
        !matches!(self.command, Command::Dismiss | Command::Scrape { .. })
    }
}
