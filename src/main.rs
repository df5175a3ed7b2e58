//! `bezglutena`: is this product on the gluten-free registry?
//!
//! Loads the published product dataset once per run, then answers lookups by
//! EAN barcode, typed on the command line or read from a keyboard-wedge
//! barcode scanner.

mod app;
mod cli;
mod error;
mod output;
mod session;

use crate::cli::Cli;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = EnvFilter::builder().with_default_directive(cli.level().into()).from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("error: {err}");
            let mut frame = err.frame();
            while let Some(cause) = frame.children().first() {
                eprintln!("  caused by: {}", cause.error());
                frame = cause;
            }
            if err.is_retryable() {
                eprintln!("(this may work if you try again)");
            }
            ExitCode::FAILURE
        },
    }
}
