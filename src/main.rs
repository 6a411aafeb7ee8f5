//! repoflat - Flatten a directory tree into a single directory
//!
//! repoflat provides:
//! - Directory walking with excluded directories pruned
//! - Name/extension filtering with an optional extension allowlist
//! - Path-preserving flat file names (separators replaced by a join token)
//! - Collision detection between flat names
//! - Text, jsonl, json and markdown reports

use clap::Parser;
use std::process::ExitCode;

mod backends;
mod cli;
mod core;
mod flows;

use crate::core::error::FlattenError;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let console = cli.console();

    match cli::run(cli, console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<FlattenError>() {
                Some(fe) => console.error(format!("[{}] {:#}", fe.code(), err)),
                None => console.error(format!("{:#}", err)),
            }
            ExitCode::FAILURE
        }
    }
}
