use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use crate::cli::{CliArgs, Commands};

mod cli;
mod commands;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Encode(#[from] dctpack_core::EncodeError),

    #[error(transparent)]
    Decode(#[from] dctpack_core::DecodeError),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

fn main() -> ExitCode {
    env_logger::init();

    let args = CliArgs::parse();
    let result = match args.command {
        Commands::Encode(args) => args.run(),
        Commands::Decode(args) => args.run(),
        Commands::Inspect(args) => args.run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
