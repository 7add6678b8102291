mod cli;
mod config;
mod error;
mod output;
mod pipeline;
mod reading;
mod series;
mod vector;

use std::process::ExitCode;

use clap::Parser;
use cli::{command, Cli, Commands};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Aod(args) => command::aod(args),
        Commands::Wind(args) => command::wind(args),
        Commands::Overlay(args) => command::overlay(args),
    };

    match result {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
