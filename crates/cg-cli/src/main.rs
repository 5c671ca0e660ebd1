//! contextgraph CLI - validate context documents, resolve join paths, and generate SQL

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{fmt, glossary, parse, path, query, validate};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<commands::common::ExitCode>() {
            Some(code) => std::process::ExitCode::from(u8::try_from(code.0).unwrap_or(1)),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Parse(args) => parse::execute(args, &cli.global),
        cli::Commands::Validate(args) => validate::execute(args, &cli.global),
        cli::Commands::Path(args) => path::execute(args, &cli.global),
        cli::Commands::Query(args) => query::execute(args, &cli.global),
        cli::Commands::Glossary(args) => glossary::execute(args, &cli.global),
        cli::Commands::Fmt(args) => fmt::execute(args, &cli.global),
    }
}
