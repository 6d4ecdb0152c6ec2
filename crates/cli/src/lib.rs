pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "leetdraw",
    about = "Leetdraw operator CLI",
    long_about = "Draw a random LeetCode question from the terminal, inspect configuration, and check bot readiness.",
    after_help = "Examples:\n  leetdraw draw\n  leetdraw draw --json\n  leetdraw doctor --json\n  leetdraw config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Draw one random question from the live LeetCode APIs and print it")]
    Draw {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Seed the slug picker for a reproducible draw")]
        seed: Option<u64>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, Discord token readiness, and LeetCode client setup")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Draw { json, seed } => commands::draw::run(json, seed),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
