//! arklint CLI - Command-line interface for the arklint regex linter
//!
//! Finds regular-expression backreferences that can never match anything in
//! JavaScript, TypeScript and ArkTS sources.

mod commands;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use commands::Commands;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "arklint",
    author,
    version,
    about = "Regex backreference linter for JavaScript, TypeScript and ArkTS",
    long_about = "arklint reports regular-expression backreferences that can never match\n\
                  anything: references into their own group, to groups that appear later,\n\
                  to groups in another alternative or inside a negative lookaround."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Minimum level of log events written to stderr
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub log_json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_json);

    let failed = match cli.command {
        Commands::Check(args) => args.run()?,
        Commands::Explain(args) => args.run()?,
    };

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
