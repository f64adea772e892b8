//! CLI command implementations

pub mod check;
pub mod explain;

pub use check::CheckArgs;
pub use explain::ExplainArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze JavaScript/TypeScript/ArkTS files for useless backreferences
    Check(CheckArgs),

    /// Show detailed explanation for a specific rule
    Explain(ExplainArgs),
}
