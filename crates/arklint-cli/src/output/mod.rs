//! Report formatters

pub mod json;
pub mod pretty;
pub mod text;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored output with source context
    Pretty,
    /// One `file:line:col: severity [id]: message` line per diagnostic
    Text,
    /// Versioned JSON document
    Json,
}
