//! Core analysis engine for arklint.
//!
//! Parses JavaScript, TypeScript and ArkTS sources with swc and reports
//! regular-expression backreferences that can never match anything.

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod disable_comments;
pub mod parser;
pub mod regexp;
pub mod rules;
pub mod visitor;

pub use analysis::AnalysisEngine;
pub use config::Config;
pub use diagnostic::Diagnostic;
pub use parser::ParsedFile;
pub use rules::Severity;
