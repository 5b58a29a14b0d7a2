//! Surveyor - derive structural diagrams from C/C++ sources
//!
//! Scans C/C++ text line by line, builds a model of functions, classes,
//! includes and calls, and renders it as Mermaid flowcharts, class diagrams,
//! call graphs and per-file module graphs.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;

// Re-export main types
pub use analysis::{analyze, analyze_with, Analysis, Analyzer, ModelStats, StructuralModel};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{DiagramGenerator, DiagramKind, DiagramSet};
pub use parser::SourceFile;
