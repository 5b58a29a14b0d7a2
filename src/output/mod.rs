// Output generation module

pub mod diagrams;
pub mod html;
pub mod markdown;
pub mod mermaid;
pub mod report;
pub mod templates;

pub use diagrams::*;
pub use html::*;
pub use markdown::generate_markdown;
pub use mermaid::{node_id, sanitize_id, Diagram, Direction};
pub use report::*;
pub use templates::*;
