// Line-oriented C/C++ scanning: recognizers, scopes and extractors

pub mod ast;
pub mod calls;
pub mod members;
pub mod patterns;
pub mod scope;

pub use ast::*;
pub use calls::extract_calls;
pub use members::{extract_members, ClassMembers};
pub use patterns::{classify, Dialect, LineKind, Signature, Terminator};
pub use scope::{track_scope, ScopeRange};
