//! Syntax tree and shared data model for the sketch preprocessor.
//!
//! - [`SyntaxTree`] rooted at a synthetic root node whose only child is the
//!   real program node
//! - [`ProgramMode`] (`Static`, `Active`, `Full`)
//! - [`PreprocOptions`], the read-only preference snapshot for a run

mod mode;
mod options;
mod tree;

pub use mode::ProgramMode;
pub use options::{PreprocOptions, PresentOptions};
pub use tree::{Element, Node, NodeKind, SyntaxTree};
