//! Emission side of the sketch preprocessor.
//!
//! - [`emit_tree`] prints a parsed sketch back out, hidden text included,
//!   applying the host-language rewrites on the way
//! - [`wrapper`] holds the per-mode header/footer table
//! - [`ImportSet`] prints the four import groups
//! - [`write_parse_tree`] dumps the tree as XML
//! - [`Preprocessor`] and [`PipelineState`] run the whole pipeline for one
//!   sketch

mod emitter;
mod error;
mod imports;
mod pipeline;
pub mod wrapper;
mod xml;

pub use emitter::emit_tree;
pub use error::PreprocessError;
pub use imports::ImportSet;
pub use pipeline::{PipelineState, PreprocessOutput, Preprocessor, SketchInput, PARSE_TREE_FILE};
pub use xml::{render_parse_tree, write_parse_tree};
