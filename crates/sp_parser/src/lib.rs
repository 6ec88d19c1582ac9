//! Sketch parser.
//!
//! Text passes run first on the raw sketch:
//!
//! - [`preprocess::scrub`] masks comments and string contents so pattern
//!   searches never match inside them
//! - [`preprocess::extract_imports`] strips `import` statements from the
//!   sketch and its scrubbed twin in lock-step
//! - [`preprocess::substitute_unicode`] escapes non-ASCII characters
//!
//! [`parse_sketch`] then tokenizes, decides the [`ProgramMode`] once, and
//! builds the [`SyntaxTree`].
//!
//! [`ProgramMode`]: sp_ast::ProgramMode
//! [`SyntaxTree`]: sp_ast::SyntaxTree

mod error;
mod grammar;
pub mod parse;
pub mod preprocess;

pub use error::SyntaxError;
pub use parse::{parse_sketch, ParseOutput};
