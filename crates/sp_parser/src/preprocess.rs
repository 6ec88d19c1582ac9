//! Text-level passes that run before tokenization.
//!
//! Processing order:
//! 1. Scrub comments and string contents into a same-length mask
//! 2. Extract imports, deleting each match from both copies
//! 3. Optionally escape non-ASCII characters

mod imports;
mod scrub;
mod unicode;

pub use imports::{extract_imports, SourceProgram};
pub use scrub::scrub;
pub use unicode::substitute_unicode;
