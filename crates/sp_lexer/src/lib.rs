//! Lexer for sketch sources.
//!
//! Tokenizes with a logos-generated DFA and tags every token with a
//! [`TokenClass`]:
//!
//! - `Hidden`: whitespace and comments. Never seen by the parser, re-emitted
//!   verbatim so generated line numbers match the sketch.
//! - `Copied`: structural punctuation (`;` `(` `)` `{` `}` `,` `[` `]` `:`
//!   `...` `<` `>` `>>` `>>>`). Seen by the parser, but not stored as tree
//!   leaves; the emitter re-emits them on the hidden path.
//! - `Significant`: everything else.

mod kind;
mod stream;

pub use kind::{TokenClass, TokenKind, COPIED, HIDDEN};
pub use stream::{tokenize, LexError, Token, TokenStream};
