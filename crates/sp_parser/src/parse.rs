use sp_ast::{NodeKind, PreprocOptions, ProgramMode, SyntaxTree};
use sp_lexer::{tokenize, TokenKind, TokenStream};
use tracing::debug;

use crate::error::{Locator, SyntaxError};
use crate::grammar::{ParseError, Parser};

/// Result of parsing a sketch.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub tree: SyntaxTree,
    /// The full token stream, hidden tokens included, for re-emission.
    pub tokens: TokenStream,
}

impl ParseOutput {
    pub fn mode(&self) -> ProgramMode {
        self.tree.mode
    }

    /// Name of the first top-level class, interface, enum or annotation type.
    pub fn first_type_name(&self) -> Option<&str> {
        self.tree
            .top_level()
            .filter(|node| node.kind.is_type_decl())
            .find_map(|node| {
                node.token_children()
                    .find(|&t| self.tokens.kind(t) == TokenKind::Ident)
            })
            .map(|t| self.tokens.text(t))
    }

    /// Whether the sketch declares its own top-level `main` method.
    pub fn has_main(&self) -> bool {
        self.tree
            .top_level()
            .filter(|node| node.kind == NodeKind::MethodDecl)
            .filter_map(|node| {
                node.token_children()
                    .find(|&t| self.tokens.kind(t) == TokenKind::Ident)
            })
            .any(|t| self.tokens.text(t) == "main")
    }
}

/// Tokenize and parse a sketch whose imports have already been removed.
///
/// The program mode is decided here, once, and recorded on the tree.
pub fn parse_sketch(source: &str, options: &PreprocOptions) -> Result<ParseOutput, SyntaxError> {
    let locator = Locator::new(source);

    let tokens = tokenize(source).map_err(|e| locator.error_at(e.offset, e.message))?;

    let mut parser = Parser::new(&tokens, options);
    let mode = parser.detect_mode();
    debug!(?mode, tokens = tokens.len(), "detected program mode");

    let program = parser
        .program(mode)
        .map_err(|e| syntax_error(&locator, &tokens, e))?;

    Ok(ParseOutput {
        tree: SyntaxTree::new(mode, program),
        tokens,
    })
}

/// Errors at end of input point just past the last real token, which is
/// where the missing text belongs.
fn syntax_error(locator: &Locator, tokens: &TokenStream, err: ParseError) -> SyntaxError {
    let offset = if tokens.kind(err.token) == TokenKind::Eof {
        tokens
            .tokens()
            .iter()
            .rev()
            .find(|t| !t.is_hidden() && t.kind != TokenKind::Eof)
            .map_or(0, |t| t.hi())
    } else {
        tokens.tokens()[err.token].lo()
    };
    locator.error_at(offset, err.message)
}
