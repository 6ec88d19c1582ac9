use logos::Logos;
use swc_common::{BytePos, Span};
use thiserror::Error;

use crate::{TokenClass, TokenKind};

/// A lexed token. Text is borrowed from the owning [`TokenStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub class: TokenClass,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, lo: usize, hi: usize) -> Self {
        Self {
            kind,
            class: kind.class(),
            span: Span::new(BytePos(lo as u32), BytePos(hi as u32)),
        }
    }

    pub fn lo(&self) -> usize {
        self.span.lo.0 as usize
    }

    pub fn hi(&self) -> usize {
        self.span.hi.0 as usize
    }

    pub fn is_hidden(&self) -> bool {
        self.class == TokenClass::Hidden
    }
}

/// Lexing failure at a byte offset of the lexed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    pub offset: usize,
    pub message: String,
}

/// Every token of a source text, in order, hidden ones included.
///
/// Tokens tile the source without gaps, and the last token is always
/// [`TokenKind::Eof`]. Hidden text preceding any token is therefore the
/// source slice between the previous visible token and that token.
#[derive(Debug, Clone)]
pub struct TokenStream {
    source: String,
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn kind(&self, index: usize) -> TokenKind {
        self.tokens.get(index).map_or(TokenKind::Eof, |t| t.kind)
    }

    pub fn text(&self, index: usize) -> &str {
        match self.tokens.get(index) {
            Some(t) => &self.source[t.lo()..t.hi()],
            None => "",
        }
    }

    /// Index of the end-of-input token.
    pub fn eof(&self) -> usize {
        self.tokens.len() - 1
    }

    /// First non-hidden token at or after `from`.
    pub fn next_visible(&self, from: usize) -> usize {
        (from..self.tokens.len())
            .find(|&i| !self.tokens[i].is_hidden())
            .unwrap_or_else(|| self.eof())
    }

    /// Indices of the tokens the parser consumes: significant and copied.
    pub fn visible(&self) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_hidden())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Tokenize `source`, keeping hidden tokens in the stream.
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => tokens.push(Token::new(kind, span.start, span.end)),
            Err(()) => {
                return Err(LexError {
                    offset: span.start,
                    message: describe_error(&source[span.start..]),
                })
            }
        }
    }

    tokens.push(Token::new(TokenKind::Eof, source.len(), source.len()));

    Ok(TokenStream {
        source: source.to_string(),
        tokens,
    })
}

fn describe_error(rest: &str) -> String {
    if rest.starts_with("/*") {
        "missing the */ from the end of a /* comment */".to_string()
    } else if rest.starts_with('"') {
        "unterminated string literal".to_string()
    } else if rest.starts_with('\'') {
        "unterminated character literal".to_string()
    } else if rest.starts_with('#') {
        "web colors are written as # followed by six hex digits".to_string()
    } else {
        match rest.chars().next() {
            Some(c) => format!("unexpected character `{c}`"),
            None => "unexpected end of input".to_string(),
        }
    }
}
