//! Recursive-descent recognizer for the sketch grammar.
//!
//! The grammar is the host-language grammar (classes, members, statements,
//! expressions, generics) extended with cast-calls (`int(x)`), web color
//! literals (`#RRGGBB`) and the static-program production, where bare
//! top-level statements form the body of an implicit `setup()`.
//!
//! The parser walks the visible (significant and copied) tokens. Only
//! significant tokens become tree leaves; copied ones are consumed and left
//! to the emitter's hidden path.

mod decl;
mod expr;
mod stmt;
mod types;

use sp_ast::{Node, NodeKind, PreprocOptions, ProgramMode};
use sp_lexer::{TokenClass, TokenKind, TokenStream};

/// Internal failure: the token index where the grammar gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    pub token: usize,
    pub message: String,
}

pub(crate) type PResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pos: usize,
    last_end: usize,
    pending_gt: u8,
    angle_depth: usize,
    class_depth: usize,
}

pub(crate) struct Parser<'a> {
    stream: &'a TokenStream,
    options: &'a PreprocOptions,
    visible: Vec<usize>,
    pos: usize,
    /// One past the last consumed token index.
    last_end: usize,
    /// `>` still owed to enclosing type argument lists after `>>`/`>>>`.
    pending_gt: u8,
    /// Nesting of type argument and parameter lists.
    angle_depth: usize,
    /// Nesting of class bodies; zero at the sketch's top level.
    class_depth: usize,
    /// Set once a top-level method header has been read.
    saw_method: bool,
}

impl<'a> Parser<'a> {
    pub fn new(stream: &'a TokenStream, options: &'a PreprocOptions) -> Self {
        Self {
            stream,
            options,
            visible: stream.visible(),
            pos: 0,
            last_end: 0,
            pending_gt: 0,
            angle_depth: 0,
            class_depth: 0,
            saw_method: false,
        }
    }

    /// Decide the program mode without consuming input.
    pub fn detect_mode(&mut self) -> ProgramMode {
        let cp = self.checkpoint();

        if self.at(TokenKind::Package) {
            return ProgramMode::Full;
        }
        if let Ok(mods) = self.modifiers() {
            let public = mods
                .token_children()
                .any(|t| self.stream.kind(t) == TokenKind::Public);
            let decl = matches!(
                self.peek(),
                TokenKind::Class | TokenKind::Interface | TokenKind::Enum
            );
            if public && decl {
                self.rewind(cp);
                return ProgramMode::Full;
            }
        }
        self.rewind(cp);

        self.saw_method = false;
        while !self.at(TokenKind::Eof) && !self.saw_method {
            if self.member().is_err() {
                break;
            }
        }
        let active = self.saw_method;
        self.rewind(cp);
        self.saw_method = false;

        if active {
            ProgramMode::Active
        } else {
            ProgramMode::Static
        }
    }

    /// Parse the whole token stream as a program of the given mode.
    pub fn program(&mut self, mode: ProgramMode) -> PResult<Node> {
        let node = match mode {
            ProgramMode::Full => self.compilation_unit()?,
            ProgramMode::Active => {
                let mut node = self.start(NodeKind::ActiveProgram);
                while !self.at(TokenKind::Eof) {
                    node.push_node(self.member()?);
                }
                self.finish(node)
            }
            ProgramMode::Static => {
                let mut node = self.start(NodeKind::StaticProgram);
                while !self.at(TokenKind::Eof) {
                    node.push_node(self.block_statement()?);
                }
                self.finish(node)
            }
        };
        Ok(node)
    }

    // ---- cursor ----

    fn current(&self) -> usize {
        self.visible
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| self.stream.eof())
    }

    fn nth(&self, n: usize) -> TokenKind {
        match self.visible.get(self.pos + n) {
            Some(&i) => self.stream.kind(i),
            None => TokenKind::Eof,
        }
    }

    fn peek(&self) -> TokenKind {
        self.nth(0)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn text(&self) -> &'a str {
        let stream: &'a TokenStream = self.stream;
        stream.text(self.current())
    }

    fn bump(&mut self) -> usize {
        let index = self.current();
        if self.stream.kind(index) != TokenKind::Eof {
            self.pos += 1;
            self.last_end = index + 1;
        }
        index
    }

    /// Consume the current token, attaching it to `node` if significant.
    fn bump_into(&mut self, node: &mut Node) -> usize {
        let index = self.bump();
        if self.stream.tokens()[index].class == TokenClass::Significant {
            node.push_token(index);
        }
        index
    }

    fn eat_into(&mut self, node: &mut Node, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump_into(node);
            true
        } else {
            false
        }
    }

    fn expect_into(&mut self, node: &mut Node, kind: TokenKind) -> PResult<usize> {
        if self.at(kind) {
            Ok(self.bump_into(node))
        } else {
            Err(self.expected(kind.describe()))
        }
    }

    fn start(&self, kind: NodeKind) -> Node {
        Node::new(kind, self.current())
    }

    fn finish(&self, mut node: Node) -> Node {
        node.tokens.end = self.last_end.max(node.tokens.start);
        node
    }

    /// Wrap an already-parsed node as the first child of a new node.
    fn wrap(&self, kind: NodeKind, inner: Node) -> Node {
        let mut node = Node::new(kind, inner.tokens.start);
        node.push_node(inner);
        node
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            last_end: self.last_end,
            pending_gt: self.pending_gt,
            angle_depth: self.angle_depth,
            class_depth: self.class_depth,
        }
    }

    fn rewind(&mut self, cp: Checkpoint) {
        self.pos = cp.pos;
        self.last_end = cp.last_end;
        self.pending_gt = cp.pending_gt;
        self.angle_depth = cp.angle_depth;
        self.class_depth = cp.class_depth;
    }

    /// Run `f`, restoring the cursor if it fails.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let cp = self.checkpoint();
        let saw_method = self.saw_method;
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.rewind(cp);
                self.saw_method = saw_method;
                None
            }
        }
    }

    /// Whether `f` succeeds here; never consumes input.
    fn lookahead(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let cp = self.checkpoint();
        let saw_method = self.saw_method;
        let ok = f(self);
        self.rewind(cp);
        self.saw_method = saw_method;
        ok
    }

    // ---- errors ----

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            token: self.current(),
            message: message.into(),
        }
    }

    fn expected(&self, what: &str) -> ParseError {
        let found = match self.peek() {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.text()),
        };
        self.error(format!("expected {what}, found {found}"))
    }
}
