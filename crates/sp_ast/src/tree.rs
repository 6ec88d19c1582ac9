//! Concrete syntax tree produced by the sketch parser.
//!
//! Nodes do not own text. Every node records the half-open range of token
//! indices it covers, and its children are either nested nodes or indices of
//! significant tokens. Copied punctuation (braces, parens, semicolons, angle
//! brackets) is consumed by the parser but only reachable through the token
//! ranges, which is how the emitter re-emits it alongside hidden text.

use std::ops::Range;

use serde::Serialize;

use crate::ProgramMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    /// Synthetic entry point wrapping the real program node.
    Root,
    CompilationUnit,
    ActiveProgram,
    StaticProgram,

    PackageDecl,
    ClassDecl,
    InterfaceDecl,
    EnumDecl,
    AnnotationDecl,
    ClassBody,
    EnumConstant,
    FieldDecl,
    MethodDecl,
    ConstructorDecl,
    Initializer,
    Modifiers,
    Annotation,
    TypeParams,
    TypeParam,
    Extends,
    Implements,
    Throws,
    Params,
    Param,
    VarDeclarator,
    Dims,

    Type,
    TypeArgs,
    Wildcard,

    Block,
    LocalVarDecl,
    LocalClassDecl,
    If,
    For,
    ForEach,
    ForInit,
    ForUpdate,
    While,
    Do,
    Try,
    Catch,
    Finally,
    Switch,
    SwitchCase,
    Return,
    Break,
    Continue,
    Throw,
    Synchronized,
    Labeled,
    Assert,
    ExprStmt,
    Empty,

    Assign,
    Conditional,
    Binary,
    InstanceOf,
    Prefix,
    Postfix,
    Cast,
    /// `int(x)` style cast written as a call.
    CastCall,
    Paren,
    Literal,
    /// `#RRGGBB` web color.
    ColorLiteral,
    Name,
    FieldAccess,
    MethodCall,
    Args,
    Index,
    New,
    ArrayCreation,
    ArrayInit,
    ClassLiteral,
    This,
    Super,
}

impl NodeKind {
    pub fn is_type_decl(self) -> bool {
        matches!(
            self,
            NodeKind::ClassDecl
                | NodeKind::InterfaceDecl
                | NodeKind::EnumDecl
                | NodeKind::AnnotationDecl
        )
    }
}

/// A child of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Node(Node),
    Token(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Token indices covered by this node; empty for empty productions.
    pub tokens: Range<usize>,
    pub children: Vec<Element>,
}

impl Node {
    pub fn new(kind: NodeKind, start: usize) -> Self {
        Self {
            kind,
            tokens: start..start,
            children: Vec::new(),
        }
    }

    pub fn push_node(&mut self, node: Node) {
        self.children.push(Element::Node(node));
    }

    pub fn push_token(&mut self, index: usize) {
        self.children.push(Element::Token(index));
    }

    /// Child nodes in source order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|c| match c {
            Element::Node(n) => Some(n),
            Element::Token(_) => None,
        })
    }

    /// Direct token children in source order.
    pub fn token_children(&self) -> impl Iterator<Item = usize> + '_ {
        self.children.iter().filter_map(|c| match c {
            Element::Token(t) => Some(*t),
            Element::Node(_) => None,
        })
    }

    pub fn child(&self, kind: NodeKind) -> Option<&Node> {
        self.nodes().find(|n| n.kind == kind)
    }

    /// Pre-order traversal including `self`.
    pub fn descendants(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children: Vec<&Node> = node.nodes().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

/// Parse result for one invocation, torn down after emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxTree {
    pub mode: ProgramMode,
    pub root: Node,
}

impl SyntaxTree {
    /// Wraps the real program node in the synthetic root.
    pub fn new(mode: ProgramMode, program: Node) -> Self {
        let mut root = Node::new(NodeKind::Root, program.tokens.start);
        root.tokens = program.tokens.clone();
        root.push_node(program);
        Self { mode, root }
    }

    /// The real parse root.
    pub fn program(&self) -> &Node {
        match self.root.children.first() {
            Some(Element::Node(n)) => n,
            _ => &self.root,
        }
    }

    /// Top-level declarations and statements of the program node.
    pub fn top_level(&self) -> impl Iterator<Item = &Node> {
        self.program().nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: NodeKind, at: usize) -> Node {
        let mut n = Node::new(kind, at);
        n.tokens = at..at + 1;
        n.push_token(at);
        n
    }

    #[test]
    fn root_has_single_program_child() {
        let mut program = Node::new(NodeKind::StaticProgram, 0);
        program.push_node(leaf(NodeKind::ExprStmt, 0));
        program.push_node(leaf(NodeKind::ExprStmt, 2));
        program.tokens = 0..3;

        let tree = SyntaxTree::new(ProgramMode::Static, program);
        assert_eq!(tree.root.kind, NodeKind::Root);
        assert_eq!(tree.root.children.len(), 1);
        assert_eq!(tree.program().kind, NodeKind::StaticProgram);
        assert_eq!(tree.top_level().count(), 2);
    }

    #[test]
    fn descendants_are_preorder() {
        let mut inner = Node::new(NodeKind::Block, 1);
        inner.push_node(leaf(NodeKind::Empty, 2));
        let mut outer = Node::new(NodeKind::MethodDecl, 0);
        outer.push_node(leaf(NodeKind::Modifiers, 0));
        outer.push_node(inner);

        let kinds: Vec<NodeKind> = outer.descendants().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::MethodDecl,
                NodeKind::Modifiers,
                NodeKind::Block,
                NodeKind::Empty
            ]
        );
    }
}
