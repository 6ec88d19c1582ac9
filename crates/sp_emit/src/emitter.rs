//! Tree-driven re-emission.
//!
//! The emitter keeps a cursor into the token stream. Before each tree leaf
//! is printed, every token between the cursor and the leaf (whitespace,
//! comments and copied punctuation) is printed verbatim, so the output keeps
//! the sketch's exact layout and line breaks. Rewrites only replace or
//! extend leaf text; they never add or remove newlines.

use std::io::{self, Write};

use sp_ast::{Element, Node, NodeKind, PreprocOptions, SyntaxTree};
use sp_lexer::{TokenKind, TokenStream};

/// Print `tree` to `out`, applying the host-language rewrites.
pub fn emit_tree<W: Write>(
    tree: &SyntaxTree,
    tokens: &TokenStream,
    options: &PreprocOptions,
    out: &mut W,
) -> io::Result<()> {
    let mut emitter = Emitter {
        tokens,
        options,
        out,
        cursor: 0,
        pending_insert: None,
    };
    emitter.node(&tree.root)?;
    emitter.flush_to(tokens.len())
}

struct Emitter<'a, W> {
    tokens: &'a TokenStream,
    options: &'a PreprocOptions,
    out: &'a mut W,
    /// Next token index not yet written.
    cursor: usize,
    /// Text written immediately before the given token.
    pending_insert: Option<(usize, &'static str)>,
}

impl<W: Write> Emitter<'_, W> {
    fn node(&mut self, node: &Node) -> io::Result<()> {
        match node.kind {
            NodeKind::MethodDecl => {
                self.implicit_public(node);
                self.children(node)
            }
            NodeKind::Literal => self.literal(node),
            NodeKind::ColorLiteral => self.color_literal(node),
            NodeKind::Type if self.options.color_datatype && self.is_color_type(node) => {
                self.type_alias(node)
            }
            NodeKind::CastCall => self.cast_call(node),
            _ => self.children(node),
        }
    }

    fn children(&mut self, node: &Node) -> io::Result<()> {
        for child in &node.children {
            match child {
                Element::Node(n) => self.node(n)?,
                Element::Token(t) => self.leaf(*t, None)?,
            }
        }
        Ok(())
    }

    /// Methods without an access modifier become `public`, inserted after
    /// any annotations.
    fn implicit_public(&mut self, node: &Node) {
        let Some(mods) = node.child(NodeKind::Modifiers) else {
            return;
        };
        if mods
            .token_children()
            .any(|t| self.tokens.kind(t).is_access())
        {
            return;
        }
        let anchor = mods
            .token_children()
            .next()
            .unwrap_or_else(|| self.tokens.next_visible(mods.tokens.end));
        self.pending_insert = Some((anchor, "public "));
    }

    fn literal(&mut self, node: &Node) -> io::Result<()> {
        for t in node.token_children() {
            let text = self.tokens.text(t);
            if self.options.substitute_floats
                && self.tokens.kind(t) == TokenKind::FloatLit
                && !text.ends_with(['f', 'F', 'd', 'D'])
            {
                let suffixed = format!("{text}f");
                self.leaf(t, Some(&suffixed))?;
            } else {
                self.leaf(t, None)?;
            }
        }
        Ok(())
    }

    /// `#CC0080` becomes `0xffcc0080`.
    fn color_literal(&mut self, node: &Node) -> io::Result<()> {
        for t in node.token_children() {
            let digits = self.tokens.text(t).trim_start_matches('#');
            let argb = format!("0xff{}", digits.to_ascii_lowercase());
            self.leaf(t, Some(&argb))?;
        }
        Ok(())
    }

    fn is_color_type(&self, node: &Node) -> bool {
        let mut leaves = node.token_children();
        matches!(
            (leaves.next(), leaves.next()),
            (Some(t), None) if self.tokens.text(t) == "color"
        )
    }

    /// `color` as a type is `int` in the host language.
    fn type_alias(&mut self, node: &Node) -> io::Result<()> {
        for child in &node.children {
            match child {
                Element::Token(t) => self.leaf(*t, Some("int"))?,
                Element::Node(n) => self.node(n)?,
            }
        }
        Ok(())
    }

    /// `int(x)` becomes `((int)(x))`; `color(x)` becomes `((int)(x))`.
    fn cast_call(&mut self, node: &Node) -> io::Result<()> {
        for child in &node.children {
            match child {
                Element::Token(t) => {
                    let target = match self.tokens.text(*t) {
                        "color" => "int",
                        name => name,
                    };
                    let open = format!("(({target})");
                    self.leaf(*t, Some(&open))?;
                }
                Element::Node(args) => {
                    self.node(args)?;
                    self.flush_to(args.tokens.end)?;
                    self.out.write_all(b")")?;
                }
            }
        }
        Ok(())
    }

    /// Write one leaf, preceded by everything the cursor has not reached.
    fn leaf(&mut self, index: usize, text: Option<&str>) -> io::Result<()> {
        self.flush_to(index)?;
        let original = self.tokens.text(index);
        self.write_token(index, text.unwrap_or(original))?;
        self.cursor = index + 1;
        Ok(())
    }

    /// Write tokens verbatim up to, not including, `end`.
    fn flush_to(&mut self, end: usize) -> io::Result<()> {
        let end = end.min(self.tokens.len());
        while self.cursor < end {
            let index = self.cursor;
            self.write_token(index, self.tokens.text(index))?;
            self.cursor += 1;
        }
        Ok(())
    }

    fn write_token(&mut self, index: usize, text: &str) -> io::Result<()> {
        if let Some((anchor, insert)) = self.pending_insert {
            if anchor == index {
                self.out.write_all(insert.as_bytes())?;
                self.pending_insert = None;
            }
        }
        self.out.write_all(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sp_parser::parse_sketch;

    use super::*;

    fn emit_with(source: &str, options: &PreprocOptions) -> String {
        let parsed = parse_sketch(source, options).unwrap();
        let mut out = Vec::new();
        emit_tree(&parsed.tree, &parsed.tokens, options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn emit(source: &str) -> String {
        emit_with(source, &PreprocOptions::default())
    }

    #[rstest]
    #[case("fill(#CC0080);\n", "fill(0xffcc0080);\n")]
    #[case("float x = 1.5;\n", "float x = 1.5f;\n")]
    #[case("float x = 1.5f + .5 + 2e3 + 1.0d;\n", "float x = 1.5f + .5f + 2e3f + 1.0d;\n")]
    #[case("int a = 10;\n", "int a = 10;\n")]
    #[case("int a = int(f);\n", "int a = ((int)(f));\n")]
    #[case("float a = float(i) / 2;\n", "float a = ((float)(i)) / 2;\n")]
    #[case("color c = color(v);\n", "int c = ((int)(v));\n")]
    #[case("color c = color(255, 0, 0);\n", "int c = color(255, 0, 0);\n")]
    #[case("color[] cs = new color[4];\n", "int[] cs = new int[4];\n")]
    #[case("String s = \"1.5 #CC0080\";\n", "String s = \"1.5 #CC0080\";\n")]
    fn rewrites_statements(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(emit(source), expected);
    }

    #[rstest]
    #[case("void draw() {}\n", "public void draw() {}\n")]
    #[case("static void f() {}\n", "public static void f() {}\n")]
    #[case("@Override\nvoid f() {}\n", "@Override\npublic void f() {}\n")]
    #[case("private void f() {}\n", "private void f() {}\n")]
    #[case("public void f() {}\n", "public void f() {}\n")]
    #[case("<T> T id(T t) { return t; }\n", "public <T> T id(T t) { return t; }\n")]
    fn methods_gain_public(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(emit(source), expected);
    }

    #[test]
    fn inner_class_methods_gain_public() {
        let source = "void setup() {}\nclass Ball {\n  Ball() {}\n  void move() {}\n}\n";
        let expected = "public void setup() {}\nclass Ball {\n  Ball() {}\n  public void move() {}\n}\n";
        assert_eq!(emit(source), expected);
    }

    #[test]
    fn comments_and_layout_survive() {
        let source = "// header\nvoid setup() {\n  /* a */ size(100,   100); // b\n\n}\n";
        let expected = "// header\npublic void setup() {\n  /* a */ size(100,   100); // b\n\n}\n";
        assert_eq!(emit(source), expected);
    }

    #[test]
    fn generics_are_printed_verbatim() {
        let source = "ArrayList<ArrayList<Integer>> xs = new ArrayList<ArrayList<Integer>>();\n";
        assert_eq!(emit(source), source);
    }

    #[test]
    fn disabled_rewrites_leave_text_alone() {
        let options = PreprocOptions {
            substitute_floats: false,
            color_datatype: false,
            ..PreprocOptions::default()
        };
        let source = "color c = 0;\nfloat f = 0.5;\n";
        assert_eq!(emit_with(source, &options), source);
    }

    #[test]
    fn output_keeps_line_count() {
        let source = "color c = #FF0000;\n\nvoid draw() {\n  float y = float(mouseY) * 0.5;\n}\n";
        let out = emit(source);
        assert_eq!(out.lines().count(), source.lines().count());
    }
}
