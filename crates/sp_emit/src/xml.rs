use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use sp_ast::{Element, Node, SyntaxTree};
use sp_lexer::{TokenClass, TokenStream};

/// Write the XML parse tree dump to `path`.
pub fn write_parse_tree(path: &Path, tree: &SyntaxTree, tokens: &TokenStream) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    render_parse_tree(tree, tokens, &mut out)?;
    out.flush()
}

/// Serialize `tree` as `<document>`-rooted XML.
///
/// Leaves are `<token>` elements. Text the emitter re-prints from the
/// token stream rather than the tree appears as `<hidden>` (whitespace and
/// comments) and `<copied>` (punctuation) elements at its position.
pub fn render_parse_tree<W: Write>(
    tree: &SyntaxTree,
    tokens: &TokenStream,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "<?xml version=\"1.0\"?>")?;
    writeln!(out, "<document mode=\"{}\">", tree.mode)?;
    let mut dump = Dump {
        tokens,
        out,
        cursor: 0,
    };
    dump.node(&tree.root, 1)?;
    dump.between(tokens.len(), 1)?;
    writeln!(dump.out, "</document>")
}

struct Dump<'a, W> {
    tokens: &'a TokenStream,
    out: &'a mut W,
    cursor: usize,
}

impl<W: Write> Dump<'_, W> {
    fn node(&mut self, node: &Node, depth: usize) -> io::Result<()> {
        let pad = "  ".repeat(depth);
        writeln!(self.out, "{pad}<node kind=\"{:?}\">", node.kind)?;
        for child in &node.children {
            match child {
                Element::Node(n) => self.node(n, depth + 1)?,
                Element::Token(t) => {
                    self.between(*t, depth + 1)?;
                    self.element("token", *t, depth + 1)?;
                    self.cursor = t + 1;
                }
            }
        }
        writeln!(self.out, "{pad}</node>")
    }

    /// Tokens from the cursor up to `end` that are not tree leaves.
    fn between(&mut self, end: usize, depth: usize) -> io::Result<()> {
        let end = end.min(self.tokens.len());
        while self.cursor < end {
            let name = match self.tokens.tokens()[self.cursor].class {
                TokenClass::Hidden => "hidden",
                TokenClass::Copied => "copied",
                TokenClass::Significant => "skipped",
            };
            if !self.tokens.text(self.cursor).is_empty() {
                self.element(name, self.cursor, depth)?;
            }
            self.cursor += 1;
        }
        Ok(())
    }

    fn element(&mut self, name: &str, index: usize, depth: usize) -> io::Result<()> {
        let pad = "  ".repeat(depth);
        writeln!(
            self.out,
            "{pad}<{name} kind=\"{:?}\">{}</{name}>",
            self.tokens.kind(index),
            escape(self.tokens.text(index))
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use sp_ast::PreprocOptions;
    use sp_parser::parse_sketch;

    use super::*;

    fn render(source: &str) -> String {
        let parsed = parse_sketch(source, &PreprocOptions::default()).unwrap();
        let mut out = Vec::new();
        render_parse_tree(&parsed.tree, &parsed.tokens, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn dump_is_a_document() {
        let xml = render("size(1, 2);\n");
        assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<document mode=\"static\">\n"));
        assert!(xml.ends_with("</document>\n"));
        assert!(xml.contains("<node kind=\"Root\">"));
        assert!(xml.contains("<node kind=\"MethodCall\">"));
        assert!(xml.contains("<token kind=\"Ident\">size</token>"));
        assert!(xml.contains("<copied kind=\"LParen\">(</copied>"));
        assert!(xml.contains("<hidden kind=\"Whitespace\">&#10;</hidden>"));
    }

    #[test]
    fn text_is_escaped() {
        let xml = render("boolean b = a < c && d;\n");
        assert!(xml.contains("<copied kind=\"Lt\">&lt;</copied>"));
        assert!(xml.contains("<token kind=\"AndAnd\">&amp;&amp;</token>"));
    }
}
