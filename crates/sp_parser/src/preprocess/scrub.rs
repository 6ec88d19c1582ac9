//! Comment and string masking.
//!
//! The scrubbed copy has the same byte length and the same newline
//! positions as the input, so any offset found in it is valid in the
//! original.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Literal(char),
}

/// Mask comments and string/char literal contents with spaces.
///
/// Comment delimiters are masked too; literal quotes are kept. Newlines are
/// never masked. An unterminated block comment masks through end of input.
pub fn scrub(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match state {
            State::Code => match (c, next) {
                ('/', Some('/')) => {
                    state = State::LineComment;
                    out.push_str("  ");
                    i += 2;
                    continue;
                }
                ('/', Some('*')) => {
                    state = State::BlockComment;
                    out.push_str("  ");
                    i += 2;
                    continue;
                }
                ('"', _) | ('\'', _) => {
                    state = State::Literal(c);
                    out.push(c);
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
                blank(&mut out, c);
            }
            State::BlockComment => {
                if c == '*' && next == Some('/') {
                    state = State::Code;
                    out.push_str("  ");
                    i += 2;
                    continue;
                }
                blank(&mut out, c);
            }
            State::Literal(quote) => {
                if c == '\\' {
                    blank(&mut out, c);
                    if let Some(escaped) = next {
                        blank(&mut out, escaped);
                        i += 2;
                        continue;
                    }
                } else if c == quote {
                    state = State::Code;
                    out.push(c);
                } else if c == '\n' {
                    // unterminated literal; the lexer reports it
                    state = State::Code;
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
            }
        }
        i += 1;
    }

    out
}

fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        for _ in 0..c.len_utf8() {
            out.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn masks_line_comment() {
        assert_eq!(scrub("a; // import x;\nb;"), format!("a;{}\nb;", " ".repeat(13)));
    }

    #[test]
    fn masks_block_comment_across_lines() {
        let input = "x /* one\ntwo */ y";
        let out = scrub(input);
        assert_eq!(out, "x       \n       y");
    }

    #[test]
    fn keeps_literal_quotes() {
        assert_eq!(scrub(r#"s = "import a;";"#), r#"s = "         ";"#);
        assert_eq!(scrub(r"c = '\'';"), "c = '  ';");
    }

    #[test]
    fn escaped_quote_does_not_end_literal() {
        assert_eq!(scrub(r#""a\"b" c"#), r#""    " c"#);
    }

    #[test]
    fn unterminated_block_comment_masks_to_end() {
        assert_eq!(scrub("a /* b\nc"), "a     \n ");
    }

    #[test]
    fn multibyte_characters_keep_byte_length() {
        let input = "// café\nx";
        let out = scrub(input);
        assert_eq!(out.len(), input.len());
        assert!(out.ends_with("\nx"));
    }

    proptest! {
        #[test]
        fn scrub_preserves_length_and_newlines(source in "[a-z /*\"'\\\\\n;é]{0,80}") {
            let out = scrub(&source);
            prop_assert_eq!(out.len(), source.len());
            let newlines = |s: &str| -> Vec<usize> {
                s.bytes().enumerate().filter(|(_, b)| *b == b'\n').map(|(i, _)| i).collect()
            };
            prop_assert_eq!(newlines(&out), newlines(&source));
        }
    }
}
