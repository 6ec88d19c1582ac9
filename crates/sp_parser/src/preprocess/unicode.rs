use std::borrow::Cow;

const NBSP: char = '\u{a0}';

/// Replace non-ASCII characters with `\uXXXX` escapes.
///
/// Non-breaking spaces become plain spaces. Characters outside the basic
/// multilingual plane are written as two escapes, one per UTF-16 unit.
/// Pure ASCII input is returned borrowed.
pub fn substitute_unicode(source: &str) -> Cow<'_, str> {
    let wide = source.chars().filter(|c| !c.is_ascii()).count();
    if wide == 0 {
        return Cow::Borrowed(source);
    }

    let mut out = String::with_capacity(source.len() + wide * 5);
    let mut units = [0u16; 2];
    for c in source.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if c == NBSP {
            out.push(' ');
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a\u{a0}b", "a b")]
    #[case("caf\u{e9}", "caf\\u00e9")]
    #[case("\u{3b1}", "\\u03b1")]
    #[case("\u{1f600}", "\\ud83d\\ude00")]
    #[case("x\ny\u{e9}\n", "x\ny\\u00e9\n")]
    fn escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(substitute_unicode(input), expected);
    }

    #[test]
    fn ascii_is_borrowed() {
        let input = "void setup() {}\n";
        assert!(matches!(substitute_unicode(input), Cow::Borrowed(s) if s == input));
    }
}
