//! Import statement extraction.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::scrub;

/// `import` at line start or after a semicolon. Group 1..=3 is the span that
/// gets deleted; group 2 is the imported name, `static` prefix included.
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^|;)\s*(import\s+)((?:static\s+)?\S+)(\s*;)")
        .expect("import pattern is valid")
});

/// A sketch and its scrubbed twin, kept offset-compatible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProgram {
    text: String,
    scrubbed: String,
}

impl SourceProgram {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let scrubbed = scrub(&text);
        Self { text, scrubbed }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scrubbed(&self) -> &str {
        &self.scrubbed
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Delete the same byte range from both copies.
    fn remove(&mut self, range: Range<usize>) {
        self.text.replace_range(range.clone(), "");
        self.scrubbed.replace_range(range, "");
    }
}

/// Remove every import statement, returning imported names in source order.
///
/// Matching runs on the scrubbed copy, so imports inside comments or strings
/// are ignored. Malformed imports are left in place for the parser to report.
pub fn extract_imports(program: &mut SourceProgram) -> Vec<String> {
    let mut imports = Vec::new();

    loop {
        let Some(caps) = IMPORT_RE.captures(&program.scrubbed) else {
            break;
        };
        let (Some(head), Some(name), Some(tail)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            break;
        };
        let span = head.start()..tail.end();

        imports.push(program.text[name.range()].to_string());
        program.remove(span);
    }

    imports
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn strips_imports_and_keeps_lines() {
        let mut program =
            SourceProgram::new("import java.util.*;\nimport foo.Bar ;\nvoid setup() {}\n");
        let imports = extract_imports(&mut program);
        assert_eq!(imports, vec!["java.util.*", "foo.Bar"]);
        assert_eq!(program.text(), "\n\nvoid setup() {}\n");
        assert_eq!(program.text().len(), program.scrubbed().len());
    }

    #[test]
    fn import_after_semicolon_on_same_line() {
        let mut program = SourceProgram::new("int x = 1; import a.b.C;\n");
        let imports = extract_imports(&mut program);
        assert_eq!(imports, vec!["a.b.C"]);
        assert_eq!(program.text(), "int x = 1; \n");
    }

    #[test]
    fn commented_and_quoted_imports_are_ignored() {
        let source = "// import a.b;\n/* import c.d; */\nString s = \"import e.f;\";\n";
        let mut program = SourceProgram::new(source);
        assert!(extract_imports(&mut program).is_empty());
        assert_eq!(program.text(), source);
    }

    #[test]
    fn duplicates_are_preserved() {
        let mut program = SourceProgram::new("import a.*;\nimport a.*;\n");
        assert_eq!(extract_imports(&mut program), vec!["a.*", "a.*"]);
    }

    #[test]
    fn static_import() {
        let mut program = SourceProgram::new("import static java.lang.Math.*;\n");
        assert_eq!(extract_imports(&mut program), vec!["static java.lang.Math.*"]);
        assert_eq!(program.text(), "\n");
    }

    #[test]
    fn malformed_import_is_left_alone() {
        let mut program = SourceProgram::new("import ;\nimport foo\n");
        assert!(extract_imports(&mut program).is_empty());
        assert_eq!(program.text(), "import ;\nimport foo\n");
    }

    proptest! {
        #[test]
        fn extraction_is_idempotent(
            lines in proptest::collection::vec(
                prop_oneof![
                    Just("import a.b.*;".to_string()),
                    Just("// import c.d;".to_string()),
                    Just("int x = 1; import e.F;".to_string()),
                    "[a-z(); ]{0,12}",
                ],
                0..8,
            )
        ) {
            let mut program = SourceProgram::new(lines.join("\n"));
            extract_imports(&mut program);
            prop_assert_eq!(program.text().len(), program.scrubbed().len());
            let before = program.clone();
            prop_assert!(extract_imports(&mut program).is_empty());
            prop_assert_eq!(program, before);
        }
    }
}
