use swc_common::{sync::Lrc, BytePos, FileName, SourceFile, SourceMap};
use thiserror::Error;

/// The sketch was rejected by the lexer or the grammar.
///
/// `line` and `column` are 1-based and count characters of the text that was
/// tokenized (imports removed, unicode escaped).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column})")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Byte offset to line/column resolution over the lexed text.
pub(crate) struct Locator {
    source_map: Lrc<SourceMap>,
    file: Lrc<SourceFile>,
}

impl Locator {
    pub fn new(source: &str) -> Self {
        let source_map: Lrc<SourceMap> = Default::default();
        let file = source_map.new_source_file(
            Lrc::new(FileName::Custom("sketch".to_string())),
            source.to_string(),
        );
        Self { source_map, file }
    }

    pub fn error_at(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        let pos = BytePos(self.file.start_pos.0 + offset as u32);
        let loc = self.source_map.lookup_char_pos(pos);
        SyntaxError {
            line: loc.line,
            column: loc.col.0 + 1,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_line_and_column() {
        let locator = Locator::new("ab\ncd\n");
        let err = locator.error_at(4, "boom");
        assert_eq!((err.line, err.column), (2, 2));
        assert_eq!(err.to_string(), "boom (line 2, column 2)");
    }

    #[test]
    fn columns_count_characters() {
        let locator = Locator::new("é x");
        let err = locator.error_at(3, "x");
        assert_eq!((err.line, err.column), (1, 3));
    }

    #[test]
    fn first_offset_is_line_one_column_one() {
        let err = Locator::new("x").error_at(0, "x");
        assert_eq!((err.line, err.column), (1, 1));
    }
}
