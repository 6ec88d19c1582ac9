//! One preprocessing run, from sketch text to a host-language file.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use sp_ast::{PreprocOptions, ProgramMode};
use sp_parser::parse_sketch;
use sp_parser::preprocess::{extract_imports, substitute_unicode, SourceProgram};
use tracing::{debug, info, warn};

use crate::emitter::emit_tree;
use crate::error::PreprocessError;
use crate::imports::ImportSet;
use crate::wrapper::{write_lines, Wrap, HEADER_LINES};
use crate::xml::write_parse_tree;

/// File name of the optional parse tree dump, inside the output directory.
pub const PARSE_TREE_FILE: &str = "parseTree.xml";

/// What the caller hands over for one sketch.
#[derive(Debug, Clone, Default)]
pub struct SketchInput {
    pub source: String,
    pub output_dir: PathBuf,
    /// Base name of the output file, and the class name outside full mode.
    pub name: String,
    /// Packages of pre-compiled helper classes; each is imported as `pkg.*`.
    pub code_folder_packages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessOutput {
    pub class_name: String,
    pub path: PathBuf,
    pub mode: ProgramMode,
    /// Lines written before the first body line.
    pub header_offset: usize,
    pub user_imports: Vec<String>,
    /// Location of the XML dump, when one was written.
    pub parse_tree: Option<PathBuf>,
}

/// Runs the pipeline with one fixed preference snapshot.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    options: PreprocOptions,
}

impl Preprocessor {
    pub fn new(options: PreprocOptions) -> Self {
        Self { options }
    }

    pub fn preprocess(&self, input: SketchInput) -> Result<PreprocessOutput, PreprocessError> {
        let mut state = PipelineState::new(self.options.clone(), input);
        state.write_prefix()?;
        state.write()
    }
}

/// Per-run state. A fresh value is built for every sketch, so nothing
/// carries over between runs.
pub struct PipelineState {
    options: PreprocOptions,
    input: SketchInput,
    path: PathBuf,
    /// Import-free sketch text, once the prefix has been written.
    program: Option<String>,
    user_imports: Vec<String>,
    header_offset: usize,
    out: Option<BufWriter<File>>,
}

impl PipelineState {
    pub fn new(options: PreprocOptions, input: SketchInput) -> Self {
        let path = input
            .output_dir
            .join(format!("{}.{}", input.name, options.host_extension));
        Self {
            options,
            input,
            path,
            program: None,
            user_imports: Vec::new(),
            header_offset: 0,
            out: None,
        }
    }

    /// Strip imports from the sketch, create the output file and write the
    /// import block. Returns the header offset: import lines plus the two
    /// header lines that [`PipelineState::write`] adds.
    pub fn write_prefix(&mut self) -> Result<usize, PreprocessError> {
        let mut source = SourceProgram::new(format!("{}\n", self.input.source));
        self.user_imports = extract_imports(&mut source);
        let mut program = source.into_text();
        if self.options.substitute_unicode {
            if let Cow::Owned(escaped) = substitute_unicode(&program) {
                program = escaped;
            }
        }
        debug!(imports = self.user_imports.len(), "extracted imports");

        let file = File::create(&self.path).map_err(|e| PreprocessError::io(&self.path, e))?;
        let mut out = BufWriter::new(file);
        let imports = ImportSet::new(
            &self.options,
            &self.user_imports,
            &self.input.code_folder_packages,
        );
        let lines = imports
            .write(&mut out)
            .map_err(|e| PreprocessError::io(&self.path, e))?;

        self.header_offset = lines + HEADER_LINES;
        self.program = Some(program);
        self.out = Some(out);
        Ok(self.header_offset)
    }

    /// Parse the sketch and write header, body and footer. The output file
    /// is removed if the sketch cannot be parsed, named or written.
    pub fn write(mut self) -> Result<PreprocessOutput, PreprocessError> {
        if self.out.is_none() {
            self.write_prefix()?;
        }
        let program = self.program.take().unwrap_or_default();
        let Some(mut out) = self.out.take() else {
            return Err(PreprocessError::io(
                &self.path,
                std::io::Error::other("output file was not opened"),
            ));
        };

        let parsed = match parse_sketch(&program, &self.options) {
            Ok(parsed) => parsed,
            Err(e) => {
                drop(out);
                self.discard();
                return Err(e.into());
            }
        };
        let mode = parsed.mode();

        let class_name = if mode.is_wrapped() {
            self.input.name.clone()
        } else {
            match parsed.first_type_name() {
                Some(name) => name.to_string(),
                None => {
                    drop(out);
                    self.discard();
                    return Err(PreprocessError::UnrecognizedStructure);
                }
            }
        };

        let wrap = Wrap {
            mode,
            class_name: &class_name,
            has_main: parsed.has_main(),
            options: &self.options,
        };
        let written = (|| -> io::Result<()> {
            write_lines(&mut out, &wrap.header())?;
            emit_tree(&parsed.tree, &parsed.tokens, &self.options, &mut out)?;
            write_lines(&mut out, &wrap.footer())?;
            out.flush()
        })();
        if let Err(e) = written {
            drop(out);
            self.discard();
            return Err(PreprocessError::io(&self.path, e));
        }
        info!(
            class = %class_name,
            %mode,
            offset = self.header_offset,
            path = %self.path.display(),
            "wrote sketch"
        );

        let parse_tree = if self.options.output_parse_tree {
            let dump = self.input.output_dir.join(PARSE_TREE_FILE);
            match write_parse_tree(&dump, &parsed.tree, &parsed.tokens) {
                Ok(()) => Some(dump),
                Err(e) => {
                    warn!(path = %dump.display(), error = %e, "could not write parse tree");
                    None
                }
            }
        } else {
            None
        };

        Ok(PreprocessOutput {
            class_name,
            path: self.path,
            mode,
            header_offset: self.header_offset,
            user_imports: self.user_imports,
            parse_tree,
        })
    }

    fn discard(&self) {
        debug!(path = %self.path.display(), "removing partial output");
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not remove partial output");
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn input(dir: &TempDir, source: &str) -> SketchInput {
        SketchInput {
            source: source.to_string(),
            output_dir: dir.path().to_path_buf(),
            name: "Sketch".to_string(),
            code_folder_packages: Vec::new(),
        }
    }

    fn no_default_imports() -> PreprocOptions {
        PreprocOptions {
            default_imports: String::new(),
            ..PreprocOptions::default()
        }
    }

    #[test]
    fn active_sketch_is_wrapped_with_main() {
        let dir = TempDir::new().unwrap();
        let source = "void setup() { size(100,100); }\nvoid draw() { background(0); }";
        let output = Preprocessor::new(no_default_imports())
            .preprocess(input(&dir, source))
            .unwrap();

        assert_eq!(output.mode, ProgramMode::Active);
        assert_eq!(output.class_name, "Sketch");
        assert_eq!(output.header_offset, 5);
        assert_eq!(output.path, dir.path().join("Sketch.java"));

        let text = fs::read_to_string(&output.path).unwrap();
        assert_eq!(
            text,
            "import processing.core.*;\n\
             import processing.xml.*;\n\
             \n\
             public class Sketch extends PApplet {\n\
             \n\
             public void setup() { size(100,100); }\n\
             public void draw() { background(0); }\n\
             \x20 static public void main(String args[]) {\n\
             \x20   PApplet.main(new String[] { \"--bgcolor=#DFDFDF\", \"Sketch\" });\n\
             \x20 }\n\
             }\n"
        );
        let body_line = text.lines().position(|l| l.contains("setup")).unwrap();
        assert_eq!(body_line, output.header_offset);
    }

    #[test]
    fn static_sketch_runs_once() {
        let dir = TempDir::new().unwrap();
        let output = Preprocessor::new(no_default_imports())
            .preprocess(input(&dir, "ellipse(50, 50, 80, 80);\n"))
            .unwrap();
        assert_eq!(output.mode, ProgramMode::Static);

        let text = fs::read_to_string(&output.path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "public class Sketch extends PApplet {");
        assert_eq!(lines[4], "  public void setup() {");
        assert_eq!(lines[5], "ellipse(50, 50, 80, 80);");
        assert!(text.contains("  noLoop();\n}\n  static public void main"));
        assert!(text.ends_with("  }\n}\n"));
    }

    #[test]
    fn full_sketch_names_class_from_source() {
        let dir = TempDir::new().unwrap();
        let source = "import java.util.List;\npublic class Other extends PApplet {\n  public void setup() {}\n}\n";
        let output = Preprocessor::new(no_default_imports())
            .preprocess(input(&dir, source))
            .unwrap();
        assert_eq!(output.mode, ProgramMode::Full);
        assert_eq!(output.class_name, "Other");
        assert_eq!(output.user_imports, vec!["java.util.List"]);
        assert_eq!(output.header_offset, 7);

        let text = fs::read_to_string(&output.path).unwrap();
        assert!(text.starts_with(
            "import processing.core.*;\nimport processing.xml.*;\n\nimport java.util.List;\n\n\n\n\npublic class Other"
        ));
        assert!(!text.contains("main("));
    }

    #[test]
    fn syntax_error_removes_output() {
        let dir = TempDir::new().unwrap();
        let err = Preprocessor::default()
            .preprocess(input(&dir, "void setup() { "))
            .unwrap_err();
        match err {
            PreprocessError::Syntax(e) => assert_eq!(e.line, 1),
            other => panic!("expected syntax error, got {other:?}"),
        }
        assert!(!dir.path().join("Sketch.java").exists());
    }

    #[test]
    fn missing_output_dir_fails_before_parsing() {
        let dir = TempDir::new().unwrap();
        let mut sketch = input(&dir, "void setup() { ");
        sketch.output_dir = dir.path().join("missing");
        let err = Preprocessor::default().preprocess(sketch).unwrap_err();
        assert!(matches!(err, PreprocessError::Io { .. }));
    }

    #[test]
    fn explicit_main_is_not_duplicated() {
        let dir = TempDir::new().unwrap();
        let source = "void setup() {}\nstatic public void main(String[] a) { PApplet.main(a); }\n";
        let output = Preprocessor::default()
            .preprocess(input(&dir, source))
            .unwrap();
        let text = fs::read_to_string(&output.path).unwrap();
        assert_eq!(text.matches("void main(").count(), 1);
    }

    #[test]
    fn prefix_offset_matches_written_imports() {
        let dir = TempDir::new().unwrap();
        let mut sketch = input(&dir, "import a.B;\nline(0, 0, 1, 1);\n");
        sketch.code_folder_packages = vec!["lib".to_string()];
        let mut state = PipelineState::new(PreprocOptions::default(), sketch);
        // core 2+1, user 1+1, code folder 1+1, default 13+1, header 2
        assert_eq!(state.write_prefix().unwrap(), 23);
        let output = state.write().unwrap();
        let text = fs::read_to_string(&output.path).unwrap();
        assert_eq!(text.lines().nth(23), Some(""));
        assert_eq!(text.lines().nth(24), Some("line(0, 0, 1, 1);"));
    }

    #[test]
    fn unicode_is_escaped_after_import_removal() {
        let dir = TempDir::new().unwrap();
        let output = Preprocessor::new(no_default_imports())
            .preprocess(input(&dir, "println(\"caf\u{e9}\u{a0}\");\n"))
            .unwrap();
        let text = fs::read_to_string(&output.path).unwrap();
        assert!(text.contains("println(\"caf\\u00e9 \");"));
    }

    #[test]
    fn parse_tree_dump_is_optional() {
        let dir = TempDir::new().unwrap();
        let options = PreprocOptions {
            output_parse_tree: true,
            ..PreprocOptions::default()
        };
        let output = Preprocessor::new(options)
            .preprocess(input(&dir, "rect(0, 0, 5, 5);\n"))
            .unwrap();
        let dump = output.parse_tree.unwrap();
        assert_eq!(dump, dir.path().join(PARSE_TREE_FILE));
        assert!(fs::read_to_string(dump).unwrap().contains("<document"));
    }

    #[test]
    fn unnamed_full_sketch_is_unrecognized() {
        let dir = TempDir::new().unwrap();
        let err = Preprocessor::default()
            .preprocess(input(&dir, "package a.b;\n"))
            .unwrap_err();
        assert!(matches!(err, PreprocessError::UnrecognizedStructure));
        assert!(!dir.path().join("Sketch.java").exists());
    }

    #[test]
    fn failed_parse_tree_dump_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(PARSE_TREE_FILE)).unwrap();
        let options = PreprocOptions {
            output_parse_tree: true,
            ..PreprocOptions::default()
        };
        let output = Preprocessor::new(options)
            .preprocess(input(&dir, "rect(0, 0, 5, 5);\n"))
            .unwrap();
        assert_eq!(output.parse_tree, None);
        assert!(output.path.exists());
    }

    #[test]
    fn failed_body_write_removes_output() {
        let dir = TempDir::new().unwrap();
        let mut state = PipelineState::new(no_default_imports(), input(&dir, "rect(0, 0, 5, 5);\n"));
        state.write_prefix().unwrap();
        // a read-only handle makes the final flush fail
        state.out = Some(BufWriter::new(File::open(&state.path).unwrap()));
        let err = state.write().unwrap_err();
        assert!(matches!(err, PreprocessError::Io { .. }));
        assert!(!dir.path().join("Sketch.java").exists());
    }
}
