//! Mode-dependent text around the emitted sketch body.
//!
//! Every mode writes a two-line header, so the body always starts
//! `imports + 2` lines into the generated file.

use std::io::{self, Write};

use sp_ast::{PreprocOptions, ProgramMode};

/// Lines every header occupies.
pub const HEADER_LINES: usize = 2;

/// What a mode wraps around the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    /// Open a class extending the runtime, with a synthesized `main`.
    class: bool,
    /// Open an implicit `setup()` that runs the body once.
    setup: bool,
}

const LAYOUTS: [(ProgramMode, Layout); 3] = [
    (
        ProgramMode::Full,
        Layout {
            class: false,
            setup: false,
        },
    ),
    (
        ProgramMode::Active,
        Layout {
            class: true,
            setup: false,
        },
    ),
    (
        ProgramMode::Static,
        Layout {
            class: true,
            setup: true,
        },
    ),
];

fn layout(mode: ProgramMode) -> Layout {
    LAYOUTS
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, layout)| *layout)
        .unwrap_or(Layout {
            class: false,
            setup: false,
        })
}

/// Inputs to header and footer text, fixed for one run.
#[derive(Debug, Clone, Copy)]
pub struct Wrap<'a> {
    pub mode: ProgramMode,
    pub class_name: &'a str,
    /// The sketch declares its own top-level `main`.
    pub has_main: bool,
    pub options: &'a PreprocOptions,
}

impl Wrap<'_> {
    pub fn header(&self) -> Vec<String> {
        let layout = layout(self.mode);
        if !layout.class {
            return vec![String::new(), String::new()];
        }
        let class = format!(
            "public class {} extends {} {{",
            self.class_name, self.options.runtime_class
        );
        let second = if layout.setup {
            format!("{}public void setup() {{", self.options.indent())
        } else {
            String::new()
        };
        vec![class, second]
    }

    pub fn footer(&self) -> Vec<String> {
        let layout = layout(self.mode);
        let mut lines = Vec::new();
        if layout.setup {
            lines.push(format!("{}noLoop();", self.options.indent()));
            lines.push("}".to_string());
        }
        if layout.class {
            if !self.has_main {
                lines.extend(self.main());
            }
            lines.push("}".to_string());
        }
        lines
    }

    /// Entry point handing the class to the runtime's bootstrap.
    pub fn main(&self) -> Vec<String> {
        let indent = self.options.indent();
        let present = &self.options.present;

        let mut args = String::new();
        if present.full_screen {
            args.push_str("\"--present\", ");
            args.push_str(&format!("\"--bgcolor={}\", ", present.present_bgcolor));
            if present.show_stop {
                args.push_str(&format!("\"--stop-color={}\", ", present.stop_color));
            } else {
                args.push_str("\"--hide-stop\", ");
            }
        } else {
            args.push_str(&format!("\"--bgcolor={}\", ", present.window_bgcolor));
        }

        vec![
            format!("{indent}static public void main(String args[]) {{"),
            format!(
                "{indent}{indent}{}.main(new String[] {{ {args}\"{}\" }});",
                self.options.runtime_class, self.class_name
            ),
            format!("{indent}}}"),
        ]
    }
}

/// Write each line followed by a newline; returns the line count.
pub fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<usize> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn wrap(mode: ProgramMode, has_main: bool, options: &PreprocOptions) -> Wrap<'_> {
        Wrap {
            mode,
            class_name: "Sketch",
            has_main,
            options,
        }
    }

    #[rstest]
    #[case(ProgramMode::Full, false, 0)]
    #[case(ProgramMode::Full, true, 0)]
    #[case(ProgramMode::Active, false, 4)]
    #[case(ProgramMode::Active, true, 1)]
    #[case(ProgramMode::Static, false, 6)]
    #[case(ProgramMode::Static, true, 3)]
    fn line_counts_depend_only_on_mode(
        #[case] mode: ProgramMode,
        #[case] has_main: bool,
        #[case] footer: usize,
    ) {
        let options = PreprocOptions::default();
        let w = wrap(mode, has_main, &options);
        assert_eq!(w.header().len(), HEADER_LINES);
        assert_eq!(w.footer().len(), footer);
    }

    #[test]
    fn static_header_opens_setup() {
        let options = PreprocOptions::default();
        assert_eq!(
            wrap(ProgramMode::Static, false, &options).header(),
            vec!["public class Sketch extends PApplet {", "  public void setup() {"]
        );
        assert_eq!(
            wrap(ProgramMode::Active, false, &options).header(),
            vec!["public class Sketch extends PApplet {", ""]
        );
    }

    #[test]
    fn windowed_main_passes_background() {
        let options = PreprocOptions::default();
        assert_eq!(
            wrap(ProgramMode::Active, false, &options).footer(),
            vec![
                "  static public void main(String args[]) {",
                "    PApplet.main(new String[] { \"--bgcolor=#DFDFDF\", \"Sketch\" });",
                "  }",
                "}",
            ]
        );
    }

    #[test]
    fn full_screen_main_hides_stop() {
        let mut options = PreprocOptions::default();
        options.present.full_screen = true;
        options.present.show_stop = false;
        let main = wrap(ProgramMode::Static, false, &options).main();
        assert_eq!(
            main[1],
            "    PApplet.main(new String[] { \"--present\", \"--bgcolor=#666666\", \"--hide-stop\", \"Sketch\" });"
        );

        options.present.show_stop = true;
        let main = wrap(ProgramMode::Static, false, &options).main();
        assert!(main[1].contains("\"--stop-color=#cccccc\", \"Sketch\""));
    }
}
