use serde::{Deserialize, Serialize};

const DEFAULT_IMPORTS: &str = "java.applet.*,java.awt.Dimension,java.awt.Frame,\
java.awt.event.MouseEvent,java.awt.event.KeyEvent,java.awt.event.FocusEvent,\
java.awt.Image,java.io.*,java.net.*,java.text.*,java.util.*,java.util.zip.*,\
java.util.regex.*";

/// Preference snapshot read once at the start of each preprocessing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocOptions {
    /// Width of one indent level in the synthesized wrapper.
    pub indent_width: usize,
    /// Rewrite non-ASCII characters into `\uXXXX` escapes.
    pub substitute_unicode: bool,
    /// Suffix unsuffixed floating-point literals with `f`.
    pub substitute_floats: bool,
    /// Rewrite `int(x)` style cast-calls into host casts.
    pub enhanced_casting: bool,
    /// Emit the `color` type as `int`.
    pub color_datatype: bool,
    /// Accept `#RRGGBB` literals.
    pub web_colors: bool,
    /// Write `parseTree.xml` next to the generated source.
    pub output_parse_tree: bool,
    /// Extension of the generated source file.
    pub host_extension: String,
    /// Runtime base class every wrapped sketch extends.
    pub runtime_class: String,
    /// Imports always emitted first.
    pub core_imports: Vec<String>,
    /// Comma/space separated list emitted after the code folder imports.
    pub default_imports: String,
    pub present: PresentOptions,
}

impl PreprocOptions {
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_width)
    }

    /// Splits `default_imports` on commas and spaces, dropping empty items.
    pub fn default_import_list(&self) -> Vec<String> {
        self.default_imports
            .split(|c| c == ',' || c == ' ')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for PreprocOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            substitute_unicode: true,
            substitute_floats: true,
            enhanced_casting: true,
            color_datatype: true,
            web_colors: true,
            output_parse_tree: false,
            host_extension: "java".to_string(),
            runtime_class: "PApplet".to_string(),
            core_imports: vec!["processing.core.*".to_string(), "processing.xml.*".to_string()],
            default_imports: DEFAULT_IMPORTS.to_string(),
            present: PresentOptions::default(),
        }
    }
}

/// Launch preferences consumed only by `main` synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentOptions {
    pub full_screen: bool,
    pub present_bgcolor: String,
    pub window_bgcolor: String,
    /// Show the stop button in full screen; `false` hides it.
    pub show_stop: bool,
    pub stop_color: String,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            full_screen: false,
            present_bgcolor: "#666666".to_string(),
            window_bgcolor: "#DFDFDF".to_string(),
            show_stop: true,
            stop_color: "#cccccc".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_import_list_splits_commas_and_spaces() {
        let opts = PreprocOptions {
            default_imports: "java.io.*, java.util.*,,java.net.* ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            opts.default_import_list(),
            vec!["java.io.*", "java.util.*", "java.net.*"]
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: PreprocOptions =
            serde_json::from_str(r#"{ "indent_width": 4, "present": { "full_screen": true } }"#)
                .unwrap();
        assert_eq!(opts.indent(), "    ");
        assert!(opts.present.full_screen);
        assert_eq!(opts.present.present_bgcolor, "#666666");
        assert_eq!(opts.runtime_class, "PApplet");
    }
}
