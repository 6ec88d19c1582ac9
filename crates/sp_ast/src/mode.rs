use serde::{Deserialize, Serialize};

/// Structural shape of a sketch, decided once before emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramMode {
    /// No method declarations; the body becomes an implicit `setup()`.
    Static,
    /// Top-level fields and methods, wrapped in a synthesized class.
    Active,
    /// A complete compilation unit, passed through without wrapping.
    Full,
}

impl ProgramMode {
    /// Whether the emitted body is wrapped in a synthesized class.
    pub fn is_wrapped(self) -> bool {
        !matches!(self, ProgramMode::Full)
    }
}

impl std::fmt::Display for ProgramMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramMode::Static => write!(f, "static"),
            ProgramMode::Active => write!(f, "active"),
            ProgramMode::Full => write!(f, "full"),
        }
    }
}
