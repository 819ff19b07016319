//! Target languages.

use crate::table::{CPP_TABLE, HASKELL_TABLE, RUST_TABLE, TypeTable};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Language that bindings are generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetLanguage {
    /// Rust modules.
    #[default]
    Rust,
    /// Haskell modules.
    Haskell,
    /// C++ headers.
    Cpp,
}

impl TargetLanguage {
    /// All supported targets.
    pub const ALL: [Self; 3] = [Self::Rust, Self::Haskell, Self::Cpp];

    /// Returns the target name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Haskell => "haskell",
            Self::Cpp => "cpp",
        }
    }

    /// Returns the directory below the output root that units are written to.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        self.name()
    }

    /// Returns the file extension of generated units.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Rust => "rs",
            Self::Haskell => "hs",
            Self::Cpp => "h",
        }
    }

    /// Returns the type table of the target.
    #[must_use]
    pub const fn type_table(self) -> &'static TypeTable {
        match self {
            Self::Rust => &RUST_TABLE,
            Self::Haskell => &HASKELL_TABLE,
            Self::Cpp => &CPP_TABLE,
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown target language name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target language '{name}' (expected rust, haskell or cpp)")]
pub struct ParseTargetError {
    /// Name as given.
    pub name: String,
}

impl FromStr for TargetLanguage {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "haskell" | "hs" => Ok(Self::Haskell),
            "cpp" | "c++" => Ok(Self::Cpp),
            _ => Err(ParseTargetError {
                name: s.to_string(),
            }),
        }
    }
}
