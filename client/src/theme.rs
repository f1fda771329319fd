//! Theme enumeration and its storage literals.
//!
//! DESIGN
//! ======
//! Exactly two states exist. The stored form is the lowercase literal, and
//! anything else read back from storage is treated as absent rather than as
//! an error so a corrupted entry degrades to the OS-preference branch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;

/// `localStorage` key holding the persisted preference.
pub const STORAGE_KEY: &str = "theme";

/// Class token placed on the document root while the dark theme is active.
pub const DARK_CLASS: &str = "dark";

/// Media query consulted once at startup when nothing is stored.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Visual theme choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme. Applying it twice returns the original value.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Storage literal: `"light"` or `"dark"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Interpret a raw stored value. Only the two exact literals are accepted.
    #[must_use]
    pub fn parse_stored(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Theme implied by the OS dark-scheme preference.
    #[must_use]
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is neither `"light"` nor `"dark"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}' (expected 'light' or 'dark')")]
pub struct ThemeParseError(pub String);

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_stored(s).ok_or_else(|| ThemeParseError(s.to_owned()))
    }
}
