use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Language a scope is typed in. There is no "unknown" value: a scope
/// without a record reads as [`LanguageLabel::English`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageLabel {
    Hebrew,
    #[default]
    English,
}

impl LanguageLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LanguageLabel::Hebrew => "hebrew",
            LanguageLabel::English => "english",
        }
    }

    /// The other label, used by the manual layout toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            LanguageLabel::Hebrew => LanguageLabel::English,
            LanguageLabel::English => LanguageLabel::Hebrew,
        }
    }
}

impl fmt::Display for LanguageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseLanguageError(pub String);

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language label '{}'", self.0)
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for LanguageLabel {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hebrew" => Ok(LanguageLabel::Hebrew),
            "english" => Ok(LanguageLabel::English),
            other => Err(ParseLanguageError(other.to_string())),
        }
    }
}
