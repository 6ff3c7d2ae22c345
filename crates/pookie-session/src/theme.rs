//! Shell color themes

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    /// Translucent dark variant
    Frosted,
}

impl Theme {
    /// The theme a light/dark toggle switches to. Frosted counts as dark.
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark | Theme::Frosted => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        !matches!(self, Theme::Light)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Frosted => "frosted",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "frosted" => Ok(Theme::Frosted),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}
