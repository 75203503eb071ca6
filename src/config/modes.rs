//! Product message language definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used for product messages (`AcceptLanguage`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageLanguage {
    /// English (default).
    #[default]
    #[serde(rename = "en")]
    English,
    /// Japanese.
    #[serde(rename = "jp")]
    Japanese,
    /// Chinese.
    #[serde(rename = "zh")]
    Chinese,
}

impl MessageLanguage {
    /// Value rendered into the resource.
    pub fn code(&self) -> &'static str {
        match self {
            MessageLanguage::English => "en",
            MessageLanguage::Japanese => "jp",
            MessageLanguage::Chinese => "zh",
        }
    }
}

impl fmt::Display for MessageLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MessageLanguage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(MessageLanguage::English),
            "jp" => Ok(MessageLanguage::Japanese),
            "zh" => Ok(MessageLanguage::Chinese),
            _ => Err(format!("Unknown message language: {}", s)),
        }
    }
}
