//! Interview Category
//!
//! The two interview flavours (technical and HR) and the single place where a
//! category is inferred from a free-text role declaration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Substrings that mark a role declaration as an HR interview.
const HR_ROLE_MARKERS: &[&str] = &["hr", "human resource", "manager"];

/// Interview category: drives greetings, intro lines and prompt framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewCategory {
    /// Implementation-level engineering questions
    Technical,
    /// Behavioral (STAR-style) questions
    Hr,
}

impl InterviewCategory {
    /// Get the string form used for storage and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Hr => "hr",
        }
    }

    /// Parse an optional caller-supplied hint.
    ///
    /// Blank or unrecognised hints yield `None` so the category can be
    /// inferred later from the declared role.
    pub fn from_hint(hint: Option<&str>) -> Option<Self> {
        hint.and_then(|h| h.parse().ok())
    }
}

impl fmt::Display for InterviewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(Self::Technical),
            "hr" => Ok(Self::Hr),
            other => Err(CoreError::parse(format!(
                "unknown interview category: {}",
                other
            ))),
        }
    }
}

/// Infer the interview category from a declared role.
///
/// Case-insensitive: the role is HR if it contains "hr", "human resource"
/// or "manager" anywhere, otherwise technical.
pub fn infer_category(role: &str) -> InterviewCategory {
    let lower = role.to_lowercase();
    if HR_ROLE_MARKERS.iter().any(|marker| lower.contains(marker)) {
        InterviewCategory::Hr
    } else {
        InterviewCategory::Technical
    }
}
