//! Storage key conventions.
//!
//! Pure string functions, no AWS SDK dependency. A document lives under
//! exactly one of three sibling prefixes; the relative path below the prefix
//! identifies the same logical document at every lifecycle stage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const INCOMING_PREFIX: &str = "incoming/";
pub const PROCESSED_PREFIX: &str = "processed/";
pub const FAILED_PREFIX: &str = "failed/";

/// Lifecycle stage of a document in the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Incoming,
    Processed,
    Failed,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Incoming, Stage::Processed, Stage::Failed];

    pub fn prefix(self) -> &'static str {
        match self {
            Stage::Incoming => INCOMING_PREFIX,
            Stage::Processed => PROCESSED_PREFIX,
            Stage::Failed => FAILED_PREFIX,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Incoming => "incoming",
            Stage::Processed => "processed",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('/') {
            "incoming" => Ok(Stage::Incoming),
            "processed" => Ok(Stage::Processed),
            "failed" => Ok(Stage::Failed),
            other => Err(CoreError::InvalidStage(other.to_string())),
        }
    }
}

/// Key of a new document under `incoming/`.
pub fn incoming(relative: &str) -> String {
    format!("{INCOMING_PREFIX}{}", relative.trim_start_matches('/'))
}

/// The stage whose prefix `key` starts with, if any.
pub fn stage_of(key: &str) -> Option<Stage> {
    Stage::ALL
        .into_iter()
        .find(|stage| key.starts_with(stage.prefix()))
}

/// The path of `key` below its lifecycle prefix. Keys outside the three
/// prefixes are returned unchanged.
pub fn relative_path(key: &str) -> &str {
    match stage_of(key) {
        Some(stage) => &key[stage.prefix().len()..],
        None => key,
    }
}

/// Swap the lifecycle prefix of `key` for the one of `to`.
///
/// `incoming/2024/acme.pdf` relocated to [`Stage::Processed`] becomes
/// `processed/2024/acme.pdf`. A key with no known prefix gets the target
/// prefix prepended.
pub fn relocate(key: &str, to: Stage) -> String {
    format!("{}{}", to.prefix(), relative_path(key))
}

/// Final path segment of a key.
pub fn filename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocate_swaps_prefix_and_keeps_relative_path() {
        assert_eq!(
            relocate("incoming/2024/acme.pdf", Stage::Processed),
            "processed/2024/acme.pdf"
        );
        assert_eq!(relocate("incoming/acme.pdf", Stage::Failed), "failed/acme.pdf");
        assert_eq!(relocate("failed/acme.pdf", Stage::Incoming), "incoming/acme.pdf");
    }

    #[test]
    fn relocate_prepends_prefix_to_unprefixed_key() {
        assert_eq!(relocate("acme.pdf", Stage::Failed), "failed/acme.pdf");
    }

    #[test]
    fn filename_is_last_segment() {
        assert_eq!(filename("incoming/2024/q1/acme.pdf"), "acme.pdf");
        assert_eq!(filename("acme.pdf"), "acme.pdf");
    }

    #[test]
    fn stage_parsing() {
        assert_eq!("processed".parse::<Stage>().unwrap(), Stage::Processed);
        assert_eq!("failed/".parse::<Stage>().unwrap(), Stage::Failed);
        assert!("archive".parse::<Stage>().is_err());
        assert_eq!(stage_of("incoming/x.pdf"), Some(Stage::Incoming));
        assert_eq!(stage_of("reports/x.pdf"), None);
    }

    #[test]
    fn incoming_key_builder() {
        assert_eq!(incoming("/acme.pdf"), "incoming/acme.pdf");
    }
}
