use crate::xliff::TransUnit;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Rule deciding which unit attributes must match for a translation to be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MatchPolicy {
    /// File group `original`, unit id and source text must all match
    #[default]
    #[value(name = "standard")]
    Standard,

    /// Unit id and source text must match; the unit may move between files
    #[value(name = "nofile")]
    NoFile,

    /// Only the unit id must match, even if the source text changed
    #[value(name = "matchid")]
    MatchId,
}

/// Equivalence key for carrying a translation forward.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    original: Option<String>,
    id: Option<String>,
    source_digest: Option<String>,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Standard => "standard",
            MatchPolicy::NoFile => "nofile",
            MatchPolicy::MatchId => "matchid",
        }
    }

    /// Derive the key of `unit` under this policy.
    pub fn key(&self, unit: &TransUnit<'_>) -> TranslationKey {
        match self {
            MatchPolicy::Standard => standard_key(unit),
            MatchPolicy::NoFile => nofile_key(unit),
            MatchPolicy::MatchId => matchid_key(unit),
        }
    }
}

fn standard_key(unit: &TransUnit<'_>) -> TranslationKey {
    TranslationKey {
        original: unit.original().map(str::to_owned),
        ..nofile_key(unit)
    }
}

fn nofile_key(unit: &TransUnit<'_>) -> TranslationKey {
    TranslationKey {
        source_digest: unit.source().as_deref().map(source_digest),
        ..matchid_key(unit)
    }
}

fn matchid_key(unit: &TransUnit<'_>) -> TranslationKey {
    TranslationKey {
        original: None,
        id: unit.id().map(str::to_owned),
        source_digest: None,
    }
}

/// Stable fingerprint of a source string (hex SHA-256).
pub fn source_digest(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(MatchPolicy::Standard),
            "nofile" => Ok(MatchPolicy::NoFile),
            "matchid" => Ok(MatchPolicy::MatchId),
            other => Err(format!(
                "Unknown match policy '{}' (expected standard, nofile or matchid)",
                other
            )),
        }
    }
}
