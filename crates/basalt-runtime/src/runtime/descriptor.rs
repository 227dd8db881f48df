use serde::{Deserialize, Serialize};

/// Release metadata parsed from a runtime's `release` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Raw version token, e.g. "17.0.1" or "1.8.0_292".
    pub version: String,
    /// Architecture tag as reported by the distribution.
    pub arch: String,
    /// Major Java version derived from `version`; 0 when unparsable.
    pub major_version: u32,
}

/// One installed runtime, keyed by its directory name.
///
/// `release` is `None` when the metadata file is missing or malformed.
/// Such a runtime is still real: it shows up in listings and can be
/// removed, it just cannot be selected for launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeDescriptor {
    pub name: String,
    pub release: Option<ReleaseInfo>,
    /// True when this runtime ships with the launcher itself.
    pub is_bundled: bool,
    /// True for older distributions with a nested `jre/` tree.
    pub is_legacy_layout: bool,
}

impl RuntimeDescriptor {
    /// Placeholder for a directory whose metadata could not be read.
    pub(crate) fn unreadable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            release: None,
            is_bundled: false,
            is_legacy_layout: false,
        }
    }

    pub fn version_string(&self) -> Option<&str> {
        self.release.as_ref().map(|r| r.version.as_str())
    }

    /// Major version, or 0 when the metadata was unreadable.
    pub fn major_version(&self) -> u32 {
        self.release.as_ref().map_or(0, |r| r.major_version)
    }
}

/// Derives the major Java version from a raw version token.
///
/// Legacy `1.x` numbering maps to `x` (so "1.8.0_292" is major 8); any
/// non-numeric leading segment yields 0.
pub fn major_from_version(version: &str) -> u32 {
    let mut parts = version.split('.');
    let first = parts.next().unwrap_or("");
    if first == "1" {
        parts.next().and_then(|s| s.parse().ok()).unwrap_or(0)
    } else {
        first.parse().unwrap_or(0)
    }
}
