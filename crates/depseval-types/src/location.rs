use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display path of a manifest, as used in diagnostics and findings.
///
/// Normalization:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - empty input becomes `<unknown>`, the name used for in-memory sources
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestPath(String);

impl Default for ManifestPath {
    fn default() -> Self {
        ManifestPath::new(ManifestPath::UNKNOWN)
    }
}

impl ManifestPath {
    pub const UNKNOWN: &'static str = "<unknown>";

    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while let Some(rest) = v.strip_prefix("./") {
            v = rest.to_string();
        }
        if v.is_empty() {
            v = Self::UNKNOWN.to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }
}

impl fmt::Display for ManifestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ManifestPath {
    fn from(value: &str) -> Self {
        ManifestPath::new(value)
    }
}

impl From<&Utf8Path> for ManifestPath {
    fn from(value: &Utf8Path) -> Self {
        ManifestPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for ManifestPath {
    fn from(value: Utf8PathBuf) -> Self {
        ManifestPath::new(value.as_str())
    }
}

/// Position of a finding inside a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: ManifestPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
}

impl Location {
    pub fn at_line(path: ManifestPath, line: Option<u32>) -> Self {
        Self {
            path,
            line,
            col: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_leading_dot() {
        assert_eq!(ManifestPath::new(".\\src\\DEPS").as_str(), "src/DEPS");
        assert_eq!(ManifestPath::new("././DEPS").as_str(), "DEPS");
    }

    #[test]
    fn empty_path_is_unknown() {
        assert_eq!(ManifestPath::new("").as_str(), "<unknown>");
        assert_eq!(ManifestPath::default().as_str(), "<unknown>");
    }
}
