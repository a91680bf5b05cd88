//! Identifier types shared by every stage of a run.
//!
//! Ids are kept as strings so the exact digit sequence from the plugin config
//! survives into file names and query strings.

use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of every artifact written to the output directory.
pub const MANIFEST_EXT: &str = "manifest";

fn is_positive_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && s.bytes().any(|b| b != b'0')
}

/// Top-level app id supplied by the caller (names the plugin config file).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppId(String);

impl AppId {
    /// Accepts a positive decimal integer; surrounding whitespace is trimmed.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        is_positive_decimal(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Depot id extracted from the plugin config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepotId(String);

impl DepotId {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        is_positive_decimal(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Published manifest revision of a depot (the "gid" of its public branch).
///
/// Restricted to ASCII alphanumerics so it can never introduce a path
/// separator or the `_` that splits the artifact file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestId(String);

impl ManifestId {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        (!s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A depot paired with the manifest revision to fetch for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub depot: DepotId,
    pub manifest: ManifestId,
}

impl ResolvedItem {
    pub fn new(depot: DepotId, manifest: ManifestId) -> Self {
        Self { depot, manifest }
    }

    /// `{depot}_{manifest}.manifest`
    pub fn file_name(&self) -> String {
        format!("{}_{}.{}", self.depot, self.manifest, MANIFEST_EXT)
    }

    pub fn target_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(self.file_name())
    }
}

impl fmt::Display for ResolvedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.depot, self.manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depot_id_accepts_digits_only() {
        assert_eq!(DepotId::parse(" 1001 ").unwrap().as_str(), "1001");
        assert!(DepotId::parse("").is_none());
        assert!(DepotId::parse("12a").is_none());
        assert!(DepotId::parse("-5").is_none());
        assert!(DepotId::parse("000").is_none());
    }

    #[test]
    fn depot_id_keeps_leading_zeros() {
        assert_eq!(DepotId::parse("0042").unwrap().as_str(), "0042");
    }

    #[test]
    fn manifest_id_rejects_separators() {
        assert!(ManifestId::parse("7387459284395823745").is_some());
        assert!(ManifestId::parse("../x").is_none());
        assert!(ManifestId::parse("1_2").is_none());
        assert!(ManifestId::parse("").is_none());
    }

    #[test]
    fn file_name_is_derived_from_pair() {
        let item = ResolvedItem::new(
            DepotId::parse("3003").unwrap(),
            ManifestId::parse("777").unwrap(),
        );
        assert_eq!(item.file_name(), "3003_777.manifest");
        assert_eq!(
            item.target_path(Path::new("/tmp/cache")),
            PathBuf::from("/tmp/cache/3003_777.manifest")
        );
    }
}
