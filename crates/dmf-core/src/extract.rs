//! Depot id extraction from a plugin config file.
//!
//! The file is Lua-like text with one declaration per line, e.g.
//! `addappid(1001, 1, "ab12cd")`. Only single-line calls with three arguments
//! (id, integer, non-empty hex string in double quotes) contribute an id;
//! comments, malformed calls and anything spanning lines are ignored.

use crate::item::DepotId;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

fn call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"^\s*[A-Za-z_][A-Za-z0-9_]*\s*\(\s*(\d+)\s*,\s*\d+\s*,\s*"[0-9A-Fa-f]+"\s*\)\s*;?\s*(?:--.*)?$"#,
        )
        .expect("call pattern is a valid regex")
    })
}

/// Returns the distinct depot ids in order of first appearance.
pub fn extract_ids(text: &str) -> Vec<DepotId> {
    let pattern = call_pattern();
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for line in text.lines() {
        let Some(caps) = pattern.captures(line) else {
            continue;
        };
        let Some(id) = caps.get(1).and_then(|m| DepotId::parse(m.as_str())) else {
            continue;
        };
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    ids
}

/// Reads `path` and extracts its depot ids. The file must exist and be readable.
pub fn extract_ids_from_path(path: &Path) -> std::io::Result<Vec<DepotId>> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let ids = extract_ids(&text);
    tracing::debug!(path = %path.display(), count = ids.len(), "extracted depot ids");
    Ok(ids)
}
