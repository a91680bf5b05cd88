//! Optional-chained lookups into a JSON tree.

use serde_json::Value;

/// Follows `path` through nested objects. Any missing key or non-object node
/// along the way yields `None`.
pub(crate) fn walk<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |node, key| node.as_object()?.get(*key))
}
