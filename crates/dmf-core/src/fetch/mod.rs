//! Manifest fetcher: makes sure `{out_dir}/{depot}_{manifest}.manifest`
//! exists with a nonzero length.
//!
//! An existing nonempty file is taken as-is (no network). Otherwise the body
//! is downloaded into `<target>.part` with up to `RetryPolicy::max_attempts`
//! tries; a nonzero result is renamed onto the target. The part file is
//! removed before every attempt and after every failed one.

mod error;
mod http;
mod part;

pub use error::FetchError;
pub use http::HttpArtifactSource;
pub use part::part_path;

use crate::item::ResolvedItem;
use crate::retry::{run_with_retry, RetryPolicy};
use std::path::Path;

/// Where manifest bodies come from. `dest` is created or truncated by the
/// source; the return value is the number of bytes written to it.
pub trait ArtifactSource {
    fn download(&self, item: &ResolvedItem, dest: &Path) -> Result<u64, FetchError>;
}

/// Result of fetching one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { bytes: u64, attempts: u32 },
    /// Target was already present and nonempty; no request was made.
    Skipped { bytes: u64 },
    Failed { error: String, attempts: u32 },
}

/// Length of `path` if it is an existing regular file.
fn existing_len(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}

/// Fetches one item into `out_dir`, which must already exist.
pub fn fetch_item(
    source: &dyn ArtifactSource,
    policy: &RetryPolicy,
    item: &ResolvedItem,
    out_dir: &Path,
) -> FetchOutcome {
    let target = item.target_path(out_dir);
    if let Some(bytes) = existing_len(&target).filter(|&n| n > 0) {
        tracing::info!(item = %item, bytes, "manifest already present, skipping");
        return FetchOutcome::Skipped { bytes };
    }

    let part = part_path(&target);
    let result = run_with_retry(policy, |attempt| {
        tracing::debug!(item = %item, attempt, "download attempt");
        part::remove_if_exists(&part)?;
        part::remove_if_exists(&target)?;
        attempt_once(source, item, &part, &target).map_err(|e| {
            if let Err(rm) = part::remove_if_exists(&part) {
                tracing::warn!(path = %part.display(), "could not remove partial file: {}", rm);
            }
            e
        })
    });

    match result {
        Ok((bytes, attempts)) => {
            tracing::info!(item = %item, bytes, attempts, "manifest downloaded");
            FetchOutcome::Downloaded { bytes, attempts }
        }
        Err(exhausted) => {
            tracing::error!(
                item = %item,
                attempts = exhausted.attempts,
                "manifest download failed: {}",
                exhausted.error
            );
            FetchOutcome::Failed {
                error: exhausted.error.to_string(),
                attempts: exhausted.attempts,
            }
        }
    }
}

fn attempt_once(
    source: &dyn ArtifactSource,
    item: &ResolvedItem,
    part: &Path,
    target: &Path,
) -> Result<u64, FetchError> {
    let received = source.download(item, part)?;
    let on_disk = existing_len(part).unwrap_or(0);
    if received == 0 || on_disk == 0 {
        return Err(FetchError::Empty);
    }
    if on_disk != received {
        return Err(FetchError::SizeMismatch { received, on_disk });
    }
    part::finalize(part, target)?;
    Ok(on_disk)
}
