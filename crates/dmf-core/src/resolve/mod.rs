//! Manifest resolution: maps each depot id to the manifest its public branch
//! currently points at.
//!
//! One info request is made per run (for the app). Depots whose entry lacks a
//! `manifests.public.gid` string are reported as unresolved and left out of
//! the download set; that is not an error.

mod http;
mod navigate;

pub use http::HttpInfoSource;

use crate::item::{AppId, DepotId, ManifestId, ResolvedItem};
use serde::Deserialize;
use serde_json::Value;

/// Status string the info service uses for a usable payload.
pub const STATUS_SUCCESS: &str = "success";

/// Why app info could not be obtained. Any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("info request failed: {0}")]
    Transport(#[from] curl::Error),
    #[error("info service returned HTTP {0}")]
    Http(u32),
    #[error("info payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("info service reported status {}", .0.as_deref().unwrap_or("<missing>"))]
    Status(Option<String>),
}

/// Top-level shape of the info payload: `{ status, data: { <app>: {...} } }`.
#[derive(Debug, Deserialize)]
struct InfoEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Value,
}

/// App info payload for one app, as returned by the info service.
#[derive(Debug, Clone)]
pub struct AppInfo {
    app: AppId,
    data: Value,
}

impl AppInfo {
    /// Parses a raw payload, rejecting anything whose status is not `success`.
    pub fn from_slice(app: AppId, body: &[u8]) -> Result<Self, ResolveError> {
        let envelope: InfoEnvelope = serde_json::from_slice(body)?;
        if envelope.status.as_deref() != Some(STATUS_SUCCESS) {
            return Err(ResolveError::Status(envelope.status));
        }
        Ok(Self {
            app,
            data: envelope.data,
        })
    }

    /// `data.<app>.depots.<depot>.manifests.public.gid`, if present and a usable string.
    pub fn public_manifest(&self, depot: &DepotId) -> Option<ManifestId> {
        navigate::walk(
            &self.data,
            &[
                self.app.as_str(),
                "depots",
                depot.as_str(),
                "manifests",
                "public",
                "gid",
            ],
        )
        .and_then(Value::as_str)
        .and_then(ManifestId::parse)
    }
}

/// Source of app info. The HTTP implementation talks to the public info
/// service; tests substitute canned payloads.
pub trait InfoSource {
    fn app_info(&self, app: &AppId) -> Result<AppInfo, ResolveError>;
}

/// Depots split into those with a public manifest and those without.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// In extraction order.
    pub items: Vec<ResolvedItem>,
    pub unresolved: Vec<DepotId>,
}

/// Pairs each depot with its public manifest; order follows `ids`.
pub fn resolve_items(info: &AppInfo, ids: &[DepotId]) -> Resolution {
    let mut resolution = Resolution::default();
    for depot in ids {
        match info.public_manifest(depot) {
            Some(manifest) => {
                tracing::debug!(depot = %depot, manifest = %manifest, "resolved public manifest");
                resolution.items.push(ResolvedItem::new(depot.clone(), manifest));
            }
            None => {
                tracing::debug!(depot = %depot, "no public manifest");
                resolution.unresolved.push(depot.clone());
            }
        }
    }
    resolution
}
