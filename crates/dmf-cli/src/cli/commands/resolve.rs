//! `dmf resolve`: show each depot's public manifest without downloading.

use anyhow::Result;
use dmf_core::config::DmfConfig;
use dmf_core::item::{DepotId, ResolvedItem};
use dmf_core::pipeline::{extract_stage, locate_plugin_config, RunError};
use dmf_core::resolve::{resolve_items, HttpInfoSource, InfoSource};

use super::parse_app_id;
use crate::cli::LocationArgs;

/// `depot manifest` per id in extraction order; `-` when unresolved.
fn lines(ids: &[DepotId], items: &[ResolvedItem]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            let manifest = items
                .iter()
                .find(|it| &it.depot == id)
                .map(|it| it.manifest.as_str())
                .unwrap_or("-");
            format!("{} {}", id, manifest)
        })
        .collect()
}

pub fn run_resolve(cfg: &DmfConfig, app_id: &str, location: &LocationArgs) -> Result<()> {
    let app = parse_app_id(app_id)?;
    let path = locate_plugin_config(&app, &location.overrides(cfg))?;
    let ids = extract_stage(&path)?;

    let info = HttpInfoSource::new(cfg.info_endpoint.clone(), cfg.info_http());
    let app_info = info
        .app_info(&app)
        .map_err(|source| RunError::InfoUnavailable {
            app: app.clone(),
            source,
        })?;
    let resolution = resolve_items(&app_info, &ids);
    for line in lines(&ids, &resolution.items) {
        println!("{}", line);
    }
    Ok(())
}
