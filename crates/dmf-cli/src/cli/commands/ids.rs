//! `dmf ids`: list the depot ids in an app's plugin config.

use anyhow::Result;
use dmf_core::config::DmfConfig;
use dmf_core::pipeline::{extract_stage, locate_plugin_config};

use super::parse_app_id;
use crate::cli::LocationArgs;

pub fn run_ids(cfg: &DmfConfig, app_id: &str, location: &LocationArgs) -> Result<()> {
    let app = parse_app_id(app_id)?;
    let path = locate_plugin_config(&app, &location.overrides(cfg))?;
    let ids = extract_stage(&path)?;
    tracing::debug!(app = %app, count = ids.len(), "listing depot ids");
    for id in &ids {
        println!("{}", id);
    }
    Ok(())
}
