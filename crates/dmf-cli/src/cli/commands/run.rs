//! `dmf run`: fetch every public manifest listed for an app.

use anyhow::{Context, Result};
use dmf_core::config::DmfConfig;
use dmf_core::credentials::{self, API_KEY, APP_ID};
use dmf_core::fetch::HttpArtifactSource;
use dmf_core::item::AppId;
use dmf_core::pipeline::{Overrides, Pipeline};
use dmf_core::resolve::HttpInfoSource;
use dmf_core::summary::RunSummary;
use std::path::PathBuf;

use crate::cli::{prompt, render, LocationArgs};

/// Exit code when `--strict` is set and some manifest failed.
pub const EXIT_ITEMS_FAILED: i32 = 2;

pub struct FetchArgs {
    pub app_id: Option<String>,
    pub api_key: Option<String>,
    pub location: LocationArgs,
    pub output_dir: Option<PathBuf>,
    pub strict: bool,
}

/// Per-item failures only change the exit code in strict mode.
pub fn exit_code(summary: &RunSummary, strict: bool) -> i32 {
    if strict && !summary.all_succeeded() {
        EXIT_ITEMS_FAILED
    } else {
        0
    }
}

pub fn run_fetch(cfg: &DmfConfig, args: FetchArgs) -> Result<i32> {
    let raw_app = credentials::resolve(
        APP_ID,
        args.app_id,
        std::env::var(APP_ID.env).ok(),
        prompt::ask,
    )?;
    let app = AppId::parse(&raw_app)
        .with_context(|| format!("invalid app id {:?}: expected a positive integer", raw_app))?;
    let api_key = credentials::resolve(
        API_KEY,
        args.api_key,
        std::env::var(API_KEY.env).ok(),
        prompt::ask,
    )?;

    let output_dir = args.output_dir.as_deref().or(cfg.output_dir.as_deref());
    let overrides = Overrides {
        output_dir,
        ..args.location.overrides(cfg)
    };

    let info = HttpInfoSource::new(cfg.info_endpoint.clone(), cfg.info_http());
    let artifacts =
        HttpArtifactSource::new(cfg.artifact_endpoint.clone(), api_key, cfg.download_http());
    let pipeline = Pipeline::new(&info, &artifacts, cfg.retry_policy());

    tracing::info!(app = %app, strict = args.strict, "starting run");
    let summary = pipeline.run_app(app, &overrides, &mut |event| {
        if let Some(line) = render::event_line(&event) {
            println!("{}", line);
        }
    })?;

    for line in render::report(&summary) {
        println!("{}", line);
    }
    Ok(exit_code(&summary, args.strict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmf_core::fetch::FetchOutcome;
    use dmf_core::item::{DepotId, ManifestId, ResolvedItem};

    fn summary_with_failure() -> RunSummary {
        let mut s = RunSummary::new();
        let item = ResolvedItem::new(DepotId::parse("3003").unwrap(), ManifestId::parse("777").unwrap());
        s.record(
            &item,
            &FetchOutcome::Failed {
                error: "HTTP 500".to_string(),
                attempts: 5,
            },
        );
        s
    }

    #[test]
    fn failures_only_matter_when_strict() {
        let failed = summary_with_failure();
        assert_eq!(exit_code(&failed, false), 0);
        assert_eq!(exit_code(&failed, true), EXIT_ITEMS_FAILED);
        assert_eq!(exit_code(&RunSummary::new(), true), 0);
    }
}
