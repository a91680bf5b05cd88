//! Run orchestration: discover → extract → resolve → fetch → report.
//!
//! Every stage runs on the calling thread. Fetching is strictly sequential in
//! resolution order and per-item failures never stop the loop; they are
//! folded into the [`RunSummary`]. Conditions that make the rest of the run
//! pointless are returned as [`RunError`].

use crate::extract;
use crate::fetch::{fetch_item, ArtifactSource, FetchOutcome};
use crate::install::SteamInstall;
use crate::item::{AppId, DepotId, ResolvedItem};
use crate::resolve::{resolve_items, InfoSource, Resolution, ResolveError};
use crate::retry::RetryPolicy;
use crate::summary::RunSummary;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Discovering,
    Extracting,
    Resolving,
    Fetching,
    Reporting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Discovering => "discovering",
            Phase::Extracting => "extracting",
            Phase::Resolving => "resolving",
            Phase::Fetching => "fetching",
            Phase::Reporting => "reporting",
        })
    }
}

/// Progress notifications for the presentation layer.
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    PhaseStarted(Phase),
    Discovered(&'a RunPlan),
    Extracted {
        path: &'a Path,
        count: usize,
    },
    Resolved {
        resolved: usize,
        unresolved: &'a [DepotId],
    },
    ItemStarted {
        index: usize,
        total: usize,
        item: &'a ResolvedItem,
    },
    ItemFinished {
        index: usize,
        total: usize,
        item: &'a ResolvedItem,
        outcome: &'a FetchOutcome,
    },
}

/// Conditions that end a run before (or instead of) fetching.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Steam installation not found (searched: {})", display_paths(.searched))]
    InstallNotFound { searched: Vec<PathBuf> },
    #[error("plugin config not found at {}", .path.display())]
    ConfigNotFound { path: PathBuf },
    #[error("plugin config {} could not be read", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no depot ids found in {}", .path.display())]
    NoIdentifiers { path: PathBuf },
    #[error("app info for {app} unavailable")]
    InfoUnavailable {
        app: AppId,
        #[source]
        source: ResolveError,
    },
    #[error("none of the {extracted} depot ids of app {app} has a public manifest")]
    NothingResolved { app: AppId, extracted: usize },
    #[error("cannot create output directory {}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Caller-supplied locations that take precedence over discovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides<'a> {
    pub steam_path: Option<&'a Path>,
    pub config_file: Option<&'a Path>,
    pub output_dir: Option<&'a Path>,
}

fn enter(phase: Phase, observer: &mut dyn FnMut(RunEvent<'_>)) {
    tracing::debug!(phase = %phase, "phase started");
    observer(RunEvent::PhaseStarted(phase));
}

/// Everything a run needs to know about the local machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub app: AppId,
    pub config_file: PathBuf,
    pub output_dir: PathBuf,
}

fn locate_once<'s>(
    slot: &'s mut Option<SteamInstall>,
    explicit: Option<&Path>,
) -> Result<&'s SteamInstall, RunError> {
    let install = match slot.take() {
        Some(install) => install,
        None => SteamInstall::locate(explicit)
            .map_err(|e| RunError::InstallNotFound { searched: e.searched })?,
    };
    Ok(slot.insert(install))
}

fn config_path(
    app: &AppId,
    overrides: &Overrides<'_>,
    install: &mut Option<SteamInstall>,
) -> Result<PathBuf, RunError> {
    let path = match overrides.config_file {
        Some(p) => p.to_path_buf(),
        None => locate_once(install, overrides.steam_path)?.plugin_config(app),
    };
    if !path.is_file() {
        return Err(RunError::ConfigNotFound { path });
    }
    Ok(path)
}

/// Plugin config for `app`: the override if given, else the Steam layout path.
/// The file must exist.
pub fn locate_plugin_config(app: &AppId, overrides: &Overrides<'_>) -> Result<PathBuf, RunError> {
    config_path(app, overrides, &mut None)
}

impl RunPlan {
    /// Resolves the plugin config and output directory for `app`. The Steam
    /// install is only looked up when one of them is not overridden. The
    /// config file must exist; the output directory is created later.
    pub fn discover(app: AppId, overrides: &Overrides<'_>) -> Result<Self, RunError> {
        let mut install = None;
        let config_file = config_path(&app, overrides, &mut install)?;
        let output_dir = match overrides.output_dir {
            Some(p) => p.to_path_buf(),
            None => locate_once(&mut install, overrides.steam_path)?.depot_cache(),
        };
        Ok(Self {
            app,
            config_file,
            output_dir,
        })
    }
}

/// Reads the plugin config; an empty id set is fatal.
pub fn extract_stage(path: &Path) -> Result<Vec<DepotId>, RunError> {
    let ids = extract::extract_ids_from_path(path).map_err(|source| RunError::ConfigUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    if ids.is_empty() {
        return Err(RunError::NoIdentifiers {
            path: path.to_path_buf(),
        });
    }
    Ok(ids)
}

/// Fetches app info once and pairs each depot with its public manifest.
pub fn resolve_stage(
    info: &dyn InfoSource,
    app: &AppId,
    ids: &[DepotId],
) -> Result<Resolution, RunError> {
    let app_info = info.app_info(app).map_err(|source| RunError::InfoUnavailable {
        app: app.clone(),
        source,
    })?;
    let resolution = resolve_items(&app_info, ids);
    if resolution.items.is_empty() {
        return Err(RunError::NothingResolved {
            app: app.clone(),
            extracted: ids.len(),
        });
    }
    if !resolution.unresolved.is_empty() {
        tracing::warn!(
            app = %app,
            unresolved = resolution.unresolved.len(),
            "some depots have no public manifest and will be skipped"
        );
    }
    Ok(resolution)
}

/// Wires the remote sources and retry policy into a run.
pub struct Pipeline<'a> {
    info: &'a dyn InfoSource,
    artifacts: &'a dyn ArtifactSource,
    retry: RetryPolicy,
}

impl<'a> Pipeline<'a> {
    pub fn new(info: &'a dyn InfoSource, artifacts: &'a dyn ArtifactSource, retry: RetryPolicy) -> Self {
        Self {
            info,
            artifacts,
            retry,
        }
    }

    /// Full run starting from discovery.
    pub fn run_app(
        &self,
        app: AppId,
        overrides: &Overrides<'_>,
        observer: &mut dyn FnMut(RunEvent<'_>),
    ) -> Result<RunSummary, RunError> {
        enter(Phase::Discovering, observer);
        let plan = RunPlan::discover(app, overrides)?;
        tracing::info!(
            app = %plan.app,
            config = %plan.config_file.display(),
            output = %plan.output_dir.display(),
            "run plan ready"
        );
        observer(RunEvent::Discovered(&plan));
        self.run(&plan, observer)
    }

    /// Runs extraction, resolution and fetching for an already discovered plan.
    pub fn run(
        &self,
        plan: &RunPlan,
        observer: &mut dyn FnMut(RunEvent<'_>),
    ) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::new();

        enter(Phase::Extracting, observer);
        let ids = extract_stage(&plan.config_file)?;
        observer(RunEvent::Extracted {
            path: &plan.config_file,
            count: ids.len(),
        });

        enter(Phase::Resolving, observer);
        let resolution = resolve_stage(self.info, &plan.app, &ids)?;
        observer(RunEvent::Resolved {
            resolved: resolution.items.len(),
            unresolved: &resolution.unresolved,
        });
        summary.unresolved = resolution.unresolved.clone();

        std::fs::create_dir_all(&plan.output_dir).map_err(|source| RunError::OutputDir {
            path: plan.output_dir.clone(),
            source,
        })?;

        enter(Phase::Fetching, observer);
        let total = resolution.items.len();
        for (index, item) in resolution.items.iter().enumerate() {
            observer(RunEvent::ItemStarted { index, total, item });
            let outcome = fetch_item(self.artifacts, &self.retry, item, &plan.output_dir);
            summary.record(item, &outcome);
            observer(RunEvent::ItemFinished {
                index,
                total,
                item,
                outcome: &outcome,
            });
        }

        enter(Phase::Reporting, observer);
        summary.finish();
        tracing::info!(
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed_count(),
            unresolved = summary.unresolved.len(),
            bytes = summary.bytes_downloaded,
            "run finished"
        );
        Ok(summary)
    }
}
