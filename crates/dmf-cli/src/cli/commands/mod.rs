//! CLI command handlers. Each command is in its own file.

mod ids;
mod resolve;
mod run;

pub use ids::run_ids;
pub use resolve::run_resolve;
pub use run::{run_fetch, FetchArgs};

use anyhow::Result;
use dmf_core::item::AppId;

/// Parses a positional app id argument.
fn parse_app_id(raw: &str) -> Result<AppId> {
    AppId::parse(raw).ok_or_else(|| anyhow::anyhow!("invalid app id {:?}: expected a positive integer", raw))
}
