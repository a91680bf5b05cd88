//! CLI for the DMF depot manifest fetcher.

mod commands;
mod prompt;
mod render;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dmf_core::config::{self, DmfConfig};
use dmf_core::pipeline::Overrides;
use std::path::PathBuf;

use commands::{run_fetch, run_ids, run_resolve, FetchArgs};

/// Top-level CLI for the DMF depot manifest fetcher.
#[derive(Debug, Parser)]
#[command(name = "dmf")]
#[command(about = "DMF: fetch depot manifests for the apps listed in Steam plugin configs", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/dmf/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where to find the plugin config.
#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// Steam install root (default: discovered).
    #[arg(long, value_name = "DIR")]
    pub steam_path: Option<PathBuf>,

    /// Plugin config file (default: <steam>/config/stplug-in/<APP_ID>.lua).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl LocationArgs {
    /// Flag values win over the config file.
    fn steam_path<'a>(&'a self, cfg: &'a DmfConfig) -> Option<&'a std::path::Path> {
        self.steam_path.as_deref().or(cfg.steam_path.as_deref())
    }

    fn overrides<'a>(&'a self, cfg: &'a DmfConfig) -> Overrides<'a> {
        Overrides {
            steam_path: self.steam_path(cfg),
            config_file: self.file.as_deref(),
            output_dir: None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the public manifest of every depot listed for an app.
    Run {
        /// App id whose plugin config lists the depots (else DMF_APP_ID, else prompt).
        #[arg(long, value_name = "APP_ID")]
        app_id: Option<String>,

        /// Manifest service API key (else DMF_API_KEY, else prompt).
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,

        #[command(flatten)]
        location: LocationArgs,

        /// Directory for .manifest files (default: <steam>/depotcache).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Exit with status 2 when any manifest could not be downloaded.
        #[arg(long)]
        strict: bool,
    },

    /// List the depot ids found in an app's plugin config.
    Ids {
        /// App id.
        app_id: String,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Show each depot's public manifest without downloading anything.
    Resolve {
        /// App id.
        app_id: String,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn load_config(path: Option<&std::path::Path>) -> Result<DmfConfig> {
    let cfg = match path {
        Some(p) => config::load_from(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    /// Parses arguments, runs the command and returns the process exit code.
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = cli.command {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dmf", &mut std::io::stdout());
            return Ok(0);
        }

        let cfg = load_config(cli.config.as_deref())?;
        match cli.command {
            CliCommand::Run {
                app_id,
                api_key,
                location,
                output_dir,
                strict,
            } => run_fetch(
                &cfg,
                FetchArgs {
                    app_id,
                    api_key,
                    location,
                    output_dir,
                    strict,
                },
            ),
            CliCommand::Ids { app_id, location } => run_ids(&cfg, &app_id, &location).map(|()| 0),
            CliCommand::Resolve { app_id, location } => {
                run_resolve(&cfg, &app_id, &location).map(|()| 0)
            }
            CliCommand::Completions { .. } => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests;
