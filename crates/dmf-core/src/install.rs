//! Steam install discovery.
//!
//! Lookup order: explicit path, `DMF_STEAM_PATH`, the Windows registry, then
//! the usual per-platform install locations. Only directories that look like
//! a Steam root (they contain `config/`) are accepted from the automatic
//! sources; an explicit path only has to be a directory.

use crate::item::AppId;
use std::path::{Path, PathBuf};

pub const STEAM_PATH_ENV: &str = "DMF_STEAM_PATH";

/// A located Steam installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamInstall {
    root: PathBuf,
}

/// Nothing usable was found; lists every location that was tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    pub searched: Vec<PathBuf>,
}

fn looks_like_steam_root(path: &Path) -> bool {
    path.join("config").is_dir()
}

impl SteamInstall {
    /// Treats `root` as the install root without any checks.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Runs the full lookup order described in the module docs.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, NotFound> {
        if let Some(path) = explicit {
            return if path.is_dir() {
                Ok(Self::at(path))
            } else {
                Err(NotFound {
                    searched: vec![path.to_path_buf()],
                })
            };
        }
        let mut candidates = Vec::new();
        if let Some(env) = std::env::var_os(STEAM_PATH_ENV).filter(|v| !v.is_empty()) {
            candidates.push(PathBuf::from(env));
        }
        candidates.extend(registry_paths());
        candidates.extend(default_paths());
        Self::first_of(candidates)
    }

    /// First candidate that looks like a Steam root.
    pub fn first_of(candidates: impl IntoIterator<Item = PathBuf>) -> Result<Self, NotFound> {
        let mut searched = Vec::new();
        for candidate in candidates {
            if looks_like_steam_root(&candidate) {
                tracing::debug!(path = %candidate.display(), "found Steam install");
                return Ok(Self::at(candidate));
            }
            searched.push(candidate);
        }
        Err(NotFound { searched })
    }

    /// `<root>/config/stplug-in/<app>.lua`
    pub fn plugin_config(&self, app: &AppId) -> PathBuf {
        self.root
            .join("config")
            .join("stplug-in")
            .join(format!("{}.lua", app))
    }

    /// `<root>/depotcache`, where the client looks for manifests.
    pub fn depot_cache(&self) -> PathBuf {
        self.root.join("depotcache")
    }
}

#[cfg(windows)]
fn registry_paths() -> Vec<PathBuf> {
    use winreg::enums::*;
    use winreg::RegKey;

    let mut paths = Vec::new();
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    if let Ok(key) = hkcu.open_subkey(r"Software\Valve\Steam") {
        if let Ok(p) = key.get_value::<String, _>("SteamPath") {
            paths.push(PathBuf::from(p));
        }
    }
    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    for sub in [r"SOFTWARE\WOW6432Node\Valve\Steam", r"SOFTWARE\Valve\Steam"] {
        if let Ok(key) = hklm.open_subkey(sub) {
            if let Ok(p) = key.get_value::<String, _>("InstallPath") {
                paths.push(PathBuf::from(p));
            }
        }
    }
    paths
}

#[cfg(not(windows))]
fn registry_paths() -> Vec<PathBuf> {
    Vec::new()
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(windows)]
    {
        for var in ["PROGRAMFILES(X86)", "PROGRAMFILES"] {
            if let Some(dir) = std::env::var_os(var) {
                paths.push(PathBuf::from(dir).join("Steam"));
            }
        }
    }

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home = PathBuf::from(home);
            paths.push(home.join(".steam").join("steam"));
            paths.push(home.join(".local").join("share").join("Steam"));
            #[cfg(target_os = "macos")]
            paths.push(
                home.join("Library")
                    .join("Application Support")
                    .join("Steam"),
            );
        }
    }

    paths
}
