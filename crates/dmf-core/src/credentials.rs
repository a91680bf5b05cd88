//! Layered resolution of run inputs: flag, then environment, then prompt.
//!
//! Resolution is a pure function of its inputs; reading the environment and
//! prompting the user are left to the caller.

/// A value that can come from a flag, an environment variable or a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    /// Human name used in prompts and errors.
    pub name: &'static str,
    pub flag: &'static str,
    pub env: &'static str,
}

pub const API_KEY: Setting = Setting {
    name: "API key",
    flag: "--api-key",
    env: "DMF_API_KEY",
};

pub const APP_ID: Setting = Setting {
    name: "app id",
    flag: "--app-id",
    env: "DMF_APP_ID",
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no {} given: pass {} or set {}", .0.name, .0.flag, .0.env)]
pub struct Missing(pub Setting);

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Picks the first non-blank value among `flag`, `env` and `prompt()`.
/// `prompt` is only called when both earlier layers are absent or blank.
pub fn resolve<P>(
    setting: Setting,
    flag: Option<String>,
    env: Option<String>,
    prompt: P,
) -> Result<String, Missing>
where
    P: FnOnce(Setting) -> Option<String>,
{
    non_blank(flag)
        .or_else(|| non_blank(env))
        .or_else(|| non_blank(prompt(setting)))
        .ok_or(Missing(setting))
}
