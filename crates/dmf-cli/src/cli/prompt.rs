//! Interactive fallback for settings missing from flags and environment.

use dmf_core::credentials::Setting;
use std::io::{self, BufRead, IsTerminal, Write};

/// Asks for `setting` on stdin. Returns `None` when stdin is not a terminal
/// or nothing could be read.
pub fn ask(setting: Setting) -> Option<String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        tracing::debug!(setting = setting.name, "stdin is not a terminal; not prompting");
        return None;
    }
    print!("Enter {}: ", setting.name);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    stdin.lock().read_line(&mut line).ok()?;
    Some(line)
}
