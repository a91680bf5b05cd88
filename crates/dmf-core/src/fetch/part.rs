//! Sequential writer for the `.part` file a download streams into.
//!
//! The body only gets the final artifact name through [`PartFile::finalize`],
//! so an interrupted or failed transfer never leaves a file that the skip
//! check would accept.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const PART_SUFFIX: &str = "part";

/// `<target>.part` next to the target file.
pub fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(PART_SUFFIX);
    target.with_file_name(name)
}

/// Removes `path` if it exists; a missing file is not an error.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

pub struct PartFile {
    file: File,
    written: u64,
}

impl PartFile {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file, written: 0 })
    }

    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flush and sync to disk; returns the number of bytes written.
    pub fn sync(mut self) -> io::Result<u64> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(self.written)
    }
}

/// Renames the finished part file onto `target`, replacing any previous file.
pub fn finalize(part: &Path, target: &Path) -> io::Result<()> {
    std::fs::rename(part, target)
}
