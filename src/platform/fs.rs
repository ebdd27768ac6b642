// LogQuery - platform/fs.rs
//
// Filesystem helpers for saving exports and showing them to the user.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Write `bytes` to `path` atomically: the data goes to a sibling temp file
/// first and is renamed over the destination, so a failed write never leaves
/// a truncated file behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let result = (|| -> io::Result<()> {
        {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, path)
    })();

    if result.is_err() {
        // Cleanup is best effort; the write error is what gets reported.
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Show a saved export in the system file manager.
///
/// Windows and macOS select the file itself; on Linux the parent directory
/// is opened. Launch failures are logged and otherwise ignored.
pub fn reveal_in_file_manager(path: &Path) {
    let Some(mut command) = reveal_command(path) else {
        tracing::debug!(path = %path.display(), "No file manager integration on this platform");
        return;
    };
    if let Err(e) = command.spawn() {
        tracing::warn!(path = %path.display(), error = %e, "Failed to open file manager");
    }
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Option<Command> {
    // Explorer wants `/select,<path>` as one argument.
    let mut command = Command::new("explorer");
    command.arg(format!("/select,{}", path.display()));
    Some(command)
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Option<Command> {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    Some(command)
}

#[cfg(target_os = "linux")]
fn reveal_command(path: &Path) -> Option<Command> {
    let mut command = Command::new("xdg-open");
    command.arg(path.parent().unwrap_or(path));
    Some(command)
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn reveal_command(_path: &Path) -> Option<Command> {
    None
}
