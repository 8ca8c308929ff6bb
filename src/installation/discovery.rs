//! Finding and probing the jextract launcher.

use crate::error::{Error, Result};

use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::debug;
use walkdir::WalkDir;

/// Name printed by the version probe.
pub const TOOL_NAME: &str = "jextract";

/// Flag that makes jextract print its version.
pub const VERSION_FLAG: &str = "--version";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i){} (?P<version>\d+)\r?\n", regex::escape(TOOL_NAME));
    Regex::new(&pattern).expect("version pattern is a valid regex")
});

/// Find the first executable regular file matching `**/bin/<filename>` below `root`.
///
/// Directory entries are visited in file name order, so the result is stable
/// for a given tree.
pub fn find_executable(root: &Path, filename: &str) -> Result<PathBuf> {
    let found = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .find(|path| is_launcher(path, filename));

    match found {
        Some(path) => {
            debug!("Found jextract executable {:?}", path);
            Ok(path)
        }
        None => Err(Error::ExecutableNotFound {
            root: root.to_path_buf(),
            filename: filename.to_string(),
        }),
    }
}

fn is_launcher(path: &Path, filename: &str) -> bool {
    let in_bin = path
        .parent()
        .and_then(|p| p.file_name())
        .is_some_and(|name| name == "bin");
    let named = path.file_name().is_some_and(|name| name == filename);
    in_bin && named && path.is_file() && is_executable(path)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Parse the major version out of `jextract --version` output.
///
/// The output must contain `jextract <digits>` (any case) followed by a line
/// break.
pub fn parse_executable_version(output: &str) -> Result<u32> {
    VERSION_PATTERN
        .captures(output)
        .and_then(|caps| caps.name("version"))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| Error::VersionParse {
            output: output.to_string(),
        })
}

/// Run `executable --version` and parse its error stream.
pub async fn probe_version(executable: &Path) -> Result<u32> {
    debug!("Probing version of {:?}", executable);
    let output = Command::new(executable)
        .arg(VERSION_FLAG)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| Error::Process {
            program: executable.to_path_buf(),
            source,
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    let version = parse_executable_version(&stderr)?;
    debug!("{:?} reports jextract {}", executable, version);
    Ok(version)
}
