//! File logging
//!
//! The dashboard owns the terminal, so log output goes to a file instead of
//! stderr. `RUST_LOG` overrides the default `skycast=info` filter.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Log file name inside the cache directory
const LOG_FILE_NAME: &str = "skycast.log";

/// Returns the default log file path
///
/// Uses the platform-appropriate cache directory:
/// - Linux: ~/.cache/skycast/skycast.log
/// - macOS: ~/Library/Caches/skycast/skycast.log
/// - Windows: C:\Users\<user>\AppData\Local\skycast\cache\skycast.log
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "skycast").map(|dirs| dirs.cache_dir().join(LOG_FILE_NAME))
}

/// Opens the log file for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global tracing subscriber
///
/// # Arguments
/// * `path` - Log file override, or `None` for the default location
///
/// # Returns
/// * `Ok(Some(path))` - The file logs are written to
/// * `Ok(None)` - No usable location exists, logging stays off
/// * `Err(io::Error)` - If the log file could not be opened
pub fn init(path: Option<PathBuf>) -> io::Result<Option<PathBuf>> {
    let Some(path) = path.or_else(default_log_path) else {
        return Ok(None);
    };
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "skycast=info".into());

    // A subscriber already installed (tests) keeps receiving events
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_log_path_file_name() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with("skycast.log"));
        }
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("logs").join("skycast.log");

        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_appends() {
        use std::io::Write;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skycast.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_init_returns_chosen_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skycast.log");

        let used = init(Some(path.clone())).unwrap();
        assert_eq!(used, Some(path.clone()));
        assert!(path.exists());
    }
}
