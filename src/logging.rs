use std::fs::{self, File};
use std::path::Path;

use crate::error::Result;

/// Creates (truncating) the log file and any missing parent directories.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}

/// Sends all log output to `path` so it never draws over the terminal UI.
/// Level defaults to info; RUST_LOG overrides it.
pub fn init(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("run.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn open_truncates_previous_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "old run").unwrap();
        open_log_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
