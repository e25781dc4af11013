use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the log file goes when `--log-file` is not given
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("breathscope")
                .join("breathscope.log")
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "breathscope") {
            proj_dirs.data_local_dir().join("breathscope.log")
        } else {
            PathBuf::from("breathscope.log")
        }
    }
}
