use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted user configuration.
///
/// Everything is optional; hard-coded defaults from
/// [`crate::core::constants`] apply when a field is absent.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Backend base URL. Overrides the `FRAGA_BASE_URL` environment
    /// variable and the built-in default.
    pub base_url: Option<String>,
    /// Workspace used when a command does not pass `--workspace`.
    pub default_workspace: Option<String>,
    /// Deadline for read operations (GET/DELETE), in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Deadline for write operations (POST/PUT), in seconds.
    pub write_timeout_secs: Option<u64>,
}

impl Config {
    pub fn workspace_or_default(&self) -> String {
        self.default_workspace
            .clone()
            .unwrap_or_else(|| crate::core::constants::DEFAULT_WORKSPACE.to_string())
    }
}

/// Get a user-friendly display string for a path.
/// Converts absolute paths to use ~ notation on Unix-like systems when possible.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
