//! Shared constants used across the application

/// Default backend base URL when neither the config file nor the
/// `FRAGA_BASE_URL` environment variable provides one. Matches the
/// backend's local development default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the backend base URL.
pub const BASE_URL_ENV_VAR: &str = "FRAGA_BASE_URL";

/// Deadline for read operations (GET/DELETE), in seconds.
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Deadline for write operations (POST/PUT), in seconds. Query answering
/// can be slow on large workspaces, so writes get the longer budget.
pub const WRITE_TIMEOUT_SECS: u64 = 60;

/// Workspace used when the user has not configured one.
pub const DEFAULT_WORKSPACE: &str = "default";
