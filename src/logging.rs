//! Diagnostic logging setup.
//!
//! Fraga logs transport-level diagnostics through `tracing`. Output is off by
//! default and controlled with the standard `RUST_LOG` filter syntax, e.g.
//! `RUST_LOG=fraga=debug fraga ask "..."`. Logs go to stderr so they never
//! interleave with command output on stdout.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
