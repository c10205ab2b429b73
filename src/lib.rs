//! Fraga is a terminal client for a document question-answering (RAG) backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] owns the outbound HTTP boundary: request construction, bearer
//!   auth injection, per-verb timeouts, and normalization of every failure
//!   into a single error shape, plus the typed wire payloads.
//! - [`session`] tracks who is logged in, drives the `/auth/*` endpoints,
//!   and persists credentials between runs.
//! - [`cli`] parses arguments and implements the user-facing commands
//!   (ask, workspaces, stats, billing, credits).
//! - [`core`] holds configuration and shared constants.
//!
//! The binary crate (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod session;
pub mod utils;
