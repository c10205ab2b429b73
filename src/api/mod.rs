//! Outbound HTTP boundary to the RAG backend.
//!
//! Every call to the backend goes through [`client::ApiClient`], which owns
//! base-URL resolution, bearer auth injection, per-verb timeouts, and the
//! normalization of every failure into [`error::ApiError`]. Callers never
//! see a raw transport error or an unparsed non-2xx body.

pub mod client;
pub mod error;
pub mod models;
#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ApiClient, Payload, Timeouts};
pub use error::ApiError;
