// src/error/mod.rs
//
// Error model: failure kinds, per-fetcher failures, the aggregate of
// one resolution attempt, and the crate-level Error.

pub mod aggregate;
pub mod types;

pub use aggregate::LookupError;
pub use types::{Error, ErrorKind, FetchError, Result};
