// src/infrastructure/mod.rs
//
// Infrastructure Layer
//
// Runtime plumbing shared by services and integrations.

pub mod context;

pub use context::{CancelHandle, Context, Done};
