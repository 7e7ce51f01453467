// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod fetcher;
pub mod resolution_service;


pub use fetcher::Fetcher;

pub use resolution_service::{resolve, ResolutionService};
