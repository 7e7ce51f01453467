// src/lib.rs
// cep - Brazilian postal code (CEP) lookup across concurrent sources
//
// Architecture:
// - Domain: canonical CEP and Address value objects, no I/O
// - Services: the Fetcher capability and the resolution engine that races it
// - Integrations: one Fetcher per remote source (ViaCEP, BrasilAPI)
// - Infrastructure: cancellation / deadline context shared across tasks

pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod integrations;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{canonicalize, valid, Address, Cep, InvalidCode};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{Error, ErrorKind, FetchError, LookupError, Result};

// ============================================================================
// PUBLIC API - Context
// ============================================================================

pub use infrastructure::{CancelHandle, Context, Done};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{resolve, Fetcher, ResolutionService};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{default_fetchers, BrasilApi, HttpConfig, ViaCep};
