// src/services/fetcher.rs
//
// Fetcher - capability to resolve a canonical CEP against one source
//
// CRITICAL RULES:
// - Implementations MUST be safe to call concurrently
// - Implementations MUST return promptly once the context is done
// - Remote "not found" is CodeNotFound, a bad payload is DecodeError,
//   a network timeout is Timeout, anything else is Other

use async_trait::async_trait;

use crate::domain::{Address, Cep};
use crate::error::FetchError;
use crate::infrastructure::Context;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short, stable name used to tag failures and in logs.
    fn name(&self) -> &'static str;

    /// Searches for the address of `cep`.
    async fn fetch(&self, ctx: &Context, cep: &Cep) -> Result<Address, FetchError>;
}
