// src/integrations/mod.rs
//
// External Integrations Module
//
// One Fetcher per remote CEP source, plus the HTTP plumbing they share.

pub mod brasilapi;
pub mod http;
pub mod viacep;

pub use brasilapi::BrasilApi;
pub use http::HttpConfig;
pub use viacep::ViaCep;

use std::sync::Arc;

use crate::error::Result;
use crate::services::Fetcher;

/// The fetchers used when none is configured: BrasilAPI and ViaCEP,
/// sharing one HTTP client built from `config`.
pub fn default_fetchers(config: &HttpConfig) -> Result<Vec<Arc<dyn Fetcher>>> {
    let client = config.build_client()?;
    Ok(vec![
        Arc::new(BrasilApi::with_client(client.clone(), &config.brasilapi_url)),
        Arc::new(ViaCep::with_client(client, &config.viacep_url)),
    ])
}
