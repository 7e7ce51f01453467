// src/integrations/brasilapi/client.rs
//
// BrasilAPI Integration
//
// GET {base}/api/cep/v1/{cep}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::domain::{Address, Cep};
use crate::error::{FetchError, Result};
use crate::infrastructure::Context;
use crate::integrations::http::{self, HttpConfig};
use crate::services::Fetcher;

/// Fetcher backed by brasilapi.com.br.
pub struct BrasilApi {
    base_url: String,
    http_client: Client,
}

impl BrasilApi {
    pub const NAME: &'static str = "brasilapi";

    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self::with_client(
            config.build_client()?,
            &config.brasilapi_url,
        ))
    }

    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }

    fn url(&self, cep: &Cep) -> String {
        http::endpoint(&self.base_url, &format!("api/cep/v1/{}", cep))
    }
}

#[async_trait]
impl Fetcher for BrasilApi {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch(&self, ctx: &Context, cep: &Cep) -> std::result::Result<Address, FetchError> {
        let (status, payload) = http::get(ctx, &self.http_client, &self.url(cep)).await?;
        match status {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(FetchError::not_found()),
            status => return Err(http::unexpected_status(status)),
        }

        let address: Address = serde_json::from_slice(&payload)?;
        if address.is_empty() {
            return Err(FetchError::decode("payload carries no address"));
        }
        Ok(address)
    }
}
