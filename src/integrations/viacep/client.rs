// src/integrations/viacep/client.rs
//
// ViaCEP Integration
//
// GET {base}/ws/{cep}/json/unicode/
//
// - 200 with an address payload        -> Address
// - 200 with {"erro": true | "true"}   -> CodeNotFound
// - 200 with anything else             -> DecodeError
// - any other status                   -> Other

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::domain::{Address, Cep};
use crate::error::{FetchError, Result};
use crate::infrastructure::Context;
use crate::integrations::http::{self, HttpConfig};
use crate::services::Fetcher;

/// ViaCEP signals an unknown CEP with an `erro` flag instead of a 404.
/// Older deployments send a bool, newer ones the string "true".
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    erro: Option<ErrorFlag>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorFlag {
    Bool(bool),
    Text(String),
}

impl ErrorFlag {
    fn is_set(&self) -> bool {
        match self {
            ErrorFlag::Bool(flag) => *flag,
            ErrorFlag::Text(text) => text.eq_ignore_ascii_case("true"),
        }
    }
}

/// Fetcher backed by viacep.com.br.
pub struct ViaCep {
    base_url: String,
    http_client: Client,
}

impl ViaCep {
    pub const NAME: &'static str = "viacep";

    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self::with_client(config.build_client()?, &config.viacep_url))
    }

    /// Reuses an existing client, e.g. one shared with other fetchers.
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }

    fn url(&self, cep: &Cep) -> String {
        http::endpoint(&self.base_url, &format!("ws/{}/json/unicode/", cep))
    }

    fn decode(payload: &[u8]) -> std::result::Result<Address, FetchError> {
        if let Ok(ErrorPayload { erro: Some(flag) }) = serde_json::from_slice(payload) {
            if flag.is_set() {
                return Err(FetchError::not_found());
            }
        }

        let address: Address = serde_json::from_slice(payload)?;
        if address.is_empty() {
            return Err(FetchError::decode("payload carries no address"));
        }
        Ok(address)
    }
}

#[async_trait]
impl Fetcher for ViaCep {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch(&self, ctx: &Context, cep: &Cep) -> std::result::Result<Address, FetchError> {
        let (status, payload) = http::get(ctx, &self.http_client, &self.url(cep)).await?;
        if status != StatusCode::OK {
            return Err(http::unexpected_status(status));
        }
        Self::decode(&payload)
    }
}
