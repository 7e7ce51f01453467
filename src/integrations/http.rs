// src/integrations/http.rs
//
// Shared HTTP plumbing for the remote CEP sources.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};

use crate::error::FetchError;
use crate::infrastructure::Context;

/// Settings for the built-in fetchers.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,
    pub user_agent: String,
    pub viacep_url: String,
    pub brasilapi_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            viacep_url: "https://viacep.com.br".to_string(),
            brasilapi_url: "https://brasilapi.com.br".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn build_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
    }
}

/// Joins `base_url` and `path` without doubling the '/'.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Issues a GET and reads the whole body, giving up as soon as `ctx` is
/// done.
///
/// Transport failures are classified by [`FetchError`]'s `From` impl:
/// client timeouts become `Timeout`, the rest `Other`.
pub(crate) async fn get(
    ctx: &Context,
    client: &Client,
    url: &str,
) -> Result<(StatusCode, Vec<u8>), FetchError> {
    let request = async {
        let response = client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok::<_, reqwest::Error>((status, body.to_vec()))
    };

    tokio::select! {
        result = request => result.map_err(FetchError::from),
        done = ctx.done() => Err(FetchError::from(done)),
    }
}

/// Failure for a status the source does not document.
pub(crate) fn unexpected_status(status: StatusCode) -> FetchError {
    FetchError::other(format!("unexpected status {}", status))
}
