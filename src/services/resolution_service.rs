// src/services/resolution_service.rs
//
// Resolution Service
//
// Resolves a raw CEP by racing every configured Fetcher.
//
// CRITICAL RULES:
// - Invalid input never reaches a fetcher
// - The first address to arrive wins; the rest are canceled
// - Every failure is merged into the LookupError, none is dropped
// - Exactly one outcome per call, and no task outlives the call
// - No retries: a fetcher failing is final for this call

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::domain::{canonicalize, Address};
use crate::error::{Error, FetchError, LookupError, Result};
use crate::infrastructure::Context;
use crate::integrations::{default_fetchers, HttpConfig};
use crate::services::fetcher::Fetcher;

// ============================================================================
// RESOLUTION SERVICE
// ============================================================================

/// A fixed set of fetchers, shared by every `resolve` call.
pub struct ResolutionService {
    fetchers: Vec<Arc<dyn Fetcher>>,
}

impl ResolutionService {
    /// Uses `fetchers`, or the default pair when `fetchers` is empty.
    pub fn new(fetchers: Vec<Arc<dyn Fetcher>>) -> Result<Self> {
        if fetchers.is_empty() {
            return Self::with_default_fetchers();
        }
        Ok(Self { fetchers })
    }

    pub fn with_default_fetchers() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Default pair, built from `config`.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            fetchers: default_fetchers(config)?,
        })
    }

    pub fn fetchers(&self) -> &[Arc<dyn Fetcher>] {
        &self.fetchers
    }

    pub async fn resolve(&self, ctx: &Context, raw: &str) -> Result<Address> {
        resolve(ctx, raw, &self.fetchers).await
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Searches for the address of `raw` using every fetcher concurrently.
///
/// Returns the first address found. When every fetcher fails, or `ctx` is
/// done first, returns `Error::Lookup` with all the failures observed.
/// An empty `fetchers` is a configuration error (`Error::NoFetchers`).
pub async fn resolve(ctx: &Context, raw: &str, fetchers: &[Arc<dyn Fetcher>]) -> Result<Address> {
    // Held until return: dropping it cancels every fetch still running.
    let (ctx, cancel) = ctx.with_cancel();

    let cep = canonicalize(raw)?;

    if fetchers.is_empty() {
        return Err(Error::NoFetchers);
    }

    if let Some(done) = ctx.err() {
        debug!("context done before dispatching {}: {}", cep, done);
        return Err(LookupError::from_iter([FetchError::from(done)]).into());
    }

    debug!("dispatching {} to {} fetchers", cep, fetchers.len());

    // Single slot: only the winner needs room, later results are dropped.
    let (address_tx, mut address_rx) = mpsc::channel::<Address>(1);
    // One slot per fetcher so a failure can always be reported without
    // waiting on the loop below.
    let (failure_tx, mut failure_rx) = mpsc::channel::<FetchError>(fetchers.len());

    let mut tasks = JoinSet::new();
    for fetcher in fetchers {
        let fetcher = Arc::clone(fetcher);
        let ctx = ctx.clone();
        let cep = cep.clone();
        let address_tx = address_tx.clone();
        let failure_tx = failure_tx.clone();

        tasks.spawn(async move {
            let outcome = tokio::select! {
                outcome = fetcher.fetch(&ctx, &cep) => outcome,
                _ = ctx.done() => return,
            };

            match outcome {
                Ok(address) => {
                    if address_tx.try_send(address).is_err() {
                        debug!("{}: late address for {} discarded", fetcher.name(), cep);
                    }
                }
                Err(err) => {
                    let err = err.with_fetcher(fetcher.name());
                    debug!("{}", err);
                    if failure_tx.try_send(err).is_err() {
                        debug!("{}: late failure for {} discarded", fetcher.name(), cep);
                    }
                }
            }
        });
    }

    // Only the tasks hold senders now: the failure channel closes once
    // every task is finished.
    drop(address_tx);
    drop(failure_tx);

    let mut lookup = LookupError::new();
    loop {
        tokio::select! {
            Some(address) = address_rx.recv() => {
                cancel.cancel();
                info!("resolved {}", cep);
                return Ok(address);
            }
            done = ctx.done() => {
                while let Ok(failure) = failure_rx.try_recv() {
                    lookup.merge(failure);
                }
                lookup.merge(FetchError::from(done));
                warn!("lookup of {} interrupted: {}", cep, done);
                return Err(lookup.into());
            }
            failure = failure_rx.recv() => match failure {
                Some(failure) => lookup.merge(failure),
                None => {
                    // The winner may have finished right before the close.
                    if let Ok(address) = address_rx.try_recv() {
                        cancel.cancel();
                        info!("resolved {}", cep);
                        return Ok(address);
                    }
                    // Tasks that saw the context end exit without reporting,
                    // so the channel can close before the arm above runs.
                    if let Some(done) = ctx.err() {
                        lookup.merge(FetchError::from(done));
                        warn!("lookup of {} interrupted: {}", cep, done);
                        return Err(lookup.into());
                    }
                    warn!("every fetcher failed for {}: {}", cep, lookup.kind());
                    return Err(lookup.into());
                }
            },
        }
    }
}
