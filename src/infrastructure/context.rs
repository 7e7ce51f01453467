// src/infrastructure/context.rs
//
// Execution Context
//
// Carries cancellation and an optional deadline across task boundaries.
//
// CRITICAL RULES:
// - A child is done whenever its parent is done
// - A child's deadline is never later than its parent's
// - Dropping a CancelHandle cancels its context
// - Once done, a context stays done

use std::future::{pending, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why a context is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Done {
    Canceled,
    DeadlineExceeded,
}

impl std::fmt::Display for Done {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Done::Canceled => write!(f, "context canceled"),
            Done::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    canceled: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
    parent: Option<Context>,
}

/// Cancels the context it was created with, on `cancel()` or on drop.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Context {
    /// A context that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self {
            inner: Arc::new(Inner {
                canceled: None,
                deadline: None,
                parent: None,
            }),
        }
    }

    /// Derives a child that can be canceled on its own.
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        self.child(None)
    }

    /// Derives a child that expires after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> (Context, CancelHandle) {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derives a child that expires at `deadline` (or earlier, if the
    /// parent does).
    pub fn with_deadline(&self, deadline: Instant) -> (Context, CancelHandle) {
        self.child(Some(deadline))
    }

    fn child(&self, deadline: Option<Instant>) -> (Context, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let deadline = match (self.inner.deadline, deadline) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };
        let ctx = Context {
            inner: Arc::new(Inner {
                canceled: Some(rx),
                deadline,
                parent: Some(self.clone()),
            }),
        };
        (ctx, CancelHandle { tx })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Non-blocking check: `Some` once the context is done.
    pub fn err(&self) -> Option<Done> {
        if let Some(rx) = &self.inner.canceled {
            if *rx.borrow() {
                return Some(Done::Canceled);
            }
        }
        if let Some(done) = self.inner.parent.as_ref().and_then(Context::err) {
            return Some(done);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Done::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is done.
    pub fn done(&self) -> Pin<Box<dyn Future<Output = Done> + Send + '_>> {
        Box::pin(async move {
            if let Some(done) = self.err() {
                return done;
            }

            let canceled = async {
                match &self.inner.canceled {
                    Some(rx) => {
                        let mut rx = rx.clone();
                        loop {
                            if *rx.borrow_and_update() {
                                break;
                            }
                            // A closed channel means the handle is gone,
                            // and dropping the handle cancels.
                            if rx.changed().await.is_err() {
                                break;
                            }
                        }
                    }
                    None => pending::<()>().await,
                }
            };

            let expired = async {
                match self.inner.deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => pending::<()>().await,
                }
            };

            let parent = async {
                match &self.inner.parent {
                    Some(parent) => parent.done().await,
                    None => pending::<Done>().await,
                }
            };

            tokio::select! {
                _ = canceled => Done::Canceled,
                _ = expired => Done::DeadlineExceeded,
                done = parent => done,
            }
        })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_background_is_never_done() {
        let ctx = Context::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());
        assert!(tokio::time::timeout(SHORT, ctx.done()).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel() {
        let (ctx, cancel) = Context::background().with_cancel();
        assert!(!ctx.is_done());

        let waiter = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.done().await })
        };
        cancel.cancel();

        assert_eq!(ctx.err(), Some(Done::Canceled));
        assert_eq!(waiter.await.unwrap(), Done::Canceled);
    }

    #[tokio::test]
    async fn test_dropping_handle_cancels() {
        let (ctx, cancel) = Context::background().with_cancel();
        drop(cancel);
        assert_eq!(ctx.err(), Some(Done::Canceled));
        assert_eq!(ctx.done().await, Done::Canceled);
    }

    #[tokio::test]
    async fn test_parent_cancel_reaches_child() {
        let (parent, cancel_parent) = Context::background().with_cancel();
        let (child, _cancel_child) = parent.with_cancel();

        let waiter = {
            let child = child.clone();
            tokio::spawn(async move { child.done().await })
        };
        cancel_parent.cancel();

        assert_eq!(child.err(), Some(Done::Canceled));
        assert_eq!(waiter.await.unwrap(), Done::Canceled);
    }

    #[tokio::test]
    async fn test_child_cancel_does_not_reach_parent() {
        let (parent, _cancel_parent) = Context::background().with_cancel();
        let (child, cancel_child) = parent.with_cancel();
        cancel_child.cancel();

        assert!(child.is_done());
        assert!(!parent.is_done());
    }

    #[tokio::test]
    async fn test_timeout() {
        let (ctx, _cancel) = Context::background().with_timeout(SHORT);
        assert!(ctx.err().is_none());
        assert_eq!(ctx.done().await, Done::DeadlineExceeded);
        assert_eq!(ctx.err(), Some(Done::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_expired_deadline_is_done_immediately() {
        let (ctx, _cancel) = Context::background().with_timeout(Duration::ZERO);
        assert_eq!(ctx.err(), Some(Done::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_child_deadline_never_exceeds_parent() {
        let (parent, _p) = Context::background().with_timeout(SHORT);
        let (child, _c) = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        let (cancelable, _c) = parent.with_cancel();
        assert_eq!(cancelable.deadline(), parent.deadline());
        assert_eq!(cancelable.done().await, Done::DeadlineExceeded);
    }
}
