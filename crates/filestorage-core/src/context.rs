//! Cancellable execution context for storage operations.
//!
//! Every `FileStorage` call receives a `StorageContext`. Callers use it to
//! bound an operation's lifetime: cancelling the token (or letting the
//! optional timeout elapse) aborts the call with `Cancelled` or
//! `DeadlineExceeded`. The `child()` method derives a context whose token is
//! cancelled together with its parent, but not vice versa.

use std::future::Future;
use std::time::Duration;

use filestorage_types::error::StorageError;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct StorageContext {
    /// Cancellation token -- child tokens are derived from the parent.
    pub cancellation: CancellationToken,
    /// Upper bound on a single operation run through [`StorageContext::run`].
    pub timeout: Option<Duration>,
}

impl StorageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancellation: CancellationToken::new(),
            timeout: Some(timeout),
        }
    }

    /// Derive a context with a child cancellation token and the same timeout.
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            timeout: self.timeout,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Cancel this context (and all child contexts derived from it).
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Fail with `Cancelled` if the context has already been cancelled.
    pub fn check(&self) -> Result<(), StorageError> {
        if self.is_cancelled() {
            return Err(StorageError::Cancelled);
        }
        Ok(())
    }

    /// Drive `fut` to completion unless the context is cancelled or the
    /// timeout elapses first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        self.check()?;

        let bounded = async {
            match self.timeout {
                Some(timeout) => tokio::time::timeout(timeout, fut)
                    .await
                    .map_err(|_| StorageError::DeadlineExceeded)?,
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(StorageError::Cancelled),
            result = bounded => result,
        }
    }
}
