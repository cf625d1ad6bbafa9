use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::task::JoinHandle;
use tracing::warn;

use crate::{error::FetchError, model::WeatherSnapshot};

/// A forecast fetch running in the background.
///
/// Await it to get the result. Dropping it (or calling [`cancel`](Self::cancel))
/// aborts the fetch, so a screen that goes away never receives a stale snapshot.
#[derive(Debug)]
pub struct FetchHandle {
    task: JoinHandle<Result<WeatherSnapshot, FetchError>>,
}

impl FetchHandle {
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<F>(fetch: F) -> Self
    where
        F: Future<Output = Result<WeatherSnapshot, FetchError>> + Send + 'static,
    {
        Self {
            task: tokio::spawn(fetch),
        }
    }

    /// Awaiting a cancelled handle yields [`FetchError::Cancelled`].
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Future for FetchHandle {
    type Output = Result<WeatherSnapshot, FetchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.task).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) => {
                if e.is_panic() {
                    warn!("forecast task panicked");
                }
                Err(FetchError::Cancelled)
            }
        })
    }
}

impl Drop for FetchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
