// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Owned background task with cooperative cancellation.

use core::future::Future;
use tokio_util::sync::CancellationToken;

/// Handle to a spawned drive task, cancelled automatically on drop.
///
/// The spawned future receives a [`CancellationToken`] that it should select
/// against so that dropping (or explicitly cancelling) the handle tears the
/// task down at its next checkpoint. This is what makes detaching the last
/// subscriber deterministic: the broadcaster drops its `DriveTask` and the
/// in-flight activation stops.
#[derive(Debug)]
pub struct DriveTask {
    cancel: CancellationToken,
}

impl DriveTask {
    /// Spawn a background task with cancellation support.
    ///
    /// The closure receives the token to monitor; the returned future runs on
    /// the tokio runtime until it completes or the token fires.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Signal the task to stop without waiting for it to finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for DriveTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
