// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Buffer-retaining shared broadcaster.
//!
//! A [`ShareReplay`] turns a [`ColdSource`] into a refcounted multicast
//! source with a replay buffer that outlives its subscribers.
//!
//! ## Characteristics
//!
//! - **Shared execution**: The first subscriber triggers a single activation;
//!   concurrent subscribers attach to the same in-flight activation.
//! - **Replay**: A buffer of the configured capacity retains the most recent
//!   values for late subscribers.
//! - **Buffer outlives refCount**: When the subscriber count drops to zero
//!   the activation is torn down, but the buffer is kept. A later subscriber
//!   replays the buffered values without a new activation if the source had
//!   completed, and re-activates only when the previous activation was torn
//!   down mid-flight.
//!
//! ## Example
//!
//! ```
//! use recast_stream::{ColdSource, ShareReplayExt};
//! use recast_core::RecastError;
//! use futures::StreamExt;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = calls.clone();
//! let shared = ColdSource::deferred(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     async move { Ok::<_, RecastError>("payload".to_string()) }
//! })
//! .share_replay(1);
//!
//! let mut sub1 = shared.subscribe();
//! let mut sub2 = shared.subscribe();
//!
//! // Both subscribers observe the same single activation.
//! assert_eq!(sub1.next().await.unwrap().unwrap(), "payload");
//! assert_eq!(sub2.next().await.unwrap().unwrap(), "payload");
//! drop(sub1);
//! drop(sub2);
//!
//! // The buffer survived the refCount reaching zero.
//! let mut late = shared.subscribe();
//! assert_eq!(late.next().await.unwrap().unwrap(), "payload");
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! # }
//! ```
//!
//! ## Comparison with [`Multicast`](crate::Multicast)
//!
//! | | Buffer at refCount zero | Later subscriber |
//! |---|---|---|
//! | `ShareReplay` | retained | replays buffered value |
//! | `Multicast` | discarded with its subject | fresh subject, new activation |

use crate::cold_source::{BoxItemStream, ColdSource};
use crate::connection::{ConnectionState, Detach};
use crate::subscription::Subscription;
use futures::StreamExt;
use parking_lot::Mutex;
use recast_core::{DriveTask, ReplaySubject, StreamItem};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A refcounted broadcaster whose replay buffer survives disconnection.
///
/// Created by [`ShareReplayExt::share_replay`]. Cheap to clone; all clones
/// share the same activation, buffer, and refCount.
pub struct ShareReplay<T: Clone + Send + Sync + 'static> {
    inner: Arc<ShareReplayInner<T>>,
}

struct ShareReplayInner<T: Clone + Send + Sync + 'static> {
    source: ColdSource<T>,
    // Persistent across connect/disconnect cycles.
    subject: ReplaySubject<T>,
    state: Mutex<ShareState>,
}

struct ShareState {
    connection: ConnectionState,
    refcount: usize,
    task: Option<DriveTask>,
}

impl<T: Clone + Send + Sync + 'static> ShareReplay<T> {
    /// Creates a broadcaster over `source` with a replay buffer of
    /// `capacity` items.
    ///
    /// Nothing is activated until the first subscriber attaches.
    #[must_use]
    pub fn new(source: ColdSource<T>, capacity: usize) -> Self {
        Self {
            inner: Arc::new(ShareReplayInner {
                source,
                subject: ReplaySubject::with_capacity(capacity),
                state: Mutex::new(ShareState {
                    connection: ConnectionState::Disconnected,
                    refcount: 0,
                    task: None,
                }),
            }),
        }
    }

    /// Attach a subscriber.
    ///
    /// The first subscriber triggers the activation; later concurrent
    /// subscribers join it. A subscriber arriving after the source completed
    /// replays the buffer and then ends, with no new activation.
    pub fn subscribe(&self) -> Subscription<T> {
        let stream = {
            let mut state = self.inner.state.lock();
            state.refcount += 1;
            let stream = self.inner.subject.subscribe();
            if state.connection == ConnectionState::Disconnected
                && !self.inner.subject.is_closed()
            {
                debug!("first subscriber attached, activating shared source");
                state.connection = ConnectionState::Connecting;
                let activation = self.inner.source.activate();
                state.task = Some(spawn_drive(self.inner.clone(), activation));
            }
            stream
        };
        Subscription::new(stream, self.inner.clone())
    }

    /// Current lifecycle state of the shared activation.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.inner.state.lock().connection
    }

    /// Number of currently attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().refcount
    }

    /// Returns `true` if the underlying source has completed or errored.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.subject.is_closed()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for ShareReplay<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ShareReplayInner<T> {
    fn mark_connected(&self, cancel: &CancellationToken) {
        // A torn-down drive task must not touch a newer connection cycle.
        if cancel.is_cancelled() {
            return;
        }
        let mut state = self.state.lock();
        if state.connection == ConnectionState::Connecting {
            state.connection = ConnectionState::Connected;
        }
    }
}

fn spawn_drive<T: Clone + Send + Sync + 'static>(
    inner: Arc<ShareReplayInner<T>>,
    mut activation: BoxItemStream<T>,
) -> DriveTask {
    DriveTask::spawn(move |cancel| async move {
        loop {
            tokio::select! {
                biased;
                // Teardown keeps the subject and its buffer.
                _ = cancel.cancelled() => break,
                item = activation.next() => match item {
                    Some(StreamItem::Value(value)) => {
                        inner.mark_connected(&cancel);
                        if inner.subject.next(value).is_err() {
                            break;
                        }
                    }
                    Some(StreamItem::Error(err)) => {
                        inner.mark_connected(&cancel);
                        let _ = inner.subject.error(err);
                        break;
                    }
                    None => {
                        inner.mark_connected(&cancel);
                        inner.subject.close();
                        break;
                    }
                },
            }
        }
    })
}

impl<T: Clone + Send + Sync + 'static> Detach for ShareReplayInner<T> {
    fn detach(&self) {
        let mut state = self.state.lock();
        state.refcount = state.refcount.saturating_sub(1);
        if state.refcount == 0 && state.connection != ConnectionState::Disconnected {
            state.connection = ConnectionState::Disconnecting;
            if let Some(task) = state.task.take() {
                task.cancel();
            }
            state.connection = ConnectionState::Disconnected;
            debug!("last subscriber detached, activation torn down, buffer retained");
        }
    }
}

/// Extension trait turning a [`ColdSource`] into a [`ShareReplay`].
pub trait ShareReplayExt<T: Clone + Send + Sync + 'static> {
    /// Shares a single activation among subscribers, retaining the last
    /// `capacity` values for replay even after the subscriber count reaches
    /// zero.
    fn share_replay(self, capacity: usize) -> ShareReplay<T>;
}

impl<T: Clone + Send + Sync + 'static> ShareReplayExt<T> for ColdSource<T> {
    fn share_replay(self, capacity: usize) -> ShareReplay<T> {
        ShareReplay::new(self, capacity)
    }
}
