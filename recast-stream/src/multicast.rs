// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Factory-based shared broadcaster.
//!
//! A [`Multicast`] shares one activation among its subscribers exactly like
//! [`ShareReplay`](crate::ShareReplay) while the subscriber count is
//! positive. The difference is the lifetime of the buffering subject: it is
//! built by a user-supplied factory at connect time and destroyed, buffer
//! included, when the subscriber count reaches zero. A subscriber arriving
//! after that causes the factory to run again and triggers a brand-new
//! activation; no stale value is ever replayed.
//!
//! See the comparison table in the [`share_replay`](crate::share_replay)
//! module docs.

use crate::cold_source::{BoxItemStream, ColdSource};
use crate::connection::{ConnectionState, Detach};
use crate::subscription::Subscription;
use futures::StreamExt;
use parking_lot::Mutex;
use recast_core::{DriveTask, ReplaySubject, StreamItem};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A refcounted broadcaster whose buffering subject is rebuilt on every
/// connect.
///
/// Created by [`MulticastExt::multicast`]. Cheap to clone; all clones share
/// the same connection and refCount.
pub struct Multicast<T: Clone + Send + Sync + 'static> {
    inner: Arc<MulticastInner<T>>,
}

struct MulticastInner<T: Clone + Send + Sync + 'static> {
    source: ColdSource<T>,
    factory: Box<dyn Fn() -> ReplaySubject<T> + Send + Sync + 'static>,
    state: Mutex<MulticastState<T>>,
}

struct MulticastState<T: Clone + Send + Sync + 'static> {
    connection: ConnectionState,
    refcount: usize,
    subject: Option<ReplaySubject<T>>,
    task: Option<DriveTask>,
}

impl<T: Clone + Send + Sync + 'static> Multicast<T> {
    /// Creates a broadcaster over `source` whose subject is produced by
    /// `factory` at every connect.
    #[must_use]
    pub fn new<F>(source: ColdSource<T>, factory: F) -> Self
    where
        F: Fn() -> ReplaySubject<T> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(MulticastInner {
                source,
                factory: Box::new(factory),
                state: Mutex::new(MulticastState {
                    connection: ConnectionState::Disconnected,
                    refcount: 0,
                    subject: None,
                    task: None,
                }),
            }),
        }
    }

    /// Attach a subscriber.
    ///
    /// When disconnected this invokes the subject factory and starts a fresh
    /// activation; otherwise the subscriber joins the current subject.
    pub fn subscribe(&self) -> Subscription<T> {
        let stream = {
            let mut state = self.inner.state.lock();
            state.refcount += 1;
            let existing = if state.connection == ConnectionState::Disconnected {
                None
            } else {
                state.subject.clone()
            };
            let subject = match existing {
                Some(subject) => subject,
                None => {
                    debug!("first subscriber attached, building subject and activating source");
                    let subject = (self.inner.factory)();
                    state.subject = Some(subject.clone());
                    state.connection = ConnectionState::Connecting;
                    let activation = self.inner.source.activate();
                    state.task = Some(spawn_drive(self.inner.clone(), subject.clone(), activation));
                    subject
                }
            };
            subject.subscribe()
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
}

impl<T: Clone + Send + Sync + 'static> Clone for Multicast<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> MulticastInner<T> {
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
    inner: Arc<MulticastInner<T>>,
    subject: ReplaySubject<T>,
    mut activation: BoxItemStream<T>,
) -> DriveTask {
    DriveTask::spawn(move |cancel| async move {
        loop {
            tokio::select! {
                biased;
                // The detach path discards the subject; nothing to clean up here.
                _ = cancel.cancelled() => break,
                item = activation.next() => match item {
                    Some(StreamItem::Value(value)) => {
                        inner.mark_connected(&cancel);
                        if subject.next(value).is_err() {
                            break;
                        }
                    }
                    Some(StreamItem::Error(err)) => {
                        inner.mark_connected(&cancel);
                        let _ = subject.error(err);
                        break;
                    }
                    None => {
                        inner.mark_connected(&cancel);
                        subject.close();
                        break;
                    }
                },
            }
        }
    })
}

impl<T: Clone + Send + Sync + 'static> Detach for MulticastInner<T> {
    fn detach(&self) {
        let mut state = self.state.lock();
        state.refcount = state.refcount.saturating_sub(1);
        if state.refcount == 0 && state.connection != ConnectionState::Disconnected {
            state.connection = ConnectionState::Disconnecting;
            if let Some(task) = state.task.take() {
                task.cancel();
            }
            state.subject = None;
            state.connection = ConnectionState::Disconnected;
            debug!("last subscriber detached, subject and buffer discarded");
        }
    }
}

/// Extension trait turning a [`ColdSource`] into a [`Multicast`].
pub trait MulticastExt<T: Clone + Send + Sync + 'static> {
    /// Shares a single activation among subscribers through a subject built
    /// by `factory` at connect time and discarded when the subscriber count
    /// reaches zero.
    fn multicast<F>(self, factory: F) -> Multicast<T>
    where
        F: Fn() -> ReplaySubject<T> + Send + Sync + 'static;
}

impl<T: Clone + Send + Sync + 'static> MulticastExt<T> for ColdSource<T> {
    fn multicast<F>(self, factory: F) -> Multicast<T>
    where
        F: Fn() -> ReplaySubject<T> + Send + Sync + 'static,
    {
        Multicast::new(self, factory)
    }
}
