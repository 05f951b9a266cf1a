// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multicast subject with a bounded replay buffer.
//!
//! A [`ReplaySubject`] broadcasts each pushed item to all active subscribers
//! and retains the most recent items in a buffer of fixed capacity. Late
//! subscribers first receive the buffered items, then join the live
//! broadcast.
//!
//! ## Characteristics
//!
//! - **Replaying**: `subscribe()` always succeeds; a new subscriber starts
//!   with the buffered items, even after the subject has terminated.
//! - **Bounded buffer**: At most `capacity` items are retained; older items
//!   are evicted as new ones arrive.
//! - **Unbounded delivery**: Uses unbounded channels internally, so `next()`
//!   never blocks.
//! - **Thread-safe**: Cheap to clone; all clones share the same state.
//! - **Error/close**: An error is delivered to subscribers that are active at
//!   failure time and terminates the subject. It is not replayed later; late
//!   subscribers receive the buffered values followed by completion.
//!
//! ## Example
//!
//! ```
//! use recast_core::{ReplaySubject, StreamItem};
//! use futures::StreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let subject = ReplaySubject::<i32>::with_capacity(1);
//!
//! subject.next(1).unwrap();
//! subject.next(2).unwrap(); // evicts 1
//! subject.close();
//!
//! // A late subscriber replays the retained item, then completes.
//! let mut stream = subject.subscribe();
//! assert_eq!(stream.next().await, Some(StreamItem::Value(2)));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use crate::{RecastError, StreamItem, SubjectError};
use async_channel::Sender;
use futures::stream::Stream;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Type alias for the boxed stream returned by `subscribe()`.
pub type SubjectBoxStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + 'static>>;

struct ReplayState<T> {
    closed: bool,
    capacity: usize,
    buffer: VecDeque<T>,
    senders: Vec<Sender<StreamItem<T>>>,
}

/// A multicast subject that retains the last `capacity` items for replay.
///
/// See the [module documentation](self) for examples and semantics.
pub struct ReplaySubject<T: Clone + Send + Sync + 'static> {
    state: Arc<Mutex<ReplayState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> ReplaySubject<T> {
    /// Creates a new subject retaining at most `capacity` items for replay.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(ReplayState {
                closed: false,
                capacity,
                buffer: VecDeque::with_capacity(capacity),
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe to this subject and receive a stream of `StreamItem<T>`.
    ///
    /// The stream starts with the buffered items. If the subject is still
    /// open the subscriber then receives live emissions; if it has terminated
    /// the stream ends after the replay.
    pub fn subscribe(&self) -> SubjectBoxStream<T> {
        let mut state = self.state.lock();

        let (tx, rx) = async_channel::unbounded();
        for value in &state.buffer {
            // Unbounded channel with a live receiver: this cannot fail.
            let _ = tx.try_send(StreamItem::Value(value.clone()));
        }
        if !state.closed {
            state.senders.push(tx);
        }
        // When closed, dropping `tx` ends the stream right after the replay.

        Box::pin(rx)
    }

    /// Send a value to all active subscribers and store it in the buffer,
    /// evicting the oldest buffered item beyond capacity.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has terminated.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        if state.capacity > 0 {
            if state.buffer.len() == state.capacity {
                state.buffer.pop_front();
            }
            state.buffer.push_back(value.clone());
        }

        let mut next_senders = Vec::with_capacity(state.senders.len());
        for tx in state.senders.drain(..) {
            if tx.try_send(StreamItem::Value(value.clone())).is_ok() {
                next_senders.push(tx);
            }
        }
        state.senders = next_senders;

        Ok(())
    }

    /// Deliver a stream error to all active subscribers and terminate the
    /// subject.
    ///
    /// The error is not buffered: subscribers arriving after the failure
    /// replay the buffered values and then complete.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has already terminated.
    pub fn error(&self, err: RecastError) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        debug!(error = %err, "subject terminating with error");
        for tx in state.senders.drain(..) {
            let _ = tx.try_send(StreamItem::Error(err.clone()));
        }
        state.closed = true;

        Ok(())
    }

    /// Terminates the subject, completing all subscriber streams.
    ///
    /// The replay buffer is retained: late subscribers still receive the
    /// buffered items before their stream ends. Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` if the subject has terminated.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of currently active subscribers.
    ///
    /// The count is updated lazily: dropped subscribers are removed on the
    /// next `next()` call, not immediately when dropped.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }

    /// Returns the number of items currently held in the replay buffer.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.state.lock().buffer.len()
    }

    /// Returns the replay buffer capacity this subject was created with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for ReplaySubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
