// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lazy, re-activatable sources.
//!
//! A [`ColdSource`] is a factory for item streams: nothing runs until
//! [`activate()`](ColdSource::activate) is called, and every activation
//! executes the underlying computation again. Two activations perform the
//! underlying effect twice; there is no caching or deduplication at this
//! level. Sharing a single activation among subscribers is the job of the
//! broadcasters built on top.
//!
//! ## Example
//!
//! ```
//! use recast_stream::ColdSource;
//! use recast_core::RecastError;
//! use futures::StreamExt;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = calls.clone();
//!
//! let source = ColdSource::deferred(move || {
//!     let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
//!     async move { Ok::<_, RecastError>(format!("activation {n}")) }
//! });
//!
//! assert_eq!(source.activate().next().await.unwrap().unwrap(), "activation 1");
//! assert_eq!(source.activate().next().await.unwrap().unwrap(), "activation 2");
//! assert_eq!(calls.load(Ordering::SeqCst), 2);
//! # }
//! ```

use core::future::Future;
use futures::stream::Stream;
use recast_core::{RecastError, StreamItem};
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for the boxed stream produced by one activation.
pub type BoxItemStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + 'static>>;

/// A lazy computation that produces a fresh item stream on every activation.
///
/// Cheap to clone; clones share the same factory.
pub struct ColdSource<T> {
    factory: Arc<dyn Fn() -> BoxItemStream<T> + Send + Sync + 'static>,
}

impl<T: Send + 'static> ColdSource<T> {
    /// Creates a cold source from a stream factory.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> BoxItemStream<T> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Creates a cold source whose activation runs `f` once, yielding a
    /// single value (or error) and then completing.
    pub fn deferred<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, RecastError>> + Send + 'static,
    {
        Self::new(move || {
            let fut = f();
            Box::pin(futures::stream::once(async move {
                StreamItem::from(fut.await)
            }))
        })
    }

    /// Runs the factory, producing a fresh stream that performs the
    /// underlying computation when polled.
    pub fn activate(&self) -> BoxItemStream<T> {
        (self.factory)()
    }
}

impl<T> Clone for ColdSource<T> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
        }
    }
}
