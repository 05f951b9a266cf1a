// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(dead_code)]

use recast_core::RecastError;
use recast_stream::ColdSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A source that yields "value N" on its N-th activation, counting
/// activations as it goes.
pub fn counting_source() -> (ColdSource<String>, Arc<AtomicUsize>) {
    let activations = Arc::new(AtomicUsize::new(0));
    let counter = activations.clone();
    let source = ColdSource::deferred(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move { Ok::<_, RecastError>(format!("value {n}")) }
    });
    (source, activations)
}

/// A source that fails every activation with a status error.
pub fn failing_source() -> (ColdSource<String>, Arc<AtomicUsize>) {
    let activations = Arc::new(AtomicUsize::new(0));
    let counter = activations.clone();
    let source = ColdSource::deferred(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Err::<String, _>(RecastError::status(500, "http://stub/resource")) }
    });
    (source, activations)
}

/// A source whose activations stay pending until a value is pushed through
/// the returned gate, so teardown-before-completion can be exercised.
pub fn gated_source() -> (
    ColdSource<String>,
    async_channel::Sender<String>,
    Arc<AtomicUsize>,
) {
    let (gate, feed) = async_channel::unbounded::<String>();
    let activations = Arc::new(AtomicUsize::new(0));
    let counter = activations.clone();
    let source = ColdSource::deferred(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let feed = feed.clone();
        async move {
            feed.recv()
                .await
                .map_err(|_| RecastError::stream_error("gate closed"))
        }
    });
    (source, gate, activations)
}
