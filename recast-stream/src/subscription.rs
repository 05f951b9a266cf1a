// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::connection::Detach;
use futures::stream::Stream;
use recast_core::{StreamItem, SubjectBoxStream};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A subscriber's stream handed out by a broadcaster.
///
/// `Subscription` counts toward the broadcaster's refCount for as long as it
/// is alive; dropping it detaches the subscriber, and dropping the last one
/// tears the shared activation down.
pub struct Subscription<T> {
    stream: SubjectBoxStream<T>,
    conn: Arc<dyn Detach>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(stream: SubjectBoxStream<T>, conn: Arc<dyn Detach>) -> Self {
        Self { stream, conn }
    }
}

impl<T> Stream for Subscription<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().stream.as_mut().poll_next(cx)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.conn.detach();
    }
}
