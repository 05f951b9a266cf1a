// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use recast_core::{RecastError, ReplaySubject, StreamItem, SubjectError};

#[tokio::test]
async fn broadcasts_to_multiple_subscribers() {
    // Arrange
    let subject = ReplaySubject::<String>::with_capacity(1);
    let mut sub1 = subject.subscribe();
    let mut sub2 = subject.subscribe();

    // Act
    subject.next("payload".to_string()).unwrap();

    // Assert - both subscribers receive the same value
    assert_eq!(
        sub1.next().await,
        Some(StreamItem::Value("payload".to_string()))
    );
    assert_eq!(
        sub2.next().await,
        Some(StreamItem::Value("payload".to_string()))
    );
}

#[tokio::test]
async fn late_subscriber_replays_buffered_item() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(1);
    subject.next(7).unwrap();

    // Act - subscribe after the emission
    let mut late = subject.subscribe();

    // Assert - the buffered item is replayed, then the subscriber goes live
    assert_eq!(late.next().await, Some(StreamItem::Value(7)));
    subject.next(8).unwrap();
    assert_eq!(late.next().await, Some(StreamItem::Value(8)));
}

#[tokio::test]
async fn evicts_oldest_item_beyond_capacity() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(2);

    // Act
    subject.next(1).unwrap();
    subject.next(2).unwrap();
    subject.next(3).unwrap(); // evicts 1

    // Assert
    assert_eq!(subject.buffered_len(), 2);
    let mut late = subject.subscribe();
    assert_eq!(late.next().await, Some(StreamItem::Value(2)));
    assert_eq!(late.next().await, Some(StreamItem::Value(3)));
}

#[tokio::test]
async fn late_subscriber_after_close_replays_then_completes() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(1);
    subject.next(42).unwrap();

    // Act
    subject.close();
    let mut late = subject.subscribe();

    // Assert - replay still works after termination, then the stream ends
    assert_eq!(late.next().await, Some(StreamItem::Value(42)));
    assert_eq!(late.next().await, None);
}

#[tokio::test]
async fn next_after_close_returns_closed() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(1);

    // Act
    subject.close();

    // Assert
    assert_eq!(subject.next(1), Err(SubjectError::Closed));
    assert!(subject.is_closed());
}

#[tokio::test]
async fn close_completes_active_subscribers() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(1);
    let mut sub = subject.subscribe();

    // Act
    subject.next(5).unwrap();
    subject.close();

    // Assert - queued value is still delivered before the stream ends
    assert_eq!(sub.next().await, Some(StreamItem::Value(5)));
    assert_eq!(sub.next().await, None);
}

#[tokio::test]
async fn error_notifies_active_subscribers_and_terminates() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(1);
    subject.next(1).unwrap();
    let mut active = subject.subscribe();
    assert_eq!(active.next().await, Some(StreamItem::Value(1)));

    // Act
    subject
        .error(RecastError::stream_error("source failed"))
        .unwrap();

    // Assert - the active subscriber observes the error, then completes
    assert!(matches!(active.next().await, Some(StreamItem::Error(_))));
    assert_eq!(active.next().await, None);
    assert!(subject.is_closed());
}

#[tokio::test]
async fn error_is_not_replayed_to_late_subscribers() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(1);
    subject.next(9).unwrap();
    subject
        .error(RecastError::stream_error("source failed"))
        .unwrap();

    // Act - subscribe after the failure
    let mut late = subject.subscribe();

    // Assert - buffered value replays, no error item, stream ends
    assert_eq!(late.next().await, Some(StreamItem::Value(9)));
    assert_eq!(late.next().await, None);
}

#[tokio::test]
async fn subscriber_count_is_pruned_on_send() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(1);
    let sub1 = subject.subscribe();
    let sub2 = subject.subscribe();
    assert_eq!(subject.subscriber_count(), 2);

    // Act - drop one subscriber; the count updates on the next send
    drop(sub2);
    subject.next(1).unwrap();

    // Assert
    assert_eq!(subject.subscriber_count(), 1);
    drop(sub1);
}

#[tokio::test]
async fn clones_share_state() {
    // Arrange
    let subject = ReplaySubject::<i32>::with_capacity(1);
    let clone = subject.clone();

    // Act
    clone.next(3).unwrap();

    // Assert
    assert_eq!(subject.buffered_len(), 1);
    let mut sub = subject.subscribe();
    assert_eq!(sub.next().await, Some(StreamItem::Value(3)));
}
