// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use recast_core::DriveTask;

#[tokio::test]
async fn drop_cancels_the_task() {
    // Arrange
    let (tx, rx) = async_channel::unbounded::<&'static str>();
    let task = DriveTask::spawn(|cancel| async move {
        cancel.cancelled().await;
        let _ = tx.try_send("cancelled");
    });

    // Act
    drop(task);

    // Assert
    assert_eq!(rx.recv().await, Ok("cancelled"));
}

#[tokio::test]
async fn explicit_cancel_is_observable() {
    // Arrange
    let task = DriveTask::spawn(|cancel| async move {
        cancel.cancelled().await;
    });
    assert!(!task.is_cancelled());

    // Act
    task.cancel();

    // Assert
    assert!(task.is_cancelled());
}
