// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for the recast multicast demo: the value-or-error item model,
//! the root error type, the replay subject that backs both broadcasters, and
//! the owned task handle used to drive shared activations.

pub mod drive_task;
pub mod error;
pub mod replay_subject;
pub mod stream_item;
pub mod subject_error;

pub use self::drive_task::DriveTask;
pub use self::error::{RecastError, Result};
pub use self::replay_subject::{ReplaySubject, SubjectBoxStream};
pub use self::stream_item::StreamItem;
pub use self::subject_error::SubjectError;
