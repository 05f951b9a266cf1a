// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// Errors specific to subject operations (lifecycle and broadcasting).
///
/// Distinct from [`RecastError`](crate::RecastError): a `SubjectError` is
/// returned to the *producer* side when it pushes into a terminated subject,
/// while `RecastError` travels downstream to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectError {
    /// The subject has terminated and cannot accept new items.
    Closed,
}

impl fmt::Display for SubjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "subject is closed"),
        }
    }
}

impl std::error::Error for SubjectError {}
