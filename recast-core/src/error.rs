// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for recast.
//!
//! A single root [`RecastError`] covers every failure mode a subscriber can
//! observe. All variants are cloneable so a terminal error can be fanned out
//! to any number of concurrent subscribers as a stream item.

/// Root error type for all recast operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecastError {
    /// The underlying transport failed before a response was produced.
    #[error("transport error: {context}")]
    Transport {
        /// Description of the transport failure
        context: String,
    },

    /// The remote endpoint answered with a non-success status code.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// The request URL
        url: String,
    },

    /// Broadcasting or stream processing failed.
    #[error("stream processing error: {context}")]
    Stream {
        /// Description of what went wrong
        context: String,
    },
}

impl RecastError {
    /// Create a transport error with the given context.
    pub fn transport(context: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
        }
    }

    /// Create a status error for the given code and URL.
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }

    /// Create a stream processing error with the given context.
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::Stream {
            context: context.into(),
        }
    }

    /// Returns `true` if this error originated in the transport layer,
    /// either as a connection failure or a non-success response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}

/// Specialized Result type for recast operations.
pub type Result<T> = std::result::Result<T, RecastError>;
