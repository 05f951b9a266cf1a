// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared-activation lifecycle.

/// Lifecycle states of a broadcaster's shared activation.
///
/// Transitions: `Disconnected -> Connecting` when the first subscriber
/// attaches, `Connecting -> Connected` when the activation delivers its first
/// item or completes, `Connected -> Disconnecting` when the subscriber count
/// reaches zero, and `Disconnecting -> Disconnected` once teardown finishes.
/// The two broadcasters diverge only in what teardown does to the buffering
/// subject: [`ShareReplay`](crate::ShareReplay) retains it,
/// [`Multicast`](crate::Multicast) discards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No shared activation is running.
    Disconnected,
    /// The first subscriber attached; the activation has not produced
    /// anything yet.
    Connecting,
    /// The activation delivered an item or terminated.
    Connected,
    /// The subscriber count reached zero; teardown is in progress.
    Disconnecting,
}

/// Seam between a subscription guard and the broadcaster it counts against.
///
/// Dropping a [`Subscription`](crate::Subscription) calls `detach()` exactly
/// once; the broadcaster decrements its refCount and tears the shared
/// activation down when the count reaches zero.
pub(crate) trait Detach: Send + Sync {
    fn detach(&self);
}
