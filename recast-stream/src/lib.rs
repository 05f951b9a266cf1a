// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cold sources and refcounted multicast broadcasters.
//!
//! This crate provides the composition layer of recast: a lazy
//! [`ColdSource`] that re-runs its computation on every activation, and two
//! ways of sharing a single activation among concurrent subscribers that
//! differ only in what happens when the subscriber count drops to zero.
//!
//! # Choosing a broadcaster
//!
//! | | While refCount > 0 | At refCount zero | Later subscriber |
//! |---|---|---|---|
//! | [`ShareReplay`] | one shared activation | activation torn down, buffer kept | replays buffered value, no new activation after completion |
//! | [`Multicast`] | one shared activation | activation torn down, subject and buffer discarded | fresh subject from the factory, brand-new activation |
//!
//! Both broadcasters walk the same lifecycle, captured by
//! [`ConnectionState`]: `Disconnected -> Connecting` on first attach,
//! `Connecting -> Connected` on first delivery, `Connected -> Disconnecting
//! -> Disconnected` when the last subscriber detaches.
//!
//! Extension traits ([`ShareReplayExt`], [`MulticastExt`]) hang the
//! composition operators directly off [`ColdSource`]:
//!
//! ```ignore
//! let shared = client.fetch().share_replay(1);
//! let multicast = client.fetch().multicast(|| ReplaySubject::with_capacity(1));
//! ```

pub mod cold_source;
pub mod connection;
pub mod multicast;
pub mod share_replay;
pub mod subscription;

pub use self::cold_source::{BoxItemStream, ColdSource};
pub use self::connection::ConnectionState;
pub use self::multicast::{Multicast, MulticastExt};
pub use self::share_replay::{ShareReplay, ShareReplayExt};
pub use self::subscription::Subscription;
