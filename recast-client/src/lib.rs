// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! HTTP resource fetching for the recast sharing demo.
//!
//! [`ResourceClient::fetch`] exposes a remote endpoint as a
//! [`ColdSource`](recast_stream::ColdSource): every activation performs one
//! GET request, nothing more. What happens when several subscribers want the
//! same resource is decided entirely by the composition layer:
//!
//! ```ignore
//! let client = ResourceClient::new("http://localhost:8080")?;
//!
//! // One request per subscription.
//! let cold = client.fetch();
//!
//! // One request shared by everyone, buffered value kept around.
//! let shared = client.fetch().share_replay(1);
//!
//! // One request shared by everyone, buffer discarded once unused.
//! let multicast = client.fetch().multicast(|| ReplaySubject::with_capacity(1));
//! ```

pub mod client;

pub use self::client::ResourceClient;
