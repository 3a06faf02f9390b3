// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A composable pipeline for sourcing JSON Web Key sets.
//!
//! A [`JwkSetSource`] produces the current [`JwkSet`](crate::jwk::JwkSet)
//! of a party. Decorators wrap a source to add behaviour, each owning its
//! inner source:
//!
//! - [`ImmutableJwkSetSource`]: a static set, never fails.
//! - [`UrlJwkSetSource`]: retrieves a remote JWK set document through a
//!   caller-provided [`JwkSetFetch`] transport.
//! - [`CachingJwkSetSource`]: caches the set with a TTL; concurrent misses
//!   share a single upstream fetch.
//! - [`RefreshAheadJwkSetSource`]: refreshes the cache in the background
//!   before it expires.
//! - [`RateLimitedJwkSetSource`]: bounds forced refreshes with a token
//!   bucket.
//! - [`OutageTolerantJwkSetSource`]: serves the last known set during
//!   transient upstream outages.
//!
//! [`JwkSetBasedJwkSource`] exposes a [`JwkSetSource`] as a [`JwkSource`]
//! of individual keys selected by a [`JwkSelector`](crate::jwk::JwkSelector),
//! and [`FailoverJwkSource`] fails over between two such sources. The
//! selectors in [`selector`](self) drive key selection from JOSE headers
//! for verification and decryption.

mod cache;
mod events;
mod failover;
mod immutable;
mod key_source;
mod outage;
mod rate_limit;
mod refresh;
mod selector;
mod source;
mod url;

pub use self::cache::CachingJwkSetSource;
pub use self::events::SourceEvent;
pub use self::events::SourceEventListener;
pub use self::failover::FailoverJwkSource;
pub use self::immutable::ImmutableJwkSetSource;
pub use self::key_source::JwkSetBasedJwkSource;
pub use self::key_source::JwkSource;
pub use self::outage::OutageTolerantJwkSetSource;
pub use self::rate_limit::RateLimitOptions;
pub use self::rate_limit::RateLimitedJwkSetSource;
pub use self::refresh::RefreshAheadJwkSetSource;
pub use self::selector::JweDecryptionKeySelector;
pub use self::selector::JwsVerificationKeySelector;
pub use self::source::JwkSetSource;
pub use self::source::SourceContext;
pub use self::source::SourceHealth;
pub use self::url::FetchOptions;
pub use self::url::FetchResponse;
pub use self::url::JwkSetFetch;
pub use self::url::UrlJwkSetSource;
