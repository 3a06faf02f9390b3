// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// A notification emitted by the sourcing pipeline.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum SourceEvent {
  /// The cache was refreshed with a new set.
  Refreshed,
  /// The upstream is unavailable and the last known set was served.
  Outage {
    /// How long outage tolerance will keep serving the last known set.
    remaining: Duration,
  },
  /// A forced refresh was denied by the rate limiter.
  RateLimited,
}

/// A handle receiving [`SourceEvent`]s, passed to the pipeline layers at
/// construction.
pub trait SourceEventListener: Send + Sync {
  /// Called for every emitted event.
  fn on_event(&self, event: SourceEvent);
}

impl<F> SourceEventListener for F
where
  F: Fn(SourceEvent) + Send + Sync,
{
  fn on_event(&self, event: SourceEvent) {
    self(event)
  }
}
