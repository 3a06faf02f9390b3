// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::jwk::JwkSet;

/// Contextual options for a single retrieval, honored by every blocking
/// layer of a source chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceContext {
  deadline: Option<Instant>,
}

impl SourceContext {
  /// Creates a new, empty `SourceContext`.
  pub const fn new() -> Self {
    Self { deadline: None }
  }

  /// Sets the instant after which the retrieval is abandoned.
  pub fn with_deadline(mut self, value: Instant) -> Self {
    self.deadline = Some(value);
    self
  }

  /// Returns the configured deadline.
  pub fn deadline(&self) -> Option<Instant> {
    self.deadline
  }
}

/// The outcome of the most recent upstream retrieval of a source.
#[derive(Clone, Copy, Debug)]
pub struct SourceHealth {
  /// Whether the retrieval succeeded.
  pub success: bool,
  /// When the retrieval finished.
  pub timestamp: Instant,
}

/// A provider of the current JSON Web Key set of a party.
///
/// `force` requests a fresh set, bypassing caches; `now` is the instant
/// observed by the caller *before* any preceding read, letting caching
/// layers elide refreshes that another caller performed concurrently.
///
/// Failures are either transient ([`Error::JwkSetUnavailable`]) and
/// eligible for outage tolerance, or fatal ([`Error::JwkSetParse`]).
///
/// [`Error::JwkSetUnavailable`]: crate::error::Error::JwkSetUnavailable
/// [`Error::JwkSetParse`]: crate::error::Error::JwkSetParse
pub trait JwkSetSource: Send + Sync {
  /// Returns the current JWK set.
  fn jwk_set(&self, force: bool, now: Instant, ctx: &SourceContext) -> Result<Arc<JwkSet>>;

  /// Returns the health of the source, if it tracks one.
  ///
  /// With `refresh`, a source that has not yet performed a retrieval may
  /// perform one to produce a meaningful answer.
  fn health(&self, refresh: bool, now: Instant, ctx: &SourceContext) -> Result<Option<SourceHealth>> {
    let _ = (refresh, now, ctx);
    Ok(None)
  }
}

impl<S: JwkSetSource + ?Sized> JwkSetSource for Arc<S> {
  fn jwk_set(&self, force: bool, now: Instant, ctx: &SourceContext) -> Result<Arc<JwkSet>> {
    (**self).jwk_set(force, now, ctx)
  }

  fn health(&self, refresh: bool, now: Instant, ctx: &SourceContext) -> Result<Option<SourceHealth>> {
    (**self).health(refresh, now, ctx)
  }
}
