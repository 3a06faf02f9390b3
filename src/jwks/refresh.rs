// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crate::error::Result;
use crate::jwk::JwkSet;
use crate::jwks::CachingJwkSetSource;
use crate::jwks::JwkSetSource;
use crate::jwks::SourceContext;
use crate::jwks::SourceHealth;

/// A [`JwkSetSource`] refreshing its cache in the background before the
/// cached set expires.
///
/// After each successful retrieval a refresh is scheduled at
/// `expires_at - refresh_ahead` on a detached thread. The refresh itself
/// is a forced retrieval through the cache and therefore coalesces with
/// concurrent refreshes via the cache's single-flight discipline.
pub struct RefreshAheadJwkSetSource<S> {
  inner: Arc<RefreshAheadState<S>>,
  refresh_ahead: Duration,
}

struct RefreshAheadState<S> {
  cache: CachingJwkSetSource<S>,
  scheduled: AtomicBool,
}

impl<S: JwkSetSource + 'static> RefreshAheadJwkSetSource<S> {
  /// Creates a new `RefreshAheadJwkSetSource` over the given cache.
  pub fn new(cache: CachingJwkSetSource<S>, refresh_ahead: Duration) -> Self {
    Self {
      inner: Arc::new(RefreshAheadState {
        cache,
        scheduled: AtomicBool::new(false),
      }),
      refresh_ahead,
    }
  }

  fn schedule(&self, expires_at: Instant) {
    if self.inner.scheduled.swap(true, Ordering::AcqRel) {
      return;
    }

    let state: Arc<RefreshAheadState<S>> = Arc::clone(&self.inner);
    let refresh_at: Instant = expires_at
      .checked_sub(self.refresh_ahead)
      .unwrap_or_else(Instant::now);

    std::thread::spawn(move || {
      let wait: Duration = refresh_at.saturating_duration_since(Instant::now());

      if !wait.is_zero() {
        std::thread::sleep(wait);
      }

      let _ = state.cache.jwk_set(true, Instant::now(), &SourceContext::new());

      state.scheduled.store(false, Ordering::Release);
    });
  }
}

impl<S: JwkSetSource + 'static> JwkSetSource for RefreshAheadJwkSetSource<S> {
  fn jwk_set(&self, force: bool, now: Instant, ctx: &SourceContext) -> Result<Arc<JwkSet>> {
    let set: Arc<JwkSet> = self.inner.cache.jwk_set(force, now, ctx)?;

    if let Some(expires_at) = self.inner.cache.cached_expires_at() {
      self.schedule(expires_at);
    }

    Ok(set)
  }

  fn health(&self, refresh: bool, now: Instant, ctx: &SourceContext) -> Result<Option<SourceHealth>> {
    self.inner.cache.health(refresh, now, ctx)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::AtomicUsize;

  use super::*;
  use crate::jwk::Jwk;

  struct CountingSource {
    calls: Arc<AtomicUsize>,
  }

  impl JwkSetSource for CountingSource {
    fn jwk_set(&self, _force: bool, _now: Instant, _ctx: &SourceContext) -> Result<Arc<JwkSet>> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(Arc::new([Jwk::random_oct(32).unwrap()].into_iter().collect()))
    }
  }

  #[test]
  fn test_background_refresh() {
    let calls: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));

    let source: RefreshAheadJwkSetSource<CountingSource> = RefreshAheadJwkSetSource::new(
      CachingJwkSetSource::new(CountingSource { calls: Arc::clone(&calls) }, Duration::from_millis(80)),
      Duration::from_millis(40),
    );

    source.jwk_set(false, Instant::now(), &SourceContext::new()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // The scheduled refresh fires at expiry minus the refresh-ahead window.
    std::thread::sleep(Duration::from_millis(120));
    assert!(calls.load(Ordering::SeqCst) >= 2);
  }
}
