// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::JwkSet;
use crate::jwks::JwkSetSource;
use crate::jwks::SourceContext;
use crate::jwks::SourceEvent;
use crate::jwks::SourceEventListener;
use crate::jwks::SourceHealth;

/// A [`JwkSetSource`] serving the last known set while the upstream
/// suffers a transient outage.
///
/// When an unforced retrieval fails with
/// [`Error::JwkSetUnavailable`](crate::error::Error::JwkSetUnavailable)
/// and the last successful set is younger than the outage TTL, that set is
/// served and a [`SourceEvent::Outage`] is emitted with the remaining
/// tolerance window.
pub struct OutageTolerantJwkSetSource<S> {
  inner: S,
  outage_ttl: Duration,
  last: Mutex<Option<LastKnownSet>>,
  listener: Option<Arc<dyn SourceEventListener>>,
}

struct LastKnownSet {
  set: Arc<JwkSet>,
  expires_at: Instant,
}

impl<S> OutageTolerantJwkSetSource<S> {
  /// Creates a new `OutageTolerantJwkSetSource` with the given tolerance.
  pub fn new(inner: S, outage_ttl: Duration) -> Self {
    Self {
      inner,
      outage_ttl,
      last: Mutex::new(None),
      listener: None,
    }
  }

  /// Sets the event listener notified of outages.
  pub fn with_listener(mut self, listener: Arc<dyn SourceEventListener>) -> Self {
    self.listener = Some(listener);
    self
  }

  fn last(&self) -> Result<std::sync::MutexGuard<'_, Option<LastKnownSet>>> {
    self
      .last
      .lock()
      .map_err(|_| Error::JwkSetUnavailable("outage tolerance lock poisoned".into()))
  }
}

impl<S: JwkSetSource> JwkSetSource for OutageTolerantJwkSetSource<S> {
  fn jwk_set(&self, force: bool, now: Instant, ctx: &SourceContext) -> Result<Arc<JwkSet>> {
    match self.inner.jwk_set(force, now, ctx) {
      Ok(set) => {
        *self.last()? = Some(LastKnownSet {
          set: Arc::clone(&set),
          expires_at: now + self.outage_ttl,
        });

        Ok(set)
      }
      Err(error @ Error::JwkSetUnavailable(_)) if !force => {
        if let Some(last) = self.last()?.as_ref() {
          if now <= last.expires_at {
            if let Some(listener) = self.listener.as_ref() {
              listener.on_event(SourceEvent::Outage {
                remaining: last.expires_at - now,
              });
            }

            return Ok(Arc::clone(&last.set));
          }
        }

        Err(error)
      }
      Err(error) => Err(error),
    }
  }

  fn health(&self, refresh: bool, now: Instant, ctx: &SourceContext) -> Result<Option<SourceHealth>> {
    self.inner.health(refresh, now, ctx)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::AtomicUsize;
  use std::sync::atomic::Ordering;

  use super::*;
  use crate::jwk::Jwk;

  /// Succeeds on the first call, then fails transiently.
  struct FlakySource {
    calls: AtomicUsize,
  }

  impl JwkSetSource for FlakySource {
    fn jwk_set(&self, _force: bool, _now: Instant, _ctx: &SourceContext) -> Result<Arc<JwkSet>> {
      if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
        Ok(Arc::new([Jwk::random_oct(32).unwrap()].into_iter().collect()))
      } else {
        Err(Error::JwkSetUnavailable("connection refused".into()))
      }
    }
  }

  #[test]
  fn test_outage_tolerance_window() {
    let source: OutageTolerantJwkSetSource<FlakySource> =
      OutageTolerantJwkSetSource::new(FlakySource { calls: AtomicUsize::new(0) }, Duration::from_secs(60));

    let start: Instant = Instant::now();
    let ctx: SourceContext = SourceContext::new();

    let first: Arc<JwkSet> = source.jwk_set(false, start, &ctx).unwrap();

    // Within the tolerance window the last known set is served.
    let within: Arc<JwkSet> = source.jwk_set(false, start + Duration::from_secs(30), &ctx).unwrap();
    assert_eq!(first, within);

    // Beyond the window the failure propagates.
    assert!(matches!(
      source.jwk_set(false, start + Duration::from_secs(61), &ctx),
      Err(Error::JwkSetUnavailable(_))
    ));
  }

  #[test]
  fn test_forced_failures_are_not_masked() {
    let source: OutageTolerantJwkSetSource<FlakySource> =
      OutageTolerantJwkSetSource::new(FlakySource { calls: AtomicUsize::new(0) }, Duration::from_secs(60));

    let start: Instant = Instant::now();
    let ctx: SourceContext = SourceContext::new();

    source.jwk_set(false, start, &ctx).unwrap();

    assert!(source.jwk_set(true, start + Duration::from_secs(1), &ctx).is_err());
  }
}
