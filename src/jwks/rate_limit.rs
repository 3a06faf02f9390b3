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

/// Token-bucket parameters for [`RateLimitedJwkSetSource`].
#[derive(Clone, Copy, Debug)]
pub struct RateLimitOptions {
  /// The number of forced refreshes permitted per interval.
  pub bucket_size: u32,
  /// The interval after which the bucket is refilled.
  pub refill_interval: Duration,
}

impl Default for RateLimitOptions {
  fn default() -> Self {
    Self {
      bucket_size: 10,
      refill_interval: Duration::from_secs(60),
    }
  }
}

/// A [`JwkSetSource`] bounding forced refreshes with a token bucket.
///
/// Over-limit forced retrievals fail with
/// [`Error::RateLimitReached`](crate::error::Error::RateLimitReached);
/// unforced retrievals pass through unconditionally.
pub struct RateLimitedJwkSetSource<S> {
  inner: S,
  options: RateLimitOptions,
  bucket: Mutex<TokenBucket>,
  listener: Option<Arc<dyn SourceEventListener>>,
}

struct TokenBucket {
  tokens: u32,
  refilled_at: Option<Instant>,
}

impl<S> RateLimitedJwkSetSource<S> {
  /// Creates a new `RateLimitedJwkSetSource` with the given options.
  pub fn new(inner: S, options: RateLimitOptions) -> Self {
    Self {
      inner,
      options,
      bucket: Mutex::new(TokenBucket {
        tokens: options.bucket_size,
        refilled_at: None,
      }),
      listener: None,
    }
  }

  /// Sets the event listener notified of denied refreshes.
  pub fn with_listener(mut self, listener: Arc<dyn SourceEventListener>) -> Self {
    self.listener = Some(listener);
    self
  }

  fn try_acquire(&self, now: Instant) -> Result<bool> {
    let mut bucket = self
      .bucket
      .lock()
      .map_err(|_| Error::JwkSetUnavailable("rate limiter lock poisoned".into()))?;

    match bucket.refilled_at {
      Some(refilled_at) if now.saturating_duration_since(refilled_at) < self.options.refill_interval => {}
      Some(_) | None => {
        bucket.tokens = self.options.bucket_size;
        bucket.refilled_at = Some(now);
      }
    }

    if bucket.tokens == 0 {
      return Ok(false);
    }

    bucket.tokens -= 1;

    Ok(true)
  }
}

impl<S: JwkSetSource> JwkSetSource for RateLimitedJwkSetSource<S> {
  fn jwk_set(&self, force: bool, now: Instant, ctx: &SourceContext) -> Result<Arc<JwkSet>> {
    if force && !self.try_acquire(now)? {
      if let Some(listener) = self.listener.as_ref() {
        listener.on_event(SourceEvent::RateLimited);
      }

      return Err(Error::RateLimitReached);
    }

    self.inner.jwk_set(force, now, ctx)
  }

  fn health(&self, refresh: bool, now: Instant, ctx: &SourceContext) -> Result<Option<SourceHealth>> {
    self.inner.health(refresh, now, ctx)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwks::ImmutableJwkSetSource;

  fn source(bucket_size: u32) -> RateLimitedJwkSetSource<ImmutableJwkSetSource> {
    RateLimitedJwkSetSource::new(
      ImmutableJwkSetSource::new(JwkSet::new()),
      RateLimitOptions {
        bucket_size,
        refill_interval: Duration::from_secs(60),
      },
    )
  }

  #[test]
  fn test_unforced_is_unlimited() {
    let source = source(0);
    let now: Instant = Instant::now();

    for _ in 0..16 {
      assert!(source.jwk_set(false, now, &SourceContext::new()).is_ok());
    }
  }

  #[test]
  fn test_forced_is_limited_and_refills() {
    let source = source(2);
    let now: Instant = Instant::now();

    assert!(source.jwk_set(true, now, &SourceContext::new()).is_ok());
    assert!(source.jwk_set(true, now, &SourceContext::new()).is_ok());
    assert!(matches!(
      source.jwk_set(true, now, &SourceContext::new()),
      Err(Error::RateLimitReached)
    ));

    let later: Instant = now + Duration::from_secs(61);
    assert!(source.jwk_set(true, later, &SourceContext::new()).is_ok());
  }
}
