// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
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

/// A [`JwkSetSource`] caching the inner set for a fixed time-to-live.
///
/// Cache refreshes are single-flight: concurrent misses elect one leader
/// to perform the upstream retrieval while the remaining callers wait for
/// and adopt its outcome. A forced retrieval whose `now` predates the
/// publication instant of the cached set is answered from the cache, since
/// a concurrent caller already refreshed it.
///
/// When the layer below denies a forced refresh with
/// [`Error::RateLimitReached`], a still-valid cache is served instead.
pub struct CachingJwkSetSource<S> {
  inner: S,
  ttl: Duration,
  state: Mutex<CacheState>,
  cond: Condvar,
  listener: Option<Arc<dyn SourceEventListener>>,
}

#[derive(Default)]
struct CacheState {
  cached: Option<CachedJwkSet>,
  refreshing: bool,
  generation: u64,
  last_error: Option<String>,
  health: Option<SourceHealth>,
}

#[derive(Clone)]
struct CachedJwkSet {
  set: Arc<JwkSet>,
  created_at: Instant,
  expires_at: Instant,
}

impl CachedJwkSet {
  /// Returns `true` if the entry satisfies the request.
  ///
  /// A forced request is satisfied only by an entry published after the
  /// instant the caller captured before its first read.
  fn satisfies(&self, force: bool, now: Instant) -> bool {
    if force {
      self.created_at > now
    } else {
      now <= self.expires_at
    }
  }
}

impl<S> CachingJwkSetSource<S> {
  /// Creates a new `CachingJwkSetSource` with the given time-to-live.
  pub fn new(inner: S, ttl: Duration) -> Self {
    Self {
      inner,
      ttl,
      state: Mutex::new(CacheState::default()),
      cond: Condvar::new(),
      listener: None,
    }
  }

  /// Sets the event listener notified of refreshes.
  pub fn with_listener(mut self, listener: Arc<dyn SourceEventListener>) -> Self {
    self.listener = Some(listener);
    self
  }

  /// Returns the expiry of the currently cached set.
  pub(crate) fn cached_expires_at(&self) -> Option<Instant> {
    self
      .state
      .lock()
      .ok()
      .and_then(|state| state.cached.as_ref().map(|cached| cached.expires_at))
  }

  fn lock(&self) -> Result<MutexGuard<'_, CacheState>> {
    self.state.lock().map_err(|_| Error::JwkSetUnavailable("cache lock poisoned".into()))
  }

  fn wait<'m>(&self, guard: MutexGuard<'m, CacheState>, ctx: &SourceContext) -> Result<(MutexGuard<'m, CacheState>, bool)> {
    match ctx.deadline() {
      Some(deadline) => {
        let timeout: Duration = deadline.saturating_duration_since(Instant::now());

        if timeout.is_zero() {
          return Err(Error::JwkSetUnavailable("deadline exceeded".into()));
        }

        self
          .cond
          .wait_timeout(guard, timeout)
          .map(|(guard, timeout)| (guard, timeout.timed_out()))
          .map_err(|_| Error::JwkSetUnavailable("cache lock poisoned".into()))
      }
      None => self
        .cond
        .wait(guard)
        .map(|guard| (guard, false))
        .map_err(|_| Error::JwkSetUnavailable("cache lock poisoned".into())),
    }
  }
}

impl<S: JwkSetSource> JwkSetSource for CachingJwkSetSource<S> {
  fn jwk_set(&self, force: bool, now: Instant, ctx: &SourceContext) -> Result<Arc<JwkSet>> {
    let mut state: MutexGuard<'_, CacheState> = self.lock()?;

    loop {
      if let Some(cached) = state.cached.as_ref() {
        if cached.satisfies(force, now) {
          return Ok(Arc::clone(&cached.set));
        }
      }

      if !state.refreshing {
        state.refreshing = true;
        break;
      }

      // Wait for the in-flight leader and adopt its outcome.
      let generation: u64 = state.generation;

      let (guard, timed_out) = self.wait(state, ctx)?;
      state = guard;

      if state.generation != generation {
        if let Some(cached) = state.cached.as_ref() {
          if cached.satisfies(force, now) {
            return Ok(Arc::clone(&cached.set));
          }
        }

        if let Some(error) = state.last_error.clone() {
          return Err(Error::JwkSetUnavailable(error));
        }
      } else if timed_out {
        return Err(Error::JwkSetUnavailable("deadline exceeded".into()));
      }
    }

    // This caller is the leader; fetch without holding the lock.
    drop(state);

    let result: Result<Arc<JwkSet>> = self.inner.jwk_set(force, now, ctx);

    let mut state: MutexGuard<'_, CacheState> = self.lock()?;

    state.generation = state.generation.wrapping_add(1);
    state.refreshing = false;

    let outcome: Result<Arc<JwkSet>> = match result {
      Ok(set) => {
        let created_at: Instant = Instant::now();

        state.cached = Some(CachedJwkSet {
          set: Arc::clone(&set),
          created_at,
          expires_at: created_at + self.ttl,
        });
        state.health = Some(SourceHealth {
          success: true,
          timestamp: created_at,
        });
        state.last_error = None;

        if let Some(listener) = self.listener.as_ref() {
          listener.on_event(SourceEvent::Refreshed);
        }

        Ok(set)
      }
      Err(Error::RateLimitReached) => {
        let cached: Option<Arc<_>> = state
          .cached
          .as_ref()
          .filter(|cached| now <= cached.expires_at)
          .map(|cached| Arc::clone(&cached.set));

        match cached {
          Some(set) => {
            state.last_error = None;
            Ok(set)
          }
          None => {
            state.last_error = Some(Error::RateLimitReached.to_string());
            Err(Error::RateLimitReached)
          }
        }
      }
      Err(error) => {
        state.health = Some(SourceHealth {
          success: false,
          timestamp: Instant::now(),
        });
        state.last_error = Some(error.to_string());

        Err(error)
      }
    };

    drop(state);
    self.cond.notify_all();

    outcome
  }

  fn health(&self, refresh: bool, now: Instant, ctx: &SourceContext) -> Result<Option<SourceHealth>> {
    if let Some(health) = self.lock()?.health {
      return Ok(Some(health));
    }

    if refresh {
      let _ = self.jwk_set(false, now, ctx);
      return Ok(self.lock()?.health);
    }

    Ok(None)
  }
}
