// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use crate::error::Result;
use crate::jwk::Jwk;
use crate::jwk::JwkSelector;
use crate::jwks::JwkSource;
use crate::jwks::SourceContext;

/// A [`JwkSource`] falling back to a secondary source when the primary
/// fails.
///
/// When both sources fail, the failure messages are combined into a single
/// [`Error::RemoteKeySource`](crate::error::Error::RemoteKeySource).
pub struct FailoverJwkSource<P, F> {
  primary: P,
  failover: F,
}

impl<P: JwkSource, F: JwkSource> FailoverJwkSource<P, F> {
  /// Creates a new `FailoverJwkSource`.
  pub fn new(primary: P, failover: F) -> Self {
    Self { primary, failover }
  }
}

impl<P: JwkSource, F: JwkSource> JwkSource for FailoverJwkSource<P, F> {
  fn get(&self, selector: &JwkSelector, ctx: &SourceContext) -> Result<Vec<Jwk>> {
    match self.primary.get(selector, ctx) {
      Ok(keys) => Ok(keys),
      Err(primary_error) => self.failover.get(selector, ctx).map_err(|failover_error| {
        Error::RemoteKeySource(format!("{primary_error}; failover failed: {failover_error}"))
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwk::JwkMatcher;
  use crate::jwks::ImmutableJwkSetSource;
  use crate::jwks::JwkSetBasedJwkSource;

  struct FailingSource;

  impl JwkSource for FailingSource {
    fn get(&self, _selector: &JwkSelector, _ctx: &SourceContext) -> Result<Vec<Jwk>> {
      Err(Error::JwkSetUnavailable("connection refused".into()))
    }
  }

  #[test]
  fn test_failover_serves_secondary() {
    let mut key: Jwk = Jwk::random_oct(32).unwrap();
    key.set_kid("backup");

    let failover = JwkSetBasedJwkSource::new(ImmutableJwkSetSource::new([key].into_iter().collect()));
    let source = FailoverJwkSource::new(FailingSource, failover);

    let keys: Vec<Jwk> = source
      .get(&JwkSelector::new(JwkMatcher::new().key_id("backup")), &SourceContext::new())
      .unwrap();

    assert_eq!(keys.len(), 1);
  }

  #[test]
  fn test_both_failing_wraps_messages() {
    let source = FailoverJwkSource::new(FailingSource, FailingSource);

    let error: Error = source
      .get(&JwkSelector::new(JwkMatcher::new()), &SourceContext::new())
      .unwrap_err();

    assert!(matches!(error, Error::RemoteKeySource(_)));
    assert!(error.to_string().contains("failover failed"));
  }
}
