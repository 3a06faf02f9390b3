// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::jwk::Jwk;
use crate::jwk::JwkSelector;
use crate::jwk::JwkSet;
use crate::jwks::JwkSetSource;
use crate::jwks::SourceContext;

/// A provider of individual JSON Web Keys matched by a [`JwkSelector`].
pub trait JwkSource: Send + Sync {
  /// Returns the keys matching the given selector, in set order.
  fn get(&self, selector: &JwkSelector, ctx: &SourceContext) -> Result<Vec<Jwk>>;
}

/// Exposes a [`JwkSetSource`] as a [`JwkSource`].
///
/// The selector runs against the currently cached set first. On an empty
/// result a forced refresh is requested with the instant captured *before*
/// the first read, so a refresh performed concurrently by another caller
/// satisfies the request without a redundant upstream retrieval.
pub struct JwkSetBasedJwkSource<S> {
  source: S,
}

impl<S: JwkSetSource> JwkSetBasedJwkSource<S> {
  /// Creates a new `JwkSetBasedJwkSource` over the given set source.
  pub fn new(source: S) -> Self {
    Self { source }
  }

  /// Returns a reference to the underlying set source.
  pub fn source(&self) -> &S {
    &self.source
  }
}

impl<S: JwkSetSource> JwkSource for JwkSetBasedJwkSource<S> {
  fn get(&self, selector: &JwkSelector, ctx: &SourceContext) -> Result<Vec<Jwk>> {
    let captured: Instant = Instant::now();

    let set: Arc<JwkSet> = self.source.jwk_set(false, captured, ctx)?;
    let selected: Vec<Jwk> = selector.select(&set);

    if !selected.is_empty() {
      return Ok(selected);
    }

    // The key may have been rotated in since the cache was populated.
    let set: Arc<JwkSet> = self.source.jwk_set(true, captured, ctx)?;

    Ok(selector.select(&set))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwk::JwkMatcher;
  use crate::jwks::ImmutableJwkSetSource;

  #[test]
  fn test_selector_match_and_miss() {
    let mut key: Jwk = Jwk::random_oct(32).unwrap();
    key.set_kid("123");

    let source: JwkSetBasedJwkSource<ImmutableJwkSetSource> =
      JwkSetBasedJwkSource::new(ImmutableJwkSetSource::new([key].into_iter().collect()));

    let ctx: SourceContext = SourceContext::new();

    let hit: Vec<Jwk> = source.get(&JwkSelector::new(JwkMatcher::new().key_id("123")), &ctx).unwrap();
    assert_eq!(hit.len(), 1);

    let miss: Vec<Jwk> = source.get(&JwkSelector::new(JwkMatcher::new().key_id("xxx")), &ctx).unwrap();
    assert!(miss.is_empty());
  }
}
