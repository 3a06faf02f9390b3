// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::jwk::JwkSet;
use crate::jwks::JwkSetSource;
use crate::jwks::SourceContext;
use crate::jwks::SourceHealth;

/// A [`JwkSetSource`] over a static key set. Never fails.
#[derive(Clone, Debug)]
pub struct ImmutableJwkSetSource {
  set: Arc<JwkSet>,
}

impl ImmutableJwkSetSource {
  /// Creates a new `ImmutableJwkSetSource` with the given set.
  pub fn new(set: JwkSet) -> Self {
    Self { set: Arc::new(set) }
  }
}

impl JwkSetSource for ImmutableJwkSetSource {
  fn jwk_set(&self, _force: bool, _now: Instant, _ctx: &SourceContext) -> Result<Arc<JwkSet>> {
    Ok(Arc::clone(&self.set))
  }

  fn health(&self, _refresh: bool, now: Instant, _ctx: &SourceContext) -> Result<Option<SourceHealth>> {
    Ok(Some(SourceHealth {
      success: true,
      timestamp: now,
    }))
  }
}
