// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use crate::error::Error;
use crate::error::Result;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweEncryption;
use crate::jwe::JweHeader;
use crate::jwk::Jwk;
use crate::jwk::JwkMatcher;
use crate::jwk::JwkSelector;
use crate::jwk::JwkType;
use crate::jwk::JwkUse;
use crate::jws::JwsAlgorithm;
use crate::jws::JwsHeader;
use crate::jwks::JwkSource;
use crate::jwks::SourceContext;

/// Selects candidate verification keys for a JWS header from a
/// [`JwkSource`].
///
/// Headers whose algorithm is outside the accepted set are rejected.
/// Asymmetric private keys are never returned; candidates are public keys
/// and symmetric secrets only.
pub struct JwsVerificationKeySelector<S> {
  algs: BTreeSet<JwsAlgorithm>,
  source: S,
}

impl<S: JwkSource> JwsVerificationKeySelector<S> {
  /// Creates a new `JwsVerificationKeySelector` accepting the given
  /// algorithms.
  pub fn new(algs: impl IntoIterator<Item = JwsAlgorithm>, source: S) -> Self {
    Self {
      algs: algs.into_iter().collect(),
      source,
    }
  }

  /// Returns the candidate keys for the given header, in source order.
  pub fn select(&self, header: &JwsHeader, ctx: &SourceContext) -> Result<Vec<Jwk>> {
    let alg: JwsAlgorithm = header.alg().ok_or(Error::MissingParam("alg"))?;

    if !self.algs.contains(&alg) {
      return Err(Error::InvalidParam("alg"));
    }

    let kty: JwkType = alg.kty().ok_or(Error::AlgError(alg.name().into()))?;

    let mut matcher: JwkMatcher = JwkMatcher::new()
      .kty(kty)
      .key_use(JwkUse::Signature)
      .algorithm(alg.name());

    if let Some(kid) = header.kid() {
      matcher = matcher.key_id(kid);
    }

    let candidates: Vec<Jwk> = self.source.get(&JwkSelector::new(matcher), ctx)?;

    Ok(
      candidates
        .into_iter()
        .filter(|key| key.kty() == JwkType::Oct || key.is_public())
        .collect(),
    )
  }
}

/// Selects candidate decryption keys for a JWE header from a
/// [`JwkSource`].
///
/// Headers must carry the expected algorithm pair. Candidates are private
/// keys and symmetric secrets only.
pub struct JweDecryptionKeySelector<S> {
  alg: JweAlgorithm,
  enc: JweEncryption,
  source: S,
}

impl<S: JwkSource> JweDecryptionKeySelector<S> {
  /// Creates a new `JweDecryptionKeySelector` expecting the given
  /// algorithms.
  pub fn new(alg: JweAlgorithm, enc: JweEncryption, source: S) -> Self {
    Self { alg, enc, source }
  }

  /// Returns the candidate keys for the given header, in source order.
  pub fn select(&self, header: &JweHeader, ctx: &SourceContext) -> Result<Vec<Jwk>> {
    if header.alg() != Some(self.alg) {
      return Err(Error::InvalidParam("alg"));
    }

    if header.enc() != Some(self.enc) {
      return Err(Error::InvalidParam("enc"));
    }

    let mut matcher: JwkMatcher = JwkMatcher::new()
      .key_use(JwkUse::Encryption)
      .algorithm(self.alg.name());

    if let Some(kid) = header.kid() {
      matcher = matcher.key_id(kid);
    }

    let candidates: Vec<Jwk> = self.source.get(&JwkSelector::new(matcher), ctx)?;

    Ok(
      candidates
        .into_iter()
        .filter(|key| key.kty() == JwkType::Oct || key.is_private())
        .collect(),
    )
  }
}
