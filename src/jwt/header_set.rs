// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use crate::error::Result;
use crate::jose::JoseHeader;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweEncryption;
use crate::jwe::JweHeader;
use crate::jws::JwsAlgorithm;
use crate::jws::JwsHeader;

/// A read-only view over the protected and unprotected headers of a JOSE
/// object.
///
/// Parameter lookups prefer the protected header; use [`JoseHeader`]
/// disjointness checks before assembling a set to rule out conflicts.
#[derive(Clone, Copy, Debug)]
pub struct JwtHeaderSet<'a, T> {
  protected: Option<&'a T>,
  unprotected: Option<&'a T>,
}

impl<'a, T> JwtHeaderSet<'a, T> {
  /// Creates a new, empty `JwtHeaderSet`.
  pub const fn new() -> Self {
    Self {
      protected: None,
      unprotected: None,
    }
  }

  /// Sets the protected header.
  pub fn with_protected(mut self, value: impl Into<Option<&'a T>>) -> Self {
    self.protected = value.into();
    self
  }

  /// Sets the unprotected header.
  pub fn with_unprotected(mut self, value: impl Into<Option<&'a T>>) -> Self {
    self.unprotected = value.into();
    self
  }

  /// Returns the protected header.
  pub fn protected(&self) -> Option<&'a T> {
    self.protected
  }

  /// Returns the unprotected header.
  pub fn unprotected(&self) -> Option<&'a T> {
    self.unprotected
  }

  /// Resolves a parameter, preferring the protected header.
  pub fn resolve<U>(&self, get: impl Fn(&'a T) -> Option<U>) -> Option<U> {
    self.protected.and_then(&get).or_else(|| self.unprotected.and_then(&get))
  }
}

impl<'a, T: JoseHeader> JwtHeaderSet<'a, T> {
  /// Returns the key ID parameter (kid) of the set.
  pub fn kid(&self) -> Option<&'a str> {
    self.resolve(|header| header.common().kid())
  }

  /// Returns `true` if the protected header contains the given parameter.
  pub fn is_protected(&self, claim: &str) -> bool {
    self.protected.map(|header| header.has_claim(claim)).unwrap_or(false)
  }

  /// Returns the merged critical parameter (crit) entries.
  pub fn crit(&self) -> Option<&'a [String]> {
    self.resolve(|header| header.common().crit())
  }
}

impl<'a> JwtHeaderSet<'a, JwsHeader> {
  /// Returns the signature algorithm (alg) of the set.
  pub fn alg(&self) -> Option<JwsAlgorithm> {
    self.resolve(JwsHeader::alg)
  }

  /// Returns the signature algorithm (alg) or an error if it is unset.
  pub fn try_alg(&self) -> Result<JwsAlgorithm> {
    self.alg().ok_or(Error::MissingParam("alg"))
  }

  /// Returns the payload encoding flag (b64), defaulting to `true`.
  pub fn b64(&self) -> bool {
    self.resolve(JwsHeader::b64).unwrap_or(true)
  }
}

impl<'a> JwtHeaderSet<'a, JweHeader> {
  /// Returns the key management algorithm (alg) of the set.
  pub fn alg(&self) -> Option<JweAlgorithm> {
    self.resolve(JweHeader::alg)
  }

  /// Returns the key management algorithm (alg) or an error if it is unset.
  pub fn try_alg(&self) -> Result<JweAlgorithm> {
    self.alg().ok_or(Error::MissingParam("alg"))
  }

  /// Returns the content encryption algorithm (enc) of the set.
  pub fn enc(&self) -> Option<JweEncryption> {
    self.resolve(JweHeader::enc)
  }

  /// Returns the content encryption algorithm (enc) or an error if it is
  /// unset.
  pub fn try_enc(&self) -> Result<JweEncryption> {
    self.enc().ok_or(Error::MissingParam("enc"))
  }
}

impl<'a, T> Default for JwtHeaderSet<'a, T> {
  fn default() -> Self {
    Self::new()
  }
}
