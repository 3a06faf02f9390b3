// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::jwk::Jwk;
use crate::jws::JwsHeader;
use crate::jwu::Secret;

/// A signing recipient of a JSON Web Signature: the signing key and the
/// headers describing the signature.
#[derive(Clone, Copy, Debug)]
pub struct Recipient<'a> {
  /// The private key used for signing.
  pub secret: Secret<'a>,
  /// The integrity-protected header.
  pub protected: Option<&'a JwsHeader>,
  /// The non integrity-protected header.
  pub unprotected: Option<&'a JwsHeader>,
}

impl<'a> Recipient<'a> {
  /// Creates a new `Recipient` with the given signing key.
  pub fn new(secret: impl Into<Secret<'a>>) -> Self {
    Self {
      secret: secret.into(),
      protected: None,
      unprotected: None,
    }
  }

  /// Sets the integrity-protected header.
  pub fn protected(mut self, value: &'a JwsHeader) -> Self {
    self.protected = Some(value);
    self
  }

  /// Sets the non integrity-protected header.
  pub fn unprotected(mut self, value: &'a JwsHeader) -> Self {
    self.unprotected = Some(value);
    self
  }
}

impl<'a> From<&'a Jwk> for Recipient<'a> {
  fn from(other: &'a Jwk) -> Self {
    Self::new(other)
  }
}

impl<'a, S: Into<Secret<'a>>> From<(S, &'a JwsHeader)> for Recipient<'a> {
  fn from(other: (S, &'a JwsHeader)) -> Self {
    Self::new(other.0).protected(other.1)
  }
}

impl<'a, S: Into<Secret<'a>>> From<(S, &'a JwsHeader, &'a JwsHeader)> for Recipient<'a> {
  fn from(other: (S, &'a JwsHeader, &'a JwsHeader)) -> Self {
    Self::new(other.0).protected(other.1).unprotected(other.2)
  }
}
