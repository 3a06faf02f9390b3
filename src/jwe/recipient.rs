// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::jwe::JweHeader;
use crate::jwk::Jwk;
use crate::jwu::Secret;

/// A recipient of a JSON Web Encryption object: the recipient key and the
/// per-recipient unprotected header.
#[derive(Clone, Copy, Debug)]
pub struct Recipient<'a> {
  /// The key used for key management.
  ///
  /// A public key for asymmetric algorithms; the shared symmetric key or
  /// password otherwise.
  pub public: Secret<'a>,
  /// The per-recipient unprotected header.
  pub header: Option<&'a JweHeader>,
}

impl<'a> Recipient<'a> {
  /// Creates a new `Recipient` with the given key.
  pub fn new(public: impl Into<Secret<'a>>) -> Self {
    Self {
      public: public.into(),
      header: None,
    }
  }

  /// Sets the per-recipient unprotected header.
  pub fn header(mut self, value: &'a JweHeader) -> Self {
    self.header = Some(value);
    self
  }
}

impl<'a> From<&'a Jwk> for Recipient<'a> {
  fn from(other: &'a Jwk) -> Self {
    Self::new(other)
  }
}

impl<'a, S: Into<Secret<'a>>> From<(S, &'a JweHeader)> for Recipient<'a> {
  fn from(other: (S, &'a JweHeader)) -> Self {
    Self::new(other.0).header(other.1)
  }
}
