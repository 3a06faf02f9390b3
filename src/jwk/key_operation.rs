// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Display;
use core::fmt::Formatter;

/// Supported algorithms for the JSON Web Key `key_ops` property.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-key-operations)
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum JwkOperation {
  /// Compute digital signature or MAC.
  Sign,
  /// Verify digital signature or MAC.
  Verify,
  /// Encrypt content.
  Encrypt,
  /// Decrypt content and validate decryption, if applicable.
  Decrypt,
  /// Encrypt key.
  WrapKey,
  /// Decrypt key and validate decryption, if applicable.
  UnwrapKey,
  /// Derive key.
  DeriveKey,
  /// Derive bits not to be used as a key.
  DeriveBits,
  /// Non-standard key operation.
  Custom(String),
}

impl JwkOperation {
  /// Returns the key operation as a `str` slice.
  pub fn name(&self) -> &str {
    match self {
      Self::Sign => "sign",
      Self::Verify => "verify",
      Self::Encrypt => "encrypt",
      Self::Decrypt => "decrypt",
      Self::WrapKey => "wrapKey",
      Self::UnwrapKey => "unwrapKey",
      Self::DeriveKey => "deriveKey",
      Self::DeriveBits => "deriveBits",
      Self::Custom(inner) => inner.as_str(),
    }
  }
}

impl Display for JwkOperation {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

impl<'a> From<&'a str> for JwkOperation {
  fn from(other: &'a str) -> Self {
    Self::from(other.to_string())
  }
}

impl From<String> for JwkOperation {
  fn from(other: String) -> Self {
    match other.as_str() {
      "sign" => Self::Sign,
      "verify" => Self::Verify,
      "encrypt" => Self::Encrypt,
      "decrypt" => Self::Decrypt,
      "wrapKey" => Self::WrapKey,
      "unwrapKey" => Self::UnwrapKey,
      "deriveKey" => Self::DeriveKey,
      "deriveBits" => Self::DeriveBits,
      _ => Self::Custom(other),
    }
  }
}

impl serde::Serialize for JwkOperation {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(self.name())
  }
}

impl<'de> serde::Deserialize<'de> for JwkOperation {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    String::deserialize(deserializer).map(Self::from)
  }
}
