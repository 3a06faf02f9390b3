// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Display;
use core::fmt::Formatter;

/// Supported algorithms for the JSON Web Key `use` property.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-key-use)
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum JwkUse {
  /// Digital Signature or MAC.
  Signature,
  /// Encryption.
  Encryption,
  /// Non-standard key use.
  Custom(String),
}

impl JwkUse {
  /// Returns the JWK "use" as a `str` slice.
  pub fn name(&self) -> &str {
    match self {
      Self::Signature => "sig",
      Self::Encryption => "enc",
      Self::Custom(inner) => inner.as_str(),
    }
  }
}

impl Display for JwkUse {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

impl<'a> From<&'a str> for JwkUse {
  fn from(other: &'a str) -> Self {
    Self::from(other.to_string())
  }
}

impl From<String> for JwkUse {
  fn from(other: String) -> Self {
    match other.as_str() {
      "sig" => Self::Signature,
      "enc" => Self::Encryption,
      _ => Self::Custom(other),
    }
  }
}

impl serde::Serialize for JwkUse {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(self.name())
  }
}

impl<'de> serde::Deserialize<'de> for JwkUse {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    String::deserialize(deserializer).map(Self::from)
  }
}
