// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Display;
use core::fmt::Formatter;

use crate::error::Error;
use crate::error::Result;

/// Supported algorithms for the JSON Web Encryption `zip` claim.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-encryption-compression-algorithms)
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum JweCompression {
  /// DEFLATE.
  Deflate,
  /// Non-standard compression algorithm.
  Custom(String),
}

impl JweCompression {
  /// Returns the compression algorithm as a `str` slice.
  pub fn name(&self) -> &str {
    match self {
      Self::Deflate => "DEF",
      Self::Custom(inner) => inner.as_str(),
    }
  }

  /// Compresses the given data.
  pub(crate) fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
    match self {
      Self::Deflate => Ok(miniz_oxide::deflate::compress_to_vec(data, 6)),
      Self::Custom(inner) => Err(Error::AlgError(inner.clone())),
    }
  }

  /// Decompresses the given data, inflating to at most `limit` bytes.
  pub(crate) fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>> {
    match self {
      Self::Deflate => miniz_oxide::inflate::decompress_to_vec_with_limit(data, limit)
        .map_err(|_| Error::InvalidContent("invalid compressed payload".into())),
      Self::Custom(inner) => Err(Error::AlgError(inner.clone())),
    }
  }
}

impl Display for JweCompression {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

impl<'a> From<&'a str> for JweCompression {
  fn from(other: &'a str) -> Self {
    Self::from(other.to_string())
  }
}

impl From<String> for JweCompression {
  fn from(other: String) -> Self {
    match other.as_str() {
      "DEF" => Self::Deflate,
      _ => Self::Custom(other),
    }
  }
}

impl serde::Serialize for JweCompression {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(self.name())
  }
}

impl<'de> serde::Deserialize<'de> for JweCompression {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    String::deserialize(deserializer).map(Self::from)
  }
}
