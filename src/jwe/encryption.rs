// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Display;
use core::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// Supported algorithms for the JSON Web Encryption `enc` claim.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-signature-encryption-algorithms)
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[allow(non_camel_case_types)]
pub enum JweEncryption {
  /// AES_128_CBC_HMAC_SHA_256 authenticated encryption algorithm
  #[serde(rename = "A128CBC-HS256")]
  A128CBC_HS256,
  /// AES_192_CBC_HMAC_SHA_384 authenticated encryption algorithm
  #[serde(rename = "A192CBC-HS384")]
  A192CBC_HS384,
  /// AES_256_CBC_HMAC_SHA_512 authenticated encryption algorithm
  #[serde(rename = "A256CBC-HS512")]
  A256CBC_HS512,
  /// AES GCM using 128-bit key
  A128GCM,
  /// AES GCM using 192-bit key
  A192GCM,
  /// AES GCM using 256-bit key
  A256GCM,
  /// ChaCha20-Poly1305
  C20P,
  /// XChaCha20-Poly1305
  XC20P,
}

impl JweEncryption {
  /// A slice of all supported [`JweEncryption`]s.
  pub const ALL: &'static [Self] = &[
    Self::A128CBC_HS256,
    Self::A192CBC_HS384,
    Self::A256CBC_HS512,
    Self::A128GCM,
    Self::A192GCM,
    Self::A256GCM,
    Self::C20P,
    Self::XC20P,
  ];

  /// Returns the JWE encryption algorithm as a `str` slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::A128CBC_HS256 => "A128CBC-HS256",
      Self::A192CBC_HS384 => "A192CBC-HS384",
      Self::A256CBC_HS512 => "A256CBC-HS512",
      Self::A128GCM => "A128GCM",
      Self::A192GCM => "A192GCM",
      Self::A256GCM => "A256GCM",
      Self::C20P => "C20P",
      Self::XC20P => "XC20P",
    }
  }

  /// Returns the required length of the content encryption key in bytes.
  pub const fn key_len(self) -> usize {
    match self {
      Self::A128CBC_HS256 => 32,
      Self::A192CBC_HS384 => 48,
      Self::A256CBC_HS512 => 64,
      Self::A128GCM => 16,
      Self::A192GCM => 24,
      Self::A256GCM | Self::C20P | Self::XC20P => 32,
    }
  }

  /// Returns the required length of the initialization vector in bytes.
  pub const fn iv_len(self) -> usize {
    match self {
      Self::A128CBC_HS256 | Self::A192CBC_HS384 | Self::A256CBC_HS512 => 16,
      Self::A128GCM | Self::A192GCM | Self::A256GCM | Self::C20P => 12,
      Self::XC20P => 24,
    }
  }

  /// Returns `true` for the composite AES-CBC-HMAC algorithms.
  pub const fn is_cbc_hmac(self) -> bool {
    matches!(self, Self::A128CBC_HS256 | Self::A192CBC_HS384 | Self::A256CBC_HS512)
  }
}

impl Display for JweEncryption {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}
