// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

/// The serialization format of a JSON Web Encryption object.
///
/// [More Info](https://tools.ietf.org/html/rfc7516#section-7)
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum JweFormat {
  /// The JWE Compact Serialization.
  #[default]
  Compact,
  /// The general JWE JSON Serialization.
  General,
  /// The flattened JWE JSON Serialization.
  Flatten,
}
