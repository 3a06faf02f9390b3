// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

/// The serialization format of a JSON Web Signature.
///
/// [More Info](https://tools.ietf.org/html/rfc7515#section-7)
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum JwsFormat {
  /// The JWS Compact Serialization.
  #[default]
  Compact,
  /// The general JWS JSON Serialization.
  General,
  /// The flattened JWS JSON Serialization.
  Flatten,
}
