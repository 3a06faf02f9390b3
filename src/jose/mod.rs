// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Common behaviour shared by the JOSE header variants.

use crate::jwt::JwtHeader;

/// Common behaviour of the concrete JOSE header types.
pub trait JoseHeader {
  /// Returns a reference to the common header parameters.
  fn common(&self) -> &JwtHeader;

  /// Returns `true` if the header contains a parameter with the given name.
  fn has_claim(&self, claim: &str) -> bool;
}
