// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crypto::utils::rand;

use crate::error::Result;

/// Returns `count` bytes from a cryptographically secure random number
/// generator.
pub fn random_bytes(count: usize) -> Result<Vec<u8>> {
  let mut data: Vec<u8> = vec![0; count];
  rand::fill(&mut data)?;
  Ok(data)
}
