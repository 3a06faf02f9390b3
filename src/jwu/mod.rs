// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Utilities shared across the JOSE modules.

mod base64;
mod random;
mod secret;
mod serde_aud;

pub use self::base64::decode_b64;
pub use self::base64::decode_b64_json;
pub use self::base64::encode_b64;
pub use self::base64::encode_b64_json;
pub use self::random::random_bytes;
pub use self::secret::Secret;

pub(crate) use self::serde_aud::string_or_seq;

use crate::error::Error;
use crate::error::Result;

/// Alias for an ordered map of JSON values.
pub type Object = ::serde_json::Map<String, ::serde_json::Value>;

/// Parses the given slice as utf-8.
pub fn parse_utf8(slice: &(impl AsRef<[u8]> + ?Sized)) -> Result<&str> {
  core::str::from_utf8(slice.as_ref()).map_err(Error::InvalidUtf8)
}

/// Compares two byte slices in constant time.
///
/// Slices of unequal length compare unequal without inspecting the content.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
  use subtle::ConstantTimeEq;

  if a.len() != b.len() {
    return false;
  }

  a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_constant_time_eq() {
    assert!(constant_time_eq(b"", b""));
    assert!(constant_time_eq(b"hello", b"hello"));
    assert!(!constant_time_eq(b"hello", b"world"));
    assert!(!constant_time_eq(b"hello", b"hello world"));
  }

  #[test]
  fn test_parse_utf8() {
    assert_eq!(parse_utf8(b"hello").unwrap(), "hello");
    assert!(parse_utf8(&[0xC0]).is_err());
  }
}
