// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// Encodes the given data as unpadded base64url ([RFC 4648, section
/// 5](https://tools.ietf.org/html/rfc4648#section-5)).
pub fn encode_b64(data: impl AsRef<[u8]>) -> String {
  URL_SAFE_NO_PAD.encode(data)
}

/// Decodes the given unpadded base64url data.
///
/// Characters outside the base64url alphabet and inputs with a length of
/// one modulo four are rejected.
pub fn decode_b64(data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
  URL_SAFE_NO_PAD.decode(data.as_ref()).map_err(Error::InvalidBase64)
}

/// Serializes the given value as JSON and encodes it as base64url.
pub fn encode_b64_json<T>(data: &T) -> Result<String>
where
  T: Serialize,
{
  serde_json::to_vec(data).map(encode_b64).map_err(Error::InvalidJson)
}

/// Decodes the given base64url data and deserializes it from JSON.
pub fn decode_b64_json<T>(data: impl AsRef<[u8]>) -> Result<T>
where
  T: DeserializeOwned,
{
  decode_b64(data).and_then(|data| serde_json::from_slice(&data).map_err(Error::InvalidJson))
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  #[test]
  fn test_decode_rejects_invalid_characters() {
    assert!(decode_b64("abc!").is_err());
    assert!(decode_b64("a+b/").is_err());
    assert!(decode_b64("abc=").is_err());
  }

  #[test]
  fn test_decode_rejects_invalid_length() {
    // length % 4 == 1 cannot be produced by the encoder
    assert!(decode_b64("abcde").is_err());
  }

  #[test]
  fn test_known_values() {
    assert_eq!(encode_b64(b"$.02"), "JC4wMg");
    assert_eq!(decode_b64("JC4wMg").unwrap(), b"$.02");
    assert_eq!(encode_b64(b""), "");
    assert_eq!(decode_b64("").unwrap(), Vec::<u8>::new());
  }

  proptest! {
    #[test]
    fn test_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..=1024)) {
      prop_assert_eq!(decode_b64(encode_b64(&bytes)).unwrap(), bytes);
    }
  }
}
