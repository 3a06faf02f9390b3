// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use crate::error::Result;

/// The allowed characters of an unencoded, attached payload
/// ([RFC 7797](https://tools.ietf.org/html/rfc7797#section-5.2)).
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum CharSet {
  /// Any character except `.`, which delimits the compact segments.
  #[default]
  Default,
  /// The characters of the unpadded base64url alphabet.
  UrlSafe,
}

impl CharSet {
  /// Returns an error if the data contains a character outside the set.
  pub fn check(&self, data: &[u8]) -> Result<()> {
    match self {
      Self::Default => {
        if data.contains(&b'.') {
          return Err(Error::InvalidContent("Invalid Character: `.`".into()));
        }
      }
      Self::UrlSafe => {
        if let Some(byte) = data
          .iter()
          .find(|byte| !matches!(byte, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_'))
        {
          return Err(Error::InvalidContent(format!("Invalid Character: `{}`", char::from(*byte))));
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_rejects_dot() {
    assert!(CharSet::Default.check(b"$.02").is_err());
    assert!(CharSet::Default.check(b"$:02").is_ok());
  }

  #[test]
  fn test_url_safe() {
    assert!(CharSet::UrlSafe.check(b"abc-_09AZ").is_ok());
    assert!(CharSet::UrlSafe.check(b"abc$").is_err());
  }
}
