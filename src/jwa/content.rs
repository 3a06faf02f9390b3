// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crypto::ciphers::aes::Aes128Gcm;
use crypto::ciphers::aes::Aes192Gcm;
use crypto::ciphers::aes::Aes256Gcm;
use crypto::ciphers::aes_cbc::Aes128CbcHmac256;
use crypto::ciphers::aes_cbc::Aes192CbcHmac384;
use crypto::ciphers::aes_cbc::Aes256CbcHmac512;
use crypto::ciphers::chacha::ChaCha20Poly1305;
use crypto::ciphers::chacha::XChaCha20Poly1305;
use crypto::ciphers::traits::Aead;

use crate::error::Error;
use crate::error::Result;
use crate::jwe::JweEncryption;

/// Encrypts `plaintext` with the given content encryption algorithm,
/// returning the ciphertext and the authentication tag.
///
/// The tag authenticates `aad`, the initialization vector and the
/// ciphertext; the CEK length must match the algorithm exactly.
pub(crate) fn encrypt_content(
  enc: JweEncryption,
  key: &[u8],
  iv: &[u8],
  aad: &[u8],
  plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>)> {
  match enc {
    JweEncryption::A128CBC_HS256 => aead_encrypt::<Aes128CbcHmac256>(enc, key, iv, aad, plaintext),
    JweEncryption::A192CBC_HS384 => aead_encrypt::<Aes192CbcHmac384>(enc, key, iv, aad, plaintext),
    JweEncryption::A256CBC_HS512 => aead_encrypt::<Aes256CbcHmac512>(enc, key, iv, aad, plaintext),
    JweEncryption::A128GCM => aead_encrypt::<Aes128Gcm>(enc, key, iv, aad, plaintext),
    JweEncryption::A192GCM => aead_encrypt::<Aes192Gcm>(enc, key, iv, aad, plaintext),
    JweEncryption::A256GCM => aead_encrypt::<Aes256Gcm>(enc, key, iv, aad, plaintext),
    JweEncryption::C20P => aead_encrypt::<ChaCha20Poly1305>(enc, key, iv, aad, plaintext),
    JweEncryption::XC20P => aead_encrypt::<XChaCha20Poly1305>(enc, key, iv, aad, plaintext),
  }
}

/// Verifies the authentication tag and decrypts `ciphertext`.
pub(crate) fn decrypt_content(
  enc: JweEncryption,
  key: &[u8],
  iv: &[u8],
  aad: &[u8],
  ciphertext: &[u8],
  tag: &[u8],
) -> Result<Vec<u8>> {
  match enc {
    JweEncryption::A128CBC_HS256 => aead_decrypt::<Aes128CbcHmac256>(enc, key, iv, aad, ciphertext, tag),
    JweEncryption::A192CBC_HS384 => aead_decrypt::<Aes192CbcHmac384>(enc, key, iv, aad, ciphertext, tag),
    JweEncryption::A256CBC_HS512 => aead_decrypt::<Aes256CbcHmac512>(enc, key, iv, aad, ciphertext, tag),
    JweEncryption::A128GCM => aead_decrypt::<Aes128Gcm>(enc, key, iv, aad, ciphertext, tag),
    JweEncryption::A192GCM => aead_decrypt::<Aes192Gcm>(enc, key, iv, aad, ciphertext, tag),
    JweEncryption::A256GCM => aead_decrypt::<Aes256Gcm>(enc, key, iv, aad, ciphertext, tag),
    JweEncryption::C20P => aead_decrypt::<ChaCha20Poly1305>(enc, key, iv, aad, ciphertext, tag),
    JweEncryption::XC20P => aead_decrypt::<XChaCha20Poly1305>(enc, key, iv, aad, ciphertext, tag),
  }
}

/// Returns an error if the CEK length does not match the algorithm.
pub(crate) fn check_cek_length(enc: JweEncryption, key: &[u8]) -> Result<()> {
  if key.len() != enc.key_len() {
    Err(Error::KeyLength {
      enc: enc.name(),
      bits: enc.key_len() * 8,
    })
  } else {
    Ok(())
  }
}

fn aead_encrypt<A: Aead>(
  enc: JweEncryption,
  key: &[u8],
  iv: &[u8],
  aad: &[u8],
  plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>)> {
  check_cek_length(enc, key)?;

  if iv.len() != A::NONCE_LENGTH {
    return Err(Error::InvalidParam("iv"));
  }

  let padding: usize = A::padsize(plaintext).map(|size| size.get()).unwrap_or_default();
  let mut ciphertext: Vec<u8> = vec![0; plaintext.len() + padding];
  let mut tag: Vec<u8> = vec![0; A::TAG_LENGTH];

  A::try_encrypt(key, iv, aad, plaintext, &mut ciphertext, &mut tag)?;

  Ok((ciphertext, tag))
}

fn aead_decrypt<A: Aead>(
  enc: JweEncryption,
  key: &[u8],
  iv: &[u8],
  aad: &[u8],
  ciphertext: &[u8],
  tag: &[u8],
) -> Result<Vec<u8>> {
  check_cek_length(enc, key)?;

  if iv.len() != A::NONCE_LENGTH || tag.len() != A::TAG_LENGTH {
    return Err(Error::EncError("decryption failed"));
  }

  let mut plaintext: Vec<u8> = vec![0; ciphertext.len()];

  let length: usize =
    A::try_decrypt(key, iv, aad, &mut plaintext, ciphertext, tag).map_err(|_| Error::EncError("decryption failed"))?;

  plaintext.truncate(length);

  Ok(plaintext)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwu::random_bytes;

  #[test]
  fn test_roundtrip_all_encryptions() {
    for enc in JweEncryption::ALL {
      let key: Vec<u8> = random_bytes(enc.key_len()).unwrap();
      let iv: Vec<u8> = random_bytes(enc.iv_len()).unwrap();

      let (ciphertext, tag) = encrypt_content(*enc, &key, &iv, b"aad", b"plaintext").unwrap();
      let plaintext: Vec<u8> = decrypt_content(*enc, &key, &iv, b"aad", &ciphertext, &tag).unwrap();

      assert_eq!(plaintext, b"plaintext");
    }
  }

  #[test]
  fn test_tag_mismatch_is_rejected() {
    let enc: JweEncryption = JweEncryption::A256GCM;
    let key: Vec<u8> = random_bytes(enc.key_len()).unwrap();
    let iv: Vec<u8> = random_bytes(enc.iv_len()).unwrap();

    let (ciphertext, mut tag) = encrypt_content(enc, &key, &iv, b"aad", b"plaintext").unwrap();
    tag[0] ^= 1;

    assert!(matches!(
      decrypt_content(enc, &key, &iv, b"aad", &ciphertext, &tag),
      Err(Error::EncError(_))
    ));
  }

  #[test]
  fn test_cek_length_is_enforced() {
    let error = encrypt_content(JweEncryption::A128CBC_HS256, &[0; 16], &[0; 16], b"", b"data").unwrap_err();

    assert_eq!(
      error.to_string(),
      "The Content Encryption Key (CEK) length for A128CBC-HS256 must be 256 bits"
    );
  }
}
