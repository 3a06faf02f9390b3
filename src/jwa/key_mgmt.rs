// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crypto::ciphers::aes::Aes128Gcm;
use crypto::ciphers::aes::Aes192Gcm;
use crypto::ciphers::aes::Aes256Gcm;
use crypto::ciphers::aes_kw::Aes128Kw;
use crypto::ciphers::aes_kw::Aes192Kw;
use crypto::ciphers::aes_kw::Aes256Kw;
use crypto::ciphers::chacha::ChaCha20Poly1305;
use crypto::ciphers::chacha::XChaCha20Poly1305;
use crypto::ciphers::traits::Aead;
use crypto::keys::pbkdf::PBKDF2_HMAC_SHA256;
use crypto::keys::pbkdf::PBKDF2_HMAC_SHA384;
use crypto::keys::pbkdf::PBKDF2_HMAC_SHA512;
use rsa::traits::PublicKeyParts;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwa::agreement::ecdh_curve;
use crate::jwa::agreement::generate_epk;
use crate::jwa::concat_kdf::concat_kdf;
use crate::jwa::concat_kdf::supp_pub_info;
use crate::jwa::content::check_cek_length;
use crate::jwa::diffie_hellman;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweEncryption;
use crate::jwe::JweHeader;
use crate::jwk::EcdhCurve;
use crate::jwk::Jwk;
use crate::jwk::JwkOperation;
use crate::jwk::JwkUse;
use crate::jwu::decode_b64;
use crate::jwu::encode_b64;
use crate::jwu::random_bytes;
use crate::jwu::Secret;

/// The result of the key management step of a JWE encryption.
pub(crate) struct EncryptedCek {
  /// The content encryption key.
  pub(crate) cek: Zeroizing<Vec<u8>>,
  /// The wrapped CEK; `None` for direct key management.
  pub(crate) encrypted_key: Option<Vec<u8>>,
  /// A key wrap that must run after content encryption.
  pub(crate) deferred: Option<DeferredKeyWrap>,
}

/// An ECDH-1PU key wrap awaiting the content authentication tag.
///
/// [draft-madden-jose-ecdh-1pu-04, section 2.3](https://tools.ietf.org/html/draft-madden-jose-ecdh-1pu-04#section-2.3)
pub(crate) struct DeferredKeyWrap {
  shared: Zeroizing<Vec<u8>>,
  apu: Vec<u8>,
  apv: Vec<u8>,
  alg_name: &'static str,
  wrap_len: usize,
}

impl DeferredKeyWrap {
  /// Derives the KEK with the authentication tag bound into SuppPubInfo
  /// and wraps the CEK.
  pub(crate) fn wrap(&self, tag: &[u8], cek: &[u8]) -> Result<Vec<u8>> {
    let kek: Zeroizing<Vec<u8>> = Zeroizing::new(concat_kdf(
      self.alg_name,
      self.wrap_len,
      &self.shared,
      &self.apu,
      &self.apv,
      &supp_pub_info(self.wrap_len, Some(tag)),
    )?);

    aes_kw_wrap(&kek, cek)
  }
}

/// Produces the CEK for an encryption operation and, for wrapping
/// algorithms, the encrypted key.
///
/// Header parameters required by the algorithm (`epk`, `iv`/`tag` for AEAD
/// key wraps, `p2s`/`p2c`) are injected into `header`. When `cek` is given
/// (shared across the recipients of a general serialization), it is reused
/// and must be produced by a wrapping algorithm.
pub(crate) fn encrypt_cek(
  alg: JweAlgorithm,
  enc: JweEncryption,
  recipient: Secret<'_>,
  sender: Option<Secret<'_>>,
  header: &mut JweHeader,
  cek: Option<&[u8]>,
) -> Result<EncryptedCek> {
  if let Some(jwk) = recipient.jwk() {
    jwk.check_use(JwkUse::Encryption)?;
    jwk.check_operation(match alg {
      JweAlgorithm::DIR => JwkOperation::Encrypt,
      JweAlgorithm::ECDH_ES | JweAlgorithm::ECDH_1PU => JwkOperation::DeriveKey,
      _ => JwkOperation::WrapKey,
    })?;
  }

  if cek.is_some() && alg.is_direct() {
    return Err(Error::AlgError(format!(
      "{} cannot share a content encryption key across recipients",
      alg.name()
    )));
  }

  match alg {
    JweAlgorithm::DIR => {
      let key = recipient.to_oct_key(0)?;
      check_cek_length(enc, &key)?;

      Ok(EncryptedCek {
        cek: Zeroizing::new(key.into_owned()),
        encrypted_key: None,
        deferred: None,
      })
    }
    JweAlgorithm::A128KW | JweAlgorithm::A192KW | JweAlgorithm::A256KW => {
      let kek = expand_kek(recipient, alg.wrap_key_len())?;
      let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;

      Ok(EncryptedCek {
        encrypted_key: Some(aes_kw_wrap(&kek, &cek)?),
        cek,
        deferred: None,
      })
    }
    JweAlgorithm::A128GCMKW => aead_cek::<Aes128Gcm>(recipient, alg, enc, header, cek),
    JweAlgorithm::A192GCMKW => aead_cek::<Aes192Gcm>(recipient, alg, enc, header, cek),
    JweAlgorithm::A256GCMKW => aead_cek::<Aes256Gcm>(recipient, alg, enc, header, cek),
    JweAlgorithm::PBES2_HS256_A128KW | JweAlgorithm::PBES2_HS384_A192KW | JweAlgorithm::PBES2_HS512_A256KW => {
      let password = recipient.to_oct_key(0)?;

      let p2s: Vec<u8> = match header.p2s() {
        Some(value) => decode_b64(value)?,
        None => {
          let salt: Vec<u8> = random_bytes(16)?;
          header.set_p2s(encode_b64(&salt));
          salt
        }
      };

      let p2c: u64 = match header.p2c() {
        Some(value) => value,
        None => {
          header.set_p2c(PBES2_DEFAULT_ITERATIONS);
          PBES2_DEFAULT_ITERATIONS
        }
      };

      let kek: Zeroizing<Vec<u8>> = pbes2_kek(alg, &password, &p2s, p2c)?;
      let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;

      Ok(EncryptedCek {
        encrypted_key: Some(aes_kw_wrap(&kek, &cek)?),
        cek,
        deferred: None,
      })
    }
    JweAlgorithm::RSA1_5 => {
      let key: rsa::RsaPublicKey = recipient.to_rsa_public()?;
      check_rsa_size(alg, key.size())?;

      let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;
      let encrypted_key: Vec<u8> = key
        .encrypt(&mut rand::rngs::OsRng, rsa::Pkcs1v15Encrypt, &cek)
        .map_err(|_| Error::EncError("RSA encryption failed"))?;

      Ok(EncryptedCek {
        encrypted_key: Some(encrypted_key),
        cek,
        deferred: None,
      })
    }
    JweAlgorithm::RSA_OAEP | JweAlgorithm::RSA_OAEP_256 | JweAlgorithm::RSA_OAEP_384 | JweAlgorithm::RSA_OAEP_512 => {
      let key: rsa::RsaPublicKey = recipient.to_rsa_public()?;
      check_rsa_size(alg, key.size())?;

      let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;
      let encrypted_key: Vec<u8> = key
        .encrypt(&mut rand::rngs::OsRng, oaep_padding(alg), &cek)
        .map_err(|_| Error::EncError("RSA encryption failed"))?;

      Ok(EncryptedCek {
        encrypted_key: Some(encrypted_key),
        cek,
        deferred: None,
      })
    }
    JweAlgorithm::ECDH_ES => {
      let z: Zeroizing<Vec<u8>> = ecdh_es_encrypt(recipient, header)?;
      let (apu, apv) = agreement_info(header)?;

      let cek: Vec<u8> = concat_kdf(
        enc.name(),
        enc.key_len(),
        &z,
        &apu,
        &apv,
        &supp_pub_info(enc.key_len(), None),
      )?;

      Ok(EncryptedCek {
        cek: Zeroizing::new(cek),
        encrypted_key: None,
        deferred: None,
      })
    }
    JweAlgorithm::ECDH_ES_A128KW | JweAlgorithm::ECDH_ES_A192KW | JweAlgorithm::ECDH_ES_A256KW => {
      let kek: Zeroizing<Vec<u8>> = ecdh_es_kek(recipient, alg, alg.wrap_key_len(), header)?;
      let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;

      Ok(EncryptedCek {
        encrypted_key: Some(aes_kw_wrap(&kek, &cek)?),
        cek,
        deferred: None,
      })
    }
    JweAlgorithm::ECDH_ES_C20PKW => {
      let kek: Zeroizing<Vec<u8>> = ecdh_es_kek(recipient, alg, ChaCha20Poly1305::KEY_LENGTH, header)?;
      let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;

      Ok(EncryptedCek {
        encrypted_key: Some(aead_key_wrap::<ChaCha20Poly1305>(&kek, header, &cek)?),
        cek,
        deferred: None,
      })
    }
    JweAlgorithm::ECDH_ES_XC20PKW => {
      let kek: Zeroizing<Vec<u8>> = ecdh_es_kek(recipient, alg, XChaCha20Poly1305::KEY_LENGTH, header)?;
      let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;

      Ok(EncryptedCek {
        encrypted_key: Some(aead_key_wrap::<XChaCha20Poly1305>(&kek, header, &cek)?),
        cek,
        deferred: None,
      })
    }
    JweAlgorithm::ECDH_1PU => {
      let z: Zeroizing<Vec<u8>> = ecdh_1pu_encrypt(recipient, sender, header)?;
      let (apu, apv) = agreement_info(header)?;

      let cek: Vec<u8> = concat_kdf(
        enc.name(),
        enc.key_len(),
        &z,
        &apu,
        &apv,
        &supp_pub_info(enc.key_len(), None),
      )?;

      Ok(EncryptedCek {
        cek: Zeroizing::new(cek),
        encrypted_key: None,
        deferred: None,
      })
    }
    JweAlgorithm::ECDH_1PU_A128KW | JweAlgorithm::ECDH_1PU_A192KW | JweAlgorithm::ECDH_1PU_A256KW => {
      check_one_pass_enc(enc)?;

      let z: Zeroizing<Vec<u8>> = ecdh_1pu_encrypt(recipient, sender, header)?;
      let (apu, apv) = agreement_info(header)?;
      let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;

      Ok(EncryptedCek {
        deferred: Some(DeferredKeyWrap {
          shared: z,
          apu,
          apv,
          alg_name: alg.name(),
          wrap_len: alg.wrap_key_len(),
        }),
        encrypted_key: None,
        cek,
      })
    }
  }
}

/// Recovers the CEK from the key management parameters of a received JWE.
///
/// `tag` is the content authentication tag, consumed by the ECDH-1PU key
/// wrap modes.
#[allow(clippy::too_many_arguments)]
pub(crate) fn decrypt_cek(
  alg: JweAlgorithm,
  enc: JweEncryption,
  secret: Secret<'_>,
  sender: Option<Secret<'_>>,
  header: &JweHeader,
  encrypted_key: Option<&[u8]>,
  tag: &[u8],
  min_p2c: u64,
  expected_curve: Option<EcdhCurve>,
) -> Result<Zeroizing<Vec<u8>>> {
  if let Some(jwk) = secret.jwk() {
    jwk.check_use(JwkUse::Encryption)?;
    jwk.check_operation(match alg {
      JweAlgorithm::DIR => JwkOperation::Decrypt,
      JweAlgorithm::ECDH_ES | JweAlgorithm::ECDH_1PU => JwkOperation::DeriveKey,
      _ => JwkOperation::UnwrapKey,
    })?;
  }

  if alg.is_direct() && encrypted_key.is_some() {
    return Err(Error::InvalidParam("encrypted_key"));
  }

  match alg {
    JweAlgorithm::DIR => {
      let key = secret.to_oct_key(0)?;
      check_cek_length(enc, &key)?;
      Ok(Zeroizing::new(key.into_owned()))
    }
    JweAlgorithm::A128KW | JweAlgorithm::A192KW | JweAlgorithm::A256KW => {
      let kek = expand_kek(secret, alg.wrap_key_len())?;
      aes_kw_unwrap(&kek, expect_encrypted_key(encrypted_key)?)
    }
    JweAlgorithm::A128GCMKW => aead_key_unwrap::<Aes128Gcm>(&expand_kek(secret, 16)?, header, encrypted_key),
    JweAlgorithm::A192GCMKW => aead_key_unwrap::<Aes192Gcm>(&expand_kek(secret, 24)?, header, encrypted_key),
    JweAlgorithm::A256GCMKW => aead_key_unwrap::<Aes256Gcm>(&expand_kek(secret, 32)?, header, encrypted_key),
    JweAlgorithm::PBES2_HS256_A128KW | JweAlgorithm::PBES2_HS384_A192KW | JweAlgorithm::PBES2_HS512_A256KW => {
      let password = secret.to_oct_key(0)?;

      let p2s: Vec<u8> = decode_b64(header.p2s().ok_or(Error::MissingParam("p2s"))?)?;
      let p2c: u64 = header.p2c().ok_or(Error::MissingParam("p2c"))?;

      if p2s.len() < 8 {
        return Err(Error::InvalidParam("p2s"));
      }

      if p2c < min_p2c {
        return Err(Error::InvalidParam("p2c"));
      }

      let kek: Zeroizing<Vec<u8>> = pbes2_kek(alg, &password, &p2s, p2c)?;

      aes_kw_unwrap(&kek, expect_encrypted_key(encrypted_key)?)
    }
    JweAlgorithm::RSA1_5 => {
      let key: rsa::RsaPrivateKey = secret.to_rsa_secret()?;
      check_rsa_size(alg, key.size())?;

      // Substitute a random CEK of the expected length on padding failure
      // so downstream authentication fails instead of exposing a
      // Bleichenbacher oracle. The substitute is generated unconditionally
      // before the decryption is attempted.
      let fallback: Zeroizing<Vec<u8>> = random_cek(enc)?;

      let cek: Zeroizing<Vec<u8>> = key
        .decrypt(rsa::Pkcs1v15Encrypt, expect_encrypted_key(encrypted_key)?)
        .map(Zeroizing::new)
        .unwrap_or_else(|_| fallback.clone());

      if cek.len() == enc.key_len() {
        Ok(cek)
      } else {
        Ok(fallback)
      }
    }
    JweAlgorithm::RSA_OAEP | JweAlgorithm::RSA_OAEP_256 | JweAlgorithm::RSA_OAEP_384 | JweAlgorithm::RSA_OAEP_512 => {
      let key: rsa::RsaPrivateKey = secret.to_rsa_secret()?;
      check_rsa_size(alg, key.size())?;

      key
        .decrypt(oaep_padding(alg), expect_encrypted_key(encrypted_key)?)
        .map(Zeroizing::new)
        .map_err(|_| Error::EncError("key unwrap failed"))
    }
    JweAlgorithm::ECDH_ES => {
      let z: Zeroizing<Vec<u8>> = ecdh_es_decrypt(secret, header, expected_curve)?;
      let (apu, apv) = agreement_info(header)?;

      concat_kdf(
        enc.name(),
        enc.key_len(),
        &z,
        &apu,
        &apv,
        &supp_pub_info(enc.key_len(), None),
      )
      .map(Zeroizing::new)
    }
    JweAlgorithm::ECDH_ES_A128KW | JweAlgorithm::ECDH_ES_A192KW | JweAlgorithm::ECDH_ES_A256KW => {
      let kek: Zeroizing<Vec<u8>> = ecdh_es_unwrap_kek(secret, alg, alg.wrap_key_len(), header, expected_curve)?;
      aes_kw_unwrap(&kek, expect_encrypted_key(encrypted_key)?)
    }
    JweAlgorithm::ECDH_ES_C20PKW => {
      let kek: Zeroizing<Vec<u8>> =
        ecdh_es_unwrap_kek(secret, alg, ChaCha20Poly1305::KEY_LENGTH, header, expected_curve)?;
      aead_key_unwrap::<ChaCha20Poly1305>(&kek, header, encrypted_key)
    }
    JweAlgorithm::ECDH_ES_XC20PKW => {
      let kek: Zeroizing<Vec<u8>> =
        ecdh_es_unwrap_kek(secret, alg, XChaCha20Poly1305::KEY_LENGTH, header, expected_curve)?;
      aead_key_unwrap::<XChaCha20Poly1305>(&kek, header, encrypted_key)
    }
    JweAlgorithm::ECDH_1PU => {
      let z: Zeroizing<Vec<u8>> = ecdh_1pu_decrypt(secret, sender, header, expected_curve)?;
      let (apu, apv) = agreement_info(header)?;

      concat_kdf(
        enc.name(),
        enc.key_len(),
        &z,
        &apu,
        &apv,
        &supp_pub_info(enc.key_len(), None),
      )
      .map(Zeroizing::new)
    }
    JweAlgorithm::ECDH_1PU_A128KW | JweAlgorithm::ECDH_1PU_A192KW | JweAlgorithm::ECDH_1PU_A256KW => {
      check_one_pass_enc(enc)?;

      let z: Zeroizing<Vec<u8>> = ecdh_1pu_decrypt(secret, sender, header, expected_curve)?;
      let (apu, apv) = agreement_info(header)?;

      let kek: Zeroizing<Vec<u8>> = Zeroizing::new(concat_kdf(
        alg.name(),
        alg.wrap_key_len(),
        &z,
        &apu,
        &apv,
        &supp_pub_info(alg.wrap_key_len(), Some(tag)),
      )?);

      aes_kw_unwrap(&kek, expect_encrypted_key(encrypted_key)?)
    }
  }
}

const PBES2_DEFAULT_ITERATIONS: u64 = 10_000;

fn random_cek(enc: JweEncryption) -> Result<Zeroizing<Vec<u8>>> {
  random_bytes(enc.key_len()).map(Zeroizing::new)
}

fn cek_or_random(cek: Option<&[u8]>, enc: JweEncryption) -> Result<Zeroizing<Vec<u8>>> {
  match cek {
    Some(cek) => {
      check_cek_length(enc, cek)?;
      Ok(Zeroizing::new(cek.to_vec()))
    }
    None => random_cek(enc),
  }
}

fn expect_encrypted_key(encrypted_key: Option<&[u8]>) -> Result<&[u8]> {
  match encrypted_key {
    Some(value) if !value.is_empty() => Ok(value),
    Some(_) | None => Err(Error::MissingParam("encrypted_key")),
  }
}

fn expand_kek<'a>(secret: Secret<'a>, len: usize) -> Result<std::borrow::Cow<'a, [u8]>> {
  let kek = secret.to_oct_key(len)?;

  if kek.len() != len {
    return Err(Error::InvalidKey(format!("expected a key of {len} bytes")));
  }

  Ok(kek)
}

fn aes_kw_wrap(kek: &[u8], cek: &[u8]) -> Result<Vec<u8>> {
  let mut ciphertext: Vec<u8> = vec![0; cek.len() + Aes128Kw::BLOCK];

  match kek.len() {
    16 => Aes128Kw::new(kek).wrap_key(cek, &mut ciphertext)?,
    24 => Aes192Kw::new(kek).wrap_key(cek, &mut ciphertext)?,
    32 => Aes256Kw::new(kek).wrap_key(cek, &mut ciphertext)?,
    _ => return Err(Error::InvalidKey("invalid AES key wrap size".into())),
  }

  Ok(ciphertext)
}

fn aes_kw_unwrap(kek: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
  let length: usize = ciphertext
    .len()
    .checked_sub(Aes128Kw::BLOCK)
    .ok_or(Error::EncError("key unwrap failed"))?;

  let mut plaintext: Zeroizing<Vec<u8>> = Zeroizing::new(vec![0; length]);

  let result: crypto::Result<()> = match kek.len() {
    16 => Aes128Kw::new(kek).unwrap_key(ciphertext, &mut plaintext),
    24 => Aes192Kw::new(kek).unwrap_key(ciphertext, &mut plaintext),
    32 => Aes256Kw::new(kek).unwrap_key(ciphertext, &mut plaintext),
    _ => return Err(Error::InvalidKey("invalid AES key wrap size".into())),
  };

  result.map_err(|_| Error::EncError("key unwrap failed"))?;

  Ok(plaintext)
}

/// Wraps the CEK with an AEAD cipher, storing the nonce and tag in the
/// `iv` and `tag` header parameters.
fn aead_key_wrap<A: Aead>(kek: &[u8], header: &mut JweHeader, cek: &[u8]) -> Result<Vec<u8>> {
  let iv: Vec<u8> = random_bytes(A::NONCE_LENGTH)?;
  let mut ciphertext: Vec<u8> = vec![0; cek.len()];
  let mut tag: Vec<u8> = vec![0; A::TAG_LENGTH];

  A::try_encrypt(kek, &iv, &[], cek, &mut ciphertext, &mut tag)?;

  header.set_iv(encode_b64(&iv));
  header.set_tag(encode_b64(&tag));

  Ok(ciphertext)
}

fn aead_key_unwrap<A: Aead>(kek: &[u8], header: &JweHeader, encrypted_key: Option<&[u8]>) -> Result<Zeroizing<Vec<u8>>> {
  let encrypted_key: &[u8] = expect_encrypted_key(encrypted_key)?;

  let iv: Vec<u8> = decode_b64(header.iv().ok_or(Error::MissingParam("iv"))?)?;
  let tag: Vec<u8> = decode_b64(header.tag().ok_or(Error::MissingParam("tag"))?)?;

  if iv.len() != A::NONCE_LENGTH || tag.len() != A::TAG_LENGTH {
    return Err(Error::EncError("key unwrap failed"));
  }

  let mut plaintext: Zeroizing<Vec<u8>> = Zeroizing::new(vec![0; encrypted_key.len()]);

  A::try_decrypt(kek, &iv, &[], &mut plaintext, encrypted_key, &tag).map_err(|_| Error::EncError("key unwrap failed"))?;

  Ok(plaintext)
}

fn aead_cek<A: Aead>(
  recipient: Secret<'_>,
  alg: JweAlgorithm,
  enc: JweEncryption,
  header: &mut JweHeader,
  cek: Option<&[u8]>,
) -> Result<EncryptedCek> {
  let kek = expand_kek(recipient, alg.wrap_key_len())?;
  let cek: Zeroizing<Vec<u8>> = cek_or_random(cek, enc)?;

  Ok(EncryptedCek {
    encrypted_key: Some(aead_key_wrap::<A>(&kek, header, &cek)?),
    cek,
    deferred: None,
  })
}

/// Derives the PBES2 KEK: PBKDF2 with the salt `UTF8(alg) || 0x00 || p2s`
/// and the PRF and key size indicated by the algorithm name.
fn pbes2_kek(alg: JweAlgorithm, password: &[u8], p2s: &[u8], p2c: u64) -> Result<Zeroizing<Vec<u8>>> {
  let mut salt: Vec<u8> = Vec::with_capacity(alg.name().len() + 1 + p2s.len());
  salt.extend_from_slice(alg.name().as_bytes());
  salt.push(0x00);
  salt.extend_from_slice(p2s);

  let rounds: u32 = u32::try_from(p2c).map_err(|_| Error::InvalidParam("p2c"))?;
  let rounds: core::num::NonZeroU32 = core::num::NonZeroU32::new(rounds).ok_or(Error::InvalidParam("p2c"))?;

  let mut kek: Zeroizing<Vec<u8>> = Zeroizing::new(vec![0; alg.wrap_key_len()]);

  match alg {
    JweAlgorithm::PBES2_HS256_A128KW => PBKDF2_HMAC_SHA256(password, &salt, rounds, &mut kek),
    JweAlgorithm::PBES2_HS384_A192KW => PBKDF2_HMAC_SHA384(password, &salt, rounds, &mut kek),
    JweAlgorithm::PBES2_HS512_A256KW => PBKDF2_HMAC_SHA512(password, &salt, rounds, &mut kek),
    _ => return Err(Error::AlgError(alg.name().into())),
  }

  Ok(kek)
}

fn check_rsa_size(alg: JweAlgorithm, size: usize) -> Result<()> {
  const RSA_MIN_MODULUS_BITS: usize = 2048;

  if size * 8 >= RSA_MIN_MODULUS_BITS {
    return Ok(());
  }

  let hash: &str = match alg {
    JweAlgorithm::RSA_OAEP => "SHA-1",
    JweAlgorithm::RSA_OAEP_256 => "SHA-256",
    JweAlgorithm::RSA_OAEP_384 => "SHA-384",
    JweAlgorithm::RSA_OAEP_512 => "SHA-512",
    _ => return Err(Error::InvalidKey(format!("RSA modulus below {RSA_MIN_MODULUS_BITS} bits"))),
  };

  Err(Error::AlgError(format!(
    "Key is too short for encryption using OAEPPadding with {hash} and MGF1{hash}"
  )))
}

fn oaep_padding(alg: JweAlgorithm) -> rsa::Oaep {
  match alg {
    JweAlgorithm::RSA_OAEP => rsa::Oaep::new::<sha1::Sha1>(),
    JweAlgorithm::RSA_OAEP_256 => rsa::Oaep::new::<sha2::Sha256>(),
    JweAlgorithm::RSA_OAEP_384 => rsa::Oaep::new::<sha2::Sha384>(),
    _ => rsa::Oaep::new::<sha2::Sha512>(),
  }
}

fn check_one_pass_enc(enc: JweEncryption) -> Result<()> {
  if enc.is_cbc_hmac() {
    Ok(())
  } else {
    Err(Error::AlgError(
      "ECDH-1PU key wrapping requires an AES-CBC-HMAC content encryption".into(),
    ))
  }
}

/// Returns the decoded PartyUInfo and PartyVInfo values.
fn agreement_info(header: &JweHeader) -> Result<(Vec<u8>, Vec<u8>)> {
  let apu: Vec<u8> = header.apu().map(decode_b64).transpose()?.unwrap_or_default();
  let apv: Vec<u8> = header.apv().map(decode_b64).transpose()?.unwrap_or_default();

  Ok((apu, apv))
}

/// Generates an ephemeral key on the recipient curve, stores its public
/// half as `epk` and returns the ECDH-ES shared secret.
fn ecdh_es_encrypt(recipient: Secret<'_>, header: &mut JweHeader) -> Result<Zeroizing<Vec<u8>>> {
  let public: &Jwk = recipient.expect_jwk()?;
  let curve: EcdhCurve = ecdh_curve(public)?;
  let ephemeral: Jwk = generate_epk(curve)?;

  let z: Zeroizing<Vec<u8>> = Zeroizing::new(diffie_hellman(curve, public, &ephemeral)?);

  header.set_epk(ephemeral.to_public()?);

  Ok(z)
}

fn ecdh_es_kek(
  recipient: Secret<'_>,
  alg: JweAlgorithm,
  len: usize,
  header: &mut JweHeader,
) -> Result<Zeroizing<Vec<u8>>> {
  let z: Zeroizing<Vec<u8>> = ecdh_es_encrypt(recipient, header)?;
  let (apu, apv) = agreement_info(header)?;

  concat_kdf(alg.name(), len, &z, &apu, &apv, &supp_pub_info(len, None)).map(Zeroizing::new)
}

fn ecdh_es_decrypt(
  secret: Secret<'_>,
  header: &JweHeader,
  expected_curve: Option<EcdhCurve>,
) -> Result<Zeroizing<Vec<u8>>> {
  let epk: &Jwk = header.epk().ok_or(Error::MissingParam("epk"))?;
  let curve: EcdhCurve = ecdh_curve(epk)?;

  if matches!(expected_curve, Some(expected) if expected != curve) {
    return Err(Error::InvalidParam("epk"));
  }

  diffie_hellman(curve, epk, secret.expect_jwk()?).map(Zeroizing::new)
}

fn ecdh_es_unwrap_kek(
  secret: Secret<'_>,
  alg: JweAlgorithm,
  len: usize,
  header: &JweHeader,
  expected_curve: Option<EcdhCurve>,
) -> Result<Zeroizing<Vec<u8>>> {
  let z: Zeroizing<Vec<u8>> = ecdh_es_decrypt(secret, header, expected_curve)?;
  let (apu, apv) = agreement_info(header)?;

  concat_kdf(alg.name(), len, &z, &apu, &apv, &supp_pub_info(len, None)).map(Zeroizing::new)
}

/// Computes `Z = Ze || Zs` for the sending party
/// ([draft-madden-jose-ecdh-1pu-04, section 2.2](https://tools.ietf.org/html/draft-madden-jose-ecdh-1pu-04#section-2.2)).
fn ecdh_1pu_encrypt(
  recipient: Secret<'_>,
  sender: Option<Secret<'_>>,
  header: &mut JweHeader,
) -> Result<Zeroizing<Vec<u8>>> {
  let sender: &Jwk = sender
    .ok_or_else(|| Error::InvalidKey("ECDH-1PU requires a sender key".into()))?
    .expect_jwk()?;

  let public: &Jwk = recipient.expect_jwk()?;
  let curve: EcdhCurve = ecdh_curve(public)?;
  let ephemeral: Jwk = generate_epk(curve)?;

  let ze: Zeroizing<Vec<u8>> = Zeroizing::new(diffie_hellman(curve, public, &ephemeral)?);
  let zs: Zeroizing<Vec<u8>> = Zeroizing::new(diffie_hellman(curve, public, sender)?);

  header.set_epk(ephemeral.to_public()?);

  let mut z: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::with_capacity(ze.len() + zs.len()));
  z.extend_from_slice(&ze);
  z.extend_from_slice(&zs);

  Ok(z)
}

/// Computes `Z = Ze || Zs` for the receiving party.
fn ecdh_1pu_decrypt(
  secret: Secret<'_>,
  sender: Option<Secret<'_>>,
  header: &JweHeader,
  expected_curve: Option<EcdhCurve>,
) -> Result<Zeroizing<Vec<u8>>> {
  let sender: &Jwk = sender
    .ok_or_else(|| Error::InvalidKey("ECDH-1PU requires the sender public key".into()))?
    .expect_jwk()?;

  let epk: &Jwk = header.epk().ok_or(Error::MissingParam("epk"))?;
  let curve: EcdhCurve = ecdh_curve(epk)?;

  if matches!(expected_curve, Some(expected) if expected != curve) {
    return Err(Error::InvalidParam("epk"));
  }

  let secret: &Jwk = secret.expect_jwk()?;

  let ze: Zeroizing<Vec<u8>> = Zeroizing::new(diffie_hellman(curve, epk, secret)?);
  let zs: Zeroizing<Vec<u8>> = Zeroizing::new(diffie_hellman(curve, sender, secret)?);

  let mut z: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::with_capacity(ze.len() + zs.len()));
  z.extend_from_slice(&ze);
  z.extend_from_slice(&zs);

  Ok(z)
}
