// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crypto::hashes::sha::SHA256_LEN;
use crypto::hashes::sha::SHA384_LEN;
use crypto::hashes::sha::SHA512_LEN;
use crypto::macs::hmac::HMAC_SHA256;
use crypto::macs::hmac::HMAC_SHA384;
use crypto::macs::hmac::HMAC_SHA512;
use rsa::traits::PublicKeyParts;
use sha2::Digest;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcCurve;
use crate::jwk::JwkOperation;
use crate::jwk::JwkParamsEc;
use crate::jwk::JwkUse;
use crate::jws::JwsAlgorithm;
use crate::jwu::constant_time_eq;
use crate::jwu::decode_b64;
use crate::jwu::Secret;

const RSA_MIN_MODULUS_BITS: usize = 2048;

/// Signs `message` with the given algorithm and key, returning the raw
/// signature bytes.
pub(crate) fn sign(alg: JwsAlgorithm, message: &[u8], secret: Secret<'_>) -> Result<Vec<u8>> {
  if let Some(jwk) = secret.jwk() {
    jwk.check_use(JwkUse::Signature)?;
    jwk.check_operation(JwkOperation::Sign)?;
  }

  match alg {
    JwsAlgorithm::HS256 => {
      let key = secret.to_oct_key(SHA256_LEN)?;
      let mut mac: [u8; SHA256_LEN] = [0; SHA256_LEN];
      HMAC_SHA256(message, &key, &mut mac);
      Ok(mac.to_vec())
    }
    JwsAlgorithm::HS384 => {
      let key = secret.to_oct_key(SHA384_LEN)?;
      let mut mac: [u8; SHA384_LEN] = [0; SHA384_LEN];
      HMAC_SHA384(message, &key, &mut mac);
      Ok(mac.to_vec())
    }
    JwsAlgorithm::HS512 => {
      let key = secret.to_oct_key(SHA512_LEN)?;
      let mut mac: [u8; SHA512_LEN] = [0; SHA512_LEN];
      HMAC_SHA512(message, &key, &mut mac);
      Ok(mac.to_vec())
    }
    JwsAlgorithm::RS256 => rsa_sign(secret, rsa::Pkcs1v15Sign::new::<sha2::Sha256>(), &sha2::Sha256::digest(message)),
    JwsAlgorithm::RS384 => rsa_sign(secret, rsa::Pkcs1v15Sign::new::<sha2::Sha384>(), &sha2::Sha384::digest(message)),
    JwsAlgorithm::RS512 => rsa_sign(secret, rsa::Pkcs1v15Sign::new::<sha2::Sha512>(), &sha2::Sha512::digest(message)),
    JwsAlgorithm::PS256 => rsa_sign(secret, rsa::Pss::new::<sha2::Sha256>(), &sha2::Sha256::digest(message)),
    JwsAlgorithm::PS384 => rsa_sign(secret, rsa::Pss::new::<sha2::Sha384>(), &sha2::Sha384::digest(message)),
    JwsAlgorithm::PS512 => rsa_sign(secret, rsa::Pss::new::<sha2::Sha512>(), &sha2::Sha512::digest(message)),
    JwsAlgorithm::ES256 => es256_sign(message, secret),
    JwsAlgorithm::ES256K => es256k_sign(message, secret),
    JwsAlgorithm::ES384 => es384_sign(message, secret),
    JwsAlgorithm::ES512 => Err(Error::AlgError(alg.name().into())),
    JwsAlgorithm::EdDSA => {
      let key = secret.to_ed25519_secret()?;
      Ok(key.sign(message).to_bytes().to_vec())
    }
    JwsAlgorithm::NONE => Ok(Vec::new()),
  }
}

/// Verifies `signature` over `message` with the given algorithm and key.
pub(crate) fn verify(alg: JwsAlgorithm, message: &[u8], signature: &[u8], public: Secret<'_>) -> Result<()> {
  if let Some(jwk) = public.jwk() {
    jwk.check_use(JwkUse::Signature)?;
    jwk.check_operation(JwkOperation::Verify)?;
  }

  match alg {
    JwsAlgorithm::HS256 | JwsAlgorithm::HS384 | JwsAlgorithm::HS512 => {
      let mac: Vec<u8> = sign(alg, message, public)?;
      if constant_time_eq(&mac, signature) {
        Ok(())
      } else {
        Err(Error::SigError("invalid HMAC"))
      }
    }
    JwsAlgorithm::RS256 => rsa_verify(
      public,
      rsa::Pkcs1v15Sign::new::<sha2::Sha256>(),
      &sha2::Sha256::digest(message),
      signature,
    ),
    JwsAlgorithm::RS384 => rsa_verify(
      public,
      rsa::Pkcs1v15Sign::new::<sha2::Sha384>(),
      &sha2::Sha384::digest(message),
      signature,
    ),
    JwsAlgorithm::RS512 => rsa_verify(
      public,
      rsa::Pkcs1v15Sign::new::<sha2::Sha512>(),
      &sha2::Sha512::digest(message),
      signature,
    ),
    JwsAlgorithm::PS256 => rsa_verify(public, rsa::Pss::new::<sha2::Sha256>(), &sha2::Sha256::digest(message), signature),
    JwsAlgorithm::PS384 => rsa_verify(public, rsa::Pss::new::<sha2::Sha384>(), &sha2::Sha384::digest(message), signature),
    JwsAlgorithm::PS512 => rsa_verify(public, rsa::Pss::new::<sha2::Sha512>(), &sha2::Sha512::digest(message), signature),
    JwsAlgorithm::ES256 => es256_verify(message, signature, public),
    JwsAlgorithm::ES256K => es256k_verify(message, signature, public),
    JwsAlgorithm::ES384 => es384_verify(message, signature, public),
    JwsAlgorithm::ES512 => Err(Error::AlgError(alg.name().into())),
    JwsAlgorithm::EdDSA => {
      let key = public.to_ed25519_public()?;

      let signature: [u8; crypto::signatures::ed25519::Signature::LENGTH] = signature
        .try_into()
        .map_err(|_| Error::SigError("invalid signature length"))?;

      if key.verify(&crypto::signatures::ed25519::Signature::from_bytes(signature), message) {
        Ok(())
      } else {
        Err(Error::SigError("invalid EdDSA signature"))
      }
    }
    JwsAlgorithm::NONE => {
      if signature.is_empty() {
        Ok(())
      } else {
        Err(Error::SigError("unexpected signature for `none`"))
      }
    }
  }
}

fn rsa_sign<S>(secret: Secret<'_>, padding: S, digest: &[u8]) -> Result<Vec<u8>>
where
  S: rsa::traits::SignatureScheme,
{
  let key: rsa::RsaPrivateKey = secret.to_rsa_secret()?;

  check_rsa_modulus(key.size())?;

  key
    .sign_with_rng(&mut rand::rngs::OsRng, padding, digest)
    .map_err(|_| Error::SigError("RSA signing failed"))
}

fn rsa_verify<S>(public: Secret<'_>, padding: S, digest: &[u8], signature: &[u8]) -> Result<()>
where
  S: rsa::traits::SignatureScheme,
{
  let key: rsa::RsaPublicKey = public.to_rsa_public()?;

  check_rsa_modulus(key.size())?;

  key
    .verify(padding, digest, signature)
    .map_err(|_| Error::SigError("invalid RSA signature"))
}

fn check_rsa_modulus(size: usize) -> Result<()> {
  if size * 8 < RSA_MIN_MODULUS_BITS {
    Err(Error::InvalidKey(format!("RSA modulus below {RSA_MIN_MODULUS_BITS} bits")))
  } else {
    Ok(())
  }
}

/// Decodes the uncompressed SEC1 representation of an EC public key
/// ([SEC1, section 2.3.3](http://www.secg.org/sec1-v2.pdf)).
pub(crate) fn expand_ec_public(curve: EcCurve, params: &JwkParamsEc) -> Result<Vec<u8>> {
  if params.try_ec_curve()? != curve {
    return Err(Error::InvalidParam("crv"));
  }

  let mut sec1: Vec<u8> = Vec::with_capacity(1 + 2 * curve.field_len());
  sec1.push(0x04);
  sec1.extend(decode_b64(&params.x)?);
  sec1.extend(decode_b64(&params.y)?);

  Ok(sec1)
}

/// Decodes the private scalar of an EC key.
pub(crate) fn expand_ec_secret(curve: EcCurve, params: &JwkParamsEc) -> Result<Vec<u8>> {
  if params.try_ec_curve()? != curve {
    return Err(Error::InvalidParam("crv"));
  }

  params
    .d
    .as_deref()
    .ok_or(Error::MissingParam("d"))
    .and_then(decode_b64)
}

macro_rules! impl_ecdsa {
  ($sign:ident, $verify:ident, $crv:expr, $ecdsa:ident) => {
    fn $sign(message: &[u8], secret: Secret<'_>) -> Result<Vec<u8>> {
      use $ecdsa::ecdsa::signature::Signer;

      let params: &JwkParamsEc = secret.expect_jwk()?.try_ec_params()?;
      let d: Vec<u8> = expand_ec_secret($crv, params)?;

      let key: $ecdsa::SecretKey =
        $ecdsa::SecretKey::from_slice(&d).map_err(|error| Error::InvalidKey(error.to_string()))?;

      let key: $ecdsa::ecdsa::SigningKey = $ecdsa::ecdsa::SigningKey::from(key);
      let signature: $ecdsa::ecdsa::Signature = key.sign(message);

      Ok(signature.to_bytes().to_vec())
    }

    fn $verify(message: &[u8], signature: &[u8], public: Secret<'_>) -> Result<()> {
      use $ecdsa::ecdsa::signature::Verifier;

      let params: &JwkParamsEc = public.expect_jwk()?.try_ec_params()?;
      let sec1: Vec<u8> = expand_ec_public($crv, params)?;

      let key: $ecdsa::PublicKey =
        $ecdsa::PublicKey::from_sec1_bytes(&sec1).map_err(|error| Error::InvalidKey(error.to_string()))?;

      let key: $ecdsa::ecdsa::VerifyingKey = $ecdsa::ecdsa::VerifyingKey::from(key);

      // Rejects signatures with r = 0 or s = 0.
      let signature: $ecdsa::ecdsa::Signature =
        $ecdsa::ecdsa::Signature::from_slice(signature).map_err(|_| Error::SigError("malformed ECDSA signature"))?;

      key
        .verify(message, &signature)
        .map_err(|_| Error::SigError("invalid ECDSA signature"))
    }
  };
}

impl_ecdsa!(es256_sign, es256_verify, EcCurve::P256, p256);
impl_ecdsa!(es256k_sign, es256k_verify, EcCurve::Secp256K1, k256);
impl_ecdsa!(es384_sign, es384_verify, EcCurve::P384, p384);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwk::Jwk;

  #[test]
  fn test_hmac_roundtrip() {
    let key: Jwk = Jwk::random(JwsAlgorithm::HS256).unwrap();
    let signature: Vec<u8> = sign(JwsAlgorithm::HS256, b"hello", Secret::Jwk(&key)).unwrap();

    assert!(verify(JwsAlgorithm::HS256, b"hello", &signature, Secret::Jwk(&key)).is_ok());
    assert!(verify(JwsAlgorithm::HS256, b"world", &signature, Secret::Jwk(&key)).is_err());
  }

  #[test]
  fn test_ecdsa_rejects_zero_signature() {
    let key: Jwk = Jwk::random(JwsAlgorithm::ES256).unwrap();
    let zeroes: Vec<u8> = vec![0; 64];

    assert!(matches!(
      verify(JwsAlgorithm::ES256, b"hello", &zeroes, Secret::Jwk(&key)),
      Err(Error::SigError(_))
    ));
  }

  #[test]
  fn test_key_use_is_enforced() {
    let mut key: Jwk = Jwk::random(JwsAlgorithm::HS256).unwrap();
    key.set_use("enc");

    assert!(matches!(
      sign(JwsAlgorithm::HS256, b"hello", Secret::Jwk(&key)),
      Err(Error::InvalidParam("use"))
    ));
  }
}
