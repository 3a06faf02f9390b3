// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwa::sign::expand_ec_public;
use crate::jwa::sign::expand_ec_secret;
use crate::jwk::EcCurve;
use crate::jwk::EcdhCurve;
use crate::jwk::EcxCurve;
use crate::jwk::Jwk;
use crate::jwk::JwkParams;
use crate::jwu::Secret;

/// Performs Diffie-Hellman key agreement between `public` and `secret`,
/// returning the raw shared secret.
///
/// Supports the Weierstrass curves P-256, secp256k1 and P-384 as well as
/// the Montgomery curves X25519 and X448.
pub fn diffie_hellman(curve: impl Into<EcdhCurve>, public: &Jwk, secret: &Jwk) -> Result<Vec<u8>> {
  match curve.into() {
    EcdhCurve::Ec(curve) => match curve {
      EcCurve::P256 => ecdh_p256(public, secret),
      EcCurve::Secp256K1 => ecdh_k256(public, secret),
      EcCurve::P384 => ecdh_p384(public, secret),
      EcCurve::P521 => Err(Error::AlgError(curve.name().into())),
    },
    EcdhCurve::Ecx(curve) => match curve {
      EcxCurve::X25519 => {
        let public = Secret::Jwk(public).to_x25519_public()?;
        let secret = Secret::Jwk(secret).to_x25519_secret()?;

        Ok(secret.diffie_hellman(&public).to_bytes().to_vec())
      }
      EcxCurve::X448 => {
        let public = Secret::Jwk(public).to_x448_public()?;
        let secret = Secret::Jwk(secret).to_x448_secret()?;

        Ok(secret.diffie_hellman(&public).to_bytes().to_vec())
      }
    },
  }
}

macro_rules! impl_ecdh {
  ($ident:ident, $crv:expr, $curve:ident) => {
    fn $ident(public: &Jwk, secret: &Jwk) -> Result<Vec<u8>> {
      let sec1: Vec<u8> = expand_ec_public($crv, public.try_ec_params()?)?;
      let d: Zeroizing<Vec<u8>> = Zeroizing::new(expand_ec_secret($crv, secret.try_ec_params()?)?);

      let public: $curve::PublicKey =
        $curve::PublicKey::from_sec1_bytes(&sec1).map_err(|error| Error::InvalidKey(error.to_string()))?;
      let secret: $curve::SecretKey =
        $curve::SecretKey::from_slice(&d).map_err(|error| Error::InvalidKey(error.to_string()))?;

      let shared = $curve::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());

      Ok(shared.raw_secret_bytes().to_vec())
    }
  };
}

impl_ecdh!(ecdh_p256, EcCurve::P256, p256);
impl_ecdh!(ecdh_k256, EcCurve::Secp256K1, k256);
impl_ecdh!(ecdh_p384, EcCurve::P384, p384);

/// Returns the key agreement curve of the given key.
pub(crate) fn ecdh_curve(jwk: &Jwk) -> Result<EcdhCurve> {
  match jwk.params() {
    Some(JwkParams::Ec(params)) => params.try_ec_curve().map(EcdhCurve::Ec),
    Some(JwkParams::Okp(params)) => params.try_ecx_curve().map(EcdhCurve::Ecx),
    Some(_) | None => Err(Error::InvalidParam("kty")),
  }
}

/// Generates an ephemeral key pair on the given curve.
pub(crate) fn generate_epk(curve: EcdhCurve) -> Result<Jwk> {
  match curve {
    EcdhCurve::Ec(curve) => Jwk::random_ec(curve),
    EcdhCurve::Ecx(curve) => Jwk::random_ecx(curve),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_x25519_agreement() {
    let a: Jwk = Jwk::random_ecx(EcxCurve::X25519).unwrap();
    let b: Jwk = Jwk::random_ecx(EcxCurve::X25519).unwrap();

    let ab: Vec<u8> = diffie_hellman(EcxCurve::X25519, &a.to_public().unwrap(), &b).unwrap();
    let ba: Vec<u8> = diffie_hellman(EcxCurve::X25519, &b.to_public().unwrap(), &a).unwrap();

    assert_eq!(ab, ba);
  }

  #[test]
  fn test_p256_agreement() {
    let a: Jwk = Jwk::random_ec(EcCurve::P256).unwrap();
    let b: Jwk = Jwk::random_ec(EcCurve::P256).unwrap();

    let ab: Vec<u8> = diffie_hellman(EcCurve::P256, &a.to_public().unwrap(), &b).unwrap();
    let ba: Vec<u8> = diffie_hellman(EcCurve::P256, &b.to_public().unwrap(), &a).unwrap();

    assert_eq!(ab, ba);
  }
}
