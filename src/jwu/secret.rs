// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Debug;
use core::fmt::Formatter;
use std::borrow::Cow;

use crypto::keys::x25519;
use crypto::keys::x448;
use crypto::signatures::ed25519;
use num_bigint_dig::BigUint;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcxCurve;
use crate::jwk::EdCurve;
use crate::jwk::Jwk;
use crate::jwk::JwkParamsOct;
use crate::jwk::JwkParamsOkp;
use crate::jwk::JwkParamsRsa;
use crate::jwu::decode_b64;

/// Borrowed key material for a cryptographic operation.
///
/// Raw bytes are accepted for symmetric operations; everything else
/// requires a [`Jwk`] carrying the key-type-specific parameters.
#[derive(Clone, Copy)]
pub enum Secret<'a> {
  /// Raw key material.
  Arr(&'a [u8]),
  /// A JSON Web Key.
  Jwk(&'a Jwk),
}

impl<'a> Secret<'a> {
  /// Returns the JWK, if the secret is one.
  pub fn jwk(&self) -> Option<&'a Jwk> {
    match self {
      Self::Arr(_) => None,
      Self::Jwk(inner) => Some(inner),
    }
  }

  /// Returns the JWK or an error for raw key material.
  pub(crate) fn expect_jwk(&self) -> Result<&'a Jwk> {
    self.jwk().ok_or_else(|| Error::InvalidKey("expected a JWK".into()))
  }

  /// Returns the secret as raw symmetric key material of at least
  /// `min_len` bytes.
  pub(crate) fn to_oct_key(&self, min_len: usize) -> Result<Cow<'a, [u8]>> {
    let data: Cow<'a, [u8]> = match self {
      Self::Arr(inner) => Cow::Borrowed(*inner),
      Self::Jwk(inner) => {
        let params: &JwkParamsOct = inner.try_oct_params()?;
        Cow::Owned(decode_b64(&params.k)?)
      }
    };

    if data.len() >= min_len {
      Ok(data)
    } else {
      Err(Error::InvalidKey("insufficient key material".into()))
    }
  }

  /// Returns the secret as an RSA public key.
  pub(crate) fn to_rsa_public(&self) -> Result<rsa::RsaPublicKey> {
    let params: &JwkParamsRsa = self.expect_jwk()?.try_rsa_params()?;

    rsa::RsaPublicKey::new(decode_biguint(&params.n)?, decode_biguint(&params.e)?)
      .map_err(|error| Error::InvalidKey(error.to_string()))
  }

  /// Returns the secret as an RSA private key.
  pub(crate) fn to_rsa_secret(&self) -> Result<rsa::RsaPrivateKey> {
    let params: &JwkParamsRsa = self.expect_jwk()?.try_rsa_params()?;

    let d: &str = params.d.as_deref().ok_or(Error::MissingParam("d"))?;

    let primes: Vec<BigUint> = match (params.p.as_deref(), params.q.as_deref()) {
      (Some(p), Some(q)) => vec![decode_biguint(p)?, decode_biguint(q)?],
      // recovered from (n, e, d) by the rsa crate
      _ => Vec::new(),
    };

    let key: rsa::RsaPrivateKey =
      rsa::RsaPrivateKey::from_components(decode_biguint(&params.n)?, decode_biguint(&params.e)?, decode_biguint(d)?, primes)
        .map_err(|error| Error::InvalidKey(error.to_string()))?;

    Ok(key)
  }

  /// Returns the secret as an Ed25519 public key.
  pub(crate) fn to_ed25519_public(&self) -> Result<ed25519::PublicKey> {
    let params: &JwkParamsOkp = self.expect_jwk()?.try_okp_params()?;

    if params.try_ed_curve()? != EdCurve::Ed25519 {
      return Err(Error::InvalidParam("crv"));
    }

    let x: [u8; ed25519::PublicKey::LENGTH] = decode_coordinate(&params.x)?;

    ed25519::PublicKey::try_from(x).map_err(Error::CryptoError)
  }

  /// Returns the secret as an Ed25519 secret key.
  pub(crate) fn to_ed25519_secret(&self) -> Result<ed25519::SecretKey> {
    let params: &JwkParamsOkp = self.expect_jwk()?.try_okp_params()?;

    if params.try_ed_curve()? != EdCurve::Ed25519 {
      return Err(Error::InvalidParam("crv"));
    }

    let d: &str = params.d.as_deref().ok_or(Error::MissingParam("d"))?;
    let d: [u8; ed25519::SecretKey::LENGTH] = decode_coordinate(d)?;

    Ok(ed25519::SecretKey::from_bytes(&d))
  }

  /// Returns the secret as an X25519 public key.
  pub fn to_x25519_public(&self) -> Result<x25519::PublicKey> {
    let params: &JwkParamsOkp = self.expect_jwk()?.try_okp_params()?;

    if params.try_ecx_curve()? != EcxCurve::X25519 {
      return Err(Error::InvalidParam("crv"));
    }

    let x: [u8; x25519::PUBLIC_KEY_LENGTH] = decode_coordinate(&params.x)?;

    Ok(x25519::PublicKey::from_bytes(x))
  }

  /// Returns the secret as an X25519 secret key.
  pub fn to_x25519_secret(&self) -> Result<x25519::SecretKey> {
    let params: &JwkParamsOkp = self.expect_jwk()?.try_okp_params()?;

    if params.try_ecx_curve()? != EcxCurve::X25519 {
      return Err(Error::InvalidParam("crv"));
    }

    let d: &str = params.d.as_deref().ok_or(Error::MissingParam("d"))?;
    let d: [u8; x25519::SECRET_KEY_LENGTH] = decode_coordinate(d)?;

    Ok(x25519::SecretKey::from_bytes(d))
  }

  /// Returns the secret as an X448 public key.
  pub fn to_x448_public(&self) -> Result<x448::PublicKey> {
    let params: &JwkParamsOkp = self.expect_jwk()?.try_okp_params()?;

    if params.try_ecx_curve()? != EcxCurve::X448 {
      return Err(Error::InvalidParam("crv"));
    }

    let x: [u8; x448::PublicKey::LENGTH] = decode_coordinate(&params.x)?;

    Ok(x448::PublicKey::from_bytes(x))
  }

  /// Returns the secret as an X448 secret key.
  pub fn to_x448_secret(&self) -> Result<x448::SecretKey> {
    let params: &JwkParamsOkp = self.expect_jwk()?.try_okp_params()?;

    if params.try_ecx_curve()? != EcxCurve::X448 {
      return Err(Error::InvalidParam("crv"));
    }

    let d: &str = params.d.as_deref().ok_or(Error::MissingParam("d"))?;
    let d: [u8; x448::SecretKey::LENGTH] = decode_coordinate(d)?;

    Ok(x448::SecretKey::from_bytes(&d))
  }
}

impl Debug for Secret<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str("Secret")
  }
}

impl<'a> From<&'a [u8]> for Secret<'a> {
  fn from(other: &'a [u8]) -> Self {
    Self::Arr(other)
  }
}

impl<'a> From<&'a Vec<u8>> for Secret<'a> {
  fn from(other: &'a Vec<u8>) -> Self {
    Self::Arr(other)
  }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Secret<'a> {
  fn from(other: &'a [u8; N]) -> Self {
    Self::Arr(other)
  }
}

impl<'a> From<&'a Jwk> for Secret<'a> {
  fn from(other: &'a Jwk) -> Self {
    Self::Jwk(other)
  }
}

fn decode_biguint(data: &str) -> Result<BigUint> {
  decode_b64(data).map(|bytes| BigUint::from_bytes_be(&bytes))
}

fn decode_coordinate<const N: usize>(data: &str) -> Result<[u8; N]> {
  decode_b64(data)?
    .try_into()
    .map_err(|_| Error::InvalidKey("invalid coordinate size".into()))
}
