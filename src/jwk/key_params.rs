// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcCurve;
use crate::jwk::EcxCurve;
use crate::jwk::EdCurve;
use crate::jwk::JwkType;

/// The key-type-specific parameters of a JSON Web Key.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum JwkParams {
  /// Elliptic Curve parameters.
  Ec(JwkParamsEc),
  /// RSA parameters.
  Rsa(JwkParamsRsa),
  /// Octet string key pair parameters.
  Okp(JwkParamsOkp),
  /// Octet sequence parameters.
  Oct(JwkParamsOct),
}

impl JwkParams {
  /// Returns the key type of the parameters.
  pub const fn kty(&self) -> JwkType {
    match self {
      Self::Ec(_) => JwkType::Ec,
      Self::Rsa(_) => JwkType::Rsa,
      Self::Oct(_) => JwkType::Oct,
      Self::Okp(_) => JwkType::Okp,
    }
  }

  /// Returns `true` if the parameters contain private components.
  pub fn is_private(&self) -> bool {
    match self {
      Self::Ec(inner) => inner.d.is_some(),
      Self::Rsa(inner) => inner.d.is_some(),
      Self::Okp(inner) => inner.d.is_some(),
      Self::Oct(_) => true,
    }
  }

  /// Returns a copy with all private components removed.
  ///
  /// Octet sequence keys have no public representation and return an error.
  pub fn to_public(&self) -> Result<Self> {
    match self {
      Self::Ec(inner) => Ok(Self::Ec(JwkParamsEc {
        crv: inner.crv.clone(),
        x: inner.x.clone(),
        y: inner.y.clone(),
        d: None,
      })),
      Self::Rsa(inner) => Ok(Self::Rsa(JwkParamsRsa {
        n: inner.n.clone(),
        e: inner.e.clone(),
        d: None,
        p: None,
        q: None,
        dp: None,
        dq: None,
        qi: None,
        oth: None,
      })),
      Self::Okp(inner) => Ok(Self::Okp(JwkParamsOkp {
        crv: inner.crv.clone(),
        x: inner.x.clone(),
        d: None,
      })),
      Self::Oct(_) => Err(Error::InvalidKey("`oct` keys have no public representation".into())),
    }
  }
}

/// Parameters for Elliptic Curve Keys.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6.2)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwkParamsEc {
  /// The name of the cryptographic curve used with the key.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.2.1.1)
  pub crv: String,
  /// The `x` coordinate for the Elliptic Curve point as a base64url-encoded
  /// value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.2.1.2)
  pub x: String,
  /// The `y` coordinate for the Elliptic Curve point as a base64url-encoded
  /// value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.2.1.3)
  pub y: String,
  /// The Elliptic Curve private key as a base64url-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.2.2.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
}

impl JwkParamsEc {
  /// Returns the curve, if it is a recognized Elliptic Curve.
  pub fn try_ec_curve(&self) -> Result<EcCurve> {
    match self.crv.as_str() {
      "P-256" => Ok(EcCurve::P256),
      "P-384" => Ok(EcCurve::P384),
      "P-521" => Ok(EcCurve::P521),
      "secp256k1" => Ok(EcCurve::Secp256K1),
      _ => Err(Error::InvalidParam("crv")),
    }
  }
}

/// Parameters for RSA Keys.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwkParamsRsa {
  /// The modulus as a base64urlUInt-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.1.1)
  pub n: String,
  /// The exponent as a base64urlUInt-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.1.2)
  pub e: String,
  /// The private exponent as a base64urlUInt-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
  /// The first prime factor as a base64urlUInt-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub p: Option<String>,
  /// The second prime factor as a base64urlUInt-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.3)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q: Option<String>,
  /// The first factor Chinese Remainder Theorem exponent as a
  /// base64urlUInt-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.4)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dp: Option<String>,
  /// The second factor Chinese Remainder Theorem exponent as a
  /// base64urlUInt-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.5)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dq: Option<String>,
  /// The first Chinese Remainder Theorem coefficient as a
  /// base64urlUInt-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.6)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub qi: Option<String>,
  /// An array of information about any third and subsequent primes,
  /// should they exist.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.7)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub oth: Option<Vec<JwkParamsRsaPrime>>,
}

/// Parameters for RSA primes beyond the second.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.7)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwkParamsRsaPrime {
  /// The value of a subsequent prime factor as a base64urlUInt-encoded
  /// value.
  pub r: String,
  /// The CRT exponent of the corresponding prime as a base64urlUInt-encoded
  /// value.
  pub d: String,
  /// The CRT coefficient of the corresponding prime as a
  /// base64urlUInt-encoded value.
  pub t: String,
}

impl JwkParamsRsa {
  /// Returns `true` if any Chinese Remainder Theorem component is present.
  pub fn has_crt(&self) -> bool {
    self.p.is_some() || self.q.is_some() || self.dp.is_some() || self.dq.is_some() || self.qi.is_some()
  }

  /// Returns `true` if all Chinese Remainder Theorem components are present.
  pub fn has_crt_all(&self) -> bool {
    self.p.is_some() && self.q.is_some() && self.dp.is_some() && self.dq.is_some() && self.qi.is_some()
  }
}

/// Parameters for Octet Key Pairs.
///
/// [More Info](https://tools.ietf.org/html/rfc8037#section-2)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwkParamsOkp {
  /// The name of the cryptographic curve used with the key.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc8037#section-2)
  pub crv: String,
  /// The public key as a base64url-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc8037#section-2)
  pub x: String,
  /// The private key as a base64url-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc8037#section-2)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
}

impl JwkParamsOkp {
  /// Returns the curve, if it is a recognized Edwards Curve.
  pub fn try_ed_curve(&self) -> Result<EdCurve> {
    match self.crv.as_str() {
      "Ed25519" => Ok(EdCurve::Ed25519),
      "Ed448" => Ok(EdCurve::Ed448),
      _ => Err(Error::InvalidParam("crv")),
    }
  }

  /// Returns the curve, if it is a recognized Montgomery Curve.
  pub fn try_ecx_curve(&self) -> Result<EcxCurve> {
    match self.crv.as_str() {
      "X25519" => Ok(EcxCurve::X25519),
      "X448" => Ok(EcxCurve::X448),
      _ => Err(Error::InvalidParam("crv")),
    }
  }
}

/// Parameters for Symmetric Keys.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6.4)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwkParamsOct {
  /// The symmetric key as a base64url-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-6.4.1)
  pub k: String,
}

impl From<JwkParamsEc> for JwkParams {
  fn from(other: JwkParamsEc) -> Self {
    Self::Ec(other)
  }
}

impl From<JwkParamsRsa> for JwkParams {
  fn from(other: JwkParamsRsa) -> Self {
    Self::Rsa(other)
  }
}

impl From<JwkParamsOkp> for JwkParams {
  fn from(other: JwkParamsOkp) -> Self {
    Self::Okp(other)
  }
}

impl From<JwkParamsOct> for JwkParams {
  fn from(other: JwkParamsOct) -> Self {
    Self::Oct(other)
  }
}
