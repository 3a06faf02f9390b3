// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::jwk::Jwk;
use crate::jwu::Object;

/// The registered header parameters shared by all JOSE header variants.
///
/// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct JwtHeader {
  /// JWK Set URL.
  ///
  /// Refers to a resource for a set of JSON-encoded public keys, one of
  /// which corresponds to the key used to secure the object.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  jku: Option<Url>,
  /// JSON Web Key.
  ///
  /// The public key that corresponds to the key used to secure the object.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.3)
  #[serde(skip_serializing_if = "Option::is_none")]
  jwk: Option<Jwk>,
  /// Key ID.
  ///
  /// A hint indicating which key was used to secure the object.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.4)
  #[serde(skip_serializing_if = "Option::is_none")]
  kid: Option<String>,
  /// X.509 URL.
  ///
  /// A URI referring to a resource for the X.509 public key certificate or
  /// certificate chain corresponding to the key used to secure the object.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.5)
  #[serde(skip_serializing_if = "Option::is_none")]
  x5u: Option<Url>,
  /// X.509 Certificate Chain.
  ///
  /// The X.509 public key certificate or certificate chain corresponding to
  /// the key used to secure the object.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.6)
  #[serde(skip_serializing_if = "Option::is_none")]
  x5c: Option<Vec<String>>,
  /// X.509 Certificate SHA-1 Thumbprint.
  ///
  /// A base64url-encoded SHA-1 digest of the DER encoding of the X.509
  /// certificate corresponding to the key used to secure the object.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.7)
  #[serde(skip_serializing_if = "Option::is_none")]
  x5t: Option<String>,
  /// X.509 Certificate SHA-256 Thumbprint.
  ///
  /// A base64url-encoded SHA-256 digest of the DER encoding of the X.509
  /// certificate corresponding to the key used to secure the object.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.8)
  #[serde(rename = "x5t#S256", skip_serializing_if = "Option::is_none")]
  x5t_s256: Option<String>,
  /// Type.
  ///
  /// Declares the media type of the complete object.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.9)
  #[serde(skip_serializing_if = "Option::is_none")]
  typ: Option<String>,
  /// Content Type.
  ///
  /// Declares the media type of the secured content.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.10)
  #[serde(skip_serializing_if = "Option::is_none")]
  cty: Option<String>,
  /// Critical.
  ///
  /// Indicates extensions that must be understood and processed.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.11)
  #[serde(skip_serializing_if = "Option::is_none")]
  crit: Option<Vec<String>>,
  /// Additional header parameters, preserved verbatim.
  #[serde(flatten)]
  custom: Object,
}

impl JwtHeader {
  /// Create a new `JwtHeader`.
  pub fn new() -> Self {
    Self {
      jku: None,
      jwk: None,
      kid: None,
      x5u: None,
      x5c: None,
      x5t: None,
      x5t_s256: None,
      typ: None,
      cty: None,
      crit: None,
      custom: Object::new(),
    }
  }

  /// Returns the value of the JWK Set URL parameter (jku).
  pub fn jku(&self) -> Option<&Url> {
    self.jku.as_ref()
  }

  /// Sets a value for the JWK Set URL parameter (jku).
  pub fn set_jku(&mut self, value: impl Into<Url>) {
    self.jku = Some(value.into());
  }

  /// Returns the value of the JWK parameter (jwk).
  pub fn jwk(&self) -> Option<&Jwk> {
    self.jwk.as_ref()
  }

  /// Sets a value for the JWK parameter (jwk).
  pub fn set_jwk(&mut self, value: impl Into<Jwk>) {
    self.jwk = Some(value.into());
  }

  /// Returns the value of the key ID parameter (kid).
  pub fn kid(&self) -> Option<&str> {
    self.kid.as_deref()
  }

  /// Sets a value for the key ID parameter (kid).
  pub fn set_kid(&mut self, value: impl Into<String>) {
    self.kid = Some(value.into());
  }

  /// Returns the value of the X.509 URL parameter (x5u).
  pub fn x5u(&self) -> Option<&Url> {
    self.x5u.as_ref()
  }

  /// Sets a value for the X.509 URL parameter (x5u).
  pub fn set_x5u(&mut self, value: impl Into<Url>) {
    self.x5u = Some(value.into());
  }

  /// Returns the value of the X.509 certificate chain parameter (x5c).
  pub fn x5c(&self) -> Option<&[String]> {
    self.x5c.as_deref()
  }

  /// Sets values for the X.509 certificate chain parameter (x5c).
  pub fn set_x5c(&mut self, value: impl IntoIterator<Item = impl Into<String>>) {
    self.x5c = Some(value.into_iter().map(Into::into).collect());
  }

  /// Returns the value of the X.509 certificate SHA-1 thumbprint parameter
  /// (x5t).
  pub fn x5t(&self) -> Option<&str> {
    self.x5t.as_deref()
  }

  /// Sets a value for the X.509 certificate SHA-1 thumbprint parameter
  /// (x5t).
  pub fn set_x5t(&mut self, value: impl Into<String>) {
    self.x5t = Some(value.into());
  }

  /// Returns the value of the X.509 certificate SHA-256 thumbprint
  /// parameter (x5t#S256).
  pub fn x5t_s256(&self) -> Option<&str> {
    self.x5t_s256.as_deref()
  }

  /// Sets a value for the X.509 certificate SHA-256 thumbprint parameter
  /// (x5t#S256).
  pub fn set_x5t_s256(&mut self, value: impl Into<String>) {
    self.x5t_s256 = Some(value.into());
  }

  /// Returns the value of the token type parameter (typ).
  pub fn typ(&self) -> Option<&str> {
    self.typ.as_deref()
  }

  /// Sets a value for the token type parameter (typ).
  pub fn set_typ(&mut self, value: impl Into<String>) {
    self.typ = Some(value.into());
  }

  /// Returns the value of the content type parameter (cty).
  pub fn cty(&self) -> Option<&str> {
    self.cty.as_deref()
  }

  /// Sets a value for the content type parameter (cty).
  pub fn set_cty(&mut self, value: impl Into<String>) {
    self.cty = Some(value.into());
  }

  /// Returns the value of the critical parameter (crit).
  pub fn crit(&self) -> Option<&[String]> {
    self.crit.as_deref()
  }

  /// Sets values for the critical parameter (crit).
  pub fn set_crit(&mut self, value: impl IntoIterator<Item = impl Into<String>>) {
    self.crit = Some(value.into_iter().map(Into::into).collect());
  }

  /// Returns a reference to the additional header parameters.
  pub fn custom(&self) -> &Object {
    &self.custom
  }

  /// Sets an additional header parameter, preserved verbatim.
  pub fn set_custom(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
    self.custom.insert(name.into(), value.into());
  }

  /// Returns `true` if the header contains the given parameter.
  pub fn has(&self, claim: &str) -> bool {
    match claim {
      "jku" => self.jku().is_some(),
      "jwk" => self.jwk().is_some(),
      "kid" => self.kid().is_some(),
      "x5u" => self.x5u().is_some(),
      "x5c" => self.x5c().is_some(),
      "x5t" => self.x5t().is_some(),
      "x5t#S256" => self.x5t_s256().is_some(),
      "typ" => self.typ().is_some(),
      "cty" => self.cty().is_some(),
      "crit" => self.crit().is_some(),
      _ => self.custom.contains_key(claim),
    }
  }

  /// Returns `true` if none of the parameters are set in both `self` and
  /// `other`.
  pub fn is_disjoint(&self, other: &JwtHeader) -> bool {
    let has_duplicate: bool = self.jku.is_some() && other.jku.is_some()
      || self.jwk.is_some() && other.jwk.is_some()
      || self.kid.is_some() && other.kid.is_some()
      || self.x5u.is_some() && other.x5u.is_some()
      || self.x5c.is_some() && other.x5c.is_some()
      || self.x5t.is_some() && other.x5t.is_some()
      || self.x5t_s256.is_some() && other.x5t_s256.is_some()
      || self.typ.is_some() && other.typ.is_some()
      || self.cty.is_some() && other.cty.is_some()
      || self.crit.is_some() && other.crit.is_some()
      || self.custom.keys().any(|key| other.custom.contains_key(key));

    !has_duplicate
  }
}
