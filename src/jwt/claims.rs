// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde::Serialize;

use crate::jwu::Object;

/// A set of JWT claims.
///
/// [More Info](https://tools.ietf.org/html/rfc7519#section-4)
///
/// Validation policy (date windows, audience matching) is left to the
/// consumer of the claims.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct JwtClaims<T = Object> {
  /// Identifies the principal that issued the JWT.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  iss: Option<String>,
  /// Identifies the principal that is the subject of the JWT.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  sub: Option<String>,
  /// Identifies the recipients that the JWT is intended for.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.3)
  #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::jwu::string_or_seq")]
  aud: Option<Vec<String>>,
  /// The expiration time on or after which the JWT must not be accepted,
  /// as seconds since the unix epoch.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.4)
  #[serde(skip_serializing_if = "Option::is_none")]
  exp: Option<i64>,
  /// The time before which the JWT must not be accepted, as seconds since
  /// the unix epoch.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.5)
  #[serde(skip_serializing_if = "Option::is_none")]
  nbf: Option<i64>,
  /// The time at which the JWT was issued, as seconds since the unix epoch.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.6)
  #[serde(skip_serializing_if = "Option::is_none")]
  iat: Option<i64>,
  /// A unique identifier for the JWT.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.7)
  #[serde(skip_serializing_if = "Option::is_none")]
  jti: Option<String>,
  /// Additional claims, preserved verbatim.
  #[serde(flatten)]
  custom: Option<T>,
}

impl<T> JwtClaims<T> {
  /// Creates a new, empty `JwtClaims`.
  pub const fn new() -> Self {
    Self {
      iss: None,
      sub: None,
      aud: None,
      exp: None,
      nbf: None,
      iat: None,
      jti: None,
      custom: None,
    }
  }

  /// Returns the value of the issuer claim (iss).
  pub fn iss(&self) -> Option<&str> {
    self.iss.as_deref()
  }

  /// Sets a value for the issuer claim (iss).
  pub fn set_iss(&mut self, value: impl Into<String>) {
    self.iss = Some(value.into());
  }

  /// Returns the value of the subject claim (sub).
  pub fn sub(&self) -> Option<&str> {
    self.sub.as_deref()
  }

  /// Sets a value for the subject claim (sub).
  pub fn set_sub(&mut self, value: impl Into<String>) {
    self.sub = Some(value.into());
  }

  /// Returns the values of the audience claim (aud).
  pub fn aud(&self) -> Option<&[String]> {
    self.aud.as_deref()
  }

  /// Sets values for the audience claim (aud).
  pub fn set_aud(&mut self, value: impl IntoIterator<Item = impl Into<String>>) {
    self.aud = Some(value.into_iter().map(Into::into).collect());
  }

  /// Returns the value of the expiration claim (exp).
  pub fn exp(&self) -> Option<i64> {
    self.exp
  }

  /// Sets a value for the expiration claim (exp).
  pub fn set_exp(&mut self, value: impl Into<i64>) {
    self.exp = Some(value.into());
  }

  /// Returns the value of the not-before claim (nbf).
  pub fn nbf(&self) -> Option<i64> {
    self.nbf
  }

  /// Sets a value for the not-before claim (nbf).
  pub fn set_nbf(&mut self, value: impl Into<i64>) {
    self.nbf = Some(value.into());
  }

  /// Returns the value of the issued-at claim (iat).
  pub fn iat(&self) -> Option<i64> {
    self.iat
  }

  /// Sets a value for the issued-at claim (iat).
  pub fn set_iat(&mut self, value: impl Into<i64>) {
    self.iat = Some(value.into());
  }

  /// Returns the value of the token ID claim (jti).
  pub fn jti(&self) -> Option<&str> {
    self.jti.as_deref()
  }

  /// Sets a value for the token ID claim (jti).
  pub fn set_jti(&mut self, value: impl Into<String>) {
    self.jti = Some(value.into());
  }

  /// Returns a reference to the additional claims.
  pub fn custom(&self) -> Option<&T> {
    self.custom.as_ref()
  }

  /// Sets the additional claims.
  pub fn set_custom(&mut self, value: impl Into<T>) {
    self.custom = Some(value.into());
  }
}

impl<T> Default for JwtClaims<T> {
  fn default() -> Self {
    Self::new()
  }
}
