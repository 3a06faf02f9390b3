// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::ops::Deref;
use core::ops::DerefMut;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::jose::JoseHeader;
use crate::jws::JwsAlgorithm;
use crate::jwt::JwtHeader;

/// JSON Web Signature JOSE Header.
///
/// [More Info](https://tools.ietf.org/html/rfc7515#section-4)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct JwsHeader {
  /// Common JOSE Header Parameters.
  #[serde(flatten)]
  common: JwtHeader,
  /// Algorithm.
  ///
  /// Identifies the cryptographic algorithm used to secure the JWS.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7515#section-4.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  alg: Option<JwsAlgorithm>,
  /// Base64url-Encode Payload.
  ///
  /// Determines whether the payload is represented in the JWS and the JWS
  /// signing input as ASCII(BASE64URL(JWS Payload)) or as the JWS Payload
  /// value itself with no encoding performed.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7797#section-3)
  #[serde(skip_serializing_if = "Option::is_none")]
  b64: Option<bool>,
  /// URL.
  ///
  /// Specifies the URL to which this JWS object is directed.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc8555#section-6.4.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  url: Option<Url>,
  /// Nonce.
  ///
  /// Provides a unique value that enables the verifier of a JWS to
  /// recognize when replay has occurred.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc8555#section-6.5.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  nonce: Option<String>,
  /// PASSporT extension identifier.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc8225#section-8.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  ppt: Option<String>,
}

impl JwsHeader {
  /// Create a new empty `JwsHeader`.
  pub fn new() -> Self {
    Self {
      common: JwtHeader::new(),
      alg: None,
      b64: None,
      url: None,
      nonce: None,
      ppt: None,
    }
  }

  /// Returns the value for the algorithm claim (alg).
  pub fn alg(&self) -> Option<JwsAlgorithm> {
    self.alg
  }

  /// Sets a value for the algorithm claim (alg).
  pub fn set_alg(&mut self, value: impl Into<JwsAlgorithm>) {
    self.alg = Some(value.into());
  }

  /// Returns the value of the base64url-encode payload claim (b64).
  pub fn b64(&self) -> Option<bool> {
    self.b64
  }

  /// Sets a value for the base64url-encode payload claim (b64).
  pub fn set_b64(&mut self, value: impl Into<bool>) {
    self.b64 = Some(value.into());
  }

  /// Returns the value of the url claim (url).
  pub fn url(&self) -> Option<&Url> {
    self.url.as_ref()
  }

  /// Sets a value for the url claim (url).
  pub fn set_url(&mut self, value: impl Into<Url>) {
    self.url = Some(value.into());
  }

  /// Returns the value of the nonce claim (nonce).
  pub fn nonce(&self) -> Option<&str> {
    self.nonce.as_deref()
  }

  /// Sets a value for the nonce claim (nonce).
  pub fn set_nonce(&mut self, value: impl Into<String>) {
    self.nonce = Some(value.into());
  }

  /// Returns the value of the passport extension claim (ppt).
  pub fn ppt(&self) -> Option<&str> {
    self.ppt.as_deref()
  }

  /// Sets a value for the passport extension claim (ppt).
  pub fn set_ppt(&mut self, value: impl Into<String>) {
    self.ppt = Some(value.into());
  }

  /// Returns `true` if the header contains the given parameter.
  pub fn has(&self, claim: &str) -> bool {
    match claim {
      "alg" => self.alg().is_some(),
      "b64" => self.b64().is_some(),
      "url" => self.url().is_some(),
      "nonce" => self.nonce().is_some(),
      "ppt" => self.ppt().is_some(),
      _ => self.common.has(claim),
    }
  }

  /// Returns `true` if none of the parameters are set in both `self` and
  /// `other`.
  pub fn is_disjoint(&self, other: &JwsHeader) -> bool {
    let has_duplicate: bool = self.alg.is_some() && other.alg.is_some()
      || self.b64.is_some() && other.b64.is_some()
      || self.url.is_some() && other.url.is_some()
      || self.nonce.is_some() && other.nonce.is_some()
      || self.ppt.is_some() && other.ppt.is_some();

    !has_duplicate && self.common.is_disjoint(other.common())
  }
}

impl Deref for JwsHeader {
  type Target = JwtHeader;

  fn deref(&self) -> &Self::Target {
    &self.common
  }
}

impl DerefMut for JwsHeader {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.common
  }
}

impl JoseHeader for JwsHeader {
  fn common(&self) -> &JwtHeader {
    self
  }

  fn has_claim(&self, claim: &str) -> bool {
    self.has(claim)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_header_disjoint() {
    let header1: JwsHeader = serde_json::from_value(serde_json::json!({
      "alg": "ES256",
      "b64": false,
    }))
    .unwrap();
    let header2: JwsHeader = serde_json::from_value(serde_json::json!({
      "alg": "ES256",
      "crit": ["b64"],
    }))
    .unwrap();
    let header3: JwsHeader = serde_json::from_value(serde_json::json!({
      "ppt": "pptx",
      "cty": "mediatype"
    }))
    .unwrap();

    assert!(!header1.is_disjoint(&header2));
    assert!(header1.is_disjoint(&header3));
    assert!(header2.is_disjoint(&header3));
    assert!(header1.is_disjoint(&JwsHeader::new()));
  }

  #[test]
  fn test_header_disjoint_custom() {
    let header1: JwsHeader = serde_json::from_value(serde_json::json!({
      "alg": "ES256",
      "hello": "world",
    }))
    .unwrap();
    let header2: JwsHeader = serde_json::from_value(serde_json::json!({
      "hello": "world",
    }))
    .unwrap();

    assert!(!header1.is_disjoint(&header2));
  }
}
