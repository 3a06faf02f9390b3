// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::ops::Deref;
use core::ops::DerefMut;

use serde::Deserialize;
use serde::Serialize;

use crate::jose::JoseHeader;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweCompression;
use crate::jwe::JweEncryption;
use crate::jwk::Jwk;
use crate::jwt::JwtHeader;

/// JSON Web Encryption JOSE Header.
///
/// [More Info](https://tools.ietf.org/html/rfc7516#section-4)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct JweHeader {
  /// Common JOSE Header Parameters.
  #[serde(flatten)]
  common: JwtHeader,
  /// Algorithm.
  ///
  /// Identifies the cryptographic algorithm used to encrypt or determine
  /// the value of the CEK.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7516#section-4.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  alg: Option<JweAlgorithm>,
  /// Encryption Algorithm.
  ///
  /// Identifies the content encryption algorithm used to perform
  /// authenticated encryption on the plaintext.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7516#section-4.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  enc: Option<JweEncryption>,
  /// Compression Algorithm.
  ///
  /// The compression algorithm applied to the plaintext before encryption.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7516#section-4.1.3)
  #[serde(skip_serializing_if = "Option::is_none")]
  zip: Option<JweCompression>,
  /// Ephemeral Public Key.
  ///
  /// The public key created by the originator for use in key agreement
  /// algorithms.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.6.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  epk: Option<Jwk>,
  /// Agreement PartyUInfo.
  ///
  /// Information about the producer, as a base64url-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.6.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  apu: Option<String>,
  /// Agreement PartyVInfo.
  ///
  /// Information about the recipient, as a base64url-encoded value.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.6.1.3)
  #[serde(skip_serializing_if = "Option::is_none")]
  apv: Option<String>,
  /// Initialization Vector.
  ///
  /// The base64url-encoded nonce used by the AEAD key wrapping algorithms.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.7.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  iv: Option<String>,
  /// Authentication Tag.
  ///
  /// The base64url-encoded tag produced by the AEAD key wrapping
  /// algorithms.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.7.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  tag: Option<String>,
  /// PBES2 Salt Input.
  ///
  /// The base64url-encoded salt input to the PBES2 key derivation.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.8.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  p2s: Option<String>,
  /// PBES2 Count.
  ///
  /// The PBKDF2 iteration count.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.8.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  p2c: Option<u64>,
  /// Sender Key ID.
  ///
  /// A hint identifying the sender public key used by ECDH-1PU.
  ///
  /// [More Info](https://tools.ietf.org/html/draft-madden-jose-ecdh-1pu-04#section-2.2.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  skid: Option<String>,
}

impl JweHeader {
  /// Create a new empty `JweHeader`.
  pub fn new() -> Self {
    Self {
      common: JwtHeader::new(),
      alg: None,
      enc: None,
      zip: None,
      epk: None,
      apu: None,
      apv: None,
      iv: None,
      tag: None,
      p2s: None,
      p2c: None,
      skid: None,
    }
  }

  /// Create a new `JweHeader` with the given algorithms.
  pub fn with_alg_enc(alg: JweAlgorithm, enc: JweEncryption) -> Self {
    let mut this: Self = Self::new();
    this.set_alg(alg);
    this.set_enc(enc);
    this
  }

  /// Returns the value of the algorithm claim (alg).
  pub fn alg(&self) -> Option<JweAlgorithm> {
    self.alg
  }

  /// Sets a value for the algorithm claim (alg).
  pub fn set_alg(&mut self, value: impl Into<JweAlgorithm>) {
    self.alg = Some(value.into());
  }

  /// Returns the value of the encryption claim (enc).
  pub fn enc(&self) -> Option<JweEncryption> {
    self.enc
  }

  /// Sets a value for the encryption claim (enc).
  pub fn set_enc(&mut self, value: impl Into<JweEncryption>) {
    self.enc = Some(value.into());
  }

  /// Returns the value of the compression claim (zip).
  pub fn zip(&self) -> Option<&JweCompression> {
    self.zip.as_ref()
  }

  /// Sets a value for the compression claim (zip).
  pub fn set_zip(&mut self, value: impl Into<JweCompression>) {
    self.zip = Some(value.into());
  }

  /// Returns the value of the ephemeral public key claim (epk).
  pub fn epk(&self) -> Option<&Jwk> {
    self.epk.as_ref()
  }

  /// Sets a value for the ephemeral public key claim (epk).
  pub fn set_epk(&mut self, value: impl Into<Jwk>) {
    self.epk = Some(value.into());
  }

  /// Returns the value of the partyuinfo claim (apu).
  pub fn apu(&self) -> Option<&str> {
    self.apu.as_deref()
  }

  /// Sets a value for the partyuinfo claim (apu).
  pub fn set_apu(&mut self, value: impl Into<String>) {
    self.apu = Some(value.into());
  }

  /// Returns the value of the partyvinfo claim (apv).
  pub fn apv(&self) -> Option<&str> {
    self.apv.as_deref()
  }

  /// Sets a value for the partyvinfo claim (apv).
  pub fn set_apv(&mut self, value: impl Into<String>) {
    self.apv = Some(value.into());
  }

  /// Returns the value of the initialization vector claim (iv).
  pub fn iv(&self) -> Option<&str> {
    self.iv.as_deref()
  }

  /// Sets a value for the initialization vector claim (iv).
  pub fn set_iv(&mut self, value: impl Into<String>) {
    self.iv = Some(value.into());
  }

  /// Returns the value of the authentication tag claim (tag).
  pub fn tag(&self) -> Option<&str> {
    self.tag.as_deref()
  }

  /// Sets a value for the authentication tag claim (tag).
  pub fn set_tag(&mut self, value: impl Into<String>) {
    self.tag = Some(value.into());
  }

  /// Returns the value of the pbes2 salt input claim (p2s).
  pub fn p2s(&self) -> Option<&str> {
    self.p2s.as_deref()
  }

  /// Sets a value for the pbes2 salt input claim (p2s).
  pub fn set_p2s(&mut self, value: impl Into<String>) {
    self.p2s = Some(value.into());
  }

  /// Returns the value of the pbes2 count claim (p2c).
  pub fn p2c(&self) -> Option<u64> {
    self.p2c
  }

  /// Sets a value for the pbes2 count claim (p2c).
  pub fn set_p2c(&mut self, value: impl Into<u64>) {
    self.p2c = Some(value.into());
  }

  /// Returns the value of the sender key ID claim (skid).
  pub fn skid(&self) -> Option<&str> {
    self.skid.as_deref()
  }

  /// Sets a value for the sender key ID claim (skid).
  pub fn set_skid(&mut self, value: impl Into<String>) {
    self.skid = Some(value.into());
  }

  /// Returns `true` if the header contains the given parameter.
  pub fn has(&self, claim: &str) -> bool {
    match claim {
      "alg" => self.alg().is_some(),
      "enc" => self.enc().is_some(),
      "zip" => self.zip().is_some(),
      "epk" => self.epk().is_some(),
      "apu" => self.apu().is_some(),
      "apv" => self.apv().is_some(),
      "iv" => self.iv().is_some(),
      "tag" => self.tag().is_some(),
      "p2s" => self.p2s().is_some(),
      "p2c" => self.p2c().is_some(),
      "skid" => self.skid().is_some(),
      _ => self.common.has(claim),
    }
  }

  /// Returns `true` if none of the parameters are set in both `self` and
  /// `other`.
  pub fn is_disjoint(&self, other: &JweHeader) -> bool {
    let has_duplicate: bool = self.alg.is_some() && other.alg.is_some()
      || self.enc.is_some() && other.enc.is_some()
      || self.zip.is_some() && other.zip.is_some()
      || self.epk.is_some() && other.epk.is_some()
      || self.apu.is_some() && other.apu.is_some()
      || self.apv.is_some() && other.apv.is_some()
      || self.iv.is_some() && other.iv.is_some()
      || self.tag.is_some() && other.tag.is_some()
      || self.p2s.is_some() && other.p2s.is_some()
      || self.p2c.is_some() && other.p2c.is_some()
      || self.skid.is_some() && other.skid.is_some();

    !has_duplicate && self.common.is_disjoint(other.common())
  }

  /// Copies all set parameters of `other` into `self`.
  ///
  /// Callers must establish disjointness beforehand.
  pub(crate) fn merge(&mut self, other: &JweHeader) {
    macro_rules! copy {
      ($($field:ident),+ $(,)?) => {
        $(
          if self.$field.is_none() {
            self.$field = other.$field.clone();
          }
        )+
      };
    }

    copy!(alg, enc, zip, epk, apu, apv, iv, tag, p2s, p2c, skid);

    let common: &JwtHeader = other.common();

    if self.common.jku().is_none() {
      if let Some(value) = common.jku() {
        self.common.set_jku(value.clone());
      }
    }
    if self.common.jwk().is_none() {
      if let Some(value) = common.jwk() {
        self.common.set_jwk(value.clone());
      }
    }
    if self.common.kid().is_none() {
      if let Some(value) = common.kid() {
        self.common.set_kid(value);
      }
    }
    if self.common.x5u().is_none() {
      if let Some(value) = common.x5u() {
        self.common.set_x5u(value.clone());
      }
    }
    if self.common.x5c().is_none() {
      if let Some(value) = common.x5c() {
        self.common.set_x5c(value.iter().cloned());
      }
    }
    if self.common.x5t().is_none() {
      if let Some(value) = common.x5t() {
        self.common.set_x5t(value);
      }
    }
    if self.common.x5t_s256().is_none() {
      if let Some(value) = common.x5t_s256() {
        self.common.set_x5t_s256(value);
      }
    }
    if self.common.typ().is_none() {
      if let Some(value) = common.typ() {
        self.common.set_typ(value);
      }
    }
    if self.common.cty().is_none() {
      if let Some(value) = common.cty() {
        self.common.set_cty(value);
      }
    }
    if self.common.crit().is_none() {
      if let Some(value) = common.crit() {
        self.common.set_crit(value.iter().cloned());
      }
    }
    for (key, value) in common.custom() {
      if !self.common.custom().contains_key(key) {
        self.common.set_custom(key.clone(), value.clone());
      }
    }
  }
}

impl Deref for JweHeader {
  type Target = JwtHeader;

  fn deref(&self) -> &Self::Target {
    &self.common
  }
}

impl DerefMut for JweHeader {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.common
  }
}

impl JoseHeader for JweHeader {
  fn common(&self) -> &JwtHeader {
    self
  }

  fn has_claim(&self, claim: &str) -> bool {
    self.has(claim)
  }
}
