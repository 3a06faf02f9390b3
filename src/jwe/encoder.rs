// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwa;
use crate::jwa::EncryptedCek;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweEncryption;
use crate::jwe::JweFormat;
use crate::jwe::JweHeader;
use crate::jwe::Recipient;
use crate::jwu::encode_b64;
use crate::jwu::encode_b64_json;
use crate::jwu::random_bytes;
use crate::jwu::Secret;

/// The JWE encryption pipeline: assembles the headers, performs the key
/// management step for every recipient, encrypts the content and emits the
/// configured serialization.
///
/// An encoder may be reused for multiple payloads.
#[derive(Debug)]
pub struct Encoder<'a> {
  /// The output format of the encoded token.
  format: JweFormat,
  /// The integrity-protected JOSE header.
  protected: Option<&'a JweHeader>,
  /// The shared unprotected JOSE header.
  unprotected: Option<&'a JweHeader>,
  /// Additional data authenticated alongside the protected header.
  aad: Option<&'a [u8]>,
  /// The sender private key; required by the ECDH-1PU algorithms.
  secret: Option<Secret<'a>>,
  /// The per-recipient configuration.
  recipients: Vec<Recipient<'a>>,
}

impl<'a> Encoder<'a> {
  /// Creates a new `Encoder` with the default (compact) format.
  pub fn new() -> Self {
    Self {
      format: JweFormat::Compact,
      protected: None,
      unprotected: None,
      aad: None,
      secret: None,
      recipients: Vec::new(),
    }
  }

  /// Sets the output serialization format.
  pub fn format(mut self, value: JweFormat) -> Self {
    self.format = value;
    self
  }

  /// Sets the integrity-protected JOSE header.
  pub fn protected(mut self, value: &'a JweHeader) -> Self {
    self.protected = Some(value);
    self
  }

  /// Sets the shared unprotected JOSE header.
  pub fn unprotected(mut self, value: &'a JweHeader) -> Self {
    self.unprotected = Some(value);
    self
  }

  /// Sets additional authenticated data; only representable by the JSON
  /// serializations.
  pub fn aad(mut self, value: &'a [u8]) -> Self {
    self.aad = Some(value);
    self
  }

  /// Sets the sender private key, enabling the ECDH-1PU algorithms.
  pub fn secret(mut self, value: impl Into<Secret<'a>>) -> Self {
    self.secret = Some(value.into());
    self
  }

  /// Adds a recipient.
  pub fn recipient(mut self, value: impl Into<Recipient<'a>>) -> Self {
    self.recipients.push(value.into());
    self
  }

  /// Encrypts `claims` for every configured recipient and returns the
  /// serialized token.
  pub fn encode(&self, claims: &[u8]) -> Result<String> {
    if self.recipients.is_empty() {
      return Err(Error::IllegalState("no recipients configured"));
    }

    self.check_format()?;
    self.check_disjoint()?;

    // The effective parameters must agree across recipients.
    let enc: JweEncryption = self.resolve_enc()?;

    let mut protected: JweHeader = self.protected.cloned().unwrap_or_default();

    // Key management. For a single recipient the header mutations of the
    // key management step (epk, iv/tag, p2s/p2c) become integrity
    // protected; with multiple recipients they are per-recipient state.
    let mut outputs: Vec<RecipientOutput> = Vec::with_capacity(self.recipients.len());
    let cek: Zeroizing<Vec<u8>>;

    if let [recipient] = self.recipients.as_slice() {
      let alg: JweAlgorithm = self.resolve_alg(recipient)?;

      let result: EncryptedCek = jwa::encrypt_cek(alg, enc, recipient.public, self.secret, &mut protected, None)?;

      cek = result.cek;
      outputs.push(RecipientOutput {
        header: recipient.header.cloned(),
        encrypted_key: result.encrypted_key,
        deferred: result.deferred,
      });
    } else {
      cek = Zeroizing::new(random_bytes(enc.key_len())?);

      for recipient in self.recipients.iter() {
        let alg: JweAlgorithm = self.resolve_alg(recipient)?;
        let mut header: JweHeader = recipient.header.cloned().unwrap_or_default();

        let result: EncryptedCek = jwa::encrypt_cek(alg, enc, recipient.public, self.secret, &mut header, Some(&cek))?;

        outputs.push(RecipientOutput {
          header: Some(header),
          encrypted_key: result.encrypted_key,
          deferred: result.deferred,
        });
      }
    }

    // Compress after the key management step so that a `zip` parameter
    // supplied by the caller stays authoritative.
    let payload: Vec<u8> = match protected.zip().or_else(|| self.unprotected.and_then(JweHeader::zip)) {
      Some(zip) => zip.compress(claims)?,
      None => claims.to_vec(),
    };

    let protected_b64: Option<String> = if protected == JweHeader::default() {
      None
    } else {
      Some(encode_b64_json(&protected)?)
    };

    let aad: String = match (protected_b64.as_deref(), self.aad) {
      (Some(header), Some(aad)) => format!("{}.{}", header, encode_b64(aad)),
      (Some(header), None) => header.to_string(),
      (None, Some(aad)) => format!(".{}", encode_b64(aad)),
      (None, None) => String::new(),
    };

    let iv: Vec<u8> = random_bytes(enc.iv_len())?;
    let (ciphertext, tag): (Vec<u8>, Vec<u8>) = jwa::encrypt_content(enc, &cek, &iv, aad.as_bytes(), &payload)?;

    // ECDH-1PU key wrapping binds the content authentication tag.
    for output in outputs.iter_mut() {
      if let Some(deferred) = output.deferred.take() {
        output.encrypted_key = Some(deferred.wrap(&tag, &cek)?);
      }
    }

    match self.format {
      JweFormat::Compact => Ok([
        protected_b64.unwrap_or_default(),
        outputs[0].encrypted_key.as_deref().map(encode_b64).unwrap_or_default(),
        encode_b64(&iv),
        encode_b64(&ciphertext),
        encode_b64(&tag),
      ]
      .join(".")),
      JweFormat::General => {
        let recipients: Vec<JsonRecipient> = outputs.into_iter().map(JsonRecipient::from).collect();

        to_json(&General {
          protected: protected_b64,
          unprotected: self.unprotected,
          recipients,
          aad: self.aad.map(encode_b64),
          iv: encode_b64(&iv),
          ciphertext: encode_b64(&ciphertext),
          tag: encode_b64(&tag),
        })
      }
      JweFormat::Flatten => {
        let recipient: JsonRecipient = outputs.into_iter().next().map(JsonRecipient::from).unwrap();

        to_json(&Flatten {
          protected: protected_b64,
          unprotected: self.unprotected,
          recipient,
          aad: self.aad.map(encode_b64),
          iv: encode_b64(&iv),
          ciphertext: encode_b64(&ciphertext),
          tag: encode_b64(&tag),
        })
      }
    }
  }

  fn check_format(&self) -> Result<()> {
    match self.format {
      JweFormat::Compact => {
        if self.recipients.len() != 1 {
          Err(Error::InvalidFormat("compact serialization requires exactly one recipient"))
        } else if self.unprotected.is_some() || self.recipients[0].header.is_some() {
          Err(Error::InvalidFormat("compact serialization does not support unprotected headers"))
        } else if self.aad.is_some() {
          Err(Error::InvalidFormat("compact serialization does not support AAD"))
        } else {
          Ok(())
        }
      }
      JweFormat::Flatten if self.recipients.len() != 1 => {
        Err(Error::InvalidFormat("flattened serialization requires exactly one recipient"))
      }
      JweFormat::Flatten | JweFormat::General => Ok(()),
    }
  }

  fn check_disjoint(&self) -> Result<()> {
    let empty: JweHeader = JweHeader::new();
    let protected: &JweHeader = self.protected.unwrap_or(&empty);
    let unprotected: &JweHeader = self.unprotected.unwrap_or(&empty);

    if !protected.is_disjoint(unprotected) {
      return Err(Error::InvalidParam("duplicate header parameter"));
    }

    for recipient in self.recipients.iter() {
      if let Some(header) = recipient.header {
        if !protected.is_disjoint(header) || !unprotected.is_disjoint(header) {
          return Err(Error::InvalidParam("duplicate header parameter"));
        }
      }
    }

    Ok(())
  }

  fn resolve_enc(&self) -> Result<JweEncryption> {
    let mut resolved: Option<JweEncryption> = None;

    for recipient in self.recipients.iter() {
      let enc: JweEncryption = self
        .merged_param(recipient, |header| header.enc())
        .ok_or(Error::MissingParam("enc"))?;

      if matches!(resolved, Some(value) if value != enc) {
        return Err(Error::InvalidParam("enc"));
      }

      resolved = Some(enc);
    }

    resolved.ok_or(Error::MissingParam("enc"))
  }

  fn resolve_alg(&self, recipient: &Recipient<'a>) -> Result<JweAlgorithm> {
    self
      .merged_param(recipient, |header| header.alg())
      .ok_or(Error::MissingParam("alg"))
  }

  fn merged_param<U>(&self, recipient: &Recipient<'a>, get: impl Fn(&JweHeader) -> Option<U>) -> Option<U> {
    self
      .protected
      .and_then(&get)
      .or_else(|| self.unprotected.and_then(&get))
      .or_else(|| recipient.header.and_then(&get))
  }
}

impl Default for Encoder<'_> {
  fn default() -> Self {
    Self::new()
  }
}

struct RecipientOutput {
  header: Option<JweHeader>,
  encrypted_key: Option<Vec<u8>>,
  deferred: Option<crate::jwa::DeferredKeyWrap>,
}

#[derive(Serialize)]
struct JsonRecipient {
  #[serde(skip_serializing_if = "Option::is_none")]
  header: Option<JweHeader>,
  #[serde(skip_serializing_if = "Option::is_none")]
  encrypted_key: Option<String>,
}

impl From<RecipientOutput> for JsonRecipient {
  fn from(other: RecipientOutput) -> Self {
    Self {
      header: other.header.filter(|header| *header != JweHeader::default()),
      encrypted_key: other.encrypted_key.as_deref().map(encode_b64),
    }
  }
}

#[derive(Serialize)]
struct General<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  protected: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  unprotected: Option<&'a JweHeader>,
  recipients: Vec<JsonRecipient>,
  #[serde(skip_serializing_if = "Option::is_none")]
  aad: Option<String>,
  iv: String,
  ciphertext: String,
  tag: String,
}

#[derive(Serialize)]
struct Flatten<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  protected: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  unprotected: Option<&'a JweHeader>,
  #[serde(flatten)]
  recipient: JsonRecipient,
  #[serde(skip_serializing_if = "Option::is_none")]
  aad: Option<String>,
  iv: String,
  ciphertext: String,
  tag: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
  serde_json::to_string(value).map_err(Error::InvalidJson)
}
