// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::jwa;
use crate::jws::CharSet;
use crate::jws::JwsAlgorithm;
use crate::jws::JwsFormat;
use crate::jws::JwsHeader;
use crate::jws::Recipient;
use crate::jwt::JwtHeaderSet;
use crate::jwu::encode_b64;
use crate::jwu::encode_b64_json;
use crate::jwu::parse_utf8;

/// The JWS signing pipeline: assembles the headers, computes the signing
/// input per recipient and emits the configured serialization.
///
/// An encoder may be reused for multiple payloads.
#[derive(Debug)]
pub struct Encoder<'a> {
  /// The output format of the encoded token.
  format: JwsFormat,
  /// The emitted payload representation; detached payloads are omitted
  /// from the serialization ([RFC 7515, appendix
  /// F](https://tools.ietf.org/html/rfc7515#appendix-F)).
  detached: bool,
  /// The characters permitted in attached unencoded payloads.
  charset: CharSet,
  /// The per-signature configuration.
  recipients: Vec<Recipient<'a>>,
}

impl<'a> Encoder<'a> {
  /// Creates a new `Encoder` with the default (compact) format.
  pub fn new() -> Self {
    Self {
      format: JwsFormat::Compact,
      detached: false,
      charset: CharSet::Default,
      recipients: Vec::new(),
    }
  }

  /// Sets the output serialization format.
  pub fn format(mut self, value: JwsFormat) -> Self {
    self.format = value;
    self
  }

  /// Omits the payload from the serialization.
  pub fn detach(mut self) -> Self {
    self.detached = true;
    self
  }

  /// Sets the characters permitted in attached unencoded payloads.
  pub fn charset(mut self, value: CharSet) -> Self {
    self.charset = value;
    self
  }

  /// Adds a signing recipient.
  pub fn recipient(mut self, value: impl Into<Recipient<'a>>) -> Self {
    self.recipients.push(value.into());
    self
  }

  /// Signs `claims` for every configured recipient and returns the
  /// serialized token.
  pub fn encode(&self, claims: &[u8]) -> Result<String> {
    if self.recipients.is_empty() {
      return Err(Error::IllegalState("no recipients configured"));
    }

    self.check_format()?;

    let b64: bool = self.resolve_b64()?;

    // The payload segment shared by all signatures.
    let payload: String = if b64 {
      encode_b64(claims)
    } else if self.detached {
      String::new()
    } else {
      self.charset.check(claims)?;
      parse_utf8(claims)?.to_string()
    };

    let mut signatures: Vec<JsonSignature<'a>> = Vec::with_capacity(self.recipients.len());

    for recipient in self.recipients.iter() {
      let protected: Option<&JwsHeader> = recipient.protected;
      let unprotected: Option<&JwsHeader> = recipient.unprotected;

      if let (Some(protected), Some(unprotected)) = (protected, unprotected) {
        if !protected.is_disjoint(unprotected) {
          return Err(Error::InvalidParam("duplicate header parameter"));
        }
      }

      let set: JwtHeaderSet<'_, JwsHeader> = JwtHeaderSet::new().with_protected(protected).with_unprotected(unprotected);
      let alg: JwsAlgorithm = set.try_alg()?;

      check_unencoded(protected, b64)?;

      let protected_b64: Option<String> = protected.map(encode_b64_json).transpose()?;

      let message: Vec<u8> = signing_input(protected_b64.as_deref().unwrap_or_default(), b64, &payload, claims);
      let signature: Vec<u8> = jwa::sign(alg, &message, recipient.secret)?;

      signatures.push(JsonSignature {
        protected: protected_b64,
        header: unprotected,
        signature: encode_b64(signature),
      });
    }

    match self.format {
      JwsFormat::Compact => {
        // unwrap is fine, the cardinality was checked above
        let signature: JsonSignature<'_> = signatures.pop().unwrap();

        if self.detached {
          Ok(format!("{}..{}", signature.protected.unwrap_or_default(), signature.signature))
        } else {
          Ok(format!(
            "{}.{}.{}",
            signature.protected.unwrap_or_default(),
            payload,
            signature.signature
          ))
        }
      }
      JwsFormat::General => to_json(&General {
        payload: attached(&payload, self.detached),
        signatures,
      }),
      JwsFormat::Flatten => {
        // unwrap is fine, the cardinality was checked above
        let signature: JsonSignature<'_> = signatures.pop().unwrap();

        to_json(&Flatten {
          payload: attached(&payload, self.detached),
          signature,
        })
      }
    }
  }

  fn check_format(&self) -> Result<()> {
    match self.format {
      JwsFormat::Compact => {
        if self.recipients.len() != 1 {
          Err(Error::InvalidFormat("compact serialization requires exactly one signature"))
        } else if self.recipients[0].unprotected.is_some() {
          Err(Error::InvalidFormat("compact serialization does not support unprotected headers"))
        } else {
          Ok(())
        }
      }
      JwsFormat::Flatten if self.recipients.len() != 1 => {
        Err(Error::InvalidFormat("flattened serialization requires exactly one signature"))
      }
      JwsFormat::Flatten | JwsFormat::General => Ok(()),
    }
  }

  /// Returns the payload encoding shared by all signatures.
  fn resolve_b64(&self) -> Result<bool> {
    let mut resolved: Option<bool> = None;

    for recipient in self.recipients.iter() {
      let set: JwtHeaderSet<'_, JwsHeader> = JwtHeaderSet::new()
        .with_protected(recipient.protected)
        .with_unprotected(recipient.unprotected);

      let b64: bool = set.b64();

      if matches!(resolved, Some(value) if value != b64) {
        return Err(Error::InvalidParam("b64"));
      }

      resolved = Some(b64);
    }

    Ok(resolved.unwrap_or(true))
  }
}

impl Default for Encoder<'_> {
  fn default() -> Self {
    Self::new()
  }
}

/// The unencoded payload option must be integrity protected and marked
/// critical ([RFC 7797, section 6](https://tools.ietf.org/html/rfc7797#section-6)).
fn check_unencoded(protected: Option<&JwsHeader>, b64: bool) -> Result<()> {
  if b64 {
    return Ok(());
  }

  let protected: &JwsHeader = protected.ok_or(Error::InvalidParam("b64"))?;

  if protected.b64() != Some(false) {
    return Err(Error::InvalidParam("b64"));
  }

  match protected.crit() {
    Some(crit) if crit.iter().any(|name| name == "b64") => Ok(()),
    Some(_) | None => Err(Error::InvalidParam("crit")),
  }
}

/// Computes the JWS signing input ([RFC 7515, section
/// 5.1](https://tools.ietf.org/html/rfc7515#section-5.1); [RFC 7797,
/// section 3](https://tools.ietf.org/html/rfc7797#section-3)).
fn signing_input(protected_b64: &str, b64: bool, payload_b64: &str, claims: &[u8]) -> Vec<u8> {
  let payload: &[u8] = if b64 { payload_b64.as_bytes() } else { claims };

  let mut message: Vec<u8> = Vec::with_capacity(protected_b64.len() + 1 + payload.len());
  message.extend_from_slice(protected_b64.as_bytes());
  message.push(b'.');
  message.extend_from_slice(payload);
  message
}

fn attached<'p>(payload: &'p str, detached: bool) -> Option<&'p str> {
  if detached {
    None
  } else {
    Some(payload)
  }
}

#[derive(Serialize)]
struct JsonSignature<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  protected: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  header: Option<&'a JwsHeader>,
  signature: String,
}

#[derive(Serialize)]
struct General<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  payload: Option<&'a str>,
  signatures: Vec<JsonSignature<'a>>,
}

#[derive(Serialize)]
struct Flatten<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  payload: Option<&'a str>,
  #[serde(flatten)]
  signature: JsonSignature<'a>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
  serde_json::to_string(value).map_err(Error::InvalidJson)
}
