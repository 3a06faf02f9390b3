// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwa;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweEncryption;
use crate::jwe::JweFormat;
use crate::jwe::JweHeader;
use crate::jwk::EcdhCurve;
use crate::jwu::decode_b64;
use crate::jwu::parse_utf8;
use crate::jwu::Secret;

/// The maximum accepted size of a decoded JOSE header.
const DEFAULT_MAX_HEADER_LEN: usize = 20_000;

/// The minimum accepted PBES2 iteration count.
const DEFAULT_MIN_P2C: u64 = 1_000;

/// The maximum size a compressed payload may inflate to.
const DEFAULT_MAX_INFLATE: usize = 10_000_000;

/// A decoded and decrypted JWE: the merged effective header and the
/// plaintext.
pub struct Token(pub JweHeader, pub Vec<u8>);

/// The JWE decryption pipeline: parses a serialization, recovers the CEK
/// per the key management algorithm, verifies the authentication tag and
/// returns the decrypted content.
///
/// Failures leave no observable state; a [`Token`] is only produced after
/// the tag has been verified.
#[derive(Debug)]
pub struct Decoder<'a> {
  /// The expected serialization format.
  format: JweFormat,
  /// The recipient key: a private key for asymmetric algorithms; the
  /// shared symmetric key or password otherwise.
  secret: Secret<'a>,
  /// The sender public key; required by the ECDH-1PU algorithms.
  public: Option<Secret<'a>>,
  /// The permitted key management algorithms.
  algs: Option<Vec<JweAlgorithm>>,
  /// The permitted content encryption algorithms.
  encs: Option<Vec<JweEncryption>>,
  /// The permitted extension parameters.
  crits: Option<Vec<String>>,
  /// The expected curve of ephemeral keys.
  ecdh_curve: Option<EcdhCurve>,
  /// The maximum accepted size of the decoded protected header.
  max_header_len: usize,
  /// The minimum accepted PBES2 iteration count.
  min_p2c: u64,
  /// The maximum size a compressed payload may inflate to.
  max_inflate: usize,
}

impl<'a> Decoder<'a> {
  /// Creates a new `Decoder` for the given recipient key.
  pub fn new(secret: impl Into<Secret<'a>>) -> Self {
    Self {
      format: JweFormat::Compact,
      secret: secret.into(),
      public: None,
      algs: None,
      encs: None,
      crits: None,
      ecdh_curve: None,
      max_header_len: DEFAULT_MAX_HEADER_LEN,
      min_p2c: DEFAULT_MIN_P2C,
      max_inflate: DEFAULT_MAX_INFLATE,
    }
  }

  /// Sets the expected serialization format.
  pub fn format(mut self, value: JweFormat) -> Self {
    self.format = value;
    self
  }

  /// Sets the sender public key, enabling the ECDH-1PU algorithms.
  pub fn public(mut self, value: impl Into<Secret<'a>>) -> Self {
    self.public = Some(value.into());
    self
  }

  /// Adds a permitted key management algorithm; tokens using any other
  /// algorithm are rejected.
  pub fn algorithm(mut self, value: JweAlgorithm) -> Self {
    self.algs.get_or_insert_with(Vec::new).push(value);
    self
  }

  /// Adds a permitted content encryption algorithm.
  pub fn encryption(mut self, value: JweEncryption) -> Self {
    self.encs.get_or_insert_with(Vec::new).push(value);
    self
  }

  /// Adds a permitted extension parameter (crit).
  pub fn critical(mut self, value: impl Into<String>) -> Self {
    self.crits.get_or_insert_with(Vec::new).push(value.into());
    self
  }

  /// Requires ephemeral keys to be on the given curve.
  pub fn ecdh_curve(mut self, value: impl Into<EcdhCurve>) -> Self {
    self.ecdh_curve = Some(value.into());
    self
  }

  /// Sets the maximum accepted size of the decoded protected header.
  pub fn max_header_len(mut self, value: usize) -> Self {
    self.max_header_len = value;
    self
  }

  /// Sets the minimum accepted PBES2 iteration count.
  pub fn min_p2c(mut self, value: u64) -> Self {
    self.min_p2c = value;
    self
  }

  /// Decodes and decrypts the given serialization.
  pub fn decode(&self, data: &[u8]) -> Result<Token> {
    let parsed: Parsed = self.parse(data)?;

    let protected: Option<JweHeader> = parsed
      .protected_b64
      .as_deref()
      .map(|segment| self.parse_header(segment))
      .transpose()?;

    // AAD is computed over the original encoding of the protected header.
    let aad: Vec<u8> = match (parsed.protected_b64.as_deref(), parsed.aad_b64.as_deref()) {
      (Some(header), Some(aad)) => format!("{header}.{aad}").into_bytes(),
      (Some(header), None) => header.as_bytes().to_vec(),
      (None, Some(aad)) => format!(".{aad}").into_bytes(),
      (None, None) => Vec::new(),
    };

    let mut error: Error = Error::EncError("decryption failed");

    for recipient in parsed.recipients.iter() {
      match self.decrypt_recipient(&parsed, protected.as_ref(), recipient, &aad) {
        Ok(token) => return Ok(token),
        Err(err) => error = err,
      }
    }

    Err(error)
  }

  fn decrypt_recipient(
    &self,
    parsed: &Parsed,
    protected: Option<&JweHeader>,
    recipient: &ParsedRecipient,
    aad: &[u8],
  ) -> Result<Token> {
    let empty: JweHeader = JweHeader::new();
    let protected: &JweHeader = protected.unwrap_or(&empty);
    let unprotected: Option<&JweHeader> = parsed.unprotected.as_ref();
    let header: Option<&JweHeader> = recipient.header.as_ref();

    if let Some(unprotected) = unprotected {
      if !protected.is_disjoint(unprotected) {
        return Err(Error::InvalidParam("duplicate header parameter"));
      }
    }

    if let Some(header) = header {
      if !protected.is_disjoint(header) {
        return Err(Error::InvalidParam("duplicate header parameter"));
      }
      if let Some(unprotected) = unprotected {
        if !unprotected.is_disjoint(header) {
          return Err(Error::InvalidParam("duplicate header parameter"));
        }
      }
    }

    let mut merged: JweHeader = protected.clone();
    if let Some(unprotected) = unprotected {
      merged.merge(unprotected);
    }
    if let Some(header) = header {
      merged.merge(header);
    }

    self.check_crit(protected, &merged)?;

    let alg: JweAlgorithm = merged.alg().ok_or(Error::MissingParam("alg"))?;
    let enc: JweEncryption = merged.enc().ok_or(Error::MissingParam("enc"))?;

    if matches!(self.algs.as_deref(), Some(algs) if !algs.contains(&alg)) {
      return Err(Error::InvalidParam("alg"));
    }

    if matches!(self.encs.as_deref(), Some(encs) if !encs.contains(&enc)) {
      return Err(Error::InvalidParam("enc"));
    }

    let cek: Zeroizing<Vec<u8>> = jwa::decrypt_cek(
      alg,
      enc,
      self.secret,
      self.public,
      &merged,
      recipient.encrypted_key.as_deref(),
      &parsed.tag,
      self.min_p2c,
      self.ecdh_curve,
    )?;

    let plaintext: Vec<u8> = jwa::decrypt_content(enc, &cek, &parsed.iv, aad, &parsed.ciphertext, &parsed.tag)?;

    let claims: Vec<u8> = match merged.zip() {
      Some(zip) => zip.decompress(&plaintext, self.max_inflate)?,
      None => plaintext,
    };

    Ok(Token(merged, claims))
  }

  fn check_crit(&self, protected: &JweHeader, merged: &JweHeader) -> Result<()> {
    let crit: Option<&[String]> = merged.crit();

    if let Some(crit) = crit {
      if protected.crit().is_none() {
        return Err(Error::InvalidParam("crit"));
      }

      let permitted: &[String] = self.crits.as_deref().unwrap_or_default();

      for name in crit {
        if !permitted.contains(name) {
          return Err(Error::InvalidParam("crit"));
        }
      }
    }

    Ok(())
  }

  fn parse_header(&self, segment: &str) -> Result<JweHeader> {
    let bytes: Vec<u8> = decode_b64(segment)?;

    if bytes.len() > self.max_header_len {
      return Err(Error::OversizedHeader(self.max_header_len));
    }

    serde_json::from_slice(&bytes).map_err(Error::InvalidJson)
  }

  fn parse(&self, data: &[u8]) -> Result<Parsed> {
    match self.format {
      JweFormat::Compact => {
        let data: &str = parse_utf8(data)?;
        let split: Vec<&str> = data.split('.').collect();

        let [header, encrypted_key, iv, ciphertext, tag] = split.as_slice() else {
          return Err(Error::InvalidFormat("expected five segments"));
        };

        if header.is_empty() {
          return Err(Error::MissingParam("protected header"));
        }

        Ok(Parsed {
          protected_b64: Some((*header).to_string()),
          unprotected: None,
          recipients: vec![ParsedRecipient {
            header: None,
            encrypted_key: Some(decode_b64(encrypted_key)?).filter(|value| !value.is_empty()),
          }],
          aad_b64: None,
          iv: decode_b64(iv)?,
          ciphertext: decode_b64(ciphertext)?,
          tag: decode_b64(tag)?,
        })
      }
      JweFormat::General => {
        let de: GeneralDe = serde_json::from_slice(data).map_err(Error::InvalidJson)?;

        if de.recipients.is_empty() {
          return Err(Error::InvalidFormat("expected at least one recipient"));
        }

        Ok(Parsed {
          protected_b64: de.protected,
          unprotected: de.unprotected,
          recipients: de
            .recipients
            .into_iter()
            .map(|recipient| {
              Ok(ParsedRecipient {
                header: recipient.header,
                encrypted_key: recipient.encrypted_key.as_deref().map(decode_b64).transpose()?,
              })
            })
            .collect::<Result<_>>()?,
          aad_b64: de.aad,
          iv: de.iv.as_deref().map(decode_b64).transpose()?.unwrap_or_default(),
          ciphertext: decode_b64(&de.ciphertext)?,
          tag: de.tag.as_deref().map(decode_b64).transpose()?.unwrap_or_default(),
        })
      }
      JweFormat::Flatten => {
        let value: serde_json::Value = serde_json::from_slice(data).map_err(Error::InvalidJson)?;

        if value.get("recipients").is_some() {
          return Err(Error::InvalidFormat("unexpected `recipients` in flattened serialization"));
        }

        let de: FlattenDe = serde_json::from_value(value).map_err(Error::InvalidJson)?;

        Ok(Parsed {
          protected_b64: de.protected,
          unprotected: de.unprotected,
          recipients: vec![ParsedRecipient {
            header: de.header,
            encrypted_key: de.encrypted_key.as_deref().map(decode_b64).transpose()?,
          }],
          aad_b64: de.aad,
          iv: de.iv.as_deref().map(decode_b64).transpose()?.unwrap_or_default(),
          ciphertext: decode_b64(&de.ciphertext)?,
          tag: de.tag.as_deref().map(decode_b64).transpose()?.unwrap_or_default(),
        })
      }
    }
  }
}

struct Parsed {
  protected_b64: Option<String>,
  unprotected: Option<JweHeader>,
  recipients: Vec<ParsedRecipient>,
  aad_b64: Option<String>,
  iv: Vec<u8>,
  ciphertext: Vec<u8>,
  tag: Vec<u8>,
}

struct ParsedRecipient {
  header: Option<JweHeader>,
  encrypted_key: Option<Vec<u8>>,
}

#[derive(Deserialize)]
struct GeneralDe {
  protected: Option<String>,
  unprotected: Option<JweHeader>,
  #[serde(default)]
  recipients: Vec<RecipientDe>,
  aad: Option<String>,
  iv: Option<String>,
  ciphertext: String,
  tag: Option<String>,
}

#[derive(Deserialize)]
struct RecipientDe {
  header: Option<JweHeader>,
  encrypted_key: Option<String>,
}

#[derive(Deserialize)]
struct FlattenDe {
  protected: Option<String>,
  unprotected: Option<JweHeader>,
  header: Option<JweHeader>,
  encrypted_key: Option<String>,
  aad: Option<String>,
  iv: Option<String>,
  ciphertext: String,
  tag: Option<String>,
}
