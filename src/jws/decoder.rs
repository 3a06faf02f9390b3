// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;

use serde::Deserialize;

use crate::error::Error;
use crate::error::Result;
use crate::jwa;
use crate::jws::JwsAlgorithm;
use crate::jws::JwsFormat;
use crate::jws::JwsHeader;
use crate::jwt::JwtHeaderSet;
use crate::jwu::decode_b64;
use crate::jwu::parse_utf8;
use crate::jwu::Secret;

/// The maximum accepted size of a decoded JOSE header.
const DEFAULT_MAX_HEADER_LEN: usize = 20_000;

/// A decoded and verified JWS: the headers of the verified signature and
/// the payload.
#[derive(Debug)]
pub struct Token<'b> {
  /// The integrity-protected header of the verified signature.
  pub protected: Option<JwsHeader>,
  /// The unprotected header of the verified signature.
  pub unprotected: Option<JwsHeader>,
  /// The payload; empty for detached tokens.
  pub claims: Cow<'b, [u8]>,
}

/// The JWS verification pipeline: parses a serialization, recomputes the
/// signing input from the original segments and verifies the signature.
///
/// A [`Token`] is only produced after a signature verified; failures leave
/// no observable state.
#[derive(Debug)]
pub struct Decoder<'a, 'b> {
  /// The expected serialization format.
  format: JwsFormat,
  /// The verification key: a public key for asymmetric algorithms, the
  /// shared symmetric key otherwise.
  public: Secret<'a>,
  /// The permitted signature algorithms. `none` is never accepted unless
  /// listed explicitly.
  algs: Option<Vec<JwsAlgorithm>>,
  /// The permitted extension parameters.
  crits: Option<Vec<String>>,
  /// The detached payload, exactly as it appears in the payload segment.
  payload: Option<&'b [u8]>,
  /// The maximum accepted size of the decoded protected header.
  max_header_len: usize,
}

impl<'a, 'b> Decoder<'a, 'b> {
  /// Creates a new `Decoder` for the given verification key.
  pub fn new(public: impl Into<Secret<'a>>) -> Self {
    Self {
      format: JwsFormat::Compact,
      public: public.into(),
      algs: None,
      crits: None,
      payload: None,
      max_header_len: DEFAULT_MAX_HEADER_LEN,
    }
  }

  /// Sets the expected serialization format.
  pub fn format(mut self, value: JwsFormat) -> Self {
    self.format = value;
    self
  }

  /// Adds a permitted signature algorithm; tokens using any other
  /// algorithm are rejected.
  pub fn algorithm(mut self, value: JwsAlgorithm) -> Self {
    self.algs.get_or_insert_with(Vec::new).push(value);
    self
  }

  /// Adds a permitted extension parameter (crit).
  pub fn critical(mut self, value: impl Into<String>) -> Self {
    self.crits.get_or_insert_with(Vec::new).push(value.into());
    self
  }

  /// Sets the detached payload.
  ///
  /// The value must match the payload segment exactly: base64url-encoded
  /// unless the token uses `b64 = false`.
  pub fn payload(mut self, value: &'b [u8]) -> Self {
    self.payload = Some(value);
    self
  }

  /// Sets the maximum accepted size of the decoded protected header.
  pub fn max_header_len(mut self, value: usize) -> Self {
    self.max_header_len = value;
    self
  }

  /// Decodes and verifies the given serialization.
  pub fn decode(&self, data: &'b [u8]) -> Result<Token<'b>> {
    match self.format {
      JwsFormat::Compact => {
        let data: &str = parse_utf8(data)?;
        let split: Vec<&str> = data.split('.').collect();

        let [header, payload, signature] = split.as_slice() else {
          return Err(Error::InvalidFormat("expected three segments"));
        };

        if header.is_empty() {
          return Err(Error::MissingParam("protected header"));
        }

        self.verify_signature(header, None, payload.as_bytes(), &decode_b64(signature)?)
      }
      JwsFormat::General => {
        let de: GeneralDe = serde_json::from_slice(data).map_err(Error::InvalidJson)?;

        if de.signatures.is_empty() {
          return Err(Error::InvalidFormat("expected at least one signature"));
        }

        let payload: &[u8] = de.payload.as_deref().map(str::as_bytes).unwrap_or_default();
        let mut error: Error = Error::SigError("signature verification failed");

        for signature in de.signatures.iter() {
          let result: Result<Token<'_>> = self.verify_json_signature(signature, payload);

          match result {
            Ok(token) => return Ok(token.into_owned()),
            Err(err) => error = err,
          }
        }

        Err(error)
      }
      JwsFormat::Flatten => {
        let value: serde_json::Value = serde_json::from_slice(data).map_err(Error::InvalidJson)?;

        if value.get("signatures").is_some() {
          return Err(Error::InvalidFormat("unexpected `signatures` in flattened serialization"));
        }

        let de: FlattenDe = serde_json::from_value(value).map_err(Error::InvalidJson)?;

        let payload: &[u8] = de.payload.as_deref().map(str::as_bytes).unwrap_or_default();

        self.verify_json_signature(&de.signature, payload).map(Token::into_owned)
      }
    }
  }

  fn verify_json_signature<'c>(&self, signature: &'c SignatureDe, payload: &'c [u8]) -> Result<Token<'c>>
  where
    'b: 'c,
  {
    let protected: &str = signature.protected.as_deref().unwrap_or_default();

    self.verify_signature(
      protected,
      signature.header.clone(),
      payload,
      &decode_b64(signature.signature.as_str())?,
    )
  }

  /// Verifies a single signature from the original wire segments.
  fn verify_signature<'c>(
    &self,
    header_b64: &'c str,
    unprotected: Option<JwsHeader>,
    payload: &'c [u8],
    signature: &[u8],
  ) -> Result<Token<'c>>
  where
    'b: 'c,
  {
    let protected: Option<JwsHeader> = if header_b64.is_empty() {
      None
    } else {
      Some(self.parse_header(header_b64)?)
    };

    if let (Some(protected), Some(unprotected)) = (protected.as_ref(), unprotected.as_ref()) {
      if !protected.is_disjoint(unprotected) {
        return Err(Error::InvalidParam("duplicate header parameter"));
      }
    }

    let set: JwtHeaderSet<'_, JwsHeader> = JwtHeaderSet::new()
      .with_protected(protected.as_ref())
      .with_unprotected(unprotected.as_ref());

    self.check_crit(protected.as_ref(), &set)?;

    let alg: JwsAlgorithm = set.try_alg()?;

    self.check_alg(alg)?;

    let b64: bool = set.b64();

    if !b64 && !set.is_protected("b64") {
      return Err(Error::InvalidParam("b64"));
    }

    // The payload segment, substituted by the caller for detached tokens.
    let payload: &[u8] = self.payload.unwrap_or(payload);

    // The signing input reuses the original segment encodings.
    let mut message: Vec<u8> = Vec::with_capacity(header_b64.len() + 1 + payload.len());
    message.extend_from_slice(header_b64.as_bytes());
    message.push(b'.');
    message.extend_from_slice(payload);

    jwa::verify(alg, &message, signature, self.public)?;

    let claims: Cow<'c, [u8]> = if self.payload.is_some() {
      Cow::Owned(Vec::new())
    } else if b64 {
      Cow::Owned(decode_b64(payload)?)
    } else {
      Cow::Borrowed(payload)
    };

    Ok(Token {
      protected,
      unprotected,
      claims,
    })
  }

  fn check_alg(&self, alg: JwsAlgorithm) -> Result<()> {
    match self.algs.as_deref() {
      Some(algs) if algs.contains(&alg) => Ok(()),
      Some(_) => Err(Error::InvalidParam("alg")),
      // `none` provides no integrity and must be opted into explicitly
      None if alg == JwsAlgorithm::NONE => Err(Error::InvalidParam("alg")),
      None => Ok(()),
    }
  }

  fn check_crit(&self, protected: Option<&JwsHeader>, set: &JwtHeaderSet<'_, JwsHeader>) -> Result<()> {
    if let Some(crit) = set.crit() {
      if protected.map(|header| header.crit().is_none()).unwrap_or(true) {
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

  fn parse_header(&self, segment: &str) -> Result<JwsHeader> {
    let bytes: Vec<u8> = decode_b64(segment)?;

    if bytes.len() > self.max_header_len {
      return Err(Error::OversizedHeader(self.max_header_len));
    }

    serde_json::from_slice(&bytes).map_err(Error::InvalidJson)
  }
}

impl Token<'_> {
  fn into_owned(self) -> Token<'static> {
    Token {
      protected: self.protected,
      unprotected: self.unprotected,
      claims: Cow::Owned(self.claims.into_owned()),
    }
  }
}

#[derive(Deserialize)]
struct SignatureDe {
  protected: Option<String>,
  header: Option<JwsHeader>,
  signature: String,
}

#[derive(Deserialize)]
struct GeneralDe {
  payload: Option<String>,
  #[serde(default)]
  signatures: Vec<SignatureDe>,
}

#[derive(Deserialize)]
struct FlattenDe {
  payload: Option<String>,
  #[serde(flatten)]
  signature: SignatureDe,
}
