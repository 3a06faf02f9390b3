// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Errors produced while working with JOSE objects.

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors the crate can produce.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
  /// Caused by invalid json serialization or deserialization.
  #[error("invalid json")]
  InvalidJson(#[source] serde_json::Error),
  /// Caused by invalid base64-encoded data.
  #[error("invalid base64")]
  InvalidBase64(#[source] base64::DecodeError),
  /// Caused by bytes that are not valid utf-8.
  #[error("invalid utf-8")]
  InvalidUtf8(#[source] core::str::Utf8Error),
  /// Caused by an invalid claim in a JWT claims set.
  #[error("invalid claim: `{0}`")]
  InvalidClaim(&'static str),
  /// Caused by an invalid or mismatched parameter in a JOSE header or key.
  #[error("invalid param: `{0}`")]
  InvalidParam(&'static str),
  /// Caused by a missing required parameter in a JOSE header or key.
  #[error("missing param: `{0}`")]
  MissingParam(&'static str),
  /// Caused by content that violates the active serialization rules.
  #[error("invalid content: {0}")]
  InvalidContent(String),
  /// Caused by a serialization with an unexpected shape.
  #[error("invalid serialization format: {0}")]
  InvalidFormat(&'static str),
  /// Caused by a decoded JOSE header above the permitted size.
  #[error("header exceeds the maximum decoded size of {0} bytes")]
  OversizedHeader(usize),
  /// Caused by an algorithm that is unregistered, or unsupported for the
  /// attempted operation or key.
  #[error("unsupported algorithm: {0}")]
  AlgError(String),
  /// Caused by a Content Encryption Key of an invalid length.
  #[error("The Content Encryption Key (CEK) length for {enc} must be {bits} bits")]
  KeyLength {
    /// The content encryption algorithm name.
    enc: &'static str,
    /// The required CEK length in bits.
    bits: usize,
  },
  /// Caused by key material that fails shape or consistency validation.
  #[error("invalid key: {0}")]
  InvalidKey(String),
  /// Caused by a failed signature verification.
  #[error("signature verification failed: {0}")]
  SigError(&'static str),
  /// Caused by a failed decryption or key unwrap. Reported generically so
  /// the failure mode cannot be used as a padding or tag oracle.
  #[error("decryption failed: {0}")]
  EncError(&'static str),
  /// Caused by a failure in an underlying cryptographic primitive.
  #[error("crypto error")]
  CryptoError(#[source] crypto::Error),
  /// Caused by an operation invoked in a state that does not permit it.
  #[error("illegal state: {0}")]
  IllegalState(&'static str),
  /// Caused by a transient failure to retrieve a remote JWK set.
  #[error("JWK set unavailable: {0}")]
  JwkSetUnavailable(String),
  /// Caused by a JWK set document that cannot be parsed. Not recoverable by
  /// retries.
  #[error("JWK set parse failure: {0}")]
  JwkSetParse(String),
  /// Caused by a forced JWK set refresh denied by the rate limiter.
  #[error("JWK set refresh rate limit reached")]
  RateLimitReached,
  /// Caused by all configured remote key sources failing.
  #[error("remote key source failure: {0}")]
  RemoteKeySource(String),
}

impl From<crypto::Error> for Error {
  fn from(other: crypto::Error) -> Self {
    Self::CryptoError(other)
  }
}

impl From<serde_json::Error> for Error {
  fn from(other: serde_json::Error) -> Self {
    Self::InvalidJson(other)
  }
}
