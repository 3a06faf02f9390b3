// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use url::Url;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::JwkSet;
use crate::jwks::JwkSetSource;
use crate::jwks::SourceContext;
use crate::jwks::SourceHealth;

/// Transport options for remote JWK set retrieval.
#[derive(Clone, Copy, Debug)]
pub struct FetchOptions {
  /// The timeout for establishing a connection.
  pub connect_timeout: Duration,
  /// The timeout for reading the response.
  pub read_timeout: Duration,
  /// The maximum accepted document size in bytes.
  pub size_limit: usize,
}

impl Default for FetchOptions {
  fn default() -> Self {
    Self {
      connect_timeout: Duration::from_secs(15),
      read_timeout: Duration::from_secs(15),
      size_limit: 50 * 1024,
    }
  }
}

/// A retrieved JWK set document.
#[derive(Clone, Debug)]
pub struct FetchResponse {
  /// The `Content-Type` of the document, if declared.
  pub content_type: Option<String>,
  /// The raw document bytes.
  pub body: Vec<u8>,
}

/// The transport used by [`UrlJwkSetSource`] to retrieve JWK set
/// documents.
///
/// HTTP plumbing lives outside this crate; implementations map transport
/// failures to [`Error::JwkSetUnavailable`] and honor the timeouts and the
/// context deadline.
///
/// [`Error::JwkSetUnavailable`]: crate::error::Error::JwkSetUnavailable
pub trait JwkSetFetch: Send + Sync {
  /// Retrieves the document at `url`.
  fn fetch(&self, url: &Url, options: &FetchOptions, ctx: &SourceContext) -> Result<FetchResponse>;
}

impl<F> JwkSetFetch for F
where
  F: Fn(&Url, &FetchOptions, &SourceContext) -> Result<FetchResponse> + Send + Sync,
{
  fn fetch(&self, url: &Url, options: &FetchOptions, ctx: &SourceContext) -> Result<FetchResponse> {
    self(url, options, ctx)
  }
}

/// A [`JwkSetSource`] retrieving the set from a remote document through a
/// [`JwkSetFetch`] transport.
///
/// Oversized or malformed documents fail with
/// [`Error::JwkSetParse`](crate::error::Error::JwkSetParse); transport
/// failures surface as
/// [`Error::JwkSetUnavailable`](crate::error::Error::JwkSetUnavailable).
pub struct UrlJwkSetSource<F> {
  url: Url,
  fetch: F,
  options: FetchOptions,
}

impl<F: JwkSetFetch> UrlJwkSetSource<F> {
  /// Creates a new `UrlJwkSetSource` with default [`FetchOptions`].
  pub fn new(url: Url, fetch: F) -> Self {
    Self {
      url,
      fetch,
      options: FetchOptions::default(),
    }
  }

  /// Sets the transport options.
  pub fn options(mut self, value: FetchOptions) -> Self {
    self.options = value;
    self
  }
}

impl<F: JwkSetFetch> JwkSetSource for UrlJwkSetSource<F> {
  fn jwk_set(&self, _force: bool, _now: Instant, ctx: &SourceContext) -> Result<Arc<JwkSet>> {
    let response: FetchResponse = self.fetch.fetch(&self.url, &self.options, ctx)?;

    if response.body.len() > self.options.size_limit {
      return Err(Error::JwkSetParse(format!(
        "document exceeds the size limit of {} bytes",
        self.options.size_limit
      )));
    }

    // Content-type sniffing: accept a declared JSON type, or an undeclared
    // document that looks like a JSON object.
    match response.content_type.as_deref() {
      Some(value) if value.split(';').next().is_some_and(|ty| ty.trim().ends_with("json")) => {}
      Some(value) => return Err(Error::JwkSetParse(format!("unexpected content type `{value}`"))),
      None => {
        if !response.body.iter().skip_while(|byte| byte.is_ascii_whitespace()).take(1).eq([&b'{']) {
          return Err(Error::JwkSetParse("document is not a JSON object".into()));
        }
      }
    }

    serde_json::from_slice(&response.body)
      .map(Arc::new)
      .map_err(|error| Error::JwkSetParse(error.to_string()))
  }

  fn health(&self, _refresh: bool, now: Instant, ctx: &SourceContext) -> Result<Option<SourceHealth>> {
    let success: bool = self.jwk_set(false, now, ctx).is_ok();

    Ok(Some(SourceHealth {
      success,
      timestamp: Instant::now(),
    }))
  }
}
