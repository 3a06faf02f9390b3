// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use libjwx::error::Error;
use libjwx::error::Result;
use libjwx::jwk::Jwk;
use libjwx::jwk::JwkSet;
use libjwx::jws::Decoder;
use libjwx::jws::Encoder;
use libjwx::jws::JwsAlgorithm;
use libjwx::jws::JwsHeader;
use libjwx::jwks::CachingJwkSetSource;
use libjwx::jwks::FetchOptions;
use libjwx::jwks::FetchResponse;
use libjwx::jwks::JwkSetBasedJwkSource;
use libjwx::jwks::JwkSetSource;
use libjwx::jwks::JwsVerificationKeySelector;
use libjwx::jwks::OutageTolerantJwkSetSource;
use libjwx::jwks::RateLimitOptions;
use libjwx::jwks::RateLimitedJwkSetSource;
use libjwx::jwks::SourceContext;
use libjwx::jwks::SourceEvent;
use libjwx::jwks::SourceEventListener;
use libjwx::jwks::UrlJwkSetSource;
use url::Url;

fn remote_keys() -> (JwkSet, Jwk) {
  let mut secret: Jwk = Jwk::random(JwsAlgorithm::ES256).unwrap();
  secret.set_kid("rotation-1");

  let mut public: Jwk = secret.to_public().unwrap();
  public.set_kid("rotation-1");
  public.set_use("sig");

  ([public].into_iter().collect(), secret)
}

fn jwks_url() -> Url {
  Url::parse("https://issuer.example/.well-known/jwks.json").unwrap()
}

#[test]
fn test_remote_verification_pipeline() {
  let (set, secret) = remote_keys();
  let document: Vec<u8> = serde_json::to_vec(&set).unwrap();

  let calls: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
  let counter: Arc<AtomicUsize> = Arc::clone(&calls);

  let fetch = move |_url: &Url, _options: &FetchOptions, _ctx: &SourceContext| -> Result<FetchResponse> {
    counter.fetch_add(1, Ordering::SeqCst);

    Ok(FetchResponse {
      content_type: Some("application/jwk-set+json".into()),
      body: document.clone(),
    })
  };

  let source = JwkSetBasedJwkSource::new(OutageTolerantJwkSetSource::new(
    CachingJwkSetSource::new(
      RateLimitedJwkSetSource::new(UrlJwkSetSource::new(jwks_url(), fetch), RateLimitOptions::default()),
      Duration::from_secs(300),
    ),
    Duration::from_secs(600),
  ));

  let selector = JwsVerificationKeySelector::new([JwsAlgorithm::ES256], source);

  // Sign a token with the rotated-in key.
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(JwsAlgorithm::ES256);
  header.set_kid("rotation-1");

  let encoded: String = Encoder::new().recipient((&secret, &header)).encode(b"claims").unwrap();

  // Resolve candidates from the remote set and verify.
  let ctx: SourceContext = SourceContext::new();
  let candidates: Vec<Jwk> = selector.select(&header, &ctx).unwrap();
  assert_eq!(candidates.len(), 1);

  let verified: bool = candidates
    .iter()
    .any(|key| Decoder::new(key).decode(encoded.as_bytes()).is_ok());
  assert!(verified);

  // A second resolution is served from the cache.
  let _ = selector.select(&header, &ctx).unwrap();
  assert_eq!(calls.load(Ordering::SeqCst), 1);

  // An unknown key ID triggers one forced refresh, then reports empty.
  let mut unknown: JwsHeader = JwsHeader::new();
  unknown.set_alg(JwsAlgorithm::ES256);
  unknown.set_kid("rotation-2");

  let candidates: Vec<Jwk> = selector.select(&unknown, &ctx).unwrap();
  assert!(candidates.is_empty());
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_url_source_rejects_unexpected_content_type() {
  let fetch = |_url: &Url, _options: &FetchOptions, _ctx: &SourceContext| -> Result<FetchResponse> {
    Ok(FetchResponse {
      content_type: Some("text/html".into()),
      body: b"<html></html>".to_vec(),
    })
  };

  let source = UrlJwkSetSource::new(jwks_url(), fetch);
  let result = source.jwk_set(false, Instant::now(), &SourceContext::new());

  assert!(matches!(result, Err(Error::JwkSetParse(_))));
}

#[test]
fn test_url_source_sniffs_undeclared_documents() {
  let (set, _) = remote_keys();
  let document: Vec<u8> = serde_json::to_vec(&set).unwrap();

  let fetch = move |_url: &Url, _options: &FetchOptions, _ctx: &SourceContext| -> Result<FetchResponse> {
    Ok(FetchResponse {
      content_type: None,
      body: document.clone(),
    })
  };

  let source = UrlJwkSetSource::new(jwks_url(), fetch);
  let set = source.jwk_set(false, Instant::now(), &SourceContext::new()).unwrap();

  assert_eq!(set.len(), 1);
}

#[test]
fn test_url_source_enforces_size_limit() {
  let fetch = |_url: &Url, _options: &FetchOptions, _ctx: &SourceContext| -> Result<FetchResponse> {
    Ok(FetchResponse {
      content_type: None,
      body: vec![b'{'; 1024],
    })
  };

  let source = UrlJwkSetSource::new(jwks_url(), fetch).options(FetchOptions {
    size_limit: 256,
    ..FetchOptions::default()
  });

  let result = source.jwk_set(false, Instant::now(), &SourceContext::new());

  assert!(matches!(result, Err(Error::JwkSetParse(_))));
}

#[test]
fn test_outage_event_is_delivered() {
  let (set, _) = remote_keys();
  let document: Vec<u8> = serde_json::to_vec(&set).unwrap();

  let calls: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
  let counter: Arc<AtomicUsize> = Arc::clone(&calls);

  // The first retrieval succeeds, everything afterwards is an outage.
  let fetch = move |_url: &Url, _options: &FetchOptions, _ctx: &SourceContext| -> Result<FetchResponse> {
    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
      Ok(FetchResponse {
        content_type: None,
        body: document.clone(),
      })
    } else {
      Err(Error::JwkSetUnavailable("connection refused".into()))
    }
  };

  let events: Arc<Mutex<Vec<SourceEvent>>> = Arc::new(Mutex::new(Vec::new()));
  let sink: Arc<Mutex<Vec<SourceEvent>>> = Arc::clone(&events);

  let listener: Arc<dyn SourceEventListener> = Arc::new(move |event: SourceEvent| {
    sink.lock().unwrap().push(event);
  });

  let source = OutageTolerantJwkSetSource::new(UrlJwkSetSource::new(jwks_url(), fetch), Duration::from_secs(60))
    .with_listener(listener);

  let ctx: SourceContext = SourceContext::new();
  let start: Instant = Instant::now();

  source.jwk_set(false, start, &ctx).unwrap();

  // Served from the last known set; an outage event carries the remaining
  // tolerance window.
  source.jwk_set(false, start + Duration::from_secs(30), &ctx).unwrap();

  let events = events.lock().unwrap();
  assert_eq!(events.len(), 1);
  assert!(matches!(
    events[0],
    SourceEvent::Outage { remaining } if remaining <= Duration::from_secs(30)
  ));
}

#[test]
fn test_health_reflects_latest_outcome() {
  let calls: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
  let counter: Arc<AtomicUsize> = Arc::clone(&calls);

  let fetch = move |_url: &Url, _options: &FetchOptions, _ctx: &SourceContext| -> Result<FetchResponse> {
    counter.fetch_add(1, Ordering::SeqCst);
    Err(Error::JwkSetUnavailable("connection refused".into()))
  };

  let source = CachingJwkSetSource::new(UrlJwkSetSource::new(jwks_url(), fetch), Duration::from_secs(300));

  let ctx: SourceContext = SourceContext::new();

  // No retrieval has happened yet.
  assert!(source.health(false, Instant::now(), &ctx).unwrap().is_none());

  // A refreshing health check performs a retrieval and reports the failure.
  let health = source.health(true, Instant::now(), &ctx).unwrap().unwrap();
  assert!(!health.success);
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}
