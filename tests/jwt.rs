// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjwx::jwk::Jwk;
use libjwx::jws::Decoder;
use libjwx::jws::Encoder;
use libjwx::jws::JwsAlgorithm;
use libjwx::jws::JwsHeader;
use libjwx::jwt::JwtClaims;

#[test]
fn test_audience_accepts_string_and_list() {
  let claims: JwtClaims = serde_json::from_str(r#"{"aud":"solo"}"#).unwrap();
  assert_eq!(claims.aud().unwrap(), vec!["solo"]);

  let claims: JwtClaims = serde_json::from_str(r#"{"aud":["a","b"]}"#).unwrap();
  assert_eq!(claims.aud().unwrap(), vec!["a", "b"]);
}

#[test]
fn test_custom_claims_roundtrip() {
  let mut claims: JwtClaims<serde_json::Value> = JwtClaims::new();
  claims.set_iss("issuer");
  claims.set_custom(serde_json::json!({"num": 42u64}));

  let json: String = serde_json::to_string(&claims).unwrap();
  let recovered: JwtClaims<serde_json::Value> = serde_json::from_str(&json).unwrap();

  assert_eq!(claims, recovered);
  assert_eq!(recovered.custom().unwrap()["num"], 42);
}

#[test]
fn test_signed_claims_roundtrip() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(JwsAlgorithm::EdDSA);
  header.set_typ("JWT");
  header.set_kid("did:example:123#signing-key");

  let mut claims: JwtClaims = JwtClaims::new();
  claims.set_iss("issuer");
  claims.set_sub("subject");
  claims.set_aud(["audience"]);
  claims.set_iat(1_300_819_380);

  let payload: Vec<u8> = serde_json::to_vec(&claims).unwrap();

  let secret: Jwk = Jwk::random(JwsAlgorithm::EdDSA).unwrap();
  let public: Jwk = secret.to_public().unwrap();

  let encoded: String = Encoder::new().recipient((&secret, &header)).encode(&payload).unwrap();
  let decoded = Decoder::new(&public).decode(encoded.as_bytes()).unwrap();

  let recovered: JwtClaims = serde_json::from_slice(&decoded.claims).unwrap();

  assert_eq!(decoded.protected.unwrap().typ(), Some("JWT"));
  assert_eq!(claims, recovered);
}

#[test]
fn test_claims_set_must_be_json() {
  // A signed JWT carries a JSON claims set; arbitrary bytes are a JWS but
  // fail claim extraction.
  let result: Result<JwtClaims, _> = serde_json::from_slice(b"not json");
  assert!(result.is_err());
}
