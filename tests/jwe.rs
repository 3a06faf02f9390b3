// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjwx::error::Error;
use libjwx::error::Result;
use libjwx::jwe::Decoder;
use libjwx::jwe::Encoder;
use libjwx::jwe::JweAlgorithm;
use libjwx::jwe::JweAlgorithm::*;
use libjwx::jwe::JweEncryption;
use libjwx::jwe::JweFormat;
use libjwx::jwe::JweHeader;
use libjwx::jwe::Token;
use libjwx::jwk::Jwk;
use libjwx::jwk::JwkType;

const __RSA: bool = cfg!(not(feature = "test-rsa-enc"));

const CLAIMS: &[u8] = b"libjwx";

fn encryption_key(secret: &Jwk) -> Jwk {
  if secret.kty() == JwkType::Oct {
    secret.clone()
  } else {
    secret.to_public().unwrap()
  }
}

fn roundtrip(algorithm: JweAlgorithm, encryption: JweEncryption) -> Result<()> {
  let header: JweHeader = JweHeader::with_alg_enc(algorithm, encryption);

  let secret: Jwk = Jwk::random((algorithm, encryption))?;
  let public: Jwk = encryption_key(&secret);

  let secret2: Jwk = Jwk::random((algorithm, encryption))?;
  let public2: Jwk = encryption_key(&secret2);

  for format in [JweFormat::Compact, JweFormat::General, JweFormat::Flatten] {
    let encoded: String = Encoder::new()
      .format(format)
      .protected(&header)
      .secret(&secret2)
      .recipient(&public)
      .encode(CLAIMS)?;

    let decoded: Token = Decoder::new(&secret)
      .format(format)
      .public(&public2)
      .decode(encoded.as_bytes())?;

    assert_eq!(decoded.0.alg(), header.alg());
    assert_eq!(decoded.0.enc(), header.enc());
    assert_eq!(decoded.1, CLAIMS);
  }

  Ok(())
}

#[test]
fn test_jwe_roundtrip() {
  for alg in JweAlgorithm::ALL {
    // skip unless opted-in - rsa is SLOWWWW
    if __RSA && matches!(alg, RSA1_5 | RSA_OAEP | RSA_OAEP_256 | RSA_OAEP_384 | RSA_OAEP_512) {
      continue;
    }

    for enc in JweEncryption::ALL {
      // one-pass key wrapping is restricted to the CBC-HMAC encryptions
      if matches!(alg, ECDH_1PU_A128KW | ECDH_1PU_A192KW | ECDH_1PU_A256KW) && !enc.is_cbc_hmac() {
        assert!(roundtrip(*alg, *enc).is_err());
        continue;
      }

      roundtrip(*alg, *enc).unwrap();
    }
  }
}

#[test]
fn test_direct_key_length_is_enforced() {
  let header: JweHeader = JweHeader::with_alg_enc(DIR, JweEncryption::A128CBC_HS256);
  let secret: Jwk = Jwk::random_oct(16).unwrap();

  let error: Error = Encoder::new()
    .protected(&header)
    .recipient(&secret)
    .encode(CLAIMS)
    .unwrap_err();

  assert_eq!(
    error.to_string(),
    "The Content Encryption Key (CEK) length for A128CBC-HS256 must be 256 bits"
  );
}

#[test]
fn test_oaep_with_short_rsa_key_is_rejected() {
  let header: JweHeader = JweHeader::with_alg_enc(RSA_OAEP_512, JweEncryption::A128CBC_HS256);
  let secret: Jwk = Jwk::random_rsa(1024).unwrap();

  let error: Error = Encoder::new()
    .protected(&header)
    .recipient(&secret.to_public().unwrap())
    .encode(CLAIMS)
    .unwrap_err();

  assert_eq!(
    error.to_string(),
    "unsupported algorithm: Key is too short for encryption using OAEPPadding with SHA-512 and MGF1SHA-512"
  );
}

#[test]
fn test_ciphertext_tampering_is_detected() {
  let header: JweHeader = JweHeader::with_alg_enc(A256KW, JweEncryption::A256GCM);
  let secret: Jwk = Jwk::random((A256KW, JweEncryption::A256GCM)).unwrap();

  let encoded: String = Encoder::new().protected(&header).recipient(&secret).encode(CLAIMS).unwrap();

  let mut segments: Vec<String> = encoded.split('.').map(str::to_string).collect();
  let replacement: &str = if segments[3].starts_with('A') { "B" } else { "A" };
  segments[3].replace_range(0..1, replacement);
  let modified: String = segments.join(".");

  let result = Decoder::new(&secret).decode(modified.as_bytes());

  assert!(result.is_err());
}

#[test]
fn test_pbes2_iteration_floor_is_enforced() {
  let mut header: JweHeader = JweHeader::with_alg_enc(PBES2_HS256_A128KW, JweEncryption::A256GCM);
  header.set_p2c(64u64);

  let password: Jwk = Jwk::random_oct(32).unwrap();

  let encoded: String = Encoder::new().protected(&header).recipient(&password).encode(CLAIMS).unwrap();

  let result = Decoder::new(&password).decode(encoded.as_bytes());
  assert!(matches!(result, Err(Error::InvalidParam("p2c"))));

  let decoded: Token = Decoder::new(&password).min_p2c(64).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.1, CLAIMS);
}

#[test]
fn test_compressed_payload_roundtrip() {
  let mut header: JweHeader = JweHeader::with_alg_enc(A128KW, JweEncryption::A128GCM);
  header.set_zip("DEF");

  let secret: Jwk = Jwk::random((A128KW, JweEncryption::A128GCM)).unwrap();
  let claims: Vec<u8> = b"repetitive ".repeat(64);

  let encoded: String = Encoder::new().protected(&header).recipient(&secret).encode(&claims).unwrap();

  let decoded: Token = Decoder::new(&secret).decode(encoded.as_bytes()).unwrap();

  assert_eq!(decoded.1, claims);
}

#[test]
fn test_aad_is_authenticated() {
  let header: JweHeader = JweHeader::with_alg_enc(A128KW, JweEncryption::A128GCM);
  let secret: Jwk = Jwk::random((A128KW, JweEncryption::A128GCM)).unwrap();

  let encoded: String = Encoder::new()
    .format(JweFormat::Flatten)
    .protected(&header)
    .aad(b"shared transcript")
    .recipient(&secret)
    .encode(CLAIMS)
    .unwrap();

  let decoded: Token = Decoder::new(&secret)
    .format(JweFormat::Flatten)
    .decode(encoded.as_bytes())
    .unwrap();
  assert_eq!(decoded.1, CLAIMS);

  // Replacing the aad member invalidates the tag.
  let mut value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
  value["aad"] = serde_json::Value::String("dGFtcGVyZWQ".into());
  let modified: String = value.to_string();

  let result = Decoder::new(&secret).format(JweFormat::Flatten).decode(modified.as_bytes());
  assert!(result.is_err());
}

#[test]
fn test_multi_recipient_general() {
  let mut protected: JweHeader = JweHeader::new();
  protected.set_enc(JweEncryption::A256GCM);

  let mut header1: JweHeader = JweHeader::new();
  header1.set_alg(A128KW);
  header1.set_kid("first");

  let mut header2: JweHeader = JweHeader::new();
  header2.set_alg(A256GCMKW);
  header2.set_kid("second");

  let secret1: Jwk = Jwk::random((A128KW, JweEncryption::A256GCM)).unwrap();
  let secret2: Jwk = Jwk::random((A256GCMKW, JweEncryption::A256GCM)).unwrap();

  let encoded: String = Encoder::new()
    .format(JweFormat::General)
    .protected(&protected)
    .recipient((&secret1, &header1))
    .recipient((&secret2, &header2))
    .encode(CLAIMS)
    .unwrap();

  for secret in [&secret1, &secret2] {
    let decoded: Token = Decoder::new(secret)
      .format(JweFormat::General)
      .decode(encoded.as_bytes())
      .unwrap();

    assert_eq!(decoded.1, CLAIMS);
  }
}

#[test]
fn test_direct_encryption_rejects_multiple_recipients() {
  let header: JweHeader = JweHeader::with_alg_enc(DIR, JweEncryption::A256GCM);
  let secret: Jwk = Jwk::random((DIR, JweEncryption::A256GCM)).unwrap();

  let result = Encoder::new()
    .format(JweFormat::General)
    .protected(&header)
    .recipient(&secret)
    .recipient(&secret)
    .encode(CLAIMS);

  assert!(matches!(result, Err(Error::AlgError(_))));
}

#[test]
fn test_flattened_rejects_recipients_member() {
  let header: JweHeader = JweHeader::with_alg_enc(A128KW, JweEncryption::A128GCM);
  let secret: Jwk = Jwk::random((A128KW, JweEncryption::A128GCM)).unwrap();

  let encoded: String = Encoder::new()
    .format(JweFormat::General)
    .protected(&header)
    .recipient(&secret)
    .encode(CLAIMS)
    .unwrap();

  let result = Decoder::new(&secret).format(JweFormat::Flatten).decode(encoded.as_bytes());

  assert!(matches!(result, Err(Error::InvalidFormat(_))));
}

#[test]
fn test_compact_encrypted_key_is_empty_for_direct() {
  let header: JweHeader = JweHeader::with_alg_enc(DIR, JweEncryption::A256GCM);
  let secret: Jwk = Jwk::random((DIR, JweEncryption::A256GCM)).unwrap();

  let encoded: String = Encoder::new().protected(&header).recipient(&secret).encode(CLAIMS).unwrap();

  let segments: Vec<&str> = encoded.split('.').collect();
  assert_eq!(segments.len(), 5);
  assert!(segments[1].is_empty());
}
