// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjwx::jwa::diffie_hellman;
use libjwx::jwe::JweHeader;
use libjwx::jwk::EcCurve;
use libjwx::jwk::Jwk;
use libjwx::jwk::JwkSet;
use libjwx::jws;
use libjwx::jws::JwsHeader;
use libjwx::jwu::encode_b64;
use serde_json::Value;

#[test]
fn test_rfc7515() {
  struct TestVector {
    header: &'static str,
    claims: &'static [u8],
    encoded: &'static [u8],
    private_key: &'static str,
  }

  static TVS: &[TestVector] = &include!("fixtures/rfc7515.rs");

  for tv in TVS {
    let header: JwsHeader = serde_json::from_str(tv.header).unwrap();
    let jwk: Jwk = serde_json::from_str(tv.private_key).unwrap();

    let decoded: jws::Token<'_> = jws::Decoder::new(&jwk).decode(tv.encoded).unwrap();

    assert_eq!(decoded.protected.unwrap(), header);
    assert_eq!(&*decoded.claims, tv.claims);

    // Our own serialization of the same inputs verifies as well.
    let encoded: String = jws::Encoder::new().recipient((&jwk, &header)).encode(tv.claims).unwrap();
    let decoded: jws::Token<'_> = jws::Decoder::new(&jwk).decode(encoded.as_bytes()).unwrap();

    assert_eq!(&*decoded.claims, tv.claims);
  }
}

#[test]
fn test_rfc7517() {
  // https://tools.ietf.org/html/rfc7517#appendix-A.1
  static JSON: &str = r#"
    {
      "keys": [
        {
          "kty": "EC",
          "crv": "P-256",
          "x": "MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
          "y": "4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM",
          "use": "enc",
          "kid": "1"
        },
        {
          "kty": "RSA",
          "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
          "e": "AQAB",
          "alg": "RS256",
          "kid": "2011-04-29"
        }
      ]
    }
  "#;

  let value: Value = serde_json::from_str(JSON).unwrap();
  let jwks: JwkSet = serde_json::from_str(JSON).unwrap();

  for (index, jwk) in jwks.iter().enumerate() {
    let ser: Value = serde_json::to_value(jwk).unwrap();
    assert_eq!(ser, value["keys"][index]);
  }
}

#[test]
fn test_rfc7518() {
  // https://tools.ietf.org/html/rfc7518#appendix-C
  static ALICE: &str = r#"
    {
      "kty": "EC",
      "crv": "P-256",
      "x": "gI0GAILBdu7T53akrFmMyGcsF3n5dO7MmwNBHKW5SV0",
      "y": "SLW_xSffzlPWrHEVI30DHM_4egVwt3NQqeUD7nMFpps",
      "d": "0_NxaRPUMQoAJt50Gz8YiTr8gRTwyEaCumd-MToTmIo"
    }
  "#;

  static BOB: &str = r#"
    {
      "kty": "EC",
      "crv": "P-256",
      "x": "weNJy2HscCSM6AEDTDg04biOvhFhyyWvOHQfeF_PxMQ",
      "y": "e8lnCO-AlStT-NJVX-crhB7QRYhiix03illJOVAOyck",
      "d": "VEmDZpDXXK8p8N0Cndsxs924q6nS1RXFASRl6BfUqdw"
    }
  "#;

  static HEADER: &str = r#"
    {
      "alg": "ECDH-ES",
      "enc": "A128GCM",
      "apu": "QWxpY2U",
      "apv": "Qm9i",
      "epk": {
        "kty": "EC",
        "crv": "P-256",
        "x": "gI0GAILBdu7T53akrFmMyGcsF3n5dO7MmwNBHKW5SV0",
        "y": "SLW_xSffzlPWrHEVI30DHM_4egVwt3NQqeUD7nMFpps"
      }
    }
  "#;

  let alice: Jwk = serde_json::from_str(ALICE).unwrap();
  let bob: Jwk = serde_json::from_str(BOB).unwrap();

  let header: JweHeader = serde_json::from_str(HEADER).unwrap();
  assert_eq!(header.apu().unwrap(), encode_b64(b"Alice"));
  assert_eq!(header.apv().unwrap(), encode_b64(b"Bob"));
  assert_eq!(header.epk().unwrap(), &alice.to_public().unwrap());

  // Both parties arrive at the shared secret of the appendix.
  let z: Vec<u8> = diffie_hellman(EcCurve::P256, &bob.to_public().unwrap(), &alice).unwrap();
  assert_eq!(encode_b64(&z), "nlbZHYFxNdNyg0KDv4QmdPvBP4mF1bAVvNNDBu6tu5c");

  let z: Vec<u8> = diffie_hellman(EcCurve::P256, &alice.to_public().unwrap(), &bob).unwrap();
  assert_eq!(encode_b64(&z), "nlbZHYFxNdNyg0KDv4QmdPvBP4mF1bAVvNNDBu6tu5c");
}

#[test]
fn test_rfc7638() {
  struct TestVector {
    jwk_json: &'static str,
    thumbprint_b64: &'static str,
  }

  static TVS: &[TestVector] = &include!("fixtures/rfc7638.rs");

  for tv in TVS {
    let key: Jwk = serde_json::from_str(tv.jwk_json).unwrap();
    let kid: String = key.thumbprint_b64().unwrap();

    assert_eq!(kid, tv.thumbprint_b64);
  }
}

#[test]
fn test_rfc7797() {
  struct TestVector {
    detach: bool,
    header: &'static [u8],
    encoded: &'static [u8],
    payload: &'static [u8],
    public_key: &'static str,
  }

  static TVS: &[TestVector] = &include!("fixtures/rfc7797.rs");

  for tv in TVS {
    let header: JwsHeader = serde_json::from_slice(tv.header).unwrap();
    let jwk: Jwk = serde_json::from_str(tv.public_key).unwrap();

    let mut decoder: jws::Decoder<'_, '_> = jws::Decoder::new(&jwk).critical("b64");

    if tv.detach {
      decoder = decoder.payload(tv.payload);
    }

    let decoded: jws::Token<'_> = decoder.decode(tv.encoded).unwrap();

    assert_eq!(decoded.protected.unwrap(), header);

    if tv.detach {
      assert!(decoded.claims.is_empty());
    } else {
      assert_eq!(&*decoded.claims, tv.payload);
    }
  }
}

#[test]
fn test_rfc8037_ed25519() {
  struct TestVector {
    private_jwk: &'static str,
    public_jwk: &'static str,
    thumbprint_b64: &'static str,
    header: &'static str,
    payload: &'static str,
    encoded: &'static str,
  }

  static TVS: &[TestVector] = &include!("fixtures/rfc8037_ed25519.rs");

  for tv in TVS {
    let secret: Jwk = serde_json::from_str(tv.private_jwk).unwrap();
    let public: Jwk = serde_json::from_str(tv.public_jwk).unwrap();

    assert_eq!(secret.thumbprint_b64().unwrap(), tv.thumbprint_b64);
    assert_eq!(public.thumbprint_b64().unwrap(), tv.thumbprint_b64);

    let header: JwsHeader = serde_json::from_str(tv.header).unwrap();

    // Ed25519 signatures are deterministic; the serialization matches the
    // appendix byte for byte.
    let encoded: String = jws::Encoder::new()
      .recipient((&secret, &header))
      .encode(tv.payload.as_bytes())
      .unwrap();

    assert_eq!(encoded, tv.encoded);

    let decoded: jws::Token<'_> = jws::Decoder::new(&public).decode(encoded.as_bytes()).unwrap();

    assert_eq!(decoded.protected.unwrap(), header);
    assert_eq!(&*decoded.claims, tv.payload.as_bytes());
  }
}
