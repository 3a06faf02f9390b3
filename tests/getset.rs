// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjwx::jwe::JweAlgorithm;
use libjwx::jwe::JweCompression;
use libjwx::jwe::JweEncryption;
use libjwx::jwe::JweHeader;
use libjwx::jwk::Jwk;
use libjwx::jwk::JwkOperation;
use libjwx::jwk::JwkType;
use libjwx::jwk::JwkUse;
use libjwx::jws::JwsAlgorithm;
use libjwx::jws::JwsHeader;
use libjwx::jwt::JwtClaims;
use libjwx::jwu::encode_b64;

#[macro_use]
mod macros;

#[test]
#[rustfmt::skip]
fn test_jwe_header_getset() {
  test_getset!(JweHeader, alg, set_alg, Option = JweAlgorithm::ECDH_ES_A256KW);
  test_getset!(JweHeader, enc, set_enc, Option = JweEncryption::A256CBC_HS512);
  test_getset!(JweHeader, zip, set_zip, OptionRef = JweCompression::Deflate);
  test_getset!(JweHeader, jku, set_jku, Url = "https://foo.com/jku");
  test_getset!(JweHeader, jwk, set_jwk, OptionRef = Jwk::new());
  test_getset!(JweHeader, kid, set_kid, Option = "key id");
  test_getset!(JweHeader, x5u, set_x5u, Url = "https://foo.com/x509");
  test_getset!(JweHeader, x5t, set_x5t, Option = encode_b64(vec![1, 2, 3, 4]));
  test_getset!(JweHeader, x5t_s256, set_x5t_s256, Option = encode_b64(vec![1, 2, 3, 4]));
  test_getset!(JweHeader, typ, set_typ, Option = "type");
  test_getset!(JweHeader, cty, set_cty, Option = "content type");
  test_getset!(JweHeader, epk, set_epk, OptionRef = Jwk::new());
  test_getset!(JweHeader, apu, set_apu, Option = "agreement partyuinfo");
  test_getset!(JweHeader, apv, set_apv, Option = "agreement partyvinfo");
  test_getset!(JweHeader, iv, set_iv, Option = "initialization vector");
  test_getset!(JweHeader, tag, set_tag, Option = "authentication tag");
  test_getset!(JweHeader, p2s, set_p2s, Option = "pbes2 salt input");
  test_getset!(JweHeader, p2c, set_p2c, Option = 123456789u64);
  test_getset!(JweHeader, skid, set_skid, Option = "sender key id");
}

#[test]
#[rustfmt::skip]
fn test_jws_header_getset() {
  test_getset!(JwsHeader, alg, set_alg, Option = JwsAlgorithm::EdDSA);
  test_getset!(JwsHeader, jku, set_jku, Url = "https://foo.com/");
  test_getset!(JwsHeader, jwk, set_jwk, OptionRef = Jwk::new());
  test_getset!(JwsHeader, kid, set_kid, Option = "key id");
  test_getset!(JwsHeader, x5u, set_x5u, Url = "https://foo.com/");
  test_getset!(JwsHeader, x5t, set_x5t, Option = encode_b64(vec![1, 2, 3, 4]));
  test_getset!(JwsHeader, x5t_s256, set_x5t_s256, Option = encode_b64(vec![1, 2, 3, 4]));
  test_getset!(JwsHeader, typ, set_typ, Option = "type");
  test_getset!(JwsHeader, cty, set_cty, Option = "content type");
  test_getset!(JwsHeader, b64, set_b64, Option = false);
  test_getset!(JwsHeader, url, set_url, Url = "https://foo.com/url");
  test_getset!(JwsHeader, nonce, set_nonce, Option = encode_b64(vec![1, 2, 3, 4]));
  test_getset!(JwsHeader, ppt, set_ppt, Option = "passport");
}

#[test]
#[rustfmt::skip]
fn test_jwk_getset() {
  test_getset!(Jwk, kty, set_kty, JwkType::Ec);
  test_getset!(Jwk, use_, set_use, OptionRef = JwkUse::Signature);
  test_getset!(Jwk, alg, set_alg, Option = "algorithm");
  test_getset!(Jwk, kid, set_kid, Option = "key id");
  test_getset!(Jwk, x5u, set_x5u, Url = "https://foo.com/");
  test_getset!(Jwk, x5t, set_x5t, Option = encode_b64(vec![1, 2, 3, 4]));
  test_getset!(Jwk, x5t_s256, set_x5t_s256, Option = encode_b64(vec![1, 2, 3, 4]));
  test_getset!(Jwk, exp, set_exp, Option = 123456789i64);
  test_getset!(Jwk, nbf, set_nbf, Option = 123456789i64);
  test_getset!(Jwk, iat, set_iat, Option = 123456789i64);
}

#[test]
fn test_jwk_getset_key_ops() {
  let mut jwk: Jwk = Jwk::new();
  assert!(jwk.key_ops().is_none());
  jwk.set_key_ops([JwkOperation::Sign, JwkOperation::Verify]);
  assert_eq!(jwk.key_ops().unwrap(), &[JwkOperation::Sign, JwkOperation::Verify]);
}

#[test]
#[rustfmt::skip]
fn test_jwt_claims_getset() {
  test_getset!(JwtClaims, iss, set_iss, Option = "issuer");
  test_getset!(JwtClaims, sub, set_sub, Option = "subject");
  test_getset!(JwtClaims, aud, set_aud, Option = vec!["audience"]);
  test_getset!(JwtClaims, exp, set_exp, Option = 123456789i64);
  test_getset!(JwtClaims, nbf, set_nbf, Option = 123456789i64);
  test_getset!(JwtClaims, iat, set_iat, Option = 123456789i64);
  test_getset!(JwtClaims, jti, set_jti, Option = "jwt id");
}
