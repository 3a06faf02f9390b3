// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::jwk::Jwk;
use crate::jwk::JwkOperation;
use crate::jwk::JwkParams;
use crate::jwk::JwkSet;
use crate::jwk::JwkType;
use crate::jwk::JwkUse;
use crate::jwu::decode_b64;

/// A predicate over [`Jwk`]s, assembled from any subset of the matchable
/// properties.
///
/// Properties that express an intent (`use`, `key_ops`, `alg`) also match
/// keys that leave the property unset, mirroring how consumers treat
/// unannotated verification keys. All other properties match exactly.
#[derive(Clone, Debug, Default)]
pub struct JwkMatcher {
  kty: Option<JwkType>,
  use_: Option<JwkUse>,
  operation: Option<JwkOperation>,
  algs: Vec<String>,
  kids: Vec<String>,
  curves: Vec<String>,
  min_key_bits: Option<usize>,
  with_x5c: Option<bool>,
  with_x5t: Option<bool>,
  private: Option<bool>,
}

impl JwkMatcher {
  /// Creates a new matcher that matches every key.
  pub fn new() -> Self {
    Self::default()
  }

  /// Requires a specific key type.
  pub fn kty(mut self, value: JwkType) -> Self {
    self.kty = Some(value);
    self
  }

  /// Requires a compatible public key use.
  pub fn key_use(mut self, value: impl Into<JwkUse>) -> Self {
    self.use_ = Some(value.into());
    self
  }

  /// Requires a compatible key operation.
  pub fn key_operation(mut self, value: impl Into<JwkOperation>) -> Self {
    self.operation = Some(value.into());
    self
  }

  /// Adds an acceptable algorithm.
  pub fn algorithm(mut self, value: impl Into<String>) -> Self {
    self.algs.push(value.into());
    self
  }

  /// Adds an acceptable key ID.
  pub fn key_id(mut self, value: impl Into<String>) -> Self {
    self.kids.push(value.into());
    self
  }

  /// Adds an acceptable curve name.
  pub fn curve(mut self, value: impl Into<String>) -> Self {
    self.curves.push(value.into());
    self
  }

  /// Requires a minimum key size in bits.
  pub fn min_key_bits(mut self, value: usize) -> Self {
    self.min_key_bits = Some(value);
    self
  }

  /// Requires the presence (or absence) of an X.509 certificate chain.
  pub fn with_x5c(mut self, value: bool) -> Self {
    self.with_x5c = Some(value);
    self
  }

  /// Requires the presence (or absence) of an X.509 certificate thumbprint.
  pub fn with_x5t(mut self, value: bool) -> Self {
    self.with_x5t = Some(value);
    self
  }

  /// Requires a private (`true`) or public (`false`) key.
  pub fn private(mut self, value: bool) -> Self {
    self.private = Some(value);
    self
  }

  /// Returns `true` if the given key satisfies every configured property.
  pub fn matches(&self, jwk: &Jwk) -> bool {
    if matches!(self.kty, Some(kty) if kty != jwk.kty()) {
      return false;
    }

    if let Some(use_) = self.use_.as_ref() {
      if matches!(jwk.use_(), Some(value) if value != use_) {
        return false;
      }
    }

    if let Some(operation) = self.operation.as_ref() {
      if matches!(jwk.key_ops(), Some(ops) if !ops.contains(operation)) {
        return false;
      }
    }

    if !self.algs.is_empty() {
      match jwk.alg() {
        Some(alg) if self.algs.iter().any(|value| value == alg) => {}
        Some(_) => return false,
        None => {}
      }
    }

    if !self.kids.is_empty() {
      match jwk.kid() {
        Some(kid) if self.kids.iter().any(|value| value == kid) => {}
        _ => return false,
      }
    }

    if !self.curves.is_empty() {
      let curve: Option<&str> = match jwk.params() {
        Some(JwkParams::Ec(params)) => Some(params.crv.as_str()),
        Some(JwkParams::Okp(params)) => Some(params.crv.as_str()),
        Some(_) | None => None,
      };

      match curve {
        Some(curve) if self.curves.iter().any(|value| value == curve) => {}
        _ => return false,
      }
    }

    if let Some(bits) = self.min_key_bits {
      match key_bits(jwk) {
        Some(value) if value >= bits => {}
        _ => return false,
      }
    }

    if matches!(self.with_x5c, Some(expected) if expected != jwk.x5c().map(|x5c| !x5c.is_empty()).unwrap_or(false)) {
      return false;
    }

    if matches!(self.with_x5t, Some(expected) if expected != jwk.x5t().is_some()) {
      return false;
    }

    if matches!(self.private, Some(expected) if expected != jwk.is_private()) {
      return false;
    }

    true
  }
}

/// Returns the size of the key material in bits, if it can be determined.
fn key_bits(jwk: &Jwk) -> Option<usize> {
  match jwk.params()? {
    JwkParams::Ec(params) => params.try_ec_curve().ok().map(|curve| curve.field_len() * 8),
    JwkParams::Rsa(params) => {
      let n: Vec<u8> = decode_b64(&params.n).ok()?;
      let n: &[u8] = match n.iter().position(|byte| *byte != 0) {
        Some(index) => &n[index..],
        None => return Some(0),
      };
      Some(n.len() * 8 - n[0].leading_zeros() as usize)
    }
    JwkParams::Okp(params) => decode_b64(&params.x).ok().map(|x| x.len() * 8),
    JwkParams::Oct(params) => decode_b64(&params.k).ok().map(|k| k.len() * 8),
  }
}

/// Selects the keys of a [`JwkSet`] matching a [`JwkMatcher`].
#[derive(Clone, Debug, Default)]
pub struct JwkSelector {
  matcher: JwkMatcher,
}

impl JwkSelector {
  /// Creates a new selector from the given matcher.
  pub fn new(matcher: JwkMatcher) -> Self {
    Self { matcher }
  }

  /// Returns a reference to the matcher.
  pub fn matcher(&self) -> &JwkMatcher {
    &self.matcher
  }

  /// Returns the matching keys of the given set, preserving set order.
  pub fn select(&self, set: &JwkSet) -> Vec<Jwk> {
    set.iter().filter(|key| self.matcher.matches(key)).cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwk::EcCurve;

  fn keys() -> JwkSet {
    let mut a: Jwk = Jwk::random_ec(EcCurve::P256).unwrap();
    a.set_kid("a");
    a.set_use(JwkUse::Signature);

    let mut b: Jwk = a.to_public().unwrap();
    b.set_kid("b");

    let mut c: Jwk = Jwk::random_oct(32).unwrap();
    c.set_kid("c");

    [a, b, c].into_iter().collect()
  }

  #[test]
  fn test_matcher_kid() {
    let selected: Vec<Jwk> = JwkSelector::new(JwkMatcher::new().key_id("b")).select(&keys());
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].kid(), Some("b"));
  }

  #[test]
  fn test_matcher_private() {
    let selected: Vec<Jwk> = JwkSelector::new(JwkMatcher::new().private(false)).select(&keys());
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].kid(), Some("b"));
  }

  #[test]
  fn test_matcher_use_matches_unannotated_keys() {
    let selected: Vec<Jwk> = JwkSelector::new(JwkMatcher::new().key_use(JwkUse::Signature)).select(&keys());
    assert_eq!(selected.len(), 3);

    let selected: Vec<Jwk> = JwkSelector::new(JwkMatcher::new().key_use(JwkUse::Encryption)).select(&keys());
    assert_eq!(selected.len(), 2);
  }

  #[test]
  fn test_matcher_min_key_bits() {
    let selected: Vec<Jwk> = JwkSelector::new(JwkMatcher::new().min_key_bits(256)).select(&keys());
    assert_eq!(selected.len(), 3);

    let selected: Vec<Jwk> = JwkSelector::new(JwkMatcher::new().min_key_bits(384)).select(&keys());
    assert!(selected.is_empty());
  }
}
