// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::iter::FromIterator;
use core::ops::Deref;
use serde::Deserialize;
use serde::Serialize;

use crate::jwk::Jwk;
use crate::jwu::Object;

/// A set of JSON Web Keys.
///
/// [More Info](https://tools.ietf.org/html/rfc7517#section-5)
///
/// Keys keep their document order; lookups are linear scans since sets are
/// small in practice. Unknown top-level members are preserved on
/// round-trip.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct JwkSet {
  /// The keys in the set.
  keys: Vec<Jwk>,
  /// Additional top-level members of the key set document.
  #[serde(flatten)]
  properties: Object,
}

impl JwkSet {
  /// Creates a new, empty `JwkSet`.
  pub fn new() -> Self {
    Self {
      keys: Vec::new(),
      properties: Object::new(),
    }
  }

  /// Returns the total number of keys in the set.
  pub fn len(&self) -> usize {
    self.keys.len()
  }

  /// Returns `true` if the set contains no keys.
  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }

  /// Returns a slice of all keys in the set.
  pub fn as_slice(&self) -> &[Jwk] {
    &self.keys
  }

  /// Returns an iterator over the keys in the set.
  pub fn iter(&self) -> core::slice::Iter<'_, Jwk> {
    self.keys.iter()
  }

  /// Returns all keys in the set with a matching key ID.
  pub fn get(&self, kid: &str) -> Vec<&Jwk> {
    self.keys.iter().filter(|key| matches!(key.kid(), Some(value) if value == kid)).collect()
  }

  /// Adds a new key to the set.
  pub fn add(&mut self, key: impl Into<Jwk>) {
    self.keys.push(key.into());
  }

  /// Removes the key at position `index`, returning `true` if it existed.
  pub fn del(&mut self, index: usize) -> bool {
    if index < self.keys.len() {
      self.keys.remove(index);
      true
    } else {
      false
    }
  }

  /// Returns a reference to the additional top-level members.
  pub fn properties(&self) -> &Object {
    &self.properties
  }
}

impl Deref for JwkSet {
  type Target = [Jwk];

  fn deref(&self) -> &Self::Target {
    &self.keys
  }
}

impl FromIterator<Jwk> for JwkSet {
  fn from_iter<I: IntoIterator<Item = Jwk>>(iter: I) -> Self {
    Self {
      keys: Vec::from_iter(iter),
      properties: Object::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unknown_members_are_preserved() {
    let json: &str = r#"{"keys":[],"issuer":"https://example.com"}"#;

    let set: JwkSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.properties()["issuer"], "https://example.com");

    let value: serde_json::Value = serde_json::to_value(&set).unwrap();
    assert_eq!(value["issuer"], "https://example.com");
  }

  #[test]
  fn test_lookup_by_key_id() {
    let mut key: Jwk = Jwk::random_oct(32).unwrap();
    key.set_kid("a");

    let mut set: JwkSet = JwkSet::new();
    set.add(key);

    assert_eq!(set.get("a").len(), 1);
    assert!(set.get("b").is_empty());
    assert_eq!(set.len(), 1);
  }
}
