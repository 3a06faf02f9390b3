// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

/// Serde helper for claims that accept a single string or a list of strings
/// ([RFC 7519, section 4.1.3](https://tools.ietf.org/html/rfc7519#section-4.1.3)).
pub(crate) mod string_or_seq {
  use serde::Deserialize;
  use serde::Deserializer;
  use serde::Serialize;
  use serde::Serializer;

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum StringOrSeq {
    One(String),
    Many(Vec<String>),
  }

  pub(crate) fn serialize<S>(value: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match value {
      Some(values) => values.serialize(serializer),
      None => serializer.serialize_none(),
    }
  }

  pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
  where
    D: Deserializer<'de>,
  {
    match StringOrSeq::deserialize(deserializer)? {
      StringOrSeq::One(value) => Ok(Some(vec![value])),
      StringOrSeq::Many(values) => Ok(Some(values)),
    }
  }
}
