// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

#[macro_export]
macro_rules! test_getset {
  ($ty:ty, $get:ident, $set:ident, Url = $value:expr) => {
    let mut object = <$ty>::new();
    assert_eq!(object.$get(), None);
    object.$set(::url::Url::parse($value).unwrap());
    assert_eq!(object.$get().unwrap().as_str(), $value);
  };
  ($ty:ty, $get:ident, $set:ident, Option = $value:expr) => {
    let mut object = <$ty>::new();
    assert_eq!(object.$get(), None);
    object.$set($value);
    assert_eq!(object.$get().unwrap(), $value);
  };
  ($ty:ty, $get:ident, $set:ident, OptionRef = $value:expr) => {
    let mut object = <$ty>::new();
    assert!(object.$get().is_none());
    object.$set($value);
    assert_eq!(object.$get().unwrap(), &$value);
  };
  ($ty:ty, $get:ident, $set:ident, $value:expr) => {
    assert!($value != Default::default());
    let mut object = <$ty>::new();
    assert_eq!(object.$get(), Default::default());
    object.$set($value);
    assert_eq!(object.$get(), $value);
  };
}
