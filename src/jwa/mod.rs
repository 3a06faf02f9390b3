// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Algorithms ([JWA](https://tools.ietf.org/html/rfc7518))
//!
//! The algorithm engines behind the JWS and JWE pipelines: signing and
//! verification, content encryption, key management and the supporting key
//! derivation functions. The algorithm enums in [`jws`](crate::jws) and
//! [`jwe`](crate::jwe) describe *what* is supported; this module implements
//! *how*.

mod agreement;
mod concat_kdf;
mod content;
mod key_mgmt;
mod sign;

pub use self::agreement::diffie_hellman;

pub(crate) use self::content::decrypt_content;
pub(crate) use self::content::encrypt_content;
pub(crate) use self::key_mgmt::decrypt_cek;
pub(crate) use self::key_mgmt::encrypt_cek;
pub(crate) use self::key_mgmt::DeferredKeyWrap;
pub(crate) use self::key_mgmt::EncryptedCek;
pub(crate) use self::sign::sign;
pub(crate) use self::sign::verify;
