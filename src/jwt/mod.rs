// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Tokens ([JWT](https://tools.ietf.org/html/rfc7519))

mod claims;
mod header;
mod header_set;

pub use self::claims::JwtClaims;
pub use self::header::JwtHeader;
pub use self::header_set::JwtHeaderSet;
