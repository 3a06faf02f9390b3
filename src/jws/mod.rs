// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Signatures ([JWS](https://tools.ietf.org/html/rfc7515))

mod algorithm;
mod charset;
mod decoder;
mod encoder;
mod format;
mod header;
mod recipient;

pub use self::algorithm::JwsAlgorithm;
pub use self::charset::CharSet;
pub use self::decoder::Decoder;
pub use self::decoder::Token;
pub use self::encoder::Encoder;
pub use self::format::JwsFormat;
pub use self::header::JwsHeader;
pub use self::recipient::Recipient;
