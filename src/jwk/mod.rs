// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Keys ([JWK](https://tools.ietf.org/html/rfc7517))

mod curve;
mod key;
mod key_operation;
mod key_params;
mod key_set;
mod key_type;
mod key_use;
mod matcher;

pub use self::curve::EcCurve;
pub use self::curve::EcdhCurve;
pub use self::curve::EcxCurve;
pub use self::curve::EdCurve;
pub use self::key::Jwk;
pub use self::key::JwkSpec;
pub use self::key_operation::JwkOperation;
pub use self::key_params::JwkParams;
pub use self::key_params::JwkParamsEc;
pub use self::key_params::JwkParamsOct;
pub use self::key_params::JwkParamsOkp;
pub use self::key_params::JwkParamsRsa;
pub use self::key_set::JwkSet;
pub use self::key_type::JwkType;
pub use self::key_use::JwkUse;
pub use self::matcher::JwkMatcher;
pub use self::matcher::JwkSelector;
