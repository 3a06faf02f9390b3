// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crypto::hashes::sha::Sha256;
use crypto::hashes::Digest;

use crate::error::Error;
use crate::error::Result;

/// The Concat KDF (using SHA-256) as defined in Section 5.8.1 of
/// NIST.800-56A.
///
/// `pub_info` is the SuppPubInfo field; SuppPrivInfo is unused by JOSE.
pub(crate) fn concat_kdf(alg: &str, len: usize, z: &[u8], apu: &[u8], apv: &[u8], pub_info: &[u8]) -> Result<Vec<u8>> {
  let mut digest: Sha256 = Sha256::new();
  let mut output: Vec<u8> = Vec::new();

  let target: usize = (len + (Sha256::output_size() - 1)) / Sha256::output_size();
  let rounds: u32 = u32::try_from(target).map_err(|_| Error::InvalidKey("requested key material too large".into()))?;

  for count in 0..rounds {
    // Iteration Count
    digest.update((count + 1).to_be_bytes());

    // Derived Secret
    digest.update(z);

    // AlgorithmId
    digest.update((alg.len() as u32).to_be_bytes());
    digest.update(alg.as_bytes());

    // PartyUInfo
    digest.update((apu.len() as u32).to_be_bytes());
    digest.update(apu);

    // PartyVInfo
    digest.update((apv.len() as u32).to_be_bytes());
    digest.update(apv);

    // SuppPubInfo
    digest.update(pub_info);

    output.extend_from_slice(&digest.finalize_reset());
  }

  output.truncate(len);

  Ok(output)
}

/// Builds the SuppPubInfo field: the key data length in bits as a 32-bit
/// big-endian integer, optionally followed by length-prefixed extra data.
pub(crate) fn supp_pub_info(len: usize, extra: Option<&[u8]>) -> Vec<u8> {
  let mut info: Vec<u8> = Vec::new();
  info.extend_from_slice(&((len * 8) as u32).to_be_bytes());

  if let Some(extra) = extra {
    info.extend_from_slice(&(extra.len() as u32).to_be_bytes());
    info.extend_from_slice(extra);
  }

  info
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jwu::decode_b64;
  use crate::jwu::encode_b64;

  #[test]
  fn test_rfc7518_appendix_c() {
    // https://tools.ietf.org/html/rfc7518#appendix-C
    let z: Vec<u8> = decode_b64("nlbZHYFxNdNyg0KDv4QmdPvBP4mF1bAVvNNDBu6tu5c").unwrap();

    let derived: Vec<u8> = concat_kdf("A128GCM", 16, &z, b"Alice", b"Bob", &supp_pub_info(16, None)).unwrap();

    assert_eq!(encode_b64(derived), "VqqN6vgjbSBcIijNcacQGg");
  }
}
