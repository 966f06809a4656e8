//! Minimal BIP-32 helper functions:
//! - point(k):    secret scalar -> EC point (public key) on secp256k1
//! - serP(P):     compressed SEC1 (33 bytes)
//! - ser32(i):    big-endian u32 (4 bytes)
//! - hash160 / fingerprint of a public key

use ripemd::Ripemd160;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

pub type Fingerprint = [u8; 4];

/// point(k): compute K = k * G as a secp256k1 public key.
pub fn point(k: &SecretKey) -> PublicKey {
  let secp = Secp256k1::new();
  PublicKey::from_secret_key(&secp, k)
}

/// serP(P): compressed SEC1 encoding of a public key (33 bytes, 0x02/0x03 + X)
pub fn ser_p(pk: &PublicKey) -> [u8; 33] {
  pk.serialize()
}

/// ser32(i): 4-byte big-endian serialization of a 32-bit integer
pub fn ser32(i: u32) -> [u8; 4] {
  i.to_be_bytes()
}

pub fn hash160(data: &[u8]) -> [u8; 20] {
  let mid = Sha256::digest(data);
  Ripemd160::digest(mid).into()
}

pub fn fingerprint_from_pub(pk: &PublicKey) -> Fingerprint {
  let h160 = hash160(&ser_p(pk));
  [h160[0], h160[1], h160[2], h160[3]]
}

#[cfg(test)]
mod tests {
  use super::*;
  use hex::ToHex;

  fn scalar(k: u8) -> SecretKey {
    let mut sk = [0u8; 32];
    sk[31] = k;
    SecretKey::from_byte_array(sk).unwrap()
  }

  #[test]
  fn test_ser32() {
    assert_eq!(ser32(0xDEAD_BEEF), [0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(ser32(0), [0, 0, 0, 0]);
    assert_eq!(ser32(1), [0, 0, 0, 1]);
  }

  #[test]
  fn generator_point() {
    // Private key = 1 -> G
    let enc = ser_p(&point(&scalar(1)));
    assert_eq!(
      enc.encode_hex::<String>(),
      "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
    );
  }

  #[test]
  fn odd_y_uses_03_prefix() {
    // 6G has an odd y-coordinate
    let enc = ser_p(&point(&scalar(6)));
    assert_eq!(enc[0], 0x03);
  }

  #[test]
  fn fingerprint_of_generator() {
    let fp = fingerprint_from_pub(&point(&scalar(1)));
    // hash160(G) = 751e76e8199196d454941c45d1b3a323f1433bd6
    assert_eq!(fp, [0x75, 0x1e, 0x76, 0xe8]);
  }
}
