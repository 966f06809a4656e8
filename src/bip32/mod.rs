//! BIP-32 root (master) keys for secp256k1.
//!
//! Features:
//! - Master key from a 64-byte BIP-39 seed
//! - Root fingerprint (HASH160 of the compressed public key, first 4 bytes)
//! - xprv/xpub Base58Check serialization (mainnet & testnet)
//! - Decoding of root xprv/tprv strings
//!
//! Child derivation is deliberately absent: everything here has depth 0,
//! parent fingerprint 0 and child number 0.

mod error;
mod util;

use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, SecretKey};
use sha2::Sha512;
use tracing::debug;

pub use crate::bip32::error::Bip32Error;
pub use crate::bip32::util::Fingerprint;

type HmacSha512 = Hmac<Sha512>;

/// Seed length produced by BIP-39 and accepted by `derive_root_key`.
pub const SEED_LEN: usize = 64;
/// version(4) + depth(1) + parent fingerprint(4) + child number(4) + chain code(32) + key(33)
pub const PAYLOAD_LEN: usize = 78;

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Network {
  #[default]
  Mainnet,
  Testnet,
}

impl Network {
  fn versions(self) -> (u32, u32) {
    match self {
      // xpub/xprv
      Network::Mainnet => (0x0488_B21E, 0x0488_ADE4),
      // tpub/tprv
      Network::Testnet => (0x0435_87CF, 0x0435_8394),
    }
  }

  fn from_private_version(v: u32) -> Result<Self, Bip32Error> {
    match v {
      0x0488_ADE4 => Ok(Network::Mainnet),
      0x0435_8394 => Ok(Network::Testnet),
      _ => Err(Bip32Error::BadVersion),
    }
  }
}

#[derive(Clone, Debug)]
pub struct ExtendedPrivKey {
  pub depth: u8,
  pub parent_fingerprint: Fingerprint,
  pub child_number: u32,
  pub chain_code: [u8; 32],
  pub secret_key: SecretKey,
}

#[derive(Clone, Debug)]
pub struct ExtendedPubKey {
  pub depth: u8,
  pub parent_fingerprint: Fingerprint,
  pub child_number: u32,
  pub chain_code: [u8; 32],
  pub public_key: PublicKey, // compressed
}

/// Everything derived from a seed at the root of the tree.
#[derive(Clone, Debug)]
pub struct RootKey {
  pub xprv: ExtendedPrivKey,
  pub public_key: PublicKey,
  pub fingerprint: Fingerprint,
}

impl RootKey {
  pub fn xpub(&self) -> ExtendedPubKey {
    self.xprv.to_xpub()
  }

  /// The 33-byte compressed public key.
  pub fn public_key_bytes(&self) -> [u8; 33] {
    util::ser_p(&self.public_key)
  }
}

/// Derive the master key, public key and fingerprint from a 64-byte seed.
///
/// Any other seed length is rejected before hashing. `InvalidMasterKey` means
/// the seed itself is unusable and a different one is required.
pub fn derive_root_key(seed: &[u8]) -> Result<RootKey, Bip32Error> {
  if seed.len() != SEED_LEN {
    return Err(Bip32Error::InvalidSeedLength(seed.len()));
  }
  let xprv = ExtendedPrivKey::master(seed)?;
  let public_key = util::point(&xprv.secret_key);
  let fingerprint = util::fingerprint_from_pub(&public_key);
  debug!(fingerprint = %hex::encode(fingerprint), "derived root key");
  Ok(RootKey {
    xprv,
    public_key,
    fingerprint,
  })
}

/// Parse a hex-encoded 64-byte seed.
pub fn seed_from_hex(s: &str) -> Result<[u8; SEED_LEN], Bip32Error> {
  let bytes = hex::decode(s.trim()).map_err(|e| Bip32Error::SeedHex(e.to_string()))?;
  bytes
    .as_slice()
    .try_into()
    .map_err(|_| Bip32Error::InvalidSeedLength(bytes.len()))
}

/* --------------------- Master key from seed ---------------------- */

impl ExtendedPrivKey {
  /// Create master extended private key from seed (BIP-32).
  /// I = HMAC-SHA512(key="Bitcoin seed", data=seed)
  /// master secret = I_L, master chain code = I_R
  pub(crate) fn master(seed: &[u8]) -> Result<Self, Bip32Error> {
    let mut mac =
      HmacSha512::new_from_slice(MASTER_HMAC_KEY).expect("HMAC can take key of any size");
    mac.update(seed);
    let mut i = [0u8; 64];
    i.copy_from_slice(&mac.finalize().into_bytes());
    Self::from_master_digest(&i)
  }

  fn from_master_digest(i: &[u8; 64]) -> Result<Self, Bip32Error> {
    let mut il = [0u8; 32];
    il.copy_from_slice(&i[..32]);
    let mut ir = [0u8; 32];
    ir.copy_from_slice(&i[32..]);

    // rejects I_L == 0 and I_L >= n
    let sk = SecretKey::from_byte_array(il).map_err(|_| Bip32Error::InvalidMasterKey)?;
    Ok(ExtendedPrivKey {
      depth: 0,
      parent_fingerprint: [0u8; 4],
      child_number: 0,
      chain_code: ir,
      secret_key: sk,
    })
  }

  /// Get the corresponding extended public key.
  pub fn to_xpub(&self) -> ExtendedPubKey {
    let pubkey = util::point(&self.secret_key);
    ExtendedPubKey {
      depth: self.depth,
      parent_fingerprint: self.parent_fingerprint,
      child_number: self.child_number,
      chain_code: self.chain_code,
      public_key: pubkey,
    }
  }

  /// The 78-byte serialization that gets Base58Check-encoded.
  pub fn to_payload(&self, network: Network) -> [u8; PAYLOAD_LEN] {
    let (_xpub, xprv) = network.versions();
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[..4].copy_from_slice(&xprv.to_be_bytes());
    payload[4] = self.depth;
    payload[5..9].copy_from_slice(&self.parent_fingerprint);
    payload[9..13].copy_from_slice(&util::ser32(self.child_number));
    payload[13..45].copy_from_slice(&self.chain_code);
    // key data: 0x00 + ser256(k)
    payload[45] = 0;
    payload[46..78].copy_from_slice(&self.secret_key.secret_bytes());
    payload
  }

  /// Serialize to Base58 (xprv/tprv) for `network`.
  pub fn to_base58(&self, network: Network) -> String {
    bs58::encode(self.to_payload(network)).with_check().into_string()
  }

  /// Decode a root xprv/tprv string.
  pub fn from_base58(s: &str) -> Result<(Self, Network), Bip32Error> {
    let data = bs58::decode(s.trim())
      .with_check(None)
      .into_vec()
      .map_err(|_| Bip32Error::InvalidBase58)?;
    if data.len() != PAYLOAD_LEN {
      return Err(Bip32Error::InvalidBase58);
    }

    let ver = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let network = Network::from_private_version(ver)?;

    let depth = data[4];
    let mut parent_fingerprint = [0u8; 4];
    parent_fingerprint.copy_from_slice(&data[5..9]);
    let child_number = u32::from_be_bytes([data[9], data[10], data[11], data[12]]);
    if depth != 0 || parent_fingerprint != [0, 0, 0, 0] || child_number != 0 {
      return Err(Bip32Error::NotRoot);
    }

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&data[13..45]);

    // key data: 0x00 + 32-byte secret
    if data[45] != 0x00 {
      return Err(Bip32Error::BadKeyData);
    }
    let mut sk_bytes = [0u8; 32];
    sk_bytes.copy_from_slice(&data[46..78]);
    let secret_key = SecretKey::from_byte_array(sk_bytes).map_err(|_| Bip32Error::BadKeyData)?;
    let xprv = ExtendedPrivKey {
      depth,
      parent_fingerprint,
      child_number,
      chain_code,
      secret_key,
    };
    Ok((xprv, network))
  }

  pub fn fingerprint(&self) -> Fingerprint {
    util::fingerprint_from_pub(&util::point(&self.secret_key))
  }
}

impl ExtendedPubKey {
  /// Serialize to Base58 (xpub/tpub) for `network`.
  pub fn to_base58(&self, network: Network) -> String {
    let (xpub, _xprv) = network.versions();
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[..4].copy_from_slice(&xpub.to_be_bytes());
    payload[4] = self.depth;
    payload[5..9].copy_from_slice(&self.parent_fingerprint);
    payload[9..13].copy_from_slice(&util::ser32(self.child_number));
    payload[13..45].copy_from_slice(&self.chain_code);
    payload[45..78].copy_from_slice(&util::ser_p(&self.public_key));

    bs58::encode(payload).with_check().into_string()
  }
}
