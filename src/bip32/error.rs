use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Bip32Error {
  /// Seeds handed to root derivation must be exactly 64 bytes
  #[error("seed must be 64 bytes (got {0})")]
  InvalidSeedLength(usize),
  #[error("seed is not valid hex: {0}")]
  SeedHex(String),
  /// I_L is zero or >= the curve order; the seed must be regenerated
  #[error("seed produced an invalid master key (I_L out of range) - derive again from a different seed")]
  InvalidMasterKey,
  /// Base58Check decode failed or payload malformed
  #[error("base58check decode failed or payload malformed")]
  InvalidBase58,
  #[error("bad version prefix - must be xprv/tprv")]
  BadVersion,
  #[error("key data field malformed - wrong length or invalid private key bytes")]
  BadKeyData,
  /// Only master keys are handled here
  #[error("not a root key - depth, parent fingerprint and child number must all be zero")]
  NotRoot,
}
