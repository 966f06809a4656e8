//! BIP-39: mnemonic checksums, last-word completion and seed derivation.
//!
//! Seed = PBKDF2-HMAC-SHA512(password=mnemonic, salt="mnemonic" + passphrase, c=2048, dkLen=64)
//!
//! Notes:
//! - `mnemonic_to_seed` hashes exactly the bytes it is given. Callers that want
//!   BIP-39's NFKD form should pass their input through `normalize_mnemonic` /
//!   `normalize_passphrase` first.
//! - The checksum engine works on word indices and never sees the seed pipeline.

pub mod checksum;
pub mod error;
pub mod phrase_spec;
pub mod wordlist;

use sha2::{Digest, Sha256, Sha512};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

pub use checksum::{
  check_phrase, complete_phrase, compute_checksum, encode_indices, enumerate_valid_last_words,
  split_phrase, validate, BitString, Completion, PhraseCheck,
};
pub use error::{Bip39Error, UnknownWord};
pub use phrase_spec::{PhraseSpec, PHRASE_SPECS};
pub use wordlist::{WordIndex, Wordlist};

pub const PBKDF2_ROUNDS: u32 = 2048;
pub const SEED_LEN: usize = 64;

/// Normalize the mnemonic per BIP-39:
/// - NFKD normalization
/// - collapse all Unicode whitespace to single ASCII spaces
pub fn normalize_mnemonic(mnemonic: &str) -> String {
  mnemonic
    .nfkd()
    .collect::<String>()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

/// NFKD for the passphrase (no whitespace collapsing)
pub fn normalize_passphrase(passphrase: &str) -> String {
  passphrase.nfkd().collect::<String>()
}

/// Derive the 64-byte seed from a mnemonic and optional passphrase.
///
/// `passphrase` may be empty (""). The mnemonic is neither validated against a
/// wordlist nor normalized; only the empty string is rejected.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> Result<[u8; SEED_LEN], Bip39Error> {
  if mnemonic.is_empty() {
    return Err(Bip39Error::EmptyMnemonic);
  }
  let mut salt = Vec::with_capacity(8 + passphrase.len());
  salt.extend_from_slice(b"mnemonic");
  salt.extend_from_slice(passphrase.as_bytes());

  let mut seed = [0u8; SEED_LEN];
  pbkdf2::pbkdf2_hmac::<Sha512>(mnemonic.as_bytes(), &salt, PBKDF2_ROUNDS, &mut seed);
  Ok(seed)
}

/// Encode raw entropy (16, 20, 24, 28 or 32 bytes) as a mnemonic sentence.
pub fn entropy_to_mnemonic(wordlist: &Wordlist, entropy: &[u8]) -> Result<String, Bip39Error> {
  let spec = PHRASE_SPECS
    .iter()
    .find(|s| s.entropy_bytes() == entropy.len())
    .ok_or(Bip39Error::EntropyLength(entropy.len()))?;

  let mut stream = BitString::from_bytes_prefix(entropy, spec.entropy_bits());
  let hash = Sha256::digest(entropy);
  stream.extend(&BitString::from_bytes_prefix(&hash, spec.checksum_bits));

  let words: Vec<&str> = stream
    .word_indices()
    .into_iter()
    .map(|idx| wordlist.word(idx))
    .collect();
  debug_assert_eq!(words.len(), spec.total_words);
  Ok(words.join(" "))
}

/// Generate a random mnemonic sentence with a given length.
/// The length must be 12, 15, 18, 21, or 24 words.
pub fn generate_mnemonic(wordlist: &Wordlist, ms_length: usize) -> Result<String, Bip39Error> {
  let spec = PhraseSpec::for_total_words(ms_length).ok_or(Bip39Error::WordCount {
    got: ms_length,
    expected: phrase_spec::TOTAL_WORD_COUNTS,
  })?;
  let mut entropy = vec![0u8; spec.entropy_bytes()];
  getrandom::fill(&mut entropy).map_err(|e| Bip39Error::Entropy(e.to_string()))?;
  debug!(words = ms_length, "generated random mnemonic");
  entropy_to_mnemonic(wordlist, &entropy)
}

/* ----------------------------- Tests ----------------------------- */
