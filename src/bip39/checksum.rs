//! BIP-39 checksum engine.
//!
//! The last word of an N-word phrase is `extra_bits || checksum_bits`, where the
//! checksum is the leading bits of SHA-256 over the full entropy
//! (`known words || extra bits`). Given the first N-1 words we try every value
//! of the extra bits and report which dictionary word each one produces.

use std::fmt;

use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::bip39::error::Bip39Error;
use crate::bip39::phrase_spec::{
  PhraseSpec, BITS_PER_WORD, KNOWN_WORD_COUNTS, TOTAL_WORD_COUNTS,
};
use crate::bip39::wordlist::{WordIndex, Wordlist};

/// An ordered, MSB-first sequence of bits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitString {
  bits: Vec<bool>,
}

impl BitString {
  pub fn new() -> Self {
    Self::default()
  }

  /// The low `width` bits of `value`, most significant first.
  pub fn from_uint(value: u64, width: usize) -> Self {
    let mut out = Self::new();
    out.push_uint(value, width);
    out
  }

  /// The first `n` bits of `bytes`.
  pub fn from_bytes_prefix(bytes: &[u8], n: usize) -> Self {
    debug_assert!(n <= bytes.len() * 8);
    let bits = (0..n)
      .map(|i| (bytes[i / 8] >> (7 - i % 8)) & 1 == 1)
      .collect();
    BitString { bits }
  }

  pub fn push_uint(&mut self, value: u64, width: usize) {
    debug_assert!(width <= 64);
    debug_assert!(width == 64 || value >> width == 0);
    for shift in (0..width).rev() {
      self.bits.push((value >> shift) & 1 == 1);
    }
  }

  pub fn extend(&mut self, other: &BitString) {
    self.bits.extend_from_slice(&other.bits);
  }

  pub fn concat(&self, other: &BitString) -> BitString {
    let mut out = self.clone();
    out.extend(other);
    out
  }

  pub fn len(&self) -> usize {
    self.bits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bits.is_empty()
  }

  /// Interpret up to 64 bits as an unsigned big-endian integer.
  pub fn to_uint(&self) -> u64 {
    debug_assert!(self.len() <= 64);
    self.bits.iter().fold(0u64, |acc, &b| (acc << 1) | b as u64)
  }

  /// Pack as a big-endian integer into `ceil(len / 8)` bytes. When the length
  /// is not a multiple of 8 the integer is left-padded with zero bits.
  pub fn to_bytes(&self) -> Vec<u8> {
    let nbytes = self.len().div_ceil(8);
    let pad = nbytes * 8 - self.len();
    let mut out = vec![0u8; nbytes];
    for (i, &b) in self.bits.iter().enumerate() {
      if b {
        let pos = i + pad;
        out[pos / 8] |= 0x80 >> (pos % 8);
      }
    }
    out
  }

  /// Split into consecutive 11-bit word indices. Trailing bits that do not
  /// fill a whole word are ignored.
  pub fn word_indices(&self) -> Vec<WordIndex> {
    self
      .bits
      .chunks_exact(BITS_PER_WORD)
      .map(|c| {
        let v = c.iter().fold(0u16, |acc, &b| (acc << 1) | b as u16);
        WordIndex::new(v).expect("11 bits always fit a word index")
      })
      .collect()
  }

  pub fn slice(&self, start: usize, end: usize) -> BitString {
    BitString {
      bits: self.bits[start..end].to_vec(),
    }
  }
}

impl fmt::Display for BitString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for &b in &self.bits {
      f.write_str(if b { "1" } else { "0" })?;
    }
    Ok(())
  }
}

/* ----------------------------- Engine ----------------------------- */

/// One candidate last word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion<'w> {
  pub extra_bits: BitString,
  pub checksum: BitString,
  pub index: WordIndex,
  pub word: &'w str,
}

/// Concatenate the 11-bit forms of `indices`, preserving order.
pub fn encode_indices(indices: &[WordIndex]) -> BitString {
  let mut out = BitString::new();
  for idx in indices {
    out.push_uint(idx.value() as u64, BITS_PER_WORD);
  }
  out
}

/// First `n_bits` of SHA-256 over the big-endian packing of `entropy`.
pub fn compute_checksum(entropy: &BitString, n_bits: usize) -> BitString {
  debug_assert!(n_bits <= 256);
  let digest = Sha256::digest(entropy.to_bytes());
  BitString::from_bytes_prefix(&digest, n_bits)
}

/// Every checksum-valid last word for a partial phrase, in ascending order of
/// the extra-bits value. Distinct extra bits may map to the same word; no
/// entries are merged.
pub fn enumerate_valid_last_words<'w>(
  wordlist: &'w Wordlist,
  known: &[WordIndex],
  spec: &PhraseSpec,
) -> Result<Vec<Completion<'w>>, Bip39Error> {
  if known.len() != spec.known_words {
    return Err(Bip39Error::WordCount {
      got: known.len(),
      expected: KNOWN_WORD_COUNTS,
    });
  }
  let initial = encode_indices(known);
  let mut out = Vec::with_capacity(spec.candidates());
  for i in 0..spec.candidates() as u64 {
    let extra_bits = BitString::from_uint(i, spec.extra_bits);
    let checksum = compute_checksum(&initial.concat(&extra_bits), spec.checksum_bits);
    let index = extra_bits
      .concat(&checksum)
      .word_indices()
      .pop()
      .expect("extra + checksum bits form one word");
    trace!(extra = %extra_bits, checksum = %checksum, index = index.value(), "candidate");
    out.push(Completion {
      extra_bits,
      checksum,
      index,
      word: wordlist.word(index),
    });
  }
  debug!(
    known_words = spec.known_words,
    candidates = out.len(),
    "enumerated last words"
  );
  Ok(out)
}

/// Whether the checksum embedded in the last word matches the entropy.
pub fn validate(full: &[WordIndex], spec: &PhraseSpec) -> Result<bool, Bip39Error> {
  Ok(expected_last_checksum(full, spec)? == last_word_checksum(full, spec))
}

/// The checksum the last word would need, given its own extra bits.
pub fn expected_last_checksum(
  full: &[WordIndex],
  spec: &PhraseSpec,
) -> Result<BitString, Bip39Error> {
  if full.len() != spec.total_words {
    return Err(Bip39Error::WordCount {
      got: full.len(),
      expected: TOTAL_WORD_COUNTS,
    });
  }
  let bits = encode_indices(full);
  let entropy = bits.slice(0, spec.entropy_bits());
  Ok(compute_checksum(&entropy, spec.checksum_bits))
}

fn last_word_checksum(full: &[WordIndex], spec: &PhraseSpec) -> BitString {
  let last = full[full.len() - 1].value() as u64;
  BitString::from_uint(last, BITS_PER_WORD).slice(spec.extra_bits, BITS_PER_WORD)
}

/* ------------------------- Phrase-level API ------------------------ */

/// Split a phrase on whitespace.
pub fn split_phrase(phrase: &str) -> Vec<&str> {
  phrase.split_whitespace().collect()
}

/// Candidate last words for a phrase missing its final word.
///
/// The word count is checked before any lookup happens.
pub fn complete_phrase<'w>(
  wordlist: &'w Wordlist,
  words: &[&str],
) -> Result<(Vec<WordIndex>, Vec<Completion<'w>>), Bip39Error> {
  let spec = PhraseSpec::for_known_words(words.len()).ok_or(Bip39Error::WordCount {
    got: words.len(),
    expected: KNOWN_WORD_COUNTS,
  })?;
  let known = wordlist.indices_of(words.iter().copied())?;
  let completions = enumerate_valid_last_words(wordlist, &known, spec)?;
  Ok((known, completions))
}

/// Outcome of checking a complete phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhraseCheck {
  pub valid: bool,
  /// Checksum bits the last word must carry.
  pub expected: BitString,
  pub spec: &'static PhraseSpec,
}

/// Check a complete phrase's checksum.
pub fn check_phrase(wordlist: &Wordlist, words: &[&str]) -> Result<PhraseCheck, Bip39Error> {
  let spec = PhraseSpec::for_total_words(words.len()).ok_or(Bip39Error::WordCount {
    got: words.len(),
    expected: TOTAL_WORD_COUNTS,
  })?;
  let full = wordlist.indices_of(words.iter().copied())?;
  let expected = expected_last_checksum(&full, spec)?;
  Ok(PhraseCheck {
    valid: expected == last_word_checksum(&full, spec),
    expected,
    spec,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn idx(v: u16) -> WordIndex {
    WordIndex::new(v).unwrap()
  }

  fn abandons(n: usize) -> Vec<WordIndex> {
    vec![idx(0); n]
  }

  #[test]
  fn encode_indices_is_order_preserving() {
    let bits = encode_indices(&[idx(1), idx(2047), idx(1024)]);
    assert_eq!(
      bits.to_string(),
      "00000000001".to_owned() + "11111111111" + "10000000000"
    );
    let rev = encode_indices(&[idx(1024), idx(2047), idx(1)]);
    assert_ne!(bits, rev);
  }

  #[test]
  fn to_bytes_left_pads() {
    // 0b101 -> one byte 0x05
    assert_eq!(BitString::from_uint(0b101, 3).to_bytes(), vec![0x05]);
    // 9 bits 1_0000_0001 -> 0x01 0x01
    assert_eq!(BitString::from_uint(0x101, 9).to_bytes(), vec![0x01, 0x01]);
    assert_eq!(BitString::from_uint(0xABCD, 16).to_bytes(), vec![0xAB, 0xCD]);
    assert!(BitString::new().to_bytes().is_empty());
  }

  #[test]
  fn checksum_is_digest_prefix() {
    let entropy = BitString::from_bytes_prefix(&[0u8; 16], 128);
    let digest = Sha256::digest([0u8; 16]);
    // sha256(16 zero bytes) = 374708ff...
    assert_eq!(digest[0], 0x37);
    assert_eq!(compute_checksum(&entropy, 4).to_string(), "0011");
    assert_eq!(compute_checksum(&entropy, 8).to_string(), "00110111");
  }

  #[test]
  fn twelve_word_completions_of_all_abandon() {
    let wl = Wordlist::english();
    let spec = PhraseSpec::for_known_words(11).unwrap();
    let out = enumerate_valid_last_words(&wl, &abandons(11), spec).unwrap();
    assert_eq!(out.len(), 128);
    assert_eq!(out[0].extra_bits.to_string(), "0000000");
    assert_eq!(out[0].checksum.to_string(), "0011");
    assert_eq!(out[0].index, idx(3));
    assert_eq!(out[0].word, "about");
    assert_eq!(out[1].word, "actual");
    assert_eq!(out[2].word, "age");
    assert_eq!(out[3].word, "alpha");
    assert_eq!(out[127].extra_bits.to_string(), "1111111");
    assert_eq!(out[127].checksum.to_string(), "0000");
    assert_eq!(out[127].word, "wrap");
  }

  #[test]
  fn twenty_four_word_completions_of_all_abandon() {
    let wl = Wordlist::english();
    let spec = PhraseSpec::for_known_words(23).unwrap();
    let out = enumerate_valid_last_words(&wl, &abandons(23), spec).unwrap();
    let words: Vec<&str> = out.iter().map(|c| c.word).collect();
    assert_eq!(
      words,
      vec!["art", "diesel", "false", "kite", "organ", "ready", "surface", "trouble"]
    );
    assert_eq!(out[0].checksum.to_string(), "01100110");
    assert_eq!(out[0].index.line(), 103);
  }

  #[test]
  fn twenty_three_words_plus_zero_extra_matches_sha256() {
    let wl = Wordlist::english();
    let words = split_phrase(
      "legal winner thank year wave sausage worth useful legal winner thank year \
       wave sausage worth useful legal winner thank year wave sausage worth",
    );
    let known = wl.indices_of(words.iter().copied()).unwrap();
    let mut entropy = encode_indices(&known);
    assert_eq!(entropy.len(), 253);
    entropy.extend(&BitString::from_uint(0, 3));
    let packed = entropy.to_bytes();
    assert_eq!(packed.len(), 32);
    let digest = Sha256::digest(&packed);
    assert_eq!(
      compute_checksum(&entropy, 8),
      BitString::from_bytes_prefix(&digest, 8)
    );
  }

  #[test]
  fn extra_bits_cover_every_value_once() {
    let wl = Wordlist::english();
    for spec in crate::bip39::phrase_spec::PHRASE_SPECS.iter() {
      let known: Vec<WordIndex> = (0..spec.known_words as u16)
        .map(|i| idx(i * 89 % 2048))
        .collect();
      let out = enumerate_valid_last_words(&wl, &known, spec).unwrap();
      assert_eq!(out.len(), spec.candidates());
      for (i, c) in out.iter().enumerate() {
        assert_eq!(c.extra_bits.to_uint(), i as u64);
        assert_eq!(c.extra_bits.len(), spec.extra_bits);
        assert_eq!(c.checksum.len(), spec.checksum_bits);
        assert_eq!(c.index.value() as u64 >> spec.checksum_bits, i as u64);
      }
    }
  }

  #[test]
  fn enumeration_rejects_mismatched_length() {
    let wl = Wordlist::english();
    let spec = PhraseSpec::for_known_words(11).unwrap();
    assert!(matches!(
      enumerate_valid_last_words(&wl, &abandons(10), spec),
      Err(Bip39Error::WordCount { got: 10, .. })
    ));
  }

  #[test]
  fn validate_known_phrases() {
    let wl = Wordlist::english();
    let good = [
      "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
      "legal winner thank year wave sausage worth useful legal winner thank yellow",
      "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo when",
      "void come effort suffer camp survey warrior heavy shoot primary clutch crush open amazing screen patrol group space point ten exist slush involve unfold",
    ];
    for p in good {
      assert!(check_phrase(&wl, &split_phrase(p)).unwrap().valid, "{p}");
    }
    let bad = "abandon ".repeat(12);
    let check = check_phrase(&wl, &split_phrase(&bad)).unwrap();
    assert!(!check.valid);
    assert_eq!(check.spec.total_words, 12);
    // same entropy as "... abandon about", whose last word ends in 0011
    assert_eq!(check.expected.to_string(), "0011");
  }

  #[test]
  fn every_completion_validates() {
    let wl = Wordlist::english();
    let spec = PhraseSpec::for_known_words(14).unwrap();
    let known: Vec<WordIndex> = (0..14).map(|i| idx(i * 131 + 7)).collect();
    for c in enumerate_valid_last_words(&wl, &known, spec).unwrap() {
      let mut full = known.clone();
      full.push(c.index);
      let full_spec = PhraseSpec::for_total_words(15).unwrap();
      assert!(validate(&full, full_spec).unwrap());
      // flipping the lowest checksum bit breaks it
      full[14] = idx(c.index.value() ^ 1);
      assert!(!validate(&full, full_spec).unwrap());
    }
  }

  #[test]
  fn bad_word_count_rejected_before_lookup() {
    let wl = Wordlist::english();
    // 13 bogus words: the count error wins over lookup errors
    let words = vec!["nope"; 13];
    assert!(matches!(
      complete_phrase(&wl, &words),
      Err(Bip39Error::WordCount { got: 13, .. })
    ));
    assert!(matches!(
      check_phrase(&wl, &words),
      Err(Bip39Error::WordCount { got: 13, .. })
    ));
  }

  #[test]
  fn complete_phrase_reports_unknown_words() {
    let wl = Wordlist::english();
    let mut words = vec!["abandon"; 11];
    words[3] = "abandn";
    match complete_phrase(&wl, &words) {
      Err(Bip39Error::UnknownWords(u)) => {
        assert_eq!(u.len(), 1);
        assert_eq!(u[0].position, 4);
      }
      other => panic!("expected UnknownWords, got {other:?}"),
    }
  }
}
