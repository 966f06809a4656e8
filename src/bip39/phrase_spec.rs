//! Bit layout of the five BIP-39 phrase lengths.
//!
//! For an N-word phrase the first N-1 words carry `11 * (N-1)` entropy bits.
//! The last word carries the remaining `extra_bits` of entropy followed by
//! `checksum_bits` of SHA-256 checksum:
//!
//! | words | known | initial | extra | checksum | ENT |
//! |------:|------:|--------:|------:|---------:|----:|
//! |    12 |    11 |     121 |     7 |        4 | 128 |
//! |    15 |    14 |     154 |     6 |        5 | 160 |
//! |    18 |    17 |     187 |     5 |        6 | 192 |
//! |    21 |    20 |     220 |     4 |        7 | 224 |
//! |    24 |    23 |     253 |     3 |        8 | 256 |

/// Bits per word index.
pub const BITS_PER_WORD: usize = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhraseSpec {
  pub known_words: usize,
  pub initial_entropy_bits: usize,
  pub extra_bits: usize,
  pub checksum_bits: usize,
  pub total_words: usize,
}

const fn spec(known_words: usize, extra_bits: usize) -> PhraseSpec {
  let initial_entropy_bits = known_words * BITS_PER_WORD;
  PhraseSpec {
    known_words,
    initial_entropy_bits,
    extra_bits,
    checksum_bits: (initial_entropy_bits + extra_bits) / 32,
    total_words: known_words + 1,
  }
}

/// All supported layouts, ordered by phrase length.
pub const PHRASE_SPECS: [PhraseSpec; 5] = [
  spec(11, 7),
  spec(14, 6),
  spec(17, 5),
  spec(20, 4),
  spec(23, 3),
];

/// Human-readable list of accepted word counts, for error messages.
pub const KNOWN_WORD_COUNTS: &str = "11, 14, 17, 20, or 23";
pub const TOTAL_WORD_COUNTS: &str = "12, 15, 18, 21, or 24";

impl PhraseSpec {
  /// Layout for a partial phrase of `n` words (the last word missing).
  pub fn for_known_words(n: usize) -> Option<&'static PhraseSpec> {
    PHRASE_SPECS.iter().find(|s| s.known_words == n)
  }

  /// Layout for a complete phrase of `n` words.
  pub fn for_total_words(n: usize) -> Option<&'static PhraseSpec> {
    PHRASE_SPECS.iter().find(|s| s.total_words == n)
  }

  /// ENT: total entropy bits including the last word's extra bits.
  pub fn entropy_bits(&self) -> usize {
    self.initial_entropy_bits + self.extra_bits
  }

  pub fn entropy_bytes(&self) -> usize {
    self.entropy_bits() / 8
  }

  /// Number of candidate last words (2^extra_bits).
  pub fn candidates(&self) -> usize {
    1 << self.extra_bits
  }
}
