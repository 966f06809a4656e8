//! The 2048-word dictionary mapping words to 11-bit indices.
//!
//! A `Wordlist` is immutable once built and is only ever handed out whole:
//! loading either yields all 2048 words or an error.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::bip39::error::{Bip39Error, UnknownWord};

pub const WORDLIST_LEN: usize = 2048;

const ENGLISH: &str = include_str!("../../bip39wordlist.txt");

/// Position of a word in the wordlist, always in `0..2048`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordIndex(u16);

impl WordIndex {
  pub const MAX: u16 = (WORDLIST_LEN - 1) as u16;

  pub fn new(i: u16) -> Option<Self> {
    (i <= Self::MAX).then_some(WordIndex(i))
  }

  pub fn value(self) -> u16 {
    self.0
  }

  /// 1-based line number in the wordlist file.
  pub fn line(self) -> usize {
    self.0 as usize + 1
  }
}

impl fmt::Display for WordIndex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Clone, Debug)]
pub struct Wordlist {
  words: Vec<String>,
  lookup: HashMap<String, WordIndex>,
}

impl Wordlist {
  /// The standard BIP-39 English list bundled with the crate.
  pub fn english() -> Self {
    Self::parse(ENGLISH).expect("bundled wordlist is well-formed")
  }

  /// Load a wordlist file: one word per line, surrounding whitespace trimmed,
  /// blank lines skipped.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Bip39Error> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Bip39Error::WordlistNotFound {
      path: path.to_path_buf(),
      source,
    })?;
    let wl = Self::parse(&text)?;
    debug!(path = %path.display(), words = wl.len(), "loaded wordlist");
    Ok(wl)
  }

  pub fn parse(text: &str) -> Result<Self, Bip39Error> {
    let words: Vec<String> = text
      .lines()
      .map(str::trim)
      .filter(|l| !l.is_empty())
      .map(String::from)
      .collect();
    if words.len() != WORDLIST_LEN {
      return Err(Bip39Error::WordlistFormat(format!(
        "expected {WORDLIST_LEN} words, found {}",
        words.len()
      )));
    }

    let mut lookup = HashMap::with_capacity(WORDLIST_LEN);
    for (i, w) in words.iter().enumerate() {
      // i < 2048 was checked above
      let idx = WordIndex(i as u16);
      if let Some(prev) = lookup.insert(w.clone(), idx) {
        return Err(Bip39Error::WordlistFormat(format!(
          "duplicate word {w:?} on lines {} and {}",
          prev.line(),
          idx.line()
        )));
      }
    }
    Ok(Wordlist { words, lookup })
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  /// Exact-string lookup. No case folding or prefix matching.
  pub fn index_of(&self, word: &str) -> Option<WordIndex> {
    self.lookup.get(word).copied()
  }

  pub fn word(&self, idx: WordIndex) -> &str {
    &self.words[idx.0 as usize]
  }

  /// Resolve every word of a phrase, collecting all misses rather than
  /// stopping at the first one.
  pub fn indices_of<'a, I>(&self, words: I) -> Result<Vec<WordIndex>, Bip39Error>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let mut found = Vec::new();
    let mut unknown = Vec::new();
    for (i, word) in words.into_iter().enumerate() {
      match self.index_of(word) {
        Some(idx) => found.push(idx),
        None => unknown.push(UnknownWord {
          position: i + 1,
          word: word.to_string(),
        }),
      }
    }
    if unknown.is_empty() {
      Ok(found)
    } else {
      Err(Bip39Error::UnknownWords(unknown))
    }
  }
}
