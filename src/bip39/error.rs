use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A phrase word that is not in the wordlist, with its 1-based position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownWord {
  pub position: usize,
  pub word: String,
}

impl fmt::Display for UnknownWord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{} {:?}", self.position, self.word)
  }
}

#[derive(Debug, Error)]
pub enum Bip39Error {
  #[error("cannot read wordlist at {}: {source}", .path.display())]
  WordlistNotFound {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  /// Wrong line count or duplicate entries
  #[error("malformed wordlist: {0}")]
  WordlistFormat(String),
  #[error("invalid word count {got} - expected {expected}")]
  WordCount { got: usize, expected: &'static str },
  #[error("{} word(s) not in wordlist: {}", .0.len(), join_unknown(.0))]
  UnknownWords(Vec<UnknownWord>),
  #[error("mnemonic must be a non-empty string")]
  EmptyMnemonic,
  #[error("entropy must be 16, 20, 24, 28, or 32 bytes (got {0})")]
  EntropyLength(usize),
  #[error("failed to gather entropy: {0}")]
  Entropy(String),
}

fn join_unknown(words: &[UnknownWord]) -> String {
  words
    .iter()
    .map(|w| w.to_string())
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_words_lists_every_offender() {
    let err = Bip39Error::UnknownWords(vec![
      UnknownWord { position: 2, word: "abandn".into() },
      UnknownWord { position: 7, word: "zooo".into() },
    ]);
    assert_eq!(
      err.to_string(),
      "2 word(s) not in wordlist: #2 \"abandn\", #7 \"zooo\""
    );
  }
}
