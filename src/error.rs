use std::process::ExitCode;

use thiserror::Error;

use crate::bip32::Bip32Error;
use crate::bip39::Bip39Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Bip39(#[from] Bip39Error),
  #[error(transparent)]
  Bip32(#[from] Bip32Error),
  #[error("logging setup failed: {0}")]
  Logging(String),
}

/// Coarse classification used for reporting and exit codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  /// Wrong word count, empty mnemonic, malformed seed or key string
  InputValidation,
  /// One or more words missing from the wordlist
  LookupFailure,
  /// Wordlist missing or malformed
  ResourceFailure,
  /// Seed produced an out-of-range master key
  CryptographicDegenerate,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::Bip39(e) => match e {
        Bip39Error::WordlistNotFound { .. } | Bip39Error::WordlistFormat(_) => {
          ErrorKind::ResourceFailure
        }
        Bip39Error::UnknownWords(_) => ErrorKind::LookupFailure,
        Bip39Error::Entropy(_) => ErrorKind::ResourceFailure,
        Bip39Error::WordCount { .. } | Bip39Error::EmptyMnemonic | Bip39Error::EntropyLength(_) => {
          ErrorKind::InputValidation
        }
      },
      Error::Bip32(e) => match e {
        Bip32Error::InvalidMasterKey => ErrorKind::CryptographicDegenerate,
        _ => ErrorKind::InputValidation,
      },
      Error::Logging(_) => ErrorKind::ResourceFailure,
    }
  }
}

impl ErrorKind {
  pub fn exit_code(self) -> ExitCode {
    match self {
      ErrorKind::InputValidation => ExitCode::from(2),
      ErrorKind::LookupFailure => ExitCode::from(3),
      ErrorKind::ResourceFailure => ExitCode::from(4),
      ErrorKind::CryptographicDegenerate => ExitCode::from(5),
    }
  }
}
