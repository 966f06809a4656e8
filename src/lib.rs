pub mod bip32;
pub mod bip39;
pub mod error;
pub mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{arg, value_parser, ArgGroup, ArgMatches, Command};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::bip32::Network;
use crate::bip39::{Bip39Error, PhraseSpec, Wordlist};
pub use crate::error::{Error, ErrorKind};

/// Set up stderr logging. `RUST_LOG` wins over the `-v` count.
fn init_logging(verbosity: u8) -> Result<(), Error> {
  let default = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(default))
    .map_err(|e| Error::Logging(e.to_string()))?;
  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(std::io::stderr))
    .try_init()
    .map_err(|e| Error::Logging(e.to_string()))
}

fn load_wordlist(matches: &ArgMatches) -> Result<Wordlist, Error> {
  match matches.get_one::<PathBuf>("wordlist") {
    Some(path) => Ok(Wordlist::from_file(path)?),
    None => {
      info!("using bundled English wordlist");
      Ok(Wordlist::english())
    }
  }
}

/// Words given either as separate arguments or as one quoted phrase.
fn phrase_arg(matches: &ArgMatches) -> String {
  matches
    .get_many::<String>("words")
    .map(|w| w.map(String::as_str).collect::<Vec<_>>().join(" "))
    .unwrap_or_default()
}

/// Mnemonic and passphrase, NFKD-normalized when `--nfkd` is set.
fn mnemonic_args(matches: &ArgMatches, mnemonic: &str) -> (String, String) {
  let passphrase: &String = matches
    .get_one("passphrase")
    .expect("valid empty default passphrase");
  if matches.get_flag("nfkd") {
    (
      bip39::normalize_mnemonic(mnemonic),
      bip39::normalize_passphrase(passphrase),
    )
  } else {
    (mnemonic.to_string(), passphrase.clone())
  }
}

fn network_arg(matches: &ArgMatches) -> Network {
  let network: &String = matches
    .get_one("network")
    .expect("default network should be enforced");
  match network.as_str() {
    "testnet" => Network::Testnet,
    _ => Network::Mainnet,
  }
}

fn run_cmd_complete(wordlist: &Wordlist, matches: &ArgMatches) -> Result<ExitCode, Error> {
  let phrase = phrase_arg(matches);
  let words = bip39::split_phrase(&phrase);
  let (known, completions) = bip39::complete_phrase(wordlist, &words)?;
  let spec = PhraseSpec::for_known_words(known.len()).expect("count checked by complete_phrase");

  print!("{}", output::format_known_bits(&bip39::encode_indices(&known), known.len()));
  println!();
  print!("{}", output::format_word_table(wordlist, &known));
  println!();
  print!("{}", output::format_completions(&completions, spec));
  Ok(ExitCode::SUCCESS)
}

fn run_cmd_check(wordlist: &Wordlist, matches: &ArgMatches) -> Result<ExitCode, Error> {
  let phrase = phrase_arg(matches);
  let words = bip39::split_phrase(&phrase);
  let check = bip39::check_phrase(wordlist, &words)?;
  print!("{}", output::format_check_result(&check));
  Ok(if check.valid {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}

fn run_cmd_bip39_seed_derivation(matches: &ArgMatches) -> Result<ExitCode, Error> {
  let mnemonic: &String = matches
    .get_one("mnemonic")
    .expect("mnemonic should be a required argument");
  let (mnemonic, passphrase) = mnemonic_args(matches, mnemonic);
  let seed = bip39::mnemonic_to_seed(&mnemonic, &passphrase)?;
  println!("{}", hex::encode(seed));
  Ok(ExitCode::SUCCESS)
}

fn run_cmd_new(wordlist: &Wordlist, matches: &ArgMatches) -> Result<ExitCode, Error> {
  let count: usize = *matches
    .get_one("wordcount")
    .expect("word count has a default");
  println!("{}", bip39::generate_mnemonic(wordlist, count)?);
  Ok(ExitCode::SUCCESS)
}

fn run_cmd_bip32_root(matches: &ArgMatches) -> Result<ExitCode, Error> {
  let seed = match (
    matches.get_one::<String>("mnemonic"),
    matches.get_one::<String>("seed"),
  ) {
    (Some(mnemonic), None) => {
      let (mnemonic, passphrase) = mnemonic_args(matches, mnemonic);
      bip39::mnemonic_to_seed(&mnemonic, &passphrase)?
    }
    (None, Some(seed)) => bip32::seed_from_hex(seed)?,
    _ => unreachable!("matches must be mutually-exclusive"),
  };
  let root = bip32::derive_root_key(&seed)?;
  print!("{}", output::format_root(&seed, &root, network_arg(matches)));
  Ok(ExitCode::SUCCESS)
}

fn run_cmd_bip32_inspect(matches: &ArgMatches) -> Result<ExitCode, Error> {
  let xprv: &String = matches.get_one("xprv").expect("xprv should be required");
  let (key, network) = bip32::ExtendedPrivKey::from_base58(xprv)?;
  println!("{} {:?}", "Network:".bold(), network);
  println!("{} {}", "Depth:".bold(), key.depth);
  println!("{} {}", "Chain Code:".bold(), hex::encode(key.chain_code));
  println!("{} {}", "Fingerprint:".bold(), hex::encode(key.fingerprint()));
  Ok(ExitCode::SUCCESS)
}

fn words_arg() -> clap::Arg {
  arg!(<WORDS> ... "Mnemonic words, separately or as one quoted phrase").id("words")
}

fn passphrase_arg() -> clap::Arg {
  arg!(-p --passphrase [PHRASE] "Optional passphrase for additional security").default_value("")
}

fn nfkd_arg() -> clap::Arg {
  arg!(--nfkd "NFKD-normalize mnemonic and passphrase (and collapse whitespace) before hashing")
}

pub fn cli() -> Command {
  Command::new(env!("CARGO_CRATE_NAME"))
    .version(env!("CARGO_PKG_VERSION"))
    .about("BIP-39 last-word completion and checksum checks, BIP-32 root key derivation")
    .arg_required_else_help(true)
    .arg(
      arg!(-w --wordlist <PATH> "Wordlist file, one word per line (default: bundled English)")
        .required(false)
        .env("SEEDCHECK_WORDLIST")
        .global(true)
        .value_parser(value_parser!(PathBuf)),
    )
    .arg(arg!(-v --verbose ... "Increase log verbosity (overridden by RUST_LOG)").global(true))
    .subcommand(
      Command::new("39")
        .about("BIP-39 mnemonic utilities")
        .arg_required_else_help(true)
        .visible_alias("mnemonic")
        .subcommand(
          Command::new("complete")
            .about("List every checksum-valid last word for 11, 14, 17, 20, or 23 words")
            .visible_alias("last-word")
            .arg(words_arg()),
        )
        .subcommand(
          Command::new("check")
            .about("Verify the checksum of a 12, 15, 18, 21, or 24 word mnemonic")
            .arg(words_arg()),
        )
        .subcommand(
          Command::new("seed")
            .about("Derive the 64-byte seed from a mnemonic")
            .arg(arg!(<MNEMONIC> "Mnemonic sentence").id("mnemonic"))
            .arg(passphrase_arg())
            .arg(nfkd_arg()),
        )
        .subcommand(
          Command::new("new")
            .about("Create new random BIP-39 mnemonic")
            .arg(
              arg!([WORD_COUNT] "Number of words in the mnemonic - must be 12, 15, 18, 21, or 24")
                .id("wordcount")
                .value_parser(clap::builder::ValueParser::new(|s: &str| {
                  match s.parse::<usize>() {
                    Ok(n) if PhraseSpec::for_total_words(n).is_some() => Ok(n),
                    Ok(_) => Err("expected 12, 15, 18, 21, or 24"),
                    Err(_) => Err("expected integer (one of 12, 15, 18, 21, or 24)"),
                  }
                }))
                .default_value("12"),
            ),
        ),
    )
    .subcommand(
      Command::new("32")
        .about("BIP-32 root key utilities")
        .arg_required_else_help(true)
        .visible_alias("derive")
        .subcommand(
          Command::new("root")
            .about("Derive the master xprv and root fingerprint from a mnemonic or seed")
            .arg(
              arg!(-m --mnemonic <MNEMONIC> "BIP-39 mnemonic sentence")
                .id("mnemonic")
                .required(false),
            )
            .arg(
              arg!(-s --seed <SEED> "64-byte seed, given as a hexadecimal string")
                .id("seed")
                .required(false),
            )
            .group(
              ArgGroup::new("source")
                .args(["mnemonic", "seed"])
                .required(true),
            )
            .arg(passphrase_arg().conflicts_with("seed"))
            .arg(nfkd_arg().conflicts_with("seed"))
            .arg(
              arg!(-n --network <NETWORK> "network (either mainnet or testnet)")
                .id("network")
                .default_value("mainnet")
                .value_parser(["mainnet", "testnet"]),
            ),
        )
        .subcommand(
          Command::new("inspect")
            .about("Decode a root xprv/tprv and show its fields")
            .arg(arg!(<XPRV> "Base58Check extended private key").id("xprv")),
        ),
    )
}

fn dispatch(matches: &ArgMatches) -> Result<ExitCode, Error> {
  match matches.subcommand() {
    Some(("39", matches)) => match matches.subcommand() {
      Some(("complete", sub)) => run_cmd_complete(&load_wordlist(sub)?, sub),
      Some(("check", sub)) => run_cmd_check(&load_wordlist(sub)?, sub),
      Some(("seed", sub)) => run_cmd_bip39_seed_derivation(sub),
      Some(("new", sub)) => run_cmd_new(&load_wordlist(sub)?, sub),
      _ => unreachable!("unknown command in BIP39 utilities"),
    },
    Some(("32", matches)) => match matches.subcommand() {
      Some(("root", sub)) => run_cmd_bip32_root(sub),
      Some(("inspect", sub)) => run_cmd_bip32_inspect(sub),
      _ => unreachable!("unknown command in BIP32 utilities"),
    },
    _ => unreachable!("top-level subcommand should be required"),
  }
}

fn report(err: &Error) {
  eprintln!("{} {err}", "error:".red().bold());
  if let Error::Bip39(Bip39Error::UnknownWords(words)) = err {
    eprint!("{}", output::format_unknown_words(words));
  }
}

pub fn run() -> ExitCode {
  let matches = cli().get_matches();
  if let Err(e) = init_logging(matches.get_count("verbose")) {
    report(&e);
    return e.kind().exit_code();
  }
  match dispatch(&matches) {
    Ok(code) => code,
    Err(e) => {
      report(&e);
      e.kind().exit_code()
    }
  }
}
