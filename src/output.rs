//! Output formatting for the CLI.
//!
//! Everything here turns engine results into text; nothing here computes.
//! Color is applied through `colored` and honours `NO_COLOR` / non-tty stdout.

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::bip32::{Network, RootKey};
use crate::bip39::{
  encode_indices, BitString, Completion, PhraseCheck, PhraseSpec, UnknownWord, WordIndex,
  Wordlist,
};

#[derive(Tabled)]
struct UnknownRow<'a> {
  #[tabled(rename = "Word #")]
  position: usize,
  #[tabled(rename = "Word")]
  word: &'a str,
  #[tabled(rename = "Status")]
  status: &'static str,
}

#[derive(Tabled)]
struct WordRow<'a> {
  #[tabled(rename = "Word #")]
  position: usize,
  #[tabled(rename = "Word")]
  word: &'a str,
  #[tabled(rename = "Line #")]
  line: usize,
  #[tabled(rename = "Value (Dec)")]
  value: u16,
  #[tabled(rename = "Value (Bin)")]
  bits: BitString,
}

#[derive(Tabled)]
struct CompletionRow<'a> {
  #[tabled(rename = "Extra bits")]
  extra_bits: &'a BitString,
  #[tabled(rename = "Checksum")]
  checksum: &'a BitString,
  #[tabled(rename = "BIP39 Line #")]
  line: usize,
  #[tabled(rename = "Word")]
  word: &'a str,
}

fn render<T: Tabled>(rows: Vec<T>, numeric: Columns<std::ops::Range<usize>>) -> String {
  let mut table = Table::new(rows);
  table
    .with(Style::psql())
    .with(Modify::new(numeric).with(Alignment::right()));
  format!("{table}\n")
}

/// English ordinal: 1st, 2nd, 3rd, 11th, 21st ...
pub fn ordinal(n: usize) -> String {
  let suffix = match (n % 10, n % 100) {
    (_, 11..=13) => "th",
    (1, _) => "st",
    (2, _) => "nd",
    (3, _) => "rd",
    _ => "th",
  };
  format!("{n}{suffix}")
}

pub fn format_unknown_words(words: &[UnknownWord]) -> String {
  let rows: Vec<UnknownRow> = words
    .iter()
    .map(|w| UnknownRow {
      position: w.position,
      word: &w.word,
      status: "Not found in wordlist",
    })
    .collect();
  render(rows, Columns::new(0..1)).as_str().red().to_string()
}

/// The concatenated bits of the known words.
pub fn format_known_bits(bits: &BitString, n_words: usize) -> String {
  format!(
    "{}\n{}\n",
    format!("{}-bits ({} words):", bits.len(), n_words).bold(),
    bits
  )
}

/// One row per word: position, word, 1-based line, decimal and binary index.
pub fn format_word_table(wordlist: &Wordlist, indices: &[WordIndex]) -> String {
  let rows: Vec<WordRow> = indices
    .iter()
    .enumerate()
    .map(|(i, &idx)| WordRow {
      position: i + 1,
      word: wordlist.word(idx),
      line: idx.line(),
      value: idx.value(),
      bits: encode_indices(&[idx]),
    })
    .collect();
  render(rows, Columns::new(2..4))
}

/// The full table of candidate last words, in ascending extra-bits order.
pub fn format_completions(completions: &[Completion<'_>], spec: &PhraseSpec) -> String {
  let rows: Vec<CompletionRow> = completions
    .iter()
    .map(|c| CompletionRow {
      extra_bits: &c.extra_bits,
      checksum: &c.checksum,
      line: c.index.line(),
      word: c.word,
    })
    .collect();
  format!(
    "{}\n{}",
    format!(
      "All possible valid {} words ({} extra bits each):",
      ordinal(spec.total_words),
      spec.extra_bits
    )
    .bold(),
    render(rows, Columns::new(2..3))
  )
}

pub fn format_check_result(check: &PhraseCheck) -> String {
  let total = check.spec.total_words;
  if check.valid {
    format!(
      "{} ({}-word phrase, checksum {})\n",
      "valid".green().bold(),
      total,
      check.expected
    )
  } else {
    format!(
      "{} ({}-word phrase, last word should end in checksum bits {})\n",
      "invalid".red().bold(),
      total,
      check.expected
    )
  }
}

pub fn format_root(seed: &[u8], root: &RootKey, network: Network) -> String {
  format!(
    "{} {}\n{} {}\n{} {}\n{} {}\n",
    "Derived Seed (Hex):".bold(),
    hex::encode(seed),
    "BIP-32 Root Key:".bold(),
    root.xprv.to_base58(network),
    "BIP-32 Root Public Key:".bold(),
    root.xpub().to_base58(network),
    "BIP-32 Root Fingerprint:".bold(),
    hex::encode(root.fingerprint)
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bip39::{check_phrase, complete_phrase, split_phrase};

  fn cells(line: &str) -> Vec<&str> {
    line.split('|').map(str::trim).collect()
  }

  #[test]
  fn ordinals() {
    let got: Vec<String> = [1, 2, 3, 11, 12, 13, 21, 22, 23, 111].map(ordinal).to_vec();
    let want = ["1st", "2nd", "3rd", "11th", "12th", "13th", "21st", "22nd", "23rd", "111th"];
    assert_eq!(got, want);
  }

  #[test]
  fn tables_list_every_row() {
    colored::control::set_override(false);
    let wl = Wordlist::english();
    let phrase = "zoo ".repeat(23);
    let (known, completions) = complete_phrase(&wl, &split_phrase(&phrase)).unwrap();
    let spec = PhraseSpec::for_known_words(23).unwrap();

    let table = format_word_table(&wl, &known);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 2 + 23);
    assert_eq!(cells(lines[0]), ["Word #", "Word", "Line #", "Value (Dec)", "Value (Bin)"]);
    assert_eq!(cells(lines[24]), ["23", "zoo", "2048", "2047", "11111111111"]);

    let comp = format_completions(&completions, spec);
    let lines: Vec<&str> = comp.lines().collect();
    assert_eq!(lines[0], "All possible valid 24th words (3 extra bits each):");
    assert_eq!(lines.len(), 1 + 2 + 8);
    let first = cells(lines[3]);
    assert_eq!(first[0], "000");
    assert_eq!(first[1].len(), 8);
    assert_eq!(first[3], completions[0].word);

    let bits = format_known_bits(&encode_indices(&known), 23);
    assert!(bits.starts_with("253-bits (23 words):\n"));
  }

  #[test]
  fn twenty_one_word_header() {
    colored::control::set_override(false);
    let wl = Wordlist::english();
    let phrase = "abandon ".repeat(20);
    let (_, completions) = complete_phrase(&wl, &split_phrase(&phrase)).unwrap();
    let spec = PhraseSpec::for_known_words(20).unwrap();
    let comp = format_completions(&completions, spec);
    assert!(comp.starts_with("All possible valid 21st words (4 extra bits each):"));
  }

  #[test]
  fn check_result_names_expected_bits() {
    colored::control::set_override(false);
    let wl = Wordlist::english();
    let bad = "abandon ".repeat(12);
    let out = format_check_result(&check_phrase(&wl, &split_phrase(&bad)).unwrap());
    let want = "invalid (12-word phrase, last word should end in checksum bits 0011)\n";
    assert_eq!(out, want);
  }

  #[test]
  fn unknown_words_are_listed() {
    colored::control::set_override(false);
    let out = format_unknown_words(&[UnknownWord {
      position: 3,
      word: "abandn".into(),
    }]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(cells(lines[0]), ["Word #", "Word", "Status"]);
    assert_eq!(cells(lines[2]), ["3", "abandn", "Not found in wordlist"]);
  }
}
