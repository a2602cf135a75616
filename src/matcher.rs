//! Checking a derived regex against its automaton.
//!
//! A [`RegexMatcher`] compiles a [`Regex`] into a `regex-automata` dense DFA.
//! Symbols are multi-character strings in general, so each alphabet symbol is
//! first mapped to its own private-use code point; a word over the alphabet
//! then becomes a haystack in which every symbol is exactly one `char`.

use regex_automata::dfa::dense::DFA;
use regex_automata::dfa::{Automaton as _, StartKind};
use regex_automata::{Anchored, Input};
use rustc_hash::FxHashMap as HashMap;

use crate::automaton::Automaton;
use crate::regex::Regex;
use crate::Result;

// start of supplementary private use area-a
const SYMBOL_CODE_POINT_BASE: u32 = 0xF0000;

// never matches anything
const EMPTY_LANGUAGE_PATTERN: &str = r"[^\s\S]";

impl Regex {
    /// Renders this expression in `regex-automata` syntax, writing each symbol
    /// as the char `symbol_char` assigns to it. Symbols without a char can
    /// never match.
    pub fn to_pattern<F>(&self, symbol_char: F) -> String
    where
        F: Fn(&str) -> Option<char>,
    {
        let mut pattern = String::new();
        self.write_pattern(&mut pattern, &symbol_char);
        pattern
    }

    fn write_pattern(&self, out: &mut String, symbol_char: &dyn Fn(&str) -> Option<char>) {
        match self {
            Regex::Empty => out.push_str(EMPTY_LANGUAGE_PATTERN),
            Regex::Epsilon => out.push_str("(?:)"),
            Regex::Symbol(s) => match symbol_char(s) {
                Some(c) => out.push(c),
                None => out.push_str(EMPTY_LANGUAGE_PATTERN),
            },
            Regex::Union(terms) => {
                out.push_str("(?:");
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        out.push('|');
                    }
                    term.write_pattern(out, symbol_char);
                }
                out.push(')');
            }
            Regex::Concat(factors) => {
                out.push_str("(?:");
                for factor in factors {
                    factor.write_pattern(out, symbol_char);
                }
                out.push(')');
            }
            Regex::Star(inner) => {
                out.push_str("(?:");
                inner.write_pattern(out, symbol_char);
                out.push_str(")*");
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegexMatcher {
    dfa: DFA<Vec<u32>>,
    symbol_chars: HashMap<String, char>,
}

impl RegexMatcher {
    pub fn new(regex: &Regex, alphabet: &[String]) -> Result<Self> {
        let symbol_chars: HashMap<String, char> = alphabet
            .iter()
            .enumerate()
            .filter_map(|(i, symbol)| {
                char::from_u32(SYMBOL_CODE_POINT_BASE + i as u32).map(|c| (symbol.clone(), c))
            })
            .collect();
        let pattern = format!(
            "^(?:{})$",
            regex.to_pattern(|symbol| symbol_chars.get(symbol).copied())
        );
        let dfa = DFA::builder()
            .configure(DFA::config().start_kind(StartKind::Anchored))
            .build(&pattern)
            .map_err(Box::new)?;
        Ok(Self { dfa, symbol_chars })
    }

    /// Whether the whole `word` is in the language of the regex.
    pub fn is_match<S: AsRef<str>>(&self, word: &[S]) -> Result<bool> {
        let mut haystack = String::new();
        for symbol in word {
            match self.symbol_chars.get(symbol.as_ref()) {
                Some(&c) => haystack.push(c),
                None => return Ok(false),
            }
        }
        let input = Input::new(&haystack).anchored(Anchored::Yes);
        Ok(self.dfa.try_search_fwd(&input)?.is_some())
    }
}

/// Compares the language of `automaton` with that of `regex` on every word
/// over the automaton's alphabet of length at most `max_len`. Returns the
/// first word on which they disagree.
pub fn equivalent_up_to(
    automaton: &Automaton,
    regex: &Regex,
    max_len: usize,
) -> Result<Option<Vec<String>>> {
    let alphabet = automaton.alphabet();
    let matcher = RegexMatcher::new(regex, alphabet)?;
    for len in 0..=max_len {
        if alphabet.is_empty() && len > 0 {
            break;
        }
        // odometer over alphabet indices
        let mut digits = vec![0usize; len];
        loop {
            let word: Vec<&str> = digits.iter().map(|&d| alphabet[d].as_str()).collect();
            if automaton.accepts(&word) != matcher.is_match(&word)? {
                return Ok(Some(word.into_iter().map(String::from).collect()));
            }
            let mut position = len;
            while position > 0 {
                position -= 1;
                digits[position] += 1;
                if digits[position] < alphabet.len() {
                    break;
                }
                digits[position] = 0;
            }
            if digits.iter().all(|&d| d == 0) {
                break;
            }
        }
    }
    Ok(None)
}
