//! # nfa_regex
//!
//! `nfa_regex` crate derives a regular expression from an epsilon-NFA by
//! eliminating epsilon transitions and then solving the automaton's regex
//! equations with Arden's lemma.

pub mod automaton;
pub mod convert;
pub mod epsilon;
pub mod equations;
pub mod error;
pub mod matcher;
pub mod regex;
pub mod trace;

mod proptests;

pub use automaton::{Automaton, AutomatonSnapshot, StateId, SymbolId, EPSILON, EPSILON_LABEL};
pub use convert::{nfa_to_regex, Config, Conversion, Converter};
pub use error::{Error, Result};
pub use regex::Regex;
pub use trace::{Equation, TraceRecorder, TraceStep};

#[cfg(feature = "python-bindings")]
mod python_bindings;
