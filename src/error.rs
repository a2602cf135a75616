//! The Errors that may occur within the crate.

use thiserror::Error;

pub type Result<T, E = crate::Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    // Validation Errors
    #[error("Automaton has no initial state")]
    NoInitialState,
    #[error("Automaton has no final state")]
    NoFinalState,
    #[error("Unknown state: {0}")]
    UnknownState(String),
    #[error("State declared more than once: {0}")]
    DuplicateState(String),
    // Elimination Errors
    #[error("Intermediate regex of length {len} exceeds the limit of {limit}")]
    ResultTooLarge { len: usize, limit: usize },
    // Language check Errors
    #[error("Failed to build DFA {0}")]
    MatcherBuild(#[from] Box<regex_automata::dfa::dense::BuildError>),
    #[error("DFA search failed: {0}")]
    Match(#[from] regex_automata::MatchError),
}

impl Error {
    /// Whether the automaton itself was rejected, as opposed to a failure while
    /// converting or matching a valid one.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoInitialState
                | Self::NoFinalState
                | Self::UnknownState(_)
                | Self::DuplicateState(_)
        )
    }
}

#[cfg(feature = "python-bindings")]
impl From<Error> for pyo3::PyErr {
    fn from(e: Error) -> Self {
        use pyo3::exceptions::{PyRuntimeError, PyValueError};
        use pyo3::PyErr;
        if e.is_validation() {
            PyErr::new::<PyValueError, _>(e.to_string())
        } else {
            PyErr::new::<PyRuntimeError, _>(e.to_string())
        }
    }
}
