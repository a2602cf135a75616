//! Step records emitted while converting an automaton.
//!
//! The conversion never writes to a global log. Each stage hands a
//! [`TraceStep`] to a caller-owned [`TraceRecorder`]; the caller decides
//! whether to keep, render or drop them. `Vec<TraceStep>` collects every step,
//! `()` discards them.

use std::fmt;

use bincode::{Decode, Encode};

use crate::regex::{Regex, EMPTY_SET_STR};

pub trait TraceRecorder {
    fn record(&mut self, step: TraceStep);

    /// Recorders that discard steps return `false` so that callers can skip
    /// building them.
    fn is_enabled(&self) -> bool {
        true
    }
}

impl TraceRecorder for Vec<TraceStep> {
    fn record(&mut self, step: TraceStep) {
        self.push(step);
    }
}

impl TraceRecorder for () {
    fn record(&mut self, _step: TraceStep) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct LabeledTransition {
    pub from: String,
    pub symbol: String,
    pub to: String,
}

impl fmt::Display for LabeledTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.symbol, self.to)
    }
}

/// One state's equation `X_state = Σ coefficient·X_target ∪ constant`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Equation {
    pub state: String,
    /// `(coefficient, target state)` for every non-empty coefficient.
    pub terms: Vec<(Regex, String)>,
    pub constant: Regex,
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X_{} = ", self.state)?;
        let mut first = true;
        for (coefficient, target) in &self.terms {
            if !first {
                f.write_str(" + ")?;
            }
            first = false;
            if coefficient.is_union() {
                write!(f, "({})X_{}", coefficient, target)?;
            } else {
                write!(f, "{}X_{}", coefficient, target)?;
            }
        }
        if !self.constant.is_empty() {
            if !first {
                f.write_str(" + ")?;
            }
            first = false;
            write!(f, "{}", self.constant)?;
        }
        if first {
            f.write_str(EMPTY_SET_STR)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum TraceStep {
    EpsilonClosure {
        state: String,
        closure: Vec<String>,
    },
    EpsilonFreeTransitions(Vec<LabeledTransition>),
    DerivedFinals(Vec<String>),
    /// A state's equation before any elimination.
    Equation(Equation),
    /// Arden's lemma applied to a non-empty self-loop.
    Arden {
        state: String,
        coefficient: Regex,
        star: Regex,
    },
    /// The eliminated state's equation once its self-loop is gone.
    Normalized(Equation),
    /// The eliminated state substituted into another equation.
    Substituted {
        eliminated: String,
        coefficient: Regex,
        equation: Equation,
    },
    Solved {
        state: String,
        regex: Regex,
    },
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceStep::EpsilonClosure { state, closure } => {
                write!(f, "ε-closure({}) = {{{}}}", state, closure.join(", "))
            }
            TraceStep::EpsilonFreeTransitions(transitions) => {
                f.write_str("Epsilon-free transitions:")?;
                for t in transitions {
                    write!(f, "\n  {}", t)?;
                }
                Ok(())
            }
            TraceStep::DerivedFinals(finals) => {
                write!(f, "Derived final states: {{{}}}", finals.join(", "))
            }
            TraceStep::Equation(equation) => write!(f, "{}", equation),
            TraceStep::Arden {
                state,
                coefficient,
                star,
            } => write!(
                f,
                "[Arden on X_{}] X = {}X + B  =>  X = {}B",
                state, coefficient, star
            ),
            TraceStep::Normalized(equation) => {
                write!(f, "Normalized equation of X_{}: {}", equation.state, equation)
            }
            TraceStep::Substituted {
                eliminated,
                coefficient,
                equation,
            } => write!(
                f,
                "  Substitute X_{} into X_{} with coefficient {}\n  => {}",
                eliminated, equation.state, coefficient, equation
            ),
            TraceStep::Solved { state, regex } => {
                write!(f, "Regex(initial state {}) = {}", state, regex)
            }
        }
    }
}
