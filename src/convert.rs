//! Converting an epsilon-NFA into a regular expression.

use std::fmt;

use bincode::{Decode, Encode};

use crate::automaton::{Automaton, AutomatonSnapshot};
use crate::epsilon::EpsilonFree;
use crate::equations::EquationSystem;
use crate::regex::Regex;
use crate::trace::{LabeledTransition, TraceRecorder, TraceStep};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    max_regex_len: Option<usize>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap on the rendered length of any intermediate regex. `None` (the
    /// default) lets results grow without bound.
    pub fn max_regex_len(mut self, limit: Option<usize>) -> Self {
        self.max_regex_len = limit;
        self
    }

    pub fn get_max_regex_len(&self) -> Option<usize> {
        self.max_regex_len
    }
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: Config,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config() -> Config {
        Config::new()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Derives the regular expression of the language `automaton` accepts
    /// from its initial state, recording every step into `trace`.
    pub fn convert<T>(&self, automaton: &Automaton, trace: &mut T) -> Result<Regex>
    where
        T: TraceRecorder + ?Sized,
    {
        let epsilon_free = EpsilonFree::new(automaton);
        if trace.is_enabled() {
            record_epsilon_elimination(automaton, &epsilon_free, trace);
        }

        let system = EquationSystem::new(automaton, &epsilon_free)
            .with_max_regex_len(self.config.max_regex_len);
        if trace.is_enabled() {
            for i in 0..system.len() {
                trace.record(TraceStep::Equation(system.equation(i)));
            }
        }

        let initial = automaton.get_initial_state();
        let regex = system.solve(trace)?;
        if trace.is_enabled() {
            trace.record(TraceStep::Solved {
                state: automaton.state_name(initial).to_string(),
                regex: regex.clone(),
            });
        }
        Ok(regex)
    }

    /// Validates `snapshot` and converts it, collecting the full trace.
    pub fn convert_snapshot(&self, snapshot: &AutomatonSnapshot) -> Result<Conversion> {
        let automaton = Automaton::new(snapshot)?;
        let mut trace: Vec<TraceStep> = Vec::new();
        let regex = self.convert(&automaton, &mut trace)?;
        Ok(Conversion { regex, trace })
    }
}

fn record_epsilon_elimination<T>(
    automaton: &Automaton,
    epsilon_free: &EpsilonFree,
    trace: &mut T,
) where
    T: TraceRecorder + ?Sized,
{
    for (state, closure) in automaton.states().iter().zip(epsilon_free.closures()) {
        trace.record(TraceStep::EpsilonClosure {
            state: state.clone(),
            closure: automaton.sorted_names(closure),
        });
    }
    trace.record(TraceStep::EpsilonFreeTransitions(
        epsilon_free
            .transitions()
            .iter()
            .map(|t| LabeledTransition {
                from: automaton.state_name(t.from).to_string(),
                symbol: automaton.symbol_name(t.symbol).to_string(),
                to: automaton.state_name(t.to).to_string(),
            })
            .collect(),
    ));
    trace.record(TraceStep::DerivedFinals(
        automaton.sorted_names(epsilon_free.get_final_states()),
    ));
}

/// A derived regex together with the steps that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Conversion {
    regex: Regex,
    trace: Vec<TraceStep>,
}

impl Conversion {
    pub fn get_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn get_trace(&self) -> &[TraceStep] {
        &self.trace
    }

    pub fn into_parts(self) -> (Regex, Vec<TraceStep>) {
        (self.regex, self.trace)
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.trace {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Converts `snapshot` with the default configuration.
pub fn nfa_to_regex(snapshot: &AutomatonSnapshot) -> Result<Conversion> {
    Converter::new().convert_snapshot(snapshot)
}
