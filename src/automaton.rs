//! The validated, index-based epsilon-NFA the conversion works on.
//!
//! Callers describe an automaton with an [`AutomatonSnapshot`] using their
//! own string ids for states and symbols. [`Automaton::new`] validates the
//! snapshot and lays the states out in an arena indexed `0..n` in declared
//! order; every later stage works on these plain indices.

use std::fmt;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::{Error, Result};

// define type alias for state-id and symbol-id
pub type StateId = u32;
pub type SymbolId = u32;

/// Symbol id of an epsilon (empty) transition. Never part of the alphabet.
pub const EPSILON: SymbolId = u32::MAX;

/// Label a snapshot uses for an epsilon transition.
pub const EPSILON_LABEL: &str = "ε";

#[inline]
pub fn is_epsilon(symbol: SymbolId) -> bool {
    symbol == EPSILON
}

/// Whether an edge label is one of the spellings of epsilon an editor accepts.
pub fn is_epsilon_alias(label: &str) -> bool {
    let lowered = label.trim().to_lowercase();
    matches!(lowered.as_str(), "ε" | "e" | "eps" | "epsilon" | "lambda" | "λ")
}

/// Splits a comma separated edge label into its symbols, mapping every
/// epsilon alias to [`EPSILON_LABEL`] and dropping empty and repeated entries.
pub fn parse_labels(label: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for part in label.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let symbol = if is_epsilon_alias(part) {
            EPSILON_LABEL.to_string()
        } else {
            part.to_string()
        };
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

/// Automaton description as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomatonSnapshot {
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub initial: Option<String>,
    pub finals: Vec<String>,
    /// `(from, symbol, to)`; `symbol` may be [`EPSILON_LABEL`].
    pub transitions: Vec<(String, String, String)>,
}

impl AutomatonSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, id: impl Into<String>) -> Self {
        self.states.push(id.into());
        self
    }

    pub fn states<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.alphabet.push(symbol.into());
        self
    }

    /// Adds the symbols of a comma separated alphabet field, e.g. `"a, b"`.
    pub fn alphabet_str(mut self, alphabet: &str) -> Self {
        self.alphabet.extend(
            alphabet
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty() && *s != EPSILON_LABEL)
                .map(String::from),
        );
        self
    }

    pub fn initial(mut self, id: impl Into<String>) -> Self {
        self.initial = Some(id.into());
        self
    }

    pub fn final_state(mut self, id: impl Into<String>) -> Self {
        self.finals.push(id.into());
        self
    }

    pub fn transition(
        mut self,
        from: impl Into<String>,
        symbol: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.transitions.push((from.into(), symbol.into(), to.into()));
        self
    }

    /// Adds one transition per symbol of an edge label such as `"a,b,eps"`.
    /// Symbols already present on the same edge are merged.
    pub fn edge(mut self, from: &str, to: &str, label: &str) -> Self {
        for symbol in parse_labels(label) {
            let transition = (from.to_string(), symbol, to.to_string());
            if !self.transitions.contains(&transition) {
                self.transitions.push(transition);
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: StateId,
    pub symbol: SymbolId,
    pub to: StateId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Vec<String>,
    state_index: HashMap<String, StateId>,
    alphabet: Vec<String>,
    symbol_index: HashMap<String, SymbolId>,
    transitions: Vec<Transition>,
    outgoing: Vec<Vec<(SymbolId, StateId)>>,
    initial_state: StateId,
    final_states: HashSet<StateId>,
}

impl Automaton {
    pub fn new(snapshot: &AutomatonSnapshot) -> Result<Self> {
        let initial_id = snapshot.initial.as_deref().ok_or(Error::NoInitialState)?;
        if snapshot.finals.is_empty() {
            return Err(Error::NoFinalState);
        }

        let mut state_index: HashMap<String, StateId> = HashMap::default();
        for (index, id) in snapshot.states.iter().enumerate() {
            if state_index.insert(id.clone(), index as StateId).is_some() {
                return Err(Error::DuplicateState(id.clone()));
            }
        }
        let lookup = |id: &str| -> Result<StateId> {
            state_index
                .get(id)
                .copied()
                .ok_or_else(|| Error::UnknownState(id.to_string()))
        };
        let initial_state = lookup(initial_id)?;
        let final_states = snapshot
            .finals
            .iter()
            .map(|id| lookup(id.as_str()))
            .collect::<Result<HashSet<StateId>>>()?;

        // configured symbols first, then symbols in order of first use
        let mut alphabet: Vec<String> = Vec::new();
        let mut symbol_index: HashMap<String, SymbolId> = HashMap::default();
        for symbol in &snapshot.alphabet {
            if symbol != EPSILON_LABEL {
                intern(&mut alphabet, &mut symbol_index, symbol);
            }
        }

        let mut transitions = Vec::with_capacity(snapshot.transitions.len());
        let mut outgoing = vec![Vec::new(); snapshot.states.len()];
        for (from, symbol, to) in &snapshot.transitions {
            let from = lookup(from.as_str())?;
            let to = lookup(to.as_str())?;
            let symbol = if symbol == EPSILON_LABEL {
                EPSILON
            } else {
                intern(&mut alphabet, &mut symbol_index, symbol)
            };
            transitions.push(Transition { from, symbol, to });
            outgoing[from as usize].push((symbol, to));
        }

        Ok(Self {
            states: snapshot.states.clone(),
            state_index,
            alphabet,
            symbol_index,
            transitions,
            outgoing,
            initial_state,
            final_states,
        })
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions leaving `state`, as `(symbol, destination)` pairs.
    pub fn outgoing(&self, state: StateId) -> &[(SymbolId, StateId)] {
        &self.outgoing[state as usize]
    }

    pub fn get_initial_state(&self) -> StateId {
        self.initial_state
    }

    pub fn is_initial_state(&self, state: StateId) -> bool {
        state == self.initial_state
    }

    pub fn get_final_states(&self) -> &HashSet<StateId> {
        &self.final_states
    }

    pub fn is_final_state(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    pub fn state_id(&self, id: &str) -> Option<StateId> {
        self.state_index.get(id).copied()
    }

    pub fn state_name(&self, state: StateId) -> &str {
        &self.states[state as usize]
    }

    pub fn symbol_id(&self, symbol: &str) -> Option<SymbolId> {
        self.symbol_index.get(symbol).copied()
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> &str {
        if is_epsilon(symbol) {
            EPSILON_LABEL
        } else {
            &self.alphabet[symbol as usize]
        }
    }

    /// Names of the given states in index order.
    pub(crate) fn sorted_names<'a>(
        &self,
        states: impl IntoIterator<Item = &'a StateId>,
    ) -> Vec<String> {
        let mut ids: Vec<StateId> = states.into_iter().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
            .map(|s| self.state_name(s).to_string())
            .collect()
    }
}

fn intern(
    alphabet: &mut Vec<String>,
    symbol_index: &mut HashMap<String, SymbolId>,
    symbol: &str,
) -> SymbolId {
    if let Some(&id) = symbol_index.get(symbol) {
        return id;
    }
    let id = alphabet.len() as SymbolId;
    alphabet.push(symbol.to_string());
    symbol_index.insert(symbol.to_string(), id);
    id
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "States: {{{}}}", self.states.join(", "))?;
        if self.alphabet.is_empty() {
            writeln!(f, "Alphabet: {{∅}}")?;
        } else {
            writeln!(f, "Alphabet: {{{}}}", self.alphabet.join(", "))?;
        }
        writeln!(f, "Initial: {}", self.state_name(self.initial_state))?;
        writeln!(
            f,
            "Finals: {{{}}}",
            self.sorted_names(&self.final_states).join(", ")
        )?;
        writeln!(f, "Transitions:")?;
        for t in &self.transitions {
            writeln!(
                f,
                "  {} --{}--> {}",
                self.state_name(t.from),
                self.symbol_name(t.symbol),
                self.state_name(t.to)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_states() -> AutomatonSnapshot {
        AutomatonSnapshot::new()
            .states(["q0", "q1"])
            .alphabet_str("a, b")
            .initial("q0")
            .final_state("q1")
            .transition("q0", "a", "q1")
    }

    #[test]
    fn builds_index_based_automaton() {
        let automaton = Automaton::new(&two_states()).unwrap();
        println!("{}", automaton);
        assert_eq!(automaton.num_states(), 2);
        assert_eq!(automaton.state_id("q1"), Some(1));
        assert_eq!(automaton.state_name(0), "q0");
        assert_eq!(automaton.get_initial_state(), 0);
        assert!(automaton.is_final_state(1));
        assert!(!automaton.is_final_state(0));
        assert_eq!(
            automaton.transitions(),
            &[Transition {
                from: 0,
                symbol: 0,
                to: 1
            }]
        );
        assert_eq!(automaton.outgoing(0), &[(0, 1)]);
        assert!(automaton.outgoing(1).is_empty());
    }

    #[test]
    fn alphabet_is_configured_then_used_symbols() {
        let snapshot = two_states()
            .symbol("a")
            .symbol(EPSILON_LABEL)
            .transition("q1", "c", "q0")
            .transition("q1", EPSILON_LABEL, "q0");
        let automaton = Automaton::new(&snapshot).unwrap();
        assert_eq!(automaton.alphabet(), &["a", "b", "c"]);
        assert_eq!(automaton.symbol_id("c"), Some(2));
        assert_eq!(automaton.symbol_id(EPSILON_LABEL), None);
        assert_eq!(automaton.transitions()[2].symbol, EPSILON);
        assert_eq!(automaton.symbol_name(EPSILON), "ε");
    }

    #[test]
    fn missing_initial_state() {
        let snapshot = AutomatonSnapshot::new()
            .states(["q0", "q1"])
            .final_state("q1")
            .transition("q0", "a", "q1");
        let err = Automaton::new(&snapshot).unwrap_err();
        assert!(matches!(err, Error::NoInitialState));
        assert!(err.is_validation());
    }

    #[test]
    fn missing_final_state() {
        let snapshot = AutomatonSnapshot::new()
            .states(["q0", "q1"])
            .initial("q0")
            .transition("q0", "a", "q1");
        assert!(matches!(
            Automaton::new(&snapshot),
            Err(Error::NoFinalState)
        ));
    }

    #[test]
    fn reference_errors_fail_fast() {
        let dangling = two_states().transition("q1", "a", "q7");
        assert!(matches!(
            Automaton::new(&dangling),
            Err(Error::UnknownState(id)) if id == "q7"
        ));

        let bad_final = two_states().final_state("q9");
        assert!(matches!(
            Automaton::new(&bad_final),
            Err(Error::UnknownState(id)) if id == "q9"
        ));

        let duplicate = two_states().state("q0");
        assert!(matches!(
            Automaton::new(&duplicate),
            Err(Error::DuplicateState(id)) if id == "q0"
        ));
    }

    #[test]
    fn edge_labels_are_normalized_and_merged() {
        assert_eq!(parse_labels(" a, b ,,EPS, λ, a"), vec!["a", "b", "ε"]);
        assert!(is_epsilon_alias("Epsilon"));
        assert!(!is_epsilon_alias("x"));

        let snapshot = AutomatonSnapshot::new()
            .states(["q0", "q1"])
            .edge("q0", "q1", "a,e")
            .edge("q0", "q1", "a,b");
        assert_eq!(
            snapshot.transitions,
            vec![
                ("q0".to_string(), "a".to_string(), "q1".to_string()),
                ("q0".to_string(), "ε".to_string(), "q1".to_string()),
                ("q0".to_string(), "b".to_string(), "q1".to_string()),
            ]
        );
    }
}
