//! Epsilon elimination.
//!
//! Computes the epsilon-closure of every state and derives an equivalent
//! automaton relation without epsilon transitions, together with the set of
//! states that become accepting once epsilon moves are folded away.

use rustc_hash::FxHashSet as HashSet;

use crate::automaton::{is_epsilon, Automaton, StateId, SymbolId, Transition};

impl Automaton {
    /// States reachable from `seeds` using only epsilon transitions, seeds
    /// included.
    fn closure_set(&self, seeds: impl IntoIterator<Item = StateId>) -> HashSet<StateId> {
        let mut closure: HashSet<StateId> = HashSet::default();
        let mut stack: Vec<StateId> = seeds.into_iter().collect();
        while let Some(state) = stack.pop() {
            if !closure.insert(state) {
                continue;
            }
            for &(symbol, destination) in self.outgoing(state) {
                if is_epsilon(symbol) && !closure.contains(&destination) {
                    stack.push(destination);
                }
            }
        }
        closure
    }

    /// Epsilon-closure of a single state, sorted by state index.
    pub fn epsilon_closure(&self, state: StateId) -> Vec<StateId> {
        let mut closure: Vec<StateId> = self.closure_set([state]).into_iter().collect();
        closure.sort_unstable();
        closure
    }

    /// Whether the automaton accepts `word`, given as a sequence of symbols.
    /// Symbols outside the alphabet are never accepted.
    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let mut current = self.closure_set([self.get_initial_state()]);
        for symbol in word {
            let Some(symbol) = self.symbol_id(symbol.as_ref()) else {
                return false;
            };
            let moved: Vec<StateId> = current
                .iter()
                .flat_map(|&state| self.outgoing(state))
                .filter(|(s, _)| *s == symbol)
                .map(|&(_, destination)| destination)
                .collect();
            if moved.is_empty() {
                return false;
            }
            current = self.closure_set(moved);
        }
        current.iter().any(|&state| self.is_final_state(state))
    }
}

/// The epsilon-free relation derived from an [`Automaton`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpsilonFree {
    closures: Vec<Vec<StateId>>,
    transitions: Vec<Transition>,
    final_states: HashSet<StateId>,
}

impl EpsilonFree {
    pub fn new(automaton: &Automaton) -> Self {
        let num_states = automaton.num_states();
        let closures: Vec<Vec<StateId>> = (0..num_states as StateId)
            .map(|state| automaton.epsilon_closure(state))
            .collect();

        let mut transitions: Vec<Transition> = Vec::new();
        for from in 0..num_states {
            for symbol in 0..automaton.alphabet().len() as SymbolId {
                let mut reached = vec![false; num_states];
                for &q in &closures[from] {
                    for &(s, t) in automaton.outgoing(q) {
                        if s == symbol {
                            for &r in &closures[t as usize] {
                                reached[r as usize] = true;
                            }
                        }
                    }
                }
                transitions.extend(
                    reached
                        .iter()
                        .enumerate()
                        .filter(|(_, hit)| **hit)
                        .map(|(to, _)| Transition {
                            from: from as StateId,
                            symbol,
                            to: to as StateId,
                        }),
                );
            }
        }

        let final_states = closures
            .iter()
            .enumerate()
            .filter(|(_, closure)| closure.iter().any(|&q| automaton.is_final_state(q)))
            .map(|(state, _)| state as StateId)
            .collect();

        Self {
            closures,
            transitions,
            final_states,
        }
    }

    pub fn closure(&self, state: StateId) -> &[StateId] {
        &self.closures[state as usize]
    }

    pub fn closures(&self) -> &[Vec<StateId>] {
        &self.closures
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn get_final_states(&self) -> &HashSet<StateId> {
        &self.final_states
    }

    pub fn is_final_state(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }
}
