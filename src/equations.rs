//! Arden's lemma state elimination over a regex-valued equation system.
//!
//! Every state `i` contributes one equation
//!
//! ```text
//! X_i = Σ_j R[i][j]·X_j ∪ F[i]
//! ```
//!
//! where `R[i][j]` is the union of the symbols leading from `i` to `j` and
//! `F[i]` is `ε` when `i` accepts. States are eliminated one at a time in
//! index order: a round first removes the state's self-loop with Arden's lemma
//! (`X = A·X ∪ B` ⇒ `X = A*·B`) and then substitutes the resulting equation
//! into every other equation that still depends on it. This is Gauss-Jordan
//! elimination with union as addition, concatenation as multiplication and
//! star as the closure operator.

use std::mem;

use crate::automaton::{Automaton, StateId};
use crate::epsilon::EpsilonFree;
use crate::regex::Regex;
use crate::trace::{Equation, TraceRecorder, TraceStep};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct EquationSystem<'a> {
    states: &'a [String],
    initial: StateId,
    coefficients: Vec<Vec<Regex>>,
    constants: Vec<Regex>,
    rounds: usize,
    max_regex_len: Option<usize>,
}

impl<'a> EquationSystem<'a> {
    pub fn new(automaton: &'a Automaton, epsilon_free: &EpsilonFree) -> Self {
        let num_states = automaton.num_states();
        let mut coefficients = vec![vec![Regex::Empty; num_states]; num_states];
        for t in epsilon_free.transitions() {
            let cell = &mut coefficients[t.from as usize][t.to as usize];
            *cell = mem::take(cell).union(Regex::symbol(automaton.symbol_name(t.symbol)));
        }
        let constants = (0..num_states as StateId)
            .map(|state| {
                if epsilon_free.is_final_state(state) {
                    Regex::Epsilon
                } else {
                    Regex::Empty
                }
            })
            .collect();
        Self {
            states: automaton.states(),
            initial: automaton.get_initial_state(),
            coefficients,
            constants,
            rounds: 0,
            max_regex_len: None,
        }
    }

    /// Abort elimination with [`Error::ResultTooLarge`] once any intermediate
    /// value renders longer than `limit` characters.
    pub fn with_max_regex_len(mut self, limit: Option<usize>) -> Self {
        self.max_regex_len = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Number of elimination rounds performed so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn is_solved(&self) -> bool {
        self.rounds == self.len()
    }

    pub fn coefficient(&self, i: usize, j: usize) -> &Regex {
        &self.coefficients[i][j]
    }

    pub fn constant(&self, i: usize) -> &Regex {
        &self.constants[i]
    }

    /// Whether equation `i` still depends on `X_k`.
    pub fn references(&self, i: usize, k: usize) -> bool {
        !self.coefficients[i][k].is_empty()
    }

    pub fn equation(&self, i: usize) -> Equation {
        Equation {
            state: self.states[i].clone(),
            terms: self.coefficients[i]
                .iter()
                .enumerate()
                .filter(|(_, coefficient)| !coefficient.is_empty())
                .map(|(j, coefficient)| (coefficient.clone(), self.states[j].clone()))
                .collect(),
            constant: self.constants[i].clone(),
        }
    }

    fn checked(&self, value: Regex) -> Result<Regex> {
        if let Some(limit) = self.max_regex_len {
            let len = value.width();
            if len > limit {
                return Err(Error::ResultTooLarge { len, limit });
            }
        }
        Ok(value)
    }

    /// Runs the next elimination round. Does nothing once every state has
    /// been eliminated.
    ///
    /// The round is computed in full before any cell is written, so a round
    /// that fails with [`Error::ResultTooLarge`] leaves the system and the
    /// trace exactly as they were.
    pub fn eliminate_next<T>(&mut self, trace: &mut T) -> Result<()>
    where
        T: TraceRecorder + ?Sized,
    {
        if self.is_solved() {
            return Ok(());
        }
        let k = self.rounds;
        let n = self.len();

        // Arden's lemma on X_k; with no self-loop the star is ε and this is a no-op
        let self_loop = self.coefficients[k][k].clone();
        let loop_star = self_loop.clone().star();
        let mut row_k = self.coefficients[k].clone();
        row_k[k] = Regex::Empty;
        for (j, cell) in row_k.iter_mut().enumerate() {
            if j != k && !cell.is_empty() {
                *cell = self.checked(loop_star.clone().concat(mem::take(cell)))?;
            }
        }
        let constant_k = self.checked(loop_star.clone().concat(self.constants[k].clone()))?;

        // substitute X_k everywhere else
        let mut substitutions: Vec<(usize, Regex, Vec<Regex>, Regex)> = Vec::new();
        for i in 0..n {
            let via_k = &self.coefficients[i][k];
            if i == k || via_k.is_empty() {
                continue;
            }
            let mut row = self.coefficients[i].clone();
            row[k] = Regex::Empty;
            for (j, cell) in row.iter_mut().enumerate() {
                if j == k || row_k[j].is_empty() {
                    continue;
                }
                let contribution = via_k.clone().concat(row_k[j].clone());
                *cell = self.checked(mem::take(cell).union(contribution))?;
            }
            let contribution = via_k.clone().concat(constant_k.clone());
            let constant = self.checked(self.constants[i].clone().union(contribution))?;
            substitutions.push((i, via_k.clone(), row, constant));
        }

        self.coefficients[k] = row_k;
        self.constants[k] = constant_k;
        if trace.is_enabled() {
            if !self_loop.is_empty() {
                trace.record(TraceStep::Arden {
                    state: self.states[k].clone(),
                    coefficient: self_loop,
                    star: loop_star,
                });
            }
            trace.record(TraceStep::Normalized(self.equation(k)));
        }
        for (i, via_k, row, constant) in substitutions {
            self.coefficients[i] = row;
            self.constants[i] = constant;
            if trace.is_enabled() {
                trace.record(TraceStep::Substituted {
                    eliminated: self.states[k].clone(),
                    coefficient: via_k,
                    equation: self.equation(i),
                });
            }
        }

        self.rounds += 1;
        Ok(())
    }

    /// Eliminates every remaining state and returns the closed form of the
    /// initial state's equation.
    pub fn solve<T>(mut self, trace: &mut T) -> Result<Regex>
    where
        T: TraceRecorder + ?Sized,
    {
        while !self.is_solved() {
            self.eliminate_next(trace)?;
        }
        Ok(mem::take(&mut self.constants[self.initial as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{AutomatonSnapshot, EPSILON_LABEL};

    fn build(snapshot: AutomatonSnapshot) -> Automaton {
        Automaton::new(&snapshot).unwrap()
    }

    #[test]
    fn builds_coefficients_and_constants() {
        // q0 -a,b-> q1, q1 -a-> q1
        let automaton = build(
            AutomatonSnapshot::new()
                .states(["q0", "q1"])
                .initial("q0")
                .final_state("q1")
                .edge("q0", "q1", "a,b")
                .transition("q1", "a", "q1"),
        );
        let epsilon_free = EpsilonFree::new(&automaton);
        let system = EquationSystem::new(&automaton, &epsilon_free);
        assert_eq!(system.len(), 2);
        assert_eq!(system.coefficient(0, 1).to_string(), "a+b");
        assert_eq!(system.coefficient(1, 1).to_string(), "a");
        assert!(system.coefficient(0, 0).is_empty());
        assert_eq!(system.constant(0), &Regex::Empty);
        assert_eq!(system.constant(1), &Regex::Epsilon);
        assert_eq!(system.equation(0).to_string(), "X_q0 = (a+b)X_q1");
        assert_eq!(system.equation(1).to_string(), "X_q1 = aX_q1 + ε");
    }

    #[test]
    fn each_round_removes_the_eliminated_state() {
        // q0 -a-> q1 -b-> q2 -c-> q0, q1 -a-> q1, q2 final
        let automaton = build(
            AutomatonSnapshot::new()
                .states(["q0", "q1", "q2"])
                .initial("q0")
                .final_state("q2")
                .transition("q0", "a", "q1")
                .transition("q1", "a", "q1")
                .transition("q1", "b", "q2")
                .transition("q2", "c", "q0")
                .transition("q2", EPSILON_LABEL, "q1"),
        );
        let epsilon_free = EpsilonFree::new(&automaton);
        let mut system = EquationSystem::new(&automaton, &epsilon_free);
        let mut trace: Vec<TraceStep> = Vec::new();
        for k in 0..system.len() {
            assert_eq!(system.rounds(), k);
            system.eliminate_next(&mut trace).unwrap();
            for i in 0..system.len() {
                if i != k {
                    assert!(!system.references(i, k), "X_{} still refers to X_{}", i, k);
                }
            }
            assert!(!system.references(k, k));
        }
        assert_eq!(system.rounds(), 3);
        assert!(system.is_solved());
        // extra calls are no-ops
        system.eliminate_next(&mut ()).unwrap();
        assert_eq!(system.rounds(), 3);
        assert!(trace
            .iter()
            .any(|step| matches!(step, TraceStep::Arden { state, .. } if state == "q1")));
    }

    #[test]
    fn single_state_self_loop() {
        let automaton = build(
            AutomatonSnapshot::new()
                .state("q0")
                .initial("q0")
                .final_state("q0")
                .transition("q0", "a", "q0"),
        );
        let epsilon_free = EpsilonFree::new(&automaton);
        let system = EquationSystem::new(&automaton, &epsilon_free);
        let mut trace: Vec<TraceStep> = Vec::new();
        let regex = system.solve(&mut trace).unwrap();
        assert_eq!(regex.to_string(), "a*");
        assert_eq!(
            trace,
            vec![
                TraceStep::Arden {
                    state: "q0".to_string(),
                    coefficient: Regex::symbol("a"),
                    star: Regex::symbol("a").star(),
                },
                TraceStep::Normalized(Equation {
                    state: "q0".to_string(),
                    terms: vec![],
                    constant: Regex::symbol("a").star(),
                }),
            ]
        );
    }

    #[test]
    fn size_cap_aborts_elimination() {
        let automaton = build(
            AutomatonSnapshot::new()
                .states(["q0", "q1"])
                .initial("q0")
                .final_state("q1")
                .transition("q0", "abc", "q0")
                .transition("q0", "def", "q1"),
        );
        let epsilon_free = EpsilonFree::new(&automaton);
        let system = EquationSystem::new(&automaton, &epsilon_free).with_max_regex_len(Some(4));
        let err = system.solve(&mut ()).unwrap_err();
        // {abc}*{def}
        assert!(matches!(err, Error::ResultTooLarge { len: 11, limit: 4 }));
    }

    #[test]
    fn failed_round_leaves_system_untouched() {
        let automaton = build(
            AutomatonSnapshot::new()
                .states(["q0", "q1"])
                .initial("q0")
                .final_state("q1")
                .transition("q0", "abc", "q0")
                .transition("q0", "def", "q1"),
        );
        let epsilon_free = EpsilonFree::new(&automaton);
        let mut system =
            EquationSystem::new(&automaton, &epsilon_free).with_max_regex_len(Some(4));
        let before = (0..system.len()).map(|i| system.equation(i)).collect::<Vec<_>>();
        let mut trace: Vec<TraceStep> = Vec::new();

        let err = system.eliminate_next(&mut trace).unwrap_err();
        assert!(matches!(err, Error::ResultTooLarge { .. }));
        assert_eq!(system.rounds(), 0);
        assert_eq!(system.coefficient(0, 0), &Regex::symbol("abc"));
        assert_eq!(system.coefficient(0, 1), &Regex::symbol("def"));
        assert_eq!(system.constant(0), &Regex::Empty);
        assert_eq!(system.constant(1), &Regex::Epsilon);
        let after = (0..system.len()).map(|i| system.equation(i)).collect::<Vec<_>>();
        assert_eq!(before, after);
        assert!(trace.is_empty());

        // retrying hits the same limit again
        let err = system.eliminate_next(&mut trace).unwrap_err();
        assert!(matches!(err, Error::ResultTooLarge { len: 11, limit: 4 }));
        assert_eq!(system.rounds(), 0);
    }

    #[test]
    fn failed_substitution_keeps_earlier_rows() {
        // the Arden step of q0 fits, substituting into q1 does not
        let automaton = build(
            AutomatonSnapshot::new()
                .states(["q0", "q1"])
                .initial("q1")
                .final_state("q0")
                .transition("q0", "a", "q0")
                .transition("q1", "b", "q0"),
        );
        let epsilon_free = EpsilonFree::new(&automaton);
        let mut system =
            EquationSystem::new(&automaton, &epsilon_free).with_max_regex_len(Some(2));
        let err = system.eliminate_next(&mut ()).unwrap_err();
        // b·a*
        assert!(matches!(err, Error::ResultTooLarge { len: 3, limit: 2 }));
        assert_eq!(system.coefficient(0, 0), &Regex::symbol("a"));
        assert_eq!(system.constant(0), &Regex::Epsilon);
        assert_eq!(system.coefficient(1, 0), &Regex::symbol("b"));
        assert_eq!(system.constant(1), &Regex::Empty);
    }

    #[test]
    fn solves_from_the_declared_initial_state() {
        let automaton = build(
            AutomatonSnapshot::new()
                .states(["q0", "q1"])
                .initial("q1")
                .final_state("q0")
                .transition("q1", "b", "q0"),
        );
        let epsilon_free = EpsilonFree::new(&automaton);
        let system = EquationSystem::new(&automaton, &epsilon_free);
        assert_eq!(system.solve(&mut ()).unwrap(), Regex::symbol("b"));
    }
}
