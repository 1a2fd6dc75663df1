use std::collections::VecDeque;

use itertools::Itertools;
use tracing::debug;

use crate::{
    alphabet::{compress, CharAlphabet},
    math::Set,
    transition_system::{
        dot::Dottable,
        run::Run,
        table::{pattern_summary, TransitionTable},
        BuildError, Edge, StateIndex, TSBuilder, DTS,
    },
    word::FiniteWord,
    Pointed, Show, TransitionSystem,
};

use super::StatesWithColor;

/// The name given to the rejecting sink that is added when completing a [`DFA`].
pub const SINK_NAME: &str = "⊥";

/// A deterministic finite automaton (DFA) is a deterministic transition system with a designated
/// initial state and boolean state colors. It accepts a finite word if reading the word from the initial
/// state ends in an accepting state (one colored `true`).
///
/// The transition function may be partial. A word on which a run gets stuck, either because it contains
/// a symbol outside the alphabet or because a transition is missing, is rejected. This is the same as
/// assuming an implicit rejecting sink state, see [`DFA::completed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DFA {
    ts: DTS,
    initial: StateIndex,
    name: Option<String>,
}

impl DFA {
    /// Creates a new DFA from the given transition system, fails if `initial` is not a state of `ts`.
    pub fn from_parts(ts: DTS, initial: StateIndex) -> Result<Self, BuildError> {
        if ts.state_color(initial).is_none() {
            return Err(BuildError::UnknownState(initial));
        }
        Ok(Self {
            ts,
            initial,
            name: None,
        })
    }

    /// Returns a fresh [`TSBuilder`].
    pub fn builder() -> TSBuilder {
        TSBuilder::default()
    }

    /// Gives the automaton a name, this is for example used as the title of its DOT representation.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The name of the automaton, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Gives access to the underlying transition system.
    pub fn ts(&self) -> &DTS {
        &self.ts
    }

    /// Consumes `self` and returns the underlying transition system.
    pub fn into_ts(self) -> DTS {
        self.ts
    }

    /// Runs `word` from the initial state.
    pub fn run<W: FiniteWord>(&self, word: W) -> Run {
        self.finite_run(word)
    }

    /// Returns true if `word` is accepted.
    pub fn accepts<W: FiniteWord>(&self, word: W) -> bool {
        self.finite_run(word).is_accepted()
    }

    /// Returns the indices of all states that are accepting.
    pub fn accepting_states(&self) -> StatesWithColor<'_, Self> {
        StatesWithColor::new(self, true)
    }

    /// Returns the indices of all states that are rejecting.
    pub fn rejecting_states(&self) -> StatesWithColor<'_, Self> {
        StatesWithColor::new(self, false)
    }

    /// Tries to construct a (finite) word witnessing that the accepted language is non-empty. If such a word exists,
    /// the function returns the length-lexicographically smallest one, otherwise `None`.
    pub fn give_word(&self) -> Option<Vec<char>> {
        self.minimal_representatives()
            .find_map(|(mr, index)| self.is_accepting(index).then_some(mr))
    }

    /// Returns true if and only if the accepted language is empty.
    pub fn is_empty_language(&self) -> bool {
        self.give_word().is_none()
    }

    /// Returns a DFA that accepts the same words as `self` and whose transition function is total. If
    /// `self` is already complete, it is simply cloned. Otherwise a rejecting sink called `⊥` is added and
    /// every undefined transition is redirected to it.
    pub fn completed(&self) -> Result<DFA, BuildError> {
        if self.is_complete() {
            return Ok(self.clone());
        }

        let mut ts = self.ts.clone();
        let sink_name = std::iter::once(SINK_NAME.to_string())
            .chain((1..).map(|i| format!("{SINK_NAME}{i}")))
            .find(|name| ts.find_state(name).is_none())
            .unwrap_or_else(|| SINK_NAME.to_string());
        let sink = ts.add_state(sink_name, false)?;

        let missing = ts
            .state_indices()
            .flat_map(|q| self.alphabet().universe().map(move |sym| (q, sym)))
            .filter(|&(q, sym)| ts.successor(q, sym).is_none())
            .collect_vec();
        debug!("completing DFA with {} transitions into the sink", missing.len());
        for (q, sym) in missing {
            ts.add_transition(q, sym, sink)?;
        }

        Ok(DFA {
            ts,
            initial: self.initial,
            name: self.name.clone(),
        })
    }

    /// Computes the complement of `self` by completing it and swapping accepting and non-accepting states.
    /// The complement accepts precisely those words over the alphabet of `self` that `self` rejects.
    pub fn complement(&self) -> Result<DFA, BuildError> {
        let mut out = self.completed()?;
        for q in out.ts.state_indices().collect_vec() {
            let flipped = !out.ts.is_accepting(q);
            out.ts.set_state_color(q, flipped)?;
        }
        out.name = self.name.as_ref().map(|n| format!("¬{n}"));
        Ok(out)
    }

    /// Attempts to find a word on which `self` and `other` disagree, meaning that the word is in the
    /// symmetric difference of their languages. The length-lexicographically smallest such word is returned.
    /// The two automata may have different alphabets, a symbol that one of them does not know leads to
    /// rejection in that automaton.
    pub fn separate(&self, other: &DFA) -> Option<Vec<char>> {
        let alphabet = self.alphabet().union(other.alphabet());
        let accepting = |l: Option<StateIndex>, r: Option<StateIndex>| {
            (
                l.is_some_and(|q| self.is_accepting(q)),
                r.is_some_and(|q| other.is_accepting(q)),
            )
        };

        let origin = (Some(self.initial()), Some(other.initial()));
        let mut seen: Set<(Option<StateIndex>, Option<StateIndex>)> = Set::default();
        seen.insert(origin);
        let mut queue = VecDeque::from([(vec![], origin)]);

        while let Some((word, (l, r))) = queue.pop_front() {
            let (left, right) = accepting(l, r);
            if left != right {
                debug!("found separating word {}", word.show());
                return Some(word);
            }
            for sym in alphabet.universe() {
                let next = (
                    l.and_then(|q| self.successor(q, sym)),
                    r.and_then(|q| other.successor(q, sym)),
                );
                if next == (None, None) {
                    continue;
                }
                if seen.insert(next) {
                    let mut extended = word.clone();
                    extended.push(sym);
                    queue.push_back((extended, next));
                }
            }
        }
        None
    }

    /// Checks whether `self` is equivalent to `other`, i.e. whether the two DFAs accept
    /// the same language.
    pub fn equivalent(&self, other: &DFA) -> bool {
        self.separate(other).is_none()
    }

    /// Returns the transition table, see [`TransitionTable`].
    pub fn transition_table(&self) -> TransitionTable<'_, Self> {
        TransitionTable::new(self).with_initial(self.initial)
    }

    /// Describes the outgoing transitions of every state in one line each.
    pub fn pattern_summary(&self) -> Vec<(String, String)> {
        pattern_summary(self)
    }

    /// Spells out the formal definition (Q, Σ, q₀, F, δ) of `self`. Parallel transitions are
    /// listed as one entry with a compressed symbol set, for example `δ(q0, A-Z) = q1`.
    pub fn formal_definition(&self) -> String {
        let states = self.state_indices().map(|q| self.show_state(q)).join(", ");
        let finals = self.accepting_states().map(|q| self.show_state(q)).join(", ");
        let delta = self
            .state_indices()
            .flat_map(|q| {
                self.grouped_edges_from(q)
                    .into_iter()
                    .map(move |(p, symbols)| {
                        format!(
                            "   δ({}, {}) = {}",
                            self.show_state(q),
                            compress(symbols),
                            self.show_state(p)
                        )
                    })
            })
            .join("\n");

        format!(
            "Q = {{{states}}}\nΣ = {}\nq₀ = {}\nF = {{{finals}}}\nδ:\n{delta}",
            self.alphabet().show(),
            self.show_state(self.initial),
        )
    }
}

impl TransitionSystem for DFA {
    fn alphabet(&self) -> &CharAlphabet {
        self.ts.alphabet()
    }

    fn state_indices(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.ts.state_indices()
    }

    fn state_color(&self, state: StateIndex) -> Option<bool> {
        self.ts.state_color(state)
    }

    fn state_name(&self, state: StateIndex) -> Option<&str> {
        self.ts.state_name(state)
    }

    fn find_state(&self, name: &str) -> Option<StateIndex> {
        self.ts.find_state(name)
    }

    fn edges_from(&self, state: StateIndex) -> Option<impl Iterator<Item = Edge> + '_> {
        self.ts.edges_from(state)
    }

    fn successor(&self, state: StateIndex, symbol: char) -> Option<StateIndex> {
        self.ts.successor(state, symbol)
    }

    fn size(&self) -> usize {
        self.ts.size()
    }
}

impl Pointed for DFA {
    fn initial(&self) -> StateIndex {
        self.initial
    }
}

impl Dottable for DFA {
    fn dot_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "DFA".to_string())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    fn contains_aa() -> DFA {
        TSBuilder::default()
            .with_state_colors([false, false, true])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 0),
                (1, 'a', 2),
                (1, 'b', 0),
            ])
            .with_edges([(2, "ab", 2)])
            .into_dfa(0)
            .unwrap()
    }

    fn partial_ab() -> DFA {
        // a b* with no transition on a from q1
        TSBuilder::default()
            .with_state_colors([false, true])
            .with_edges([(0, 'a', 1), (1, 'b', 1)])
            .into_dfa(0)
            .unwrap()
    }

    #[test_log::test]
    fn accepting_and_rejecting_states() {
        let dfa = contains_aa();
        assert_eq!(dfa.accepting_states().collect_vec(), vec![2]);
        assert_eq!(dfa.rejecting_states().collect_vec(), vec![0, 1]);
    }

    #[test]
    fn witnesses_and_emptiness() {
        assert_eq!(contains_aa().give_word(), Some(vec!['a', 'a']));
        assert_eq!(partial_ab().give_word(), Some(vec!['a']));

        let empty = TSBuilder::default()
            .with_state_colors([false, true])
            .with_edges([(0, 'a', 0), (1, 'a', 1)])
            .into_dfa(0)
            .unwrap();
        assert!(empty.is_empty_language());
    }

    #[test]
    fn completion_adds_a_sink_only_when_needed() {
        let complete = contains_aa();
        assert!(complete.is_complete());
        assert_eq!(complete.completed().unwrap(), complete);

        let dfa = partial_ab();
        let completed = dfa.completed().unwrap();
        assert!(completed.is_complete());
        assert_eq!(completed.size(), 3);
        let sink = completed.find_state("⊥").unwrap();
        assert!(!completed.is_accepting(sink));
        assert_eq!(completed.successor(1, 'a'), Some(sink));
        assert!(dfa.equivalent(&completed));
    }

    #[test]
    fn complement_flips_the_language() {
        let dfa = partial_ab();
        let complement = dfa.complement().unwrap();
        for word in ["", "a", "ab", "abb", "aa", "b", "aba"] {
            assert_ne!(dfa.accepts(word), complement.accepts(word), "{word}");
        }
        assert_eq!(dfa.separate(&complement), Some(vec![]));
    }

    #[test]
    fn separation() {
        let dfa = contains_aa();
        assert_eq!(dfa.separate(&dfa), None);
        assert!(dfa.equivalent(&dfa.completed().unwrap()));

        let ends_with_aa = TSBuilder::default()
            .with_state_colors([false, false, true])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 0),
                (1, 'a', 2),
                (1, 'b', 0),
                (2, 'a', 2),
                (2, 'b', 0),
            ])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.separate(&ends_with_aa), Some(vec!['a', 'a', 'b']));

        // different alphabets, the c is unknown to `dfa`
        let with_c = TSBuilder::default()
            .with_state_colors([false, true])
            .with_edges([(0, 'c', 1)])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.separate(&with_c), Some(vec!['c']));
    }

    #[test]
    fn formal_definition_lists_grouped_transitions() {
        let definition = contains_aa().formal_definition();
        assert!(definition.starts_with("Q = {q0, q1, q2}\nΣ = {a,b}\nq₀ = q0\nF = {q2}\nδ:"));
        assert!(definition.contains("   δ(q2, a,b) = q2"));
        assert!(definition.contains("   δ(q0, b) = q0"));
    }
}
