use itertools::Itertools;
use thiserror::Error;
use tracing::trace;

use crate::{
    alphabet::{CharAlphabet, SymbolSpecError},
    math::{Bijection, OrderedMap},
    word::FiniteWord,
};

mod builder;
pub use builder::{IntoSymbols, TSBuilder};

/// Runs of words through a transition system and their outcome.
pub mod run;
use run::Run;

/// Breadth-first exploration of the states reachable from some origin.
pub mod reachable;
use reachable::MinimalRepresentatives;

/// Transition tables and pattern summaries.
pub mod table;

/// Graphviz output.
pub mod dot;

/// The type that is used to index states.
pub type DefaultIdType = u32;
/// Type alias for the index of a state in a [`DTS`].
pub type StateIndex = DefaultIdType;

/// Errors that can occur while growing a transition system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A state index was used that has not been created.
    #[error("state {0} does not exist")]
    UnknownState(StateIndex),
    /// State names must be unique.
    #[error("a state named \"{0}\" exists already")]
    DuplicateStateName(String),
    /// The transition would make the system nondeterministic.
    #[error("transition from {state} on '{symbol}' leads to {existing}, cannot also lead to {requested}")]
    Conflict {
        /// Name of the source state.
        state: String,
        /// The symbol on which both transitions are defined.
        symbol: char,
        /// Name of the target that is already present.
        existing: String,
        /// Name of the target that was requested.
        requested: String,
    },
    /// A symbol specification could not be expanded.
    #[error("invalid symbols: {0}")]
    Symbols(#[from] SymbolSpecError),
}

/// An edge in a deterministic transition system. As the alphabets are simple, an edge and
/// a transition coincide, the edge is labelled with exactly one symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    source: StateIndex,
    symbol: char,
    target: StateIndex,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(source: StateIndex, symbol: char, target: StateIndex) -> Self {
        Self {
            source,
            symbol,
            target,
        }
    }
    /// The state in which the edge originates.
    pub fn source(&self) -> StateIndex {
        self.source
    }
    /// The symbol that labels the edge.
    pub fn symbol(&self) -> char {
        self.symbol
    }
    /// The state the edge leads to.
    pub fn target(&self) -> StateIndex {
        self.target
    }
}

/// The central trait of the crate. A transition system consists of an alphabet, a finite set of
/// states, each of which is named and colored (`true` meaning accepting), and a partial deterministic
/// successor function.
pub trait TransitionSystem {
    /// The alphabet over which the transition system operates.
    fn alphabet(&self) -> &CharAlphabet;

    /// Iterates over the indices of all states in ascending order.
    fn state_indices(&self) -> impl Iterator<Item = StateIndex> + '_;

    /// Returns the color of the given state or `None` if it does not exist.
    fn state_color(&self, state: StateIndex) -> Option<bool>;

    /// Returns the display name of the given state or `None` if it does not exist.
    fn state_name(&self, state: StateIndex) -> Option<&str>;

    /// Looks up a state by its display name.
    fn find_state(&self, name: &str) -> Option<StateIndex>;

    /// Returns an iterator over the outgoing edges of `state`, ordered by symbol. If the state
    /// does not exist, `None` is returned.
    fn edges_from(&self, state: StateIndex) -> Option<impl Iterator<Item = Edge> + '_>;

    /// Returns the state reached from `state` on `symbol`, if such a transition exists.
    fn successor(&self, state: StateIndex, symbol: char) -> Option<StateIndex>;

    /// The number of states.
    fn size(&self) -> usize {
        self.state_indices().count()
    }

    /// Returns true if the state exists and is accepting.
    fn is_accepting(&self, state: StateIndex) -> bool {
        self.state_color(state).unwrap_or(false)
    }

    /// Returns the name of `state`, or a placeholder if it does not exist.
    fn show_state(&self, state: StateIndex) -> String {
        self.state_name(state)
            .map(str::to_string)
            .unwrap_or_else(|| format!("<{state}>"))
    }

    /// Iterates over all edges of the transition system, ordered by source and symbol.
    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.state_indices()
            .flat_map(move |q| self.edges_from(q).into_iter().flatten())
    }

    /// Returns true if every state has an outgoing transition for every symbol of the alphabet.
    fn is_complete(&self) -> bool {
        self.state_indices().all(|q| {
            self.alphabet()
                .universe()
                .all(|sym| self.successor(q, sym).is_some())
        })
    }

    /// Groups the outgoing transitions of `state` by their target, the symbols leading to each
    /// target are kept in ascending order. Targets are ordered by the smallest symbol leading to them.
    fn grouped_edges_from(&self, state: StateIndex) -> Vec<(StateIndex, Vec<char>)> {
        let Some(edges) = self.edges_from(state) else {
            return vec![];
        };
        edges
            .map(|e| (e.target(), e.symbol()))
            .into_group_map()
            .into_iter()
            .sorted_by_key(|(_, symbols)| symbols.first().copied())
            .collect()
    }

    /// Runs `word` starting in the state `from`. See [`Run`] for the details.
    fn finite_run_from<W: FiniteWord>(&self, from: StateIndex, word: W) -> Run
    where
        Self: Sized,
    {
        Run::execute(self, from, word)
    }

    /// Iterates over the minimal representatives of all states reachable from `origin`. The minimal
    /// representative of a state is its length-lexicographically minimal access sequence.
    fn minimal_representatives_from(&self, origin: StateIndex) -> MinimalRepresentatives<'_, Self>
    where
        Self: Sized,
    {
        MinimalRepresentatives::new(self, origin)
    }
}

/// A transition system with a designated initial state.
pub trait Pointed: TransitionSystem {
    /// Returns the index of the initial state.
    fn initial(&self) -> StateIndex;

    /// Returns the color of the initial state.
    fn initial_color(&self) -> bool {
        self.is_accepting(self.initial())
    }

    /// Runs `word` from the initial state.
    fn finite_run<W: FiniteWord>(&self, word: W) -> Run
    where
        Self: Sized,
    {
        self.finite_run_from(self.initial(), word)
    }

    /// Returns the minimal representatives of all states that are reachable from the initial state,
    /// in length-lexicographic order of the representatives.
    fn minimal_representatives(&self) -> MinimalRepresentatives<'_, Self>
    where
        Self: Sized,
    {
        self.minimal_representatives_from(self.initial())
    }

    /// Iterates over the indices of all states that are reachable from the initial state.
    fn reachable_state_indices(&self) -> impl Iterator<Item = StateIndex> + '_
    where
        Self: Sized,
    {
        self.minimal_representatives().map(|(_, q)| q)
    }
}

impl<T: TransitionSystem> TransitionSystem for &T {
    fn alphabet(&self) -> &CharAlphabet {
        T::alphabet(self)
    }
    fn state_indices(&self) -> impl Iterator<Item = StateIndex> + '_ {
        T::state_indices(self)
    }
    fn state_color(&self, state: StateIndex) -> Option<bool> {
        T::state_color(self, state)
    }
    fn state_name(&self, state: StateIndex) -> Option<&str> {
        T::state_name(self, state)
    }
    fn find_state(&self, name: &str) -> Option<StateIndex> {
        T::find_state(self, name)
    }
    fn edges_from(&self, state: StateIndex) -> Option<impl Iterator<Item = Edge> + '_> {
        T::edges_from(self, state)
    }
    fn successor(&self, state: StateIndex, symbol: char) -> Option<StateIndex> {
        T::successor(self, state, symbol)
    }
}

impl<P: Pointed> Pointed for &P {
    fn initial(&self) -> StateIndex {
        P::initial(self)
    }
}

/// A deterministic transition system with named, boolean colored states. Transitions
/// are stored per state in an ordered map from symbol to target, which keeps iteration
/// over outgoing edges sorted by symbol.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DTS {
    alphabet: CharAlphabet,
    names: Bijection<StateIndex, String>,
    colors: Vec<bool>,
    transitions: Vec<OrderedMap<char, StateIndex>>,
}

impl DTS {
    /// Creates an empty transition system over the given alphabet.
    pub fn new(alphabet: CharAlphabet) -> Self {
        Self {
            alphabet,
            ..Default::default()
        }
    }

    /// Creates an empty transition system and reserves space for `states` many states.
    pub fn for_alphabet_size_hint(alphabet: CharAlphabet, states: usize) -> Self {
        Self {
            alphabet,
            names: Bijection::new(),
            colors: Vec::with_capacity(states),
            transitions: Vec::with_capacity(states),
        }
    }

    /// Extends the alphabet by the given symbols. This can be used to make symbols known
    /// that do not appear on any transition.
    pub fn with_symbols<I: IntoIterator<Item = char>>(mut self, symbols: I) -> Self {
        self.alphabet.extend(symbols);
        self
    }

    /// Adds a new state with the given name and color and returns its index.
    pub fn add_state<N: Into<String>>(
        &mut self,
        name: N,
        accepting: bool,
    ) -> Result<StateIndex, BuildError> {
        let name = name.into();
        if self.names.contains_right(&name) {
            return Err(BuildError::DuplicateStateName(name));
        }
        let idx = self.colors.len() as StateIndex;
        trace!("adding state {name} with index {idx}");
        self.names.insert(idx, name);
        self.colors.push(accepting);
        self.transitions.push(OrderedMap::new());
        Ok(idx)
    }

    /// Sets the color of an existing state.
    pub fn set_state_color(&mut self, state: StateIndex, accepting: bool) -> Result<(), BuildError> {
        let color = self
            .colors
            .get_mut(state as usize)
            .ok_or(BuildError::UnknownState(state))?;
        *color = accepting;
        Ok(())
    }

    /// Adds the transition `source --symbol--> target`. The symbol is added to the alphabet if it
    /// is not yet part of it. Adding a transition that exists already is a no-op, while adding one
    /// that would make the system nondeterministic is an error.
    pub fn add_transition(
        &mut self,
        source: StateIndex,
        symbol: char,
        target: StateIndex,
    ) -> Result<(), BuildError> {
        if target as usize >= self.colors.len() {
            return Err(BuildError::UnknownState(target));
        }
        let existing = self
            .transitions
            .get(source as usize)
            .ok_or(BuildError::UnknownState(source))?
            .get(&symbol)
            .copied();
        match existing {
            Some(existing) if existing == target => return Ok(()),
            Some(existing) => {
                return Err(BuildError::Conflict {
                    state: self.show_state(source),
                    symbol,
                    existing: self.show_state(existing),
                    requested: self.show_state(target),
                })
            }
            None => {
                self.transitions[source as usize].insert(symbol, target);
            }
        }
        if !self.alphabet.contains(symbol) {
            self.alphabet.extend([symbol]);
        }
        Ok(())
    }

    /// Adds a transition from `source` to `target` for each of the given symbols.
    pub fn add_transitions<I: IntoIterator<Item = char>>(
        &mut self,
        source: StateIndex,
        symbols: I,
        target: StateIndex,
    ) -> Result<(), BuildError> {
        symbols
            .into_iter()
            .try_for_each(|sym| self.add_transition(source, sym, target))
    }
}

impl TransitionSystem for DTS {
    fn alphabet(&self) -> &CharAlphabet {
        &self.alphabet
    }

    fn state_indices(&self) -> impl Iterator<Item = StateIndex> + '_ {
        0..(self.colors.len() as StateIndex)
    }

    fn state_color(&self, state: StateIndex) -> Option<bool> {
        self.colors.get(state as usize).copied()
    }

    fn state_name(&self, state: StateIndex) -> Option<&str> {
        self.names.get_by_left(&state).map(String::as_str)
    }

    fn find_state(&self, name: &str) -> Option<StateIndex> {
        self.names.get_by_right(name).copied()
    }

    fn edges_from(&self, state: StateIndex) -> Option<impl Iterator<Item = Edge> + '_> {
        self.transitions.get(state as usize).map(|outgoing| {
            outgoing
                .iter()
                .map(move |(&symbol, &target)| Edge::new(state, symbol, target))
        })
    }

    fn successor(&self, state: StateIndex, symbol: char) -> Option<StateIndex> {
        self.transitions.get(state as usize)?.get(&symbol).copied()
    }

    fn size(&self) -> usize {
        self.colors.len()
    }
}
