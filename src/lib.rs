//! Library for defining, simulating and inspecting deterministic finite automata over `char` alphabets.
//!
//! An automaton consists of a transition system (TS) together with an acceptance component. A TS is a finite
//! collection of states (the set of all states is denoted $Q$) that are connected by directed edges, each
//! labelled with a single symbol. Every state carries a color, for a [`DFA`](automaton::DFA) the color is a
//! `bool` that is `true` precisely if the state is accepting. The transition function is allowed to be
//! partial, a missing transition behaves like an implicit rejecting sink (sometimes called the dead state).
//!
//! The most important traits are [`TransitionSystem`], which provides access to the states and their outgoing
//! edges, and [`Pointed`], which picks out a designated initial state and on top of that provides runs,
//! reachability and the like. The concrete representation is [`transition_system::DTS`], it can be grown
//! state by state or assembled in one go through a [`transition_system::TSBuilder`].
//!
//! Besides that, the crate contains
//! - a [`catalog`] of the four workshop automata (pattern over `{a, b}`, identifiers, license plates and
//!   institutional e-mail addresses) together with their sample words,
//! - a loader for automata described in TOML documents, see [`definition`],
//! - transition tables, pattern summaries and Graphviz output, see [`transition_system::table`] and
//!   [`transition_system::dot`].
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_workshop::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{compress, parse_symbols, CharAlphabet, SymbolSpecError},
        automaton::DFA,
        catalog::{Catalog, Exercise},
        definition::{AutomatonDefinition, DefinitionError},
        math,
        transition_system::{
            dot::Dottable,
            run::{Run, RunOutcome},
            table::TransitionTable,
            BuildError, Edge, StateIndex, TSBuilder, TransitionSystem, DTS,
        },
        word::FiniteWord,
        Pointed, Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets and symbol specifications.
pub mod alphabet;

/// Module that contains definitions for dealing with finite words.
pub mod word;

/// This module defines transition systems, runs, tables and their graphical representation.
pub mod transition_system;
pub use transition_system::{Pointed, TransitionSystem};

/// Defines deterministic finite automata and the language level operations on them.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;

/// The built-in workshop automata.
pub mod catalog;

/// Loading automata from TOML documents.
pub mod definition;

/// Implements the generation of random words. This is feature gated behind the `random` feature.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// Helper trait which can be used to display states, words, alphabets and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a word that should be
    /// for example `"abba"` and for a boolean state color it is `+` or `-`.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    /// By default the elements are shown individually and joined with commas.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
        I::IntoIter: DoubleEndedIterator,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
    fn show_collection<'a, I: IntoIterator<Item = &'a Self>>(iter: I) -> String
    where
        Self: 'a,
        I::IntoIter: DoubleEndedIterator,
    {
        format!("[{}]", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for u32 {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The DFA from the wikipedia article on DFA minimization, it accepts the language `a*ba*`.
    pub fn wiki_dfa() -> DFA {
        TSBuilder::default()
            .with_state_colors([false, false, true, true, true, false])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'a', 0),
                (1, 'b', 3),
                (2, 'a', 4),
                (2, 'b', 5),
                (3, 'a', 4),
                (3, 'b', 5),
                (4, 'a', 4),
                (4, 'b', 5),
                (5, 'a', 5),
                (5, 'b', 5),
            ])
            .into_dfa(0)
            .unwrap()
    }

    #[test]
    fn show_words_and_colors() {
        assert_eq!(vec!['a', 'b', 'b'].show(), "\"abb\"");
        assert_eq!(true.show(), "+");
        assert_eq!(vec![1usize, 2].show(), "[1, 2]");
    }

    #[test]
    fn wiki_dfa_runs() {
        let dfa = wiki_dfa();
        assert!(dfa.accepts("b"));
        assert!(dfa.accepts("aab"));
        assert!(!dfa.accepts("ab".repeat(3).as_str()));
        assert!(!dfa.accepts(""));
    }
}
