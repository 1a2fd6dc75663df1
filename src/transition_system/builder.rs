use std::ops::RangeInclusive;

use tracing::debug;

use crate::{
    alphabet::{parse_symbols, CharAlphabet, SymbolSpecError},
    automaton::DFA,
    Show,
};

use super::{BuildError, DefaultIdType, StateIndex, TransitionSystem, DTS};

/// Anything that can be turned into a list of symbols labelling a group of parallel edges.
/// A single `char` stands for itself, a string slice is interpreted as a symbol specification
/// (see [`parse_symbols`]).
pub trait IntoSymbols {
    /// Expands `self` into the symbols it denotes.
    fn into_symbols(self) -> Result<Vec<char>, SymbolSpecError>;
}

impl IntoSymbols for char {
    fn into_symbols(self) -> Result<Vec<char>, SymbolSpecError> {
        Ok(vec![self])
    }
}

impl IntoSymbols for &str {
    fn into_symbols(self) -> Result<Vec<char>, SymbolSpecError> {
        parse_symbols(self)
    }
}

impl IntoSymbols for Vec<char> {
    fn into_symbols(self) -> Result<Vec<char>, SymbolSpecError> {
        Ok(self)
    }
}

impl IntoSymbols for RangeInclusive<char> {
    fn into_symbols(self) -> Result<Vec<char>, SymbolSpecError> {
        Ok(self.collect())
    }
}

/// Helper struct for the construction of deterministic transition systems and DFAs. It stores a list of
/// edges, a list of colors and names and a default color.
///
/// # Example
///
/// We want to create a DFA with two states 0 and 1 over the alphabet `['a', 'b']`. We want to add the following transitions:
/// - From state 0 to state 0 on symbol 'a'
/// - From state 0 to state 1 on symbol 'b'
/// - From state 1 to state 1 on symbols 'a' and 'b'
///
/// Further, state 0 should be initial and rejecting while state 1 should be accepting. This can be done as follows
/// ```
/// use automata_workshop::prelude::*;
///
/// let dfa = TSBuilder::default()
///     .with_state_colors([false, true]) // colors given in the order of the states
///     .with_edges([(0, 'a', 0), (0, 'b', 1)])
///     .with_edges([(1, "a-b", 1)])
///     .into_dfa(0) // 0 is the initial state
///     .unwrap();
/// assert!(dfa.accepts("aab"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TSBuilder {
    symbols: Vec<char>,
    edges: Vec<(DefaultIdType, Vec<char>, DefaultIdType)>,
    default: bool,
    colors: Vec<(DefaultIdType, bool)>,
    names: Vec<String>,
    error: Option<SymbolSpecError>,
}

impl TSBuilder {
    /// Sets the color for states that have no color specified. Unless changed, such states are rejecting.
    pub fn default_color(mut self, color: bool) -> Self {
        self.default = color;
        self
    }

    /// By default, the only alphabet symbols in the transition system that is built
    /// are the ones that appear on at least one edge. This method can be used to force
    /// additional alphabet symbols to appear.
    pub fn with_alphabet_symbols<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        self.symbols.extend(symbols);
        self
    }

    /// Adds a list of colors to `self`. The colors are assigned to the states in the order in which they are given.
    pub fn with_state_colors<I: IntoIterator<Item = bool>>(self, iter: I) -> Self {
        iter.into_iter()
            .enumerate()
            .fold(self, |acc, (i, x)| acc.color(i as DefaultIdType, x))
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = DefaultIdType>>(self, iter: I) -> Self {
        iter.into_iter().fold(self, |acc, q| acc.color(q, true))
    }

    /// Assigns the given names to the states, in order. States without a name are called `q{index}`.
    pub fn with_state_names<I, S>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = iter.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the color of the state `idx`.
    pub fn color(mut self, idx: DefaultIdType, color: bool) -> Self {
        self.colors.push((idx, color));
        self
    }

    /// Adds a list of edges to `self`. Each edge is a triple of source, symbols and target, where the
    /// symbols can be anything that implements [`IntoSymbols`].
    pub fn with_edges<I, S>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (DefaultIdType, S, DefaultIdType)>,
        S: IntoSymbols,
    {
        for (p, symbols, q) in iter {
            match symbols.into_symbols() {
                Ok(symbols) => self.edges.push((p, symbols, q)),
                Err(e) => {
                    self.error.get_or_insert(e);
                }
            }
        }
        self
    }

    fn num_states(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|(p, _, q)| [*p, *q])
            .chain(self.colors.iter().map(|(q, _)| *q))
            .max()
            .map(|max| max as usize + 1)
            .unwrap_or(0)
            .max(self.names.len())
    }

    /// Builds a [`DTS`] from `self`. Fails if one of the given symbol specifications is invalid or the
    /// edges would make the transition system nondeterministic.
    pub fn into_dts(self) -> Result<DTS, BuildError> {
        if let Some(err) = self.error {
            return Err(err.into());
        }

        let num_states = self.num_states();
        let alphabet = CharAlphabet::from_iter(
            self.edges
                .iter()
                .flat_map(|(_, symbols, _)| symbols.iter().copied())
                .chain(self.symbols.iter().copied()),
        );
        let mut ts = DTS::for_alphabet_size_hint(alphabet, num_states);

        for i in 0..num_states {
            let color = self
                .colors
                .iter()
                .rev()
                .find_map(|(q, c)| (*q as usize == i).then_some(*c))
                .unwrap_or(self.default);
            let name = self
                .names
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("q{i}"));
            ts.add_state(name, color)?;
        }

        for (p, symbols, q) in self.edges {
            ts.add_transitions(p, symbols, q)?;
        }

        debug!(
            "built transition system with {} states and {} edges over {}",
            num_states,
            ts.edges().count(),
            ts.alphabet().show()
        );
        Ok(ts)
    }

    /// Builds a [`DFA`] with the given initial state from `self`.
    pub fn into_dfa(self, initial: StateIndex) -> Result<DFA, BuildError> {
        DFA::from_parts(self.into_dts()?, initial)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn build_with_symbol_specs() {
        let ts = TSBuilder::default()
            .with_state_colors([false, true])
            .with_edges([(0, "A-Z", 1), (1, "0-9", 1)])
            .with_alphabet_symbols(['_'])
            .into_dts()
            .unwrap();
        assert_eq!(ts.size(), 2);
        assert_eq!(ts.alphabet().size(), 26 + 10 + 1);
        assert_eq!(ts.successor(0, 'K'), Some(1));
        assert_eq!(ts.successor(1, 'K'), None);
        assert_eq!(ts.state_name(1), Some("q1"));
        assert!(ts.is_accepting(1));
    }

    #[test]
    fn names_and_default_color() {
        let ts = TSBuilder::default()
            .default_color(true)
            .color(0, false)
            .with_state_names(["start", "end"])
            .with_edges([(0, 'x', 1)])
            .into_dts()
            .unwrap();
        assert_eq!(ts.find_state("end"), Some(1));
        assert!(!ts.is_accepting(0));
        assert!(ts.is_accepting(1));
    }

    #[test]
    fn builder_errors() {
        assert!(matches!(
            TSBuilder::default().with_edges([(0, "9-0", 1)]).into_dts(),
            Err(BuildError::Symbols(SymbolSpecError::InvertedRange('9', '0')))
        ));
        assert!(matches!(
            TSBuilder::default()
                .with_edges([(0, 'a', 1), (0, 'a', 0)])
                .into_dts(),
            Err(BuildError::Conflict { .. })
        ));
        assert!(matches!(
            TSBuilder::default().with_edges([(0, 'a', 0)]).into_dfa(3),
            Err(BuildError::UnknownState(3))
        ));
    }
}
