use itertools::Itertools;

use crate::alphabet::compress;

use super::{StateIndex, TransitionSystem};

/// Alphabets with at most this many symbols get one column per symbol, larger ones are
/// abbreviated to a few representatives.
pub const FULL_TABLE_LIMIT: usize = 12;

/// A transition table lists one row per state and one column per symbol, each cell contains the name of
/// the successor state or `-` if the transition is undefined. The initial state is prefixed with `→`
/// and accepting states with `*`.
///
/// For large alphabets, listing every symbol is not helpful. If the alphabet has more than
/// [`FULL_TABLE_LIMIT`] symbols, only a selection of columns is shown, which can be given explicitly
/// through [`TransitionTable::with_columns`] and otherwise consists of
/// [`representatives`](crate::alphabet::CharAlphabet::representatives) of the alphabet.
#[derive(Debug, Clone)]
pub struct TransitionTable<'a, T> {
    ts: &'a T,
    initial: Option<StateIndex>,
    columns: Vec<char>,
}

impl<'a, T: TransitionSystem> TransitionTable<'a, T> {
    /// Creates a table for `ts` with the default column selection.
    pub fn new(ts: &'a T) -> Self {
        let columns = if ts.alphabet().size() <= FULL_TABLE_LIMIT {
            ts.alphabet().universe().collect()
        } else {
            ts.alphabet().representatives()
        };
        Self {
            ts,
            initial: None,
            columns,
        }
    }

    /// Marks `initial` as the initial state.
    pub fn with_initial(mut self, initial: StateIndex) -> Self {
        self.initial = Some(initial);
        self
    }

    /// Uses the given sample symbols as columns, unless the alphabet is small enough to show all
    /// symbols or `samples` is empty.
    pub fn with_columns<I: IntoIterator<Item = char>>(mut self, samples: I) -> Self {
        let samples = samples.into_iter().collect_vec();
        if self.ts.alphabet().size() > FULL_TABLE_LIMIT && !samples.is_empty() {
            self.columns = samples;
        }
        self
    }

    /// The symbols that are shown as columns.
    pub fn columns(&self) -> &[char] {
        &self.columns
    }

    fn state_label(&self, q: StateIndex) -> String {
        format!(
            "{}{}{}",
            if self.initial == Some(q) { "→" } else { "" },
            if self.ts.is_accepting(q) { "*" } else { "" },
            self.ts.show_state(q)
        )
    }

    /// Returns the rows of the table, the first one being the header.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let header = std::iter::once("State".to_string())
            .chain(self.columns.iter().map(|c| c.to_string()))
            .collect_vec();
        std::iter::once(header)
            .chain(self.ts.state_indices().map(|q| {
                std::iter::once(self.state_label(q))
                    .chain(self.columns.iter().map(|&sym| {
                        self.ts
                            .successor(q, sym)
                            .map(|p| self.ts.show_state(p))
                            .unwrap_or_else(|| "-".to_string())
                    }))
                    .collect_vec()
            }))
            .collect()
    }

    /// Renders the table with rounded borders.
    pub fn render(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        for row in self.rows() {
            builder.push_record(row);
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<T: TransitionSystem> std::fmt::Display for TransitionTable<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Describes the outgoing transitions of every state in one line, for example `0-9 → q2, a-z → q1 (loop)`.
/// Parallel transitions are merged and their symbols compressed into ranges.
pub fn pattern_summary<T: TransitionSystem>(ts: &T) -> Vec<(String, String)> {
    ts.state_indices()
        .map(|q| {
            let groups = ts.grouped_edges_from(q);
            let description = if groups.is_empty() {
                "no transitions".to_string()
            } else {
                groups
                    .into_iter()
                    .map(|(p, symbols)| {
                        format!(
                            "{} → {}{}",
                            compress(symbols),
                            ts.show_state(p),
                            if p == q { " (loop)" } else { "" }
                        )
                    })
                    .join(", ")
            };
            (ts.show_state(q), description)
        })
        .collect()
}
