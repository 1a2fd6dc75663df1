use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::trace;

use crate::{word::FiniteWord, Show};

use super::{StateIndex, TransitionSystem};

/// Describes how a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The whole word was read and the reached state is accepting.
    Accepted,
    /// The whole word was read but the reached state is not accepting.
    EndedInRejecting(StateIndex),
    /// No transition is defined for `symbol` in `state`, the symbol sits at `position` in the word.
    MissingTransition {
        /// The state in which the run got stuck.
        state: StateIndex,
        /// The symbol that could not be read.
        symbol: char,
        /// Zero based position of `symbol` in the word.
        position: usize,
    },
    /// The word contains a symbol that does not belong to the alphabet.
    ForeignSymbol {
        /// The offending symbol.
        symbol: char,
        /// Zero based position of `symbol` in the word.
        position: usize,
    },
}

/// The result of feeding a finite word to a transition system.
///
/// A run starts in some state, which is always the first element of the [`path`](Run::path). Then the symbols
/// are read one by one. Reading stops early if a symbol is not part of the alphabet or if there is no
/// transition for it, in both cases the word is rejected and the path ends in the state that was reached last.
/// Otherwise the outcome depends on whether the state reached after the last symbol is accepting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    word: Vec<char>,
    path: Vec<StateIndex>,
    reached: StateIndex,
    outcome: RunOutcome,
}

impl Run {
    pub(crate) fn execute<T: TransitionSystem, W: FiniteWord>(
        ts: &T,
        from: StateIndex,
        word: W,
    ) -> Self {
        let word = word.to_vec();
        let mut path = Vec::with_capacity(word.len() + 1);
        path.push(from);
        let mut current = from;

        for (position, &symbol) in word.iter().enumerate() {
            if !ts.alphabet().contains(symbol) {
                trace!("symbol {symbol:?} at position {position} is not in the alphabet");
                return Self {
                    word,
                    path,
                    reached: current,
                    outcome: RunOutcome::ForeignSymbol { symbol, position },
                };
            }
            let Some(next) = ts.successor(current, symbol) else {
                trace!(
                    "no transition from {} on {symbol:?} at position {position}",
                    ts.show_state(current)
                );
                return Self {
                    word,
                    path,
                    reached: current,
                    outcome: RunOutcome::MissingTransition {
                        state: current,
                        symbol,
                        position,
                    },
                };
            };
            trace!(
                "{} --{symbol}--> {}",
                ts.show_state(current),
                ts.show_state(next)
            );
            path.push(next);
            current = next;
        }

        let outcome = if ts.is_accepting(current) {
            RunOutcome::Accepted
        } else {
            RunOutcome::EndedInRejecting(current)
        };
        Self {
            word,
            path,
            reached: current,
            outcome,
        }
    }

    /// Returns true if the word was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, RunOutcome::Accepted)
    }

    /// Returns `"Accepted"` or `"Rejected"`.
    pub fn verdict(&self) -> &'static str {
        if self.is_accepted() {
            "Accepted"
        } else {
            "Rejected"
        }
    }

    /// Like [`Run::verdict`], but colored green or red for terminal output.
    pub fn colored_verdict(&self) -> String {
        if self.is_accepted() {
            self.verdict().green().bold().to_string()
        } else {
            self.verdict().red().bold().to_string()
        }
    }

    /// The word that was read.
    pub fn word(&self) -> &[char] {
        &self.word
    }

    /// The sequence of visited states, starting with the state the run started in.
    pub fn path(&self) -> &[StateIndex] {
        &self.path
    }

    /// How the run ended.
    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    /// The state in which the run ended.
    pub fn reached(&self) -> StateIndex {
        self.reached
    }

    /// The number of symbols that were successfully read.
    pub fn consumed(&self) -> usize {
        self.path.len() - 1
    }

    /// Renders the path using the state names of `ts`, e.g. `q0 → q1 → q4`.
    pub fn show_path<T: TransitionSystem>(&self, ts: &T) -> String {
        self.path.iter().map(|&q| ts.show_state(q)).join(" → ")
    }

    /// Explains the outcome in words, using the state names of `ts`.
    pub fn explain<T: TransitionSystem>(&self, ts: &T) -> String {
        match self.outcome {
            RunOutcome::Accepted => format!("ends in accepting state {}", ts.show_state(self.reached())),
            RunOutcome::EndedInRejecting(q) => {
                format!("ends in non-accepting state {}", ts.show_state(q))
            }
            RunOutcome::MissingTransition {
                state,
                symbol,
                position,
            } => format!(
                "no transition from {} on '{symbol}' (position {position})",
                ts.show_state(state)
            ),
            RunOutcome::ForeignSymbol { symbol, position } => format!(
                "'{symbol}' (position {position}) is not in {}",
                ts.alphabet().show()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn ends_with_b() -> DFA {
        TSBuilder::default()
            .with_state_colors([false, true])
            .with_edges([(0, 'a', 0), (0, 'b', 1), (1, 'b', 1)])
            .into_dfa(0)
            .unwrap()
    }

    #[test_log::test]
    fn accepted_and_rejected_runs() {
        let dfa = ends_with_b();

        let run = dfa.run("aab");
        assert!(run.is_accepted());
        assert_eq!(run.path(), &[0, 0, 0, 1]);
        assert_eq!(run.show_path(&dfa), "q0 → q0 → q0 → q1");
        assert_eq!(run.verdict(), "Accepted");
        assert!(run.colored_verdict().contains("Accepted"));

        let run = dfa.run("aa");
        assert_eq!(run.outcome(), RunOutcome::EndedInRejecting(0));
        assert_eq!(run.consumed(), 2);
    }

    #[test]
    fn runs_stop_early() {
        let dfa = ends_with_b();

        let run = dfa.run("aba");
        assert_eq!(
            run.outcome(),
            RunOutcome::MissingTransition {
                state: 1,
                symbol: 'a',
                position: 2
            }
        );
        assert_eq!(run.path(), &[0, 0, 1]);
        assert_eq!(run.explain(&dfa), "no transition from q1 on 'a' (position 2)");

        let run = dfa.run("ac");
        assert_eq!(
            run.outcome(),
            RunOutcome::ForeignSymbol {
                symbol: 'c',
                position: 1
            }
        );
        assert_eq!(run.consumed(), 1);
        assert_eq!(run.reached(), 0);
        assert!(!run.is_accepted());
    }

    #[test]
    fn empty_word() {
        let dfa = ends_with_b();
        let run = dfa.run("");
        assert_eq!(run.path(), &[0]);
        assert!(!run.is_accepted());
    }
}
