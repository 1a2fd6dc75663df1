use std::{path::Path, str::FromStr};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    alphabet::{parse_symbols, SymbolSpecError},
    automaton::DFA,
    math::{Map, Set},
    transition_system::{BuildError, StateIndex, DTS},
    TransitionSystem,
};

/// Errors that can occur while loading an automaton definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The document could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The document is not valid TOML or does not have the expected shape.
    #[error("malformed definition: {0}")]
    Toml(#[from] toml::de::Error),
    /// The initial state is neither declared nor used by a transition.
    #[error("initial state \"{0}\" does not exist")]
    UnknownInitial(String),
    /// An accepting state is neither declared nor used by a transition.
    #[error("accepting state \"{0}\" does not exist")]
    UnknownAccepting(String),
    /// A symbol specification is invalid.
    #[error(transparent)]
    Symbols(#[from] SymbolSpecError),
    /// The transitions do not form a deterministic transition system.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// A single group of parallel transitions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionDefinition {
    /// Name of the source state.
    pub from: String,
    /// Symbol specification, e.g. `a-z` or `@`.
    pub on: String,
    /// Name of the target state.
    pub to: String,
}

/// Description of a DFA in a TOML document, for example
/// ```toml
/// name = "ends-in-b"
/// initial = "q0"
/// accepting = ["q1"]
///
/// [[transition]]
/// from = "q0"
/// on = "a"
/// to = "q0"
///
/// [[transition]]
/// from = "q0"
/// on = "b"
/// to = "q1"
/// ```
/// States are created in the order in which they are listed in `states`, followed by those that are
/// first mentioned in a transition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutomatonDefinition {
    /// Optional name of the automaton.
    pub name: Option<String>,
    /// Name of the initial state.
    pub initial: String,
    /// Names of the accepting states.
    #[serde(default)]
    pub accepting: Vec<String>,
    /// States that should exist regardless of the transitions, in this order.
    #[serde(default)]
    pub states: Vec<String>,
    /// Symbols that belong to the alphabet even if no transition uses them.
    #[serde(default)]
    pub alphabet: Option<String>,
    /// The transitions.
    #[serde(default, rename = "transition")]
    pub transitions: Vec<TransitionDefinition>,
}

impl AutomatonDefinition {
    /// Reads and parses the definition stored at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        debug!("loading automaton definition from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        contents.parse()
    }

    fn state_order(&self) -> Vec<&str> {
        let mut seen = Set::default();
        self.states
            .iter()
            .map(String::as_str)
            .chain(
                self.transitions
                    .iter()
                    .flat_map(|t| [t.from.as_str(), t.to.as_str()]),
            )
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Builds the DFA that is described by `self`.
    pub fn into_dfa(self) -> Result<DFA, DefinitionError> {
        let order = self.state_order();
        if let Some(missing) = self.accepting.iter().find(|q| !order.contains(&q.as_str())) {
            return Err(DefinitionError::UnknownAccepting(missing.clone()));
        }

        let symbols = match &self.alphabet {
            Some(spec) => parse_symbols(spec)?,
            None => vec![],
        };
        let mut ts = DTS::default().with_symbols(symbols);
        let mut indices: Map<&str, StateIndex> = Map::default();
        for name in order {
            let idx = ts.add_state(name, self.accepting.iter().any(|q| q == name))?;
            indices.insert(name, idx);
        }

        for transition in &self.transitions {
            ts.add_transitions(
                indices[transition.from.as_str()],
                parse_symbols(&transition.on)?,
                indices[transition.to.as_str()],
            )?;
        }

        let initial: StateIndex = ts
            .find_state(&self.initial)
            .ok_or_else(|| DefinitionError::UnknownInitial(self.initial.clone()))?;
        debug!(
            "loaded automaton with {} states over {} symbols",
            ts.size(),
            ts.alphabet().size()
        );

        let dfa = DFA::from_parts(ts, initial)?;
        Ok(match self.name {
            Some(name) => dfa.with_name(name),
            None => dfa,
        })
    }
}

impl FromStr for AutomatonDefinition {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    const EMAIL: &str = r#"
name = "short-mail"
initial = "start"
accepting = ["done"]
states = ["start", "local", "at"]
alphabet = "a-z0-9@."

[[transition]]
from = "start"
on = "a-z"
to = "local"

[[transition]]
from = "local"
on = "a-z0-9"
to = "local"

[[transition]]
from = "local"
on = "@"
to = "at"

[[transition]]
from = "at"
on = "x"
to = "done"
"#;

    #[test_log::test]
    fn load_definition() {
        let dfa = EMAIL
            .parse::<AutomatonDefinition>()
            .unwrap()
            .into_dfa()
            .unwrap();
        assert_eq!(dfa.name(), Some("short-mail"));
        assert_eq!(dfa.size(), 4);
        assert_eq!(dfa.find_state("done"), Some(3));
        assert_eq!(dfa.alphabet().size(), 38);
        assert!(dfa.accepts("ab1@x"));
        assert!(!dfa.accepts("1ab@x"));
        assert!(matches!(
            dfa.run("a.b").outcome(),
            RunOutcome::MissingTransition { symbol: '.', position: 1, .. }
        ));
    }

    #[test]
    fn states_appear_in_order_of_mention() {
        let dfa = r#"
initial = "b"
[[transition]]
from = "a"
on = "0"
to = "b"
[[transition]]
from = "b"
on = "1"
to = "c"
"#
        .parse::<AutomatonDefinition>()
        .unwrap()
        .into_dfa()
        .unwrap();
        assert_eq!(dfa.name(), None);
        assert_eq!(dfa.state_name(0), Some("a"));
        assert_eq!(dfa.initial(), 1);
        assert!(dfa.is_empty_language());
    }

    #[test]
    fn definition_errors() {
        let load = |s: &str| s.parse::<AutomatonDefinition>().and_then(|d| d.into_dfa());

        assert!(matches!(
            load("initial = \"nowhere\"\nstates = [\"q0\"]"),
            Err(DefinitionError::UnknownInitial(q)) if q == "nowhere"
        ));
        assert!(matches!(
            load("initial = \"q0\"\nstates = [\"q0\"]\naccepting = [\"q1\"]"),
            Err(DefinitionError::UnknownAccepting(q)) if q == "q1"
        ));
        assert!(matches!(
            load("initial = \"q0\"\n[[transition]]\nfrom = \"q0\"\non = \"z-a\"\nto = \"q0\""),
            Err(DefinitionError::Symbols(_))
        ));
        assert!(matches!(
            load("initial = \"q0\"\n[[transition]]\nfrom = \"q0\"\non = \"a\"\nto = \"q0\"\n[[transition]]\nfrom = \"q0\"\non = \"a-c\"\nto = \"q1\""),
            Err(DefinitionError::Build(BuildError::Conflict { symbol: 'a', .. }))
        ));
        assert!(matches!(load("initial = 3"), Err(DefinitionError::Toml(_))));
        assert!(matches!(
            load("initial = \"q0\"\nstates = [\"q0\"]\nfinal = [\"q0\"]"),
            Err(DefinitionError::Toml(_))
        ));
        assert!(matches!(
            AutomatonDefinition::from_path("/definitely/not/here.toml"),
            Err(DefinitionError::Io { .. })
        ));
    }
}
