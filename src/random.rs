use fastrand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::prelude::*;

/// Generate a random `String` over the universe of the `alphabet`. The length of the `String` is
/// drawn uniformly from the range `min_len..=max_len`. Over an empty alphabet only the empty word
/// can be produced.
pub fn generate_random_word(
    rng: &mut Rng,
    alphabet: &CharAlphabet,
    min_len: usize,
    max_len: usize,
) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    let length = rng.usize(min_len..=max_len.max(min_len));
    (0..length)
        .map(|_| alphabet[rng.usize(..alphabet.size())])
        .collect()
}

/// Draws `count` words of length at most `max_len` over `alphabet`. The words are determined by
/// `seed`, so the same arguments always yield the same sample. Duplicates are possible.
pub fn random_words(alphabet: &CharAlphabet, count: usize, max_len: usize, seed: u64) -> Vec<String> {
    let mut rng = Rng::with_seed(seed);
    let words: Vec<_> = (0..count)
        .map(|_| generate_random_word(&mut rng, alphabet, 0, max_len))
        .collect();
    debug!(
        "drew {} random words over {} with seed {seed}",
        words.len(),
        alphabet.show()
    );
    words
}

/// The largest number of symbols a randomly generated automaton can use, its alphabet consists of
/// the first lowercase letters.
pub const MAX_RANDOM_SYMBOLS: usize = 26;

/// Invalid parameters for [`generate_random_dfa`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RandomError {
    /// More symbols than there are lowercase letters were requested.
    #[error("at most {MAX_RANDOM_SYMBOLS} symbols are supported, got {0}")]
    TooManySymbols(usize),
    /// The back edge probability has to lie in `(0, 1]`, otherwise new states keep being created.
    #[error("back edge probability must be in (0, 1], got {0}")]
    InvalidProbability(f64),
    /// Growing the transition system failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Uses sprout-like algorithm to generate a random DFA. `symbols` determines the number of distinct
/// symbols in the [`CharAlphabet`], `probability` the probability of a back edge to some existing
/// state being inserted. The algorithm works as follows:
/// 1. Start with a single state.
/// 2. For each state and each symbol, go through the existing states in order and with probability
///    `probability` add an edge to that state.
/// 3. If no such edge was added, insert an edge to a new state.
/// 4. Repeat until all states and symbols have been treated.
///
/// Every state is accepting with probability one half. The result is complete and all states are
/// reachable from the initial state `0`. Fails if `symbols` exceeds [`MAX_RANDOM_SYMBOLS`] or
/// `probability` is not in `(0, 1]`.
pub fn generate_random_dfa(symbols: usize, probability: f64, seed: u64) -> Result<DFA, RandomError> {
    if symbols > MAX_RANDOM_SYMBOLS {
        return Err(RandomError::TooManySymbols(symbols));
    }
    if !(probability > 0.0 && probability <= 1.0) {
        return Err(RandomError::InvalidProbability(probability));
    }
    let mut rng = Rng::with_seed(seed);
    let alphabet = CharAlphabet::of_size(symbols);
    let mut dts = DTS::new(alphabet.clone());

    let mut next_name = 0usize;
    let mut add_state = |dts: &mut DTS, rng: &mut Rng| {
        let name = format!("q{next_name}");
        next_name += 1;
        dts.add_state(name, rng.bool())
    };

    add_state(&mut dts, &mut rng)?;
    let mut current: StateIndex = 0;
    while (current as usize) < dts.size() {
        for symbol in alphabet.universe() {
            let back_edge = (0..=current).find(|_| rng.f64() < probability);
            let target = match back_edge {
                Some(target) => target,
                None => add_state(&mut dts, &mut rng)?,
            };
            dts.add_transition(current, symbol, target)?;
        }
        current += 1;
    }

    debug!("generated random DFA with {} states", dts.size());
    Ok(DFA::from_parts(dts, 0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn words_are_reproducible() {
        let alphabet = CharAlphabet::parse("ab").unwrap();
        let first = random_words(&alphabet, 20, 5, 42);
        assert_eq!(first, random_words(&alphabet, 20, 5, 42));
        assert_eq!(first.len(), 20);
        assert!(first
            .iter()
            .all(|w| w.len() <= 5 && w.chars().all(|c| alphabet.contains(c))));

        assert!(random_words(&CharAlphabet::default(), 3, 5, 1)
            .iter()
            .all(String::is_empty));
    }

    #[test]
    fn random_dfa_is_complete() {
        for seed in 0..10 {
            let dfa = generate_random_dfa(2, 0.5, seed).unwrap();
            assert!(dfa.is_complete());
            assert_eq!(dfa.reachable_state_indices().count(), dfa.size());
            assert_eq!(dfa.alphabet().size(), 2);
        }
        assert_eq!(generate_random_dfa(1, 1.0, 3).unwrap().size(), 1);
    }

    #[test]
    fn random_dfa_rejects_bad_parameters() {
        assert_eq!(
            generate_random_dfa(27, 0.5, 0).unwrap_err(),
            RandomError::TooManySymbols(27)
        );
        assert_eq!(
            generate_random_dfa(2, 0.0, 0).unwrap_err(),
            RandomError::InvalidProbability(0.0)
        );
        assert!(matches!(
            generate_random_dfa(2, f64::NAN, 0),
            Err(RandomError::InvalidProbability(_))
        ));
        assert!(generate_random_dfa(2, 1.5, 0).is_err());
    }
}
