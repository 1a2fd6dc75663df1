use itertools::Itertools;
use thiserror::Error;

use crate::Show;

/// Errors that can occur while expanding a symbol specification such as `"a-z0-9"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolSpecError {
    /// The specification contains no characters at all.
    #[error("symbol specification is empty")]
    Empty,
    /// A range whose lower end is larger than its upper end, like `z-a`.
    #[error("range '{0}-{1}' is inverted")]
    InvertedRange(char, char),
}

/// Represents an alphabet where a symbol is just a single `char`.
///
/// The symbols are kept sorted and free of duplicates, so iterating over the [`universe`](CharAlphabet::universe)
/// always yields them in ascending order. This is the order in which transition tables list their columns.
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord, Default)]
pub struct CharAlphabet(Vec<char>);

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] from the given symbols, duplicates are removed.
    pub fn new(symbols: Vec<char>) -> Self {
        Self::from_iter(symbols)
    }

    /// Creates a new [`CharAlphabet`] from a symbol specification, see [`parse_symbols`].
    pub fn parse(spec: &str) -> Result<Self, SymbolSpecError> {
        parse_symbols(spec).map(Self::from_iter)
    }

    /// Creates a new [`CharAlphabet`] alphabet of the given size. The symbols are just the first `size` letters
    /// of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }

    /// Number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `symbol` is part of the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.0.binary_search(&symbol).is_ok()
    }

    /// Iterates over all symbols in ascending order.
    pub fn universe(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Returns the position of `symbol` in the ascending order of the alphabet.
    pub fn position(&self, symbol: char) -> Option<usize> {
        self.0.binary_search(&symbol).ok()
    }

    /// Returns the symbol at position `pos`.
    pub fn nth(&self, pos: usize) -> Option<char> {
        self.0.get(pos).copied()
    }

    /// Adds the given symbols to `self`.
    pub fn extend<I: IntoIterator<Item = char>>(&mut self, symbols: I) {
        self.0.extend(symbols);
        self.0.sort_unstable();
        self.0.dedup();
    }

    /// Returns the union of `self` and `other`.
    pub fn union(&self, other: &CharAlphabet) -> CharAlphabet {
        self.universe().chain(other.universe()).collect()
    }

    /// Picks a handful of representative symbols: the first two and the last symbol
    /// of every run of consecutive code points. For `A-Z` this gives `A`, `B` and `Z`.
    pub fn representatives(&self) -> Vec<char> {
        runs(&self.0)
            .into_iter()
            .flat_map(|run| {
                if run.len() <= 3 {
                    run
                } else {
                    vec![run[0], run[1], run[run.len() - 1]]
                }
            })
            .collect()
    }
}

impl FromIterator<char> for CharAlphabet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self(iter.into_iter().unique().sorted().collect())
    }
}

impl std::ops::Index<usize> for CharAlphabet {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_collection<'a, I: IntoIterator<Item = &'a Self>>(iter: I) -> String
    where
        Self: 'a,
        I::IntoIter: DoubleEndedIterator,
    {
        format!("\"{}\"", iter.into_iter().join(""))
    }
}

impl Show for CharAlphabet {
    fn show(&self) -> String {
        format!("{{{}}}", compress(self.universe()))
    }
}

/// Expands a symbol specification into the symbols it denotes.
///
/// A specification is a string in which `x-y` denotes the inclusive range of all characters from
/// `x` to `y` and every other character stands for itself. A `-` at the very beginning or end
/// is taken literally, so `"a-z0-9@."` and `"+-"` are both valid.
/// ```
/// use automata_workshop::alphabet::parse_symbols;
/// assert_eq!(parse_symbols("a-c@").unwrap(), vec!['@', 'a', 'b', 'c']);
/// ```
pub fn parse_symbols(spec: &str) -> Result<Vec<char>, SymbolSpecError> {
    let chars = spec.chars().collect_vec();
    if chars.is_empty() {
        return Err(SymbolSpecError::Empty);
    }

    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len() && chars[i + 1] == '-' {
            let (from, to) = (chars[i], chars[i + 2]);
            if from > to {
                return Err(SymbolSpecError::InvertedRange(from, to));
            }
            out.extend(from..=to);
            i += 3;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out.into_iter().unique().sorted().collect())
}

/// Splits a sorted, duplicate free slice of symbols into maximal runs of consecutive code points.
fn runs(symbols: &[char]) -> Vec<Vec<char>> {
    let mut out: Vec<Vec<char>> = vec![];
    for &sym in symbols {
        match out.last_mut() {
            Some(run) if run.last().map(|&l| l as u32 + 1) == Some(sym as u32) => run.push(sym),
            _ => out.push(vec![sym]),
        }
    }
    out
}

/// Renders a set of symbols compactly. Runs of at least three consecutive characters are
/// collapsed into a range `x-y`, everything else is listed individually. The items are
/// separated by commas, e.g. `['a', 'b', '0', '1', '2', '@']` becomes `0-2,@,a,b`.
pub fn compress<I: IntoIterator<Item = char>>(symbols: I) -> String {
    let sorted = symbols.into_iter().unique().sorted().collect_vec();
    runs(&sorted)
        .into_iter()
        .flat_map(|run| {
            if run.len() >= 3 {
                vec![format!("{}-{}", run[0], run[run.len() - 1])]
            } else {
                run.into_iter().map(|c| c.to_string()).collect()
            }
        })
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ranges_and_literals() {
        let symbols = parse_symbols("A-Z0-9").unwrap();
        assert_eq!(symbols.len(), 36);
        assert_eq!(symbols[0], '0');

        assert_eq!(parse_symbols("-a").unwrap(), vec!['-', 'a']);
        assert_eq!(parse_symbols("a-").unwrap(), vec!['-', 'a']);
        assert_eq!(parse_symbols("@").unwrap(), vec!['@']);
        assert_eq!(parse_symbols("aab").unwrap(), vec!['a', 'b']);
    }

    #[test]
    fn parse_rejects_bad_specs() {
        assert_eq!(parse_symbols(""), Err(SymbolSpecError::Empty));
        assert_eq!(
            parse_symbols("z-a"),
            Err(SymbolSpecError::InvertedRange('z', 'a'))
        );
    }

    #[test]
    fn compression() {
        assert_eq!(compress("abcdefghijklmnopqrstuvwxyz".chars()), "a-z");
        assert_eq!(compress(['b', 'a']), "a,b");
        assert_eq!(compress("123456789".chars()), "1-9");
        assert_eq!(compress(['0']), "0");
        assert_eq!(compress("@.a0123".chars()), ".,0-3,@,a");
    }

    #[test]
    fn alphabet_basics() {
        let alphabet = CharAlphabet::parse("A-Z0-9").unwrap();
        assert_eq!(alphabet.size(), 36);
        assert!(alphabet.contains('Q'));
        assert!(!alphabet.contains('q'));
        assert_eq!(alphabet.position('0'), Some(0));
        assert_eq!(alphabet.representatives(), vec!['0', '1', '9', 'A', 'B', 'Z']);
        assert_eq!(CharAlphabet::of_size(2).show(), "{a,b}");
    }
}
