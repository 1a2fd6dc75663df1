/// A finite word is anything that can produce a finite sequence of symbols. This allows
/// runs to be started from string slices as well as from collected symbol vectors.
pub trait FiniteWord {
    /// Iterates over the symbols of the word in order.
    fn symbols(&self) -> impl Iterator<Item = char> + '_;

    /// Collects the symbols into a vector.
    fn to_vec(&self) -> Vec<char> {
        self.symbols().collect()
    }

    /// The number of symbols in the word.
    fn len(&self) -> usize {
        self.symbols().count()
    }

    /// Returns true if the word has no symbols.
    fn is_empty(&self) -> bool {
        self.symbols().next().is_none()
    }
}

impl FiniteWord for str {
    fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.chars()
    }
}

impl FiniteWord for String {
    fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.chars()
    }
}

impl FiniteWord for [char] {
    fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.iter().copied()
    }
}

impl FiniteWord for Vec<char> {
    fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.iter().copied()
    }
}

impl<W: FiniteWord + ?Sized> FiniteWord for &W {
    fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        W::symbols(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::FiniteWord;

    #[test]
    fn words_from_different_sources() {
        assert_eq!(FiniteWord::to_vec("ab"), vec!['a', 'b']);
        assert_eq!(FiniteWord::len(&String::from("ñu")), 2);
        assert!(FiniteWord::is_empty(""));
        assert_eq!(FiniteWord::len(&vec!['x', 'y']), 2);
    }
}
