use tracing::debug;

use crate::{
    automaton::DFA,
    transition_system::{table::TransitionTable, BuildError, TSBuilder},
};

/// The domain that the e-mail validator requires after the `@`.
pub const EMAIL_DOMAIN: &str = "uptc.edu.co";

/// One of the workshop automata, together with the material that accompanies it: the words it is
/// tested on, the symbols that make a readable excerpt of its transition table and a description
/// of the recognized language.
#[derive(Debug, Clone)]
pub struct Exercise {
    id: &'static str,
    legacy_name: &'static str,
    title: &'static str,
    pattern: &'static str,
    dfa: DFA,
    samples: Vec<&'static str>,
    columns: Vec<char>,
    analysis: Vec<&'static str>,
}

impl Exercise {
    /// The identifier under which the exercise is found in the [`Catalog`].
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The name of the script in which the exercise was originally handed in, e.g. `at1ej1`.
    pub fn legacy_name(&self) -> &'static str {
        self.legacy_name
    }

    /// A human readable title.
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// A regular expression like description of the recognized language.
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// The automaton.
    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }

    /// The words the automaton is demonstrated on.
    pub fn sample_words(&self) -> &[&'static str] {
        &self.samples
    }

    /// Symbols used as columns of the abbreviated transition table.
    pub fn table_columns(&self) -> &[char] {
        &self.columns
    }

    /// Lines of prose that analyse the recognized language.
    pub fn analysis(&self) -> &[&'static str] {
        &self.analysis
    }

    /// The transition table of the automaton restricted to the sample columns.
    pub fn transition_table(&self) -> TransitionTable<'_, DFA> {
        self.dfa
            .transition_table()
            .with_columns(self.columns.iter().copied())
    }
}

/// Pattern over `{a, b}`: q0..q4 with q4 accepting and q3 acting as a dead state after `bb`.
fn ab_pattern() -> Result<Exercise, BuildError> {
    let dfa = TSBuilder::default()
        .with_accepting([4])
        .with_edges([
            (0, 'a', 1),
            (0, 'b', 2),
            (1, 'a', 4),
            (1, 'b', 2),
            (2, 'a', 4),
            (2, 'b', 3),
            (4, 'a', 4),
            (4, 'b', 2),
        ])
        .into_dfa(0)?
        .with_name("ab-pattern");
    Ok(Exercise {
        id: "ab-pattern",
        legacy_name: "at1ej1",
        title: "Finite automaton over {a, b}",
        pattern: "(a|b)(a|ba)*a without bb",
        dfa,
        samples: vec![
            "abba",
            "aababaabb",
            "abaababa",
            "abbabba",
            "abababababab",
            "babbaaaba",
            "bbbbbbb",
            "aaaaaaa",
            "abaababa",
            "ababba",
            "abaaaaabaaaa",
            "aabbbaaa",
        ],
        columns: vec![],
        analysis: vec![
            "Every word of length at least two that ends in 'a' leads to q4.",
            "Two consecutive b's lead to q3, which has no outgoing transitions.",
            "L = {w ∈ {a,b}* | |w| ≥ 2, w ends in 'a' and w does not contain bb}",
        ],
    })
}

/// Identifiers: one uppercase letter, any number of lowercase letters and at least one digit.
fn identifier() -> Result<Exercise, BuildError> {
    let dfa = TSBuilder::default()
        .with_accepting([2])
        .with_edges([(0, "A-Z", 1), (1, "a-z", 1), (1, "0-9", 2), (2, "0-9", 2)])
        .into_dfa(0)?
        .with_name("identifier");
    Ok(Exercise {
        id: "identifier",
        legacy_name: "at1ej2",
        title: "Identifier recognizer",
        pattern: "[A-Z][a-z]*[0-9]+",
        dfa,
        samples: vec![
            "A123",
            "Sogamoso2025",
            "Uptc9",
            "X0",
            "Z99",
            "1234",
            "soga2025",
            "UPTC",
            "aa99",
            "AAT",
        ],
        columns: vec!['A', 'B', 'Z', 'a', 'b', 'z', '0', '1', '9'],
        analysis: vec![
            "An identifier starts with exactly one uppercase letter (A-Z),",
            "continues with zero or more lowercase letters (a-z)",
            "and ends with one or more digits (0-9).",
            "Valid examples: A123, Sogamoso2025, X0",
        ],
    })
}

/// Plates: two uppercase letters, three digits without two adjacent zeros and a final uppercase letter.
fn plate() -> Result<Exercise, BuildError> {
    let dfa = TSBuilder::default()
        .with_accepting([9])
        .with_edges([
            (0, "A-Z", 1),
            (1, "A-Z", 2),
            (2, "1-9", 3),
            (2, "0", 4),
            (3, "1-9", 6),
            (3, "0", 7),
            (4, "0", 5),
            (4, "1-9", 6),
            (6, "0-9", 8),
            (7, "0", 5),
            (7, "1-9", 8),
            (8, "A-Z", 9),
        ])
        .into_dfa(0)?
        .with_name("plate");
    Ok(Exercise {
        id: "plate",
        legacy_name: "at2ej1",
        title: "Alphanumeric plate recognizer",
        pattern: "[A-Z]{2}[0-9]{3}[A-Z], no two adjacent zeros among the digits",
        dfa,
        samples: vec![
            "AS345S",
            "ASD123S",
            "CV657C",
            "HL001V",
            "39CVB0",
            "Im456c",
            "BI645K",
            "HJCMB579ZX",
            "HI890I",
        ],
        columns: vec!['A', 'B', 'Z', '0', '1', '5', '9'],
        analysis: vec![
            "A plate consists of two uppercase letters (A-Z),",
            "three digits in which no two zeros are adjacent (q5 is the dead end for 00)",
            "and one final uppercase letter.",
            "Valid example: AS345S",
        ],
    })
}

/// Institutional e-mail addresses `[a-z][a-z0-9]*@uptc.edu.co`. The fixed domain is spelled out
/// by a chain of states, one per character.
fn uptc_email() -> Result<Exercise, BuildError> {
    let domain_start = 2;
    let domain = EMAIL_DOMAIN
        .chars()
        .enumerate()
        .map(|(i, c)| (domain_start + i as u32, vec![c], domain_start + i as u32 + 1));
    let accepting = domain_start + EMAIL_DOMAIN.chars().count() as u32;

    let dfa = TSBuilder::default()
        .with_accepting([accepting])
        .with_edges([(0, "a-z", 1), (1, "a-z0-9", 1), (1, "@", 2)])
        .with_edges(domain)
        .into_dfa(0)?
        .with_name("uptc-email");
    Ok(Exercise {
        id: "uptc-email",
        legacy_name: "at2ej2",
        title: "UPTC e-mail validator",
        pattern: "[a-z][a-z0-9]*@uptc\\.edu\\.co",
        dfa,
        samples: vec![
            "juan3@uptc.edu.co",
            "maria@uptc.edu.co",
            "abc123@uptc.edu.co",
            "123juan@uptc.edu.co",
            "juan@uptc.com",
            "MARIA@uptc.edu.co",
        ],
        columns: vec!['a', 'b', 'z', '0', '1', '9', '@', '.'],
        analysis: vec![
            "The local part starts with a lowercase letter (a-z),",
            "followed by zero or more lowercase letters or digits.",
            "The @ symbol is mandatory.",
            "The domain is fixed: uptc.edu.co",
        ],
    })
}

/// The collection of built-in exercises.
#[derive(Debug, Clone)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    /// Assembles all built-in exercises.
    pub fn builtin() -> Result<Self, BuildError> {
        let exercises = vec![ab_pattern()?, identifier()?, plate()?, uptc_email()?];
        debug!("assembled catalog with {} exercises", exercises.len());
        Ok(Self { exercises })
    }

    /// Looks up an exercise by its identifier or by its legacy script name (with or without `.py`).
    pub fn get(&self, name: &str) -> Option<&Exercise> {
        let name = name.strip_suffix(".py").unwrap_or(name);
        self.exercises
            .iter()
            .find(|e| e.id == name || e.legacy_name == name)
    }

    /// Iterates over all exercises in the order in which they were set.
    pub fn iter(&self) -> impl Iterator<Item = &Exercise> + '_ {
        self.exercises.iter()
    }

    /// The identifiers of all exercises.
    pub fn names(&self) -> Vec<&'static str> {
        self.exercises.iter().map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn verdicts(exercise: &Exercise) -> Vec<(&'static str, bool)> {
        exercise
            .sample_words()
            .iter()
            .map(|w| (*w, exercise.dfa().accepts(*w)))
            .collect()
    }

    #[test_log::test]
    fn lookup() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.names(),
            vec!["ab-pattern", "identifier", "plate", "uptc-email"]
        );
        assert_eq!(catalog.get("at2ej1").unwrap().id(), "plate");
        assert_eq!(catalog.get("at1ej2.py").unwrap().id(), "identifier");
        assert!(catalog.get("at3ej1").is_none());
    }

    #[test]
    fn ab_pattern_samples() {
        let exercise = ab_pattern().unwrap();
        let accepted = verdicts(&exercise)
            .into_iter()
            .filter_map(|(w, acc)| acc.then_some(w))
            .collect::<Vec<_>>();
        assert_eq!(
            accepted,
            vec!["abaababa", "aaaaaaa", "abaababa", "abaaaaabaaaa"]
        );

        let dfa = exercise.dfa();
        let run = dfa.run("abba");
        assert_eq!(run.show_path(dfa), "q0 → q1 → q2 → q3");
        assert!(matches!(
            run.outcome(),
            RunOutcome::MissingTransition { symbol: 'a', position: 3, .. }
        ));
        assert_eq!(dfa.give_word(), Some(vec!['a', 'a']));

        let patterns = dfa.pattern_summary();
        assert_eq!(
            patterns[3],
            ("q3".to_string(), "no transitions".to_string())
        );
        assert_eq!(
            patterns[4],
            ("q4".to_string(), "a → q4 (loop), b → q2".to_string())
        );
    }

    #[test]
    fn identifier_samples() {
        let exercise = identifier().unwrap();
        assert_eq!(
            verdicts(&exercise),
            vec![
                ("A123", true),
                ("Sogamoso2025", true),
                ("Uptc9", true),
                ("X0", true),
                ("Z99", true),
                ("1234", false),
                ("soga2025", false),
                ("UPTC", false),
                ("aa99", false),
                ("AAT", false),
            ]
        );
        assert_eq!(exercise.dfa().alphabet().size(), 62);
        assert_eq!(exercise.transition_table().columns().len(), 9);
    }

    #[test]
    fn plate_samples() {
        let exercise = plate().unwrap();
        assert_eq!(
            verdicts(&exercise),
            vec![
                ("AS345S", true),
                ("ASD123S", false),
                ("CV657C", true),
                ("HL001V", false),
                ("39CVB0", false),
                ("Im456c", false),
                ("BI645K", true),
                ("HJCMB579ZX", false),
                ("HI890I", true),
            ]
        );
        let dfa = exercise.dfa();
        assert!(dfa.accepts("AB010C"));
        assert!(dfa.accepts("AB101C"));
        assert!(!dfa.accepts("AB100C"));
        assert!(matches!(
            dfa.run("Im456c").outcome(),
            RunOutcome::ForeignSymbol { symbol: 'm', position: 1 }
        ));
    }

    #[test]
    fn email_samples() {
        let exercise = uptc_email().unwrap();
        assert_eq!(
            verdicts(&exercise),
            vec![
                ("juan3@uptc.edu.co", true),
                ("maria@uptc.edu.co", true),
                ("abc123@uptc.edu.co", true),
                ("123juan@uptc.edu.co", false),
                ("juan@uptc.com", false),
                ("MARIA@uptc.edu.co", false),
            ]
        );
        let dfa = exercise.dfa();
        assert!(!dfa.accepts(""));
        assert!(!dfa.accepts("a.b@uptc.edu.co"));
        assert!(!dfa.accepts("a@uptc.edu.co.uk"));
        assert!(!dfa.accepts("a@b@uptc.edu.co"));
        assert_eq!(dfa.give_word().unwrap().into_iter().collect::<String>(), "a@uptc.edu.co");
        assert_eq!(dfa.accepting_states().count(), 1);
    }
}
