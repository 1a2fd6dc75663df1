use anyhow::{anyhow, bail, Context};
use automata_workshop::prelude::*;
use owo_colors::OwoColorize;

use tracing::{debug, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

fn automaton_arg() -> Arg {
    Arg::new("automaton")
        .help("catalog name (e.g. plate or at2ej1) or path to a .toml definition")
        .required_unless_present("file")
}

fn cli() -> clap::Command {
    Command::new("workshop")
        .about("Simulate and inspect the workshop finite automata")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .global(true)
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .global(true)
                .value_name("PATH")
                .help("load the automaton from a TOML definition instead of the catalog"),
        )
        .subcommand(Command::new("list").about("lists the built-in exercises"))
        .subcommand(
            Command::new("show")
                .about("prints formal definition, transition table and transition patterns")
                .arg(automaton_arg()),
        )
        .subcommand(
            Command::new("run")
                .about("runs the automaton on the given words")
                .arg(automaton_arg())
                .arg(Arg::new("words").num_args(0..).value_name("WORD")),
        )
        .subcommand(
            Command::new("demo")
                .about("walks through an exercise: definition, tables, sample words and analysis")
                .arg(automaton_arg())
                .arg(
                    Arg::new("dot")
                        .long("dot")
                        .value_name("FILE")
                        .help("also write the state diagram in DOT format"),
                ),
        )
        .subcommand(
            Command::new("dot")
                .about("exports the state diagram")
                .arg(automaton_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("write the DOT source to FILE instead of stdout"),
                )
                .arg(
                    Arg::new("png")
                        .long("png")
                        .value_name("FILE")
                        .help("render the diagram to a PNG file, requires graphviz"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("checks two automata for equivalence")
                .arg(
                    Arg::new("automata")
                        .help("two catalog names or .toml paths, only the second one if --file is given")
                        .value_name("AUTOMATON")
                        .required(true)
                        .num_args(1..=2),
                ),
        )
        .subcommand(
            Command::new("sample")
                .about("classifies randomly drawn words")
                .arg(automaton_arg())
                .arg(
                    Arg::new("count")
                        .short('n')
                        .value_parser(value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    Arg::new("max-len")
                        .long("max-len")
                        .value_parser(value_parser!(usize))
                        .default_value("8"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .default_value("0"),
                ),
        )
        .arg(Arg::new("no-color").long("no-color").global(true).action(ArgAction::SetTrue))
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

/// Loads an automaton given either by catalog name or as path to a TOML definition.
fn load(catalog: &Catalog, name: &str) -> anyhow::Result<DFA> {
    if name.ends_with(".toml") {
        return AutomatonDefinition::from_path(name)?
            .into_dfa()
            .with_context(|| format!("invalid definition in {name}"));
    }
    catalog
        .get(name)
        .map(|exercise| exercise.dfa().clone())
        .ok_or_else(|| {
            anyhow!(
                "unknown automaton {name}, expected one of {} or a .toml file",
                catalog.names().join(", ")
            )
        })
}

/// Resolves the automaton of a subcommand. `--file` takes precedence over the positional argument,
/// in which case the positional value is returned as left over so that `run` can treat it as a word.
fn resolve<'a>(
    catalog: &'a Catalog,
    matches: &'a ArgMatches,
) -> anyhow::Result<(DFA, Option<&'a Exercise>, Option<&'a String>)> {
    let positional = matches.get_one::<String>("automaton");
    if let Some(path) = matches.get_one::<String>("file") {
        let dfa = AutomatonDefinition::from_path(path)?
            .into_dfa()
            .with_context(|| format!("invalid definition in {path}"))?;
        return Ok((dfa, None, positional));
    }
    let name = positional.ok_or_else(|| anyhow!("no automaton given"))?;
    Ok((load(catalog, name)?, catalog.get(name), None))
}

/// The two automata compared by `check`. With `--file` the definition is the first one and exactly one
/// positional value names the second, otherwise both are given positionally.
fn check_operands(catalog: &Catalog, matches: &ArgMatches) -> anyhow::Result<(DFA, DFA)> {
    let names = matches
        .get_many::<String>("automata")
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    match (matches.get_one::<String>("file"), names.as_slice()) {
        (Some(path), [other]) => {
            let dfa = AutomatonDefinition::from_path(path)?
                .into_dfa()
                .with_context(|| format!("invalid definition in {path}"))?;
            Ok((dfa, load(catalog, other)?))
        }
        (Some(_), _) => bail!("with --file, check expects exactly one further automaton"),
        (None, [first, second]) => Ok((load(catalog, first)?, load(catalog, second)?)),
        (None, _) => bail!("check expects two automata"),
    }
}

fn show_word(word: &str) -> String {
    if word.is_empty() {
        "ε".to_string()
    } else {
        word.to_string()
    }
}

fn results_table<'w, I: IntoIterator<Item = &'w str>>(dfa: &DFA, words: I, colored: bool) -> String {
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(["Word", "Result", "Path", "Reason"]);
    for word in words {
        let run = dfa.run(word);
        builder.push_record([
            show_word(word),
            if colored {
                run.colored_verdict()
            } else {
                run.verdict().to_string()
            },
            run.show_path(dfa),
            run.explain(dfa),
        ]);
    }
    builder
        .build()
        .with(tabled::settings::Style::rounded())
        .to_string()
}

fn heading(text: &str, colored: bool) -> String {
    if colored {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

fn print_overview(dfa: &DFA, exercise: Option<&Exercise>, colored: bool) {
    println!("{}", heading("Formal definition", colored));
    println!("{}\n", dfa.formal_definition());

    let table = match exercise {
        Some(exercise) => exercise.transition_table(),
        None => dfa.transition_table(),
    };
    println!("{}", heading("Transition table", colored));
    println!("{table}");
    if table.columns().len() < dfa.alphabet().size() {
        println!(
            "(showing {} of {} symbols)",
            table.columns().len(),
            dfa.alphabet().size()
        );
    }
    println!();

    println!("{}", heading("Transition patterns", colored));
    for (state, description) in dfa.pattern_summary() {
        println!("  {state}: {description}");
    }
}

fn write_dot(dfa: &DFA, path: &str) -> anyhow::Result<()> {
    std::fs::write(path, dfa.dot_representation())
        .with_context(|| format!("could not write {path}"))?;
    info!("wrote state diagram to {path}");
    Ok(())
}

#[cfg(feature = "graphviz")]
fn write_png(dfa: &DFA, path: &str) -> anyhow::Result<()> {
    dfa.render_to_file_name(path)
        .with_context(|| format!("rendering with graphviz to {path} failed"))?;
    info!("rendered state diagram to {path}");
    Ok(())
}

#[cfg(not(feature = "graphviz"))]
fn write_png(_dfa: &DFA, _path: &str) -> anyhow::Result<()> {
    bail!("PNG output requires the graphviz feature")
}

pub fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    setup_logging(&matches);

    let colored = !matches.get_flag("no-color");
    let catalog = Catalog::builtin()?;
    debug!("loaded catalog with {} exercises", catalog.names().len());

    match matches.subcommand() {
        Some(("list", _)) => {
            let mut builder = tabled::builder::Builder::default();
            builder.push_record(["Name", "Script", "Title", "States", "Language"]);
            for exercise in catalog.iter() {
                builder.push_record([
                    exercise.id().to_string(),
                    exercise.legacy_name().to_string(),
                    exercise.title().to_string(),
                    exercise.dfa().size().to_string(),
                    exercise.pattern().to_string(),
                ]);
            }
            println!(
                "{}",
                builder.build().with(tabled::settings::Style::rounded())
            );
        }
        Some(("show", sub_matches)) => {
            let (dfa, exercise, _) = resolve(&catalog, sub_matches)?;
            print_overview(&dfa, exercise, colored);
        }
        Some(("run", sub_matches)) => {
            let (dfa, _, leftover) = resolve(&catalog, sub_matches)?;
            let words = leftover
                .into_iter()
                .chain(sub_matches.get_many::<String>("words").into_iter().flatten())
                .map(String::as_str)
                .collect::<Vec<_>>();
            if words.is_empty() {
                bail!("no words given");
            }
            println!("{}", results_table(&dfa, words, colored));
        }
        Some(("demo", sub_matches)) => {
            let (dfa, exercise, _) = resolve(&catalog, sub_matches)?;
            let title = exercise
                .map(|e| e.title())
                .or(dfa.name())
                .unwrap_or("Automaton");
            let rule = "=".repeat(70);
            println!("{rule}\n{}", heading(title, colored));
            if let Some(exercise) = exercise {
                println!("{}", exercise.pattern());
            }
            println!("{rule}\n");

            print_overview(&dfa, exercise, colored);
            println!();

            if let Some(exercise) = exercise {
                println!("{}", heading("Sample words", colored));
                println!(
                    "{}\n",
                    results_table(&dfa, exercise.sample_words().iter().copied(), colored)
                );
                println!("{}", heading("Language analysis", colored));
                for line in exercise.analysis() {
                    println!("  {line}");
                }
            }
            if let Some(witness) = dfa.give_word() {
                println!(
                    "  Shortest accepted word: {}",
                    show_word(&witness.iter().collect::<String>())
                );
            } else {
                println!("  The language is empty.");
            }

            if let Some(path) = sub_matches.get_one::<String>("dot") {
                write_dot(&dfa, path)?;
            }
        }
        Some(("dot", sub_matches)) => {
            let (dfa, _, _) = resolve(&catalog, sub_matches)?;
            match sub_matches.get_one::<String>("output") {
                Some(path) => write_dot(&dfa, path)?,
                None if sub_matches.get_one::<String>("png").is_some() => {}
                None => println!("{}", dfa.dot_representation()),
            }
            if let Some(path) = sub_matches.get_one::<String>("png") {
                write_png(&dfa, path)?;
            }
        }
        Some(("check", sub_matches)) => {
            let (dfa, other) = check_operands(&catalog, sub_matches)?;
            match dfa.separate(&other) {
                None => println!("The automata are equivalent."),
                Some(word) => {
                    let word = word.into_iter().collect::<String>();
                    println!(
                        "The automata differ on {}: the first one {} it, the second one {} it.",
                        show_word(&word),
                        if dfa.accepts(word.as_str()) { "accepts" } else { "rejects" },
                        if other.accepts(word.as_str()) { "accepts" } else { "rejects" },
                    );
                }
            }
        }
        Some(("sample", sub_matches)) => {
            let (dfa, _, _) = resolve(&catalog, sub_matches)?;
            let count = *sub_matches.get_one::<usize>("count").unwrap_or(&10);
            let max_len = *sub_matches.get_one::<usize>("max-len").unwrap_or(&8);
            let seed = *sub_matches.get_one::<u64>("seed").unwrap_or(&0);
            let words = automata_workshop::random::random_words(dfa.alphabet(), count, max_len, seed);
            let accepted = words.iter().filter(|w| dfa.accepts(w.as_str())).count();
            println!(
                "{}",
                results_table(&dfa, words.iter().map(String::as_str), colored)
            );
            println!("{accepted} of {} words accepted", words.len());
        }
        _ => unreachable!(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDS_IN_B: &str = r#"
initial = "q0"
accepting = ["q1"]

[[transition]]
from = "q0"
on = "a"
to = "q0"

[[transition]]
from = "q0"
on = "b"
to = "q1"
"#;

    fn check_matches(args: &[&str]) -> ArgMatches {
        let matches = cli()
            .try_get_matches_from(std::iter::once("workshop").chain(args.iter().copied()))
            .unwrap();
        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(name, "check");
        sub_matches.clone()
    }

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn check_two_catalog_automata() {
        let catalog = Catalog::builtin().unwrap();
        let matches = check_matches(&["check", "plate", "identifier"]);
        let (left, right) = check_operands(&catalog, &matches).unwrap();
        assert_eq!(left.name(), Some("plate"));
        assert_eq!(right.name(), Some("identifier"));

        let matches = check_matches(&["check", "plate"]);
        assert!(check_operands(&catalog, &matches).is_err());
    }

    #[test]
    fn check_definition_file_against_catalog() {
        let path = std::env::temp_dir().join(format!("workshop-ends-in-b-{}.toml", std::process::id()));
        std::fs::write(&path, ENDS_IN_B).unwrap();
        let path = path.to_string_lossy().to_string();

        let catalog = Catalog::builtin().unwrap();
        let matches = check_matches(&["check", "--file", &path, "plate"]);
        assert_eq!(
            matches.get_many::<String>("automata").unwrap().collect::<Vec<_>>(),
            vec!["plate"]
        );
        let (left, right) = check_operands(&catalog, &matches).unwrap();
        assert!(left.accepts("aab"));
        assert_eq!(right.name(), Some("plate"));
        assert_eq!(left.separate(&right), Some(vec!['b']));

        let matches = check_matches(&["check", "--file", &path, "plate", "identifier"]);
        assert!(check_operands(&catalog, &matches).is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn run_accepts_words_after_the_automaton() {
        let matches = cli()
            .try_get_matches_from(["workshop", "run", "identifier", "A1", "b2"])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(
            sub_matches.get_one::<String>("automaton").map(String::as_str),
            Some("identifier")
        );
        assert_eq!(sub_matches.get_many::<String>("words").unwrap().count(), 2);
    }
}
