use std::fmt::Display;

use itertools::Itertools;

use crate::{alphabet::compress, Pointed};

use super::StateIndex;

/// Attributes that can be attached to a state in the DOT output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotStateAttribute {
    /// The text shown inside the node.
    Label(String),
    /// The node shape, for example `circle` or `doublecircle`.
    Shape(String),
    /// The fill color, setting it also makes the node filled.
    Color(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{}\"", escape(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{s}\""),
            DotStateAttribute::Color(c) => write!(f, "style=filled, fillcolor=\"{c}\""),
        }
    }
}

/// Attributes that can be attached to an edge in the DOT output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotTransitionAttribute {
    /// The text shown next to the edge.
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(s) => write!(f, "label=\"{}\"", escape(s)),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Identifiers of DOT nodes are indices, the state names only show up in the labels. This way
/// arbitrary state names (like `⊥`) do not have to be sanitized.
fn node_ident(idx: StateIndex) -> String {
    format!("s{idx}")
}

/// Objects that have a Graphviz representation. Parallel edges between two states are merged into
/// a single edge whose label lists the symbols compactly, so an identifier automaton has one edge
/// labelled `A-Z` instead of twenty-six.
pub trait Dottable: Pointed {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String {
        let header = [
            format!("digraph \"{}\" {{", escape(&self.dot_name())),
            "rankdir=LR".to_string(),
            "node [fontname=\"Helvetica\"]".to_string(),
            "init [label=\"\", shape=none, width=0, height=0]".to_string(),
            format!("init -> {}", node_ident(self.initial())),
        ];

        let states = self.state_indices().map(|q| {
            format!(
                "{} [{}]",
                node_ident(q),
                self.dot_state_attributes(q)
                    .into_iter()
                    .map(|attr| attr.to_string())
                    .join(", ")
            )
        });

        let transitions = self.state_indices().flat_map(|q| {
            self.grouped_edges_from(q)
                .into_iter()
                .map(move |(p, symbols)| {
                    format!(
                        "{} -> {} [{}]",
                        node_ident(q),
                        node_ident(p),
                        DotTransitionAttribute::Label(compress(symbols))
                    )
                })
        });

        header
            .into_iter()
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    /// The name of the graph.
    fn dot_name(&self) -> String;

    /// The attributes of the node for the state `idx`. Accepting states are drawn as double circles,
    /// the initial state is filled light green and accepting states light coral.
    fn dot_state_attributes(&self, idx: StateIndex) -> Vec<DotStateAttribute> {
        let accepting = self.is_accepting(idx);
        let mut attributes = vec![
            DotStateAttribute::Label(self.show_state(idx)),
            DotStateAttribute::Shape(if accepting { "doublecircle" } else { "circle" }.into()),
        ];
        if accepting {
            attributes.push(DotStateAttribute::Color("lightcoral".into()));
        } else if idx == self.initial() {
            attributes.push(DotStateAttribute::Color("lightgreen".into()));
        }
        attributes
    }

    /// Renders the object visually (as PNG) and returns a vec of bytes/u8s encoding
    /// the rendered image. This method is only available on the `graphviz` crate feature
    /// and requires the `dot` executable to be installed.
    #[cfg(feature = "graphviz")]
    fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        use std::io::{Read, Write};

        use tracing::trace;
        let dot = self.dot_representation();
        trace!("writing dot representation\n{}", dot);

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let mut output = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_end(&mut output)?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("dot process exited with status: {}", status),
            ));
        }

        Ok(output)
    }

    /// Attempts to render the object to a PNG file with the given filename. This method
    /// is only available on the `graphviz` crate feature and makes use of temporary files.
    #[cfg(feature = "graphviz")]
    fn render_to_file_name(&self, filename: &str) -> Result<(), std::io::Error> {
        use std::io::Write;
        use tracing::trace;

        trace!("Outputting dot and rendering to png");
        let dot = self.dot_representation();
        let mut tempfile = tempfile::NamedTempFile::new()?;

        tempfile.write_all(dot.as_bytes())?;
        let tempfile_name = tempfile.path();

        let status = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(filename)
            .arg(tempfile_name)
            .status()?;
        if !status.success() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("dot process exited with status: {}", status),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn dot_merges_parallel_edges() {
        let dfa = TSBuilder::default()
            .with_state_colors([false, true])
            .with_edges([(0, "A-Z", 1), (1, "0-9", 1)])
            .into_dfa(0)
            .unwrap();
        let dot = dfa.dot_representation();

        assert!(dot.starts_with("digraph \"DFA\" {"));
        assert!(dot.contains("init -> s0"));
        assert!(dot.contains("s0 -> s1 [label=\"A-Z\"]"));
        assert!(dot.contains("s1 -> s1 [label=\"0-9\"]"));
        assert!(dot.contains("shape=\"doublecircle\""));
        assert!(dot.contains("s0 [label=\"q0\", shape=\"circle\", style=filled, fillcolor=\"lightgreen\"]"));
        assert!(dot.contains("s1 [label=\"q1\", shape=\"doublecircle\", style=filled, fillcolor=\"lightcoral\"]"));
        assert_eq!(dot.matches(" -> s1").count(), 2);
        assert!(dot.ends_with('}'));
    }

    #[test]
    #[ignore]
    #[cfg(feature = "graphviz")]
    fn render_dfa() {
        let dfa = TSBuilder::default()
            .with_state_colors([false, true])
            .with_edges([(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 0)])
            .into_dfa(0)
            .unwrap();
        assert!(!dfa.render().unwrap().is_empty());
    }
}
