//! Graphviz diagram construction

use std::fmt::Write;

use super::RenderError;
use crate::domain::{GraphProvider, StatusMap, Target, NEUTRAL_COLOR};

/// Escapes special characters for a quoted DOT string
pub fn escape(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Builds DOT text one statement at a time
///
/// Node identifiers are always quoted, so any target name is valid
pub struct DotBuilder {
    output: String,
}

impl DotBuilder {
    /// Starts a directed graph with a leading comment line
    pub fn new(comment: &str, name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "// {comment}");
        let _ = writeln!(output, "digraph {name} {{");
        Self { output }
    }

    /// Adds a node with attributes
    pub fn node(&mut self, id: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let _ = write!(self.output, "  \"{}\" [", escape(id));
        for (i, (key, value)) in attrs.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            let _ = write!(self.output, "{}=\"{}\"", key, escape(value));
        }
        self.output.push_str("];\n");
        self
    }

    /// Adds an edge
    pub fn edge(&mut self, from: &str, to: &str) -> &mut Self {
        let _ = writeln!(self.output, "  \"{}\" -> \"{}\";", escape(from), escape(to));
        self
    }

    /// Closes the graph and returns the DOT text
    pub fn finish(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

/// Fill color for a target: its status color, or neutral without statuses
pub fn fill_color(statuses: Option<&StatusMap>, target: &Target) -> Result<&'static str, RenderError> {
    match statuses {
        None => Ok(NEUTRAL_COLOR),
        Some(statuses) => statuses
            .get(target)
            .map(|status| status.color())
            .ok_or_else(|| RenderError::MissingStatus(target.clone())),
    }
}

/// Builds the diagram description for a traversal result
///
/// One filled node per visited target, then one `target -> dependency` edge
/// per dependency, both in traversal order
pub fn diagram_source<G: GraphProvider + ?Sized>(
    graph: &G,
    visited: &[Target],
    statuses: Option<&StatusMap>,
) -> Result<String, RenderError> {
    let mut dot = DotBuilder::new("Dependency Graph", "dependencies");

    for target in visited {
        let color = fill_color(statuses, target)?;
        dot.node(
            target.name(),
            &[("label", target.name()), ("style", "filled"), ("fillcolor", color)],
        );
    }

    for target in visited {
        for dep in graph.dependencies(target) {
            dot.edge(target.name(), dep.name());
        }
    }

    Ok(dot.finish())
}
