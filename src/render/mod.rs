//! # Rendering
//!
//! Turns a traversal result into output. The format identifier picks one of
//! three renderers:
//!
//! | Identifier | Renderer | Output |
//! |------------|----------|--------|
//! | `dot`, `gv` | diagram source | Graphviz text, written by the sink |
//! | `sif` | adjacency listing | `<target> dependencies <dep>...` lines, written by the sink |
//! | any engine format (`svg`, `png`, `pdf`, ...) | diagram image | drawn by the [`DiagramEngine`] itself |
//!
//! Built-in identifiers are looked up first, then the engine's formats.
//! Anything else is [`RenderError::UnsupportedFormat`].

mod dot;
mod sif;
mod engine;
mod sink;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{GraphProvider, StatusMap, Target};

pub use dot::{diagram_source, escape, fill_color, DotBuilder};
pub use engine::{DiagramEngine, EngineError, GraphvizEngine, GRAPHVIZ_FORMATS};
pub use sif::adjacency_listing;
pub use sink::{emit, SinkError};

/// Format identifiers handled without the diagram engine
pub const BUILTIN_FORMATS: &[&str] = &["dot", "gv", "sif"];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("No status was resolved for target: {0}")]
    MissingStatus(Target),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A resolved output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    /// Graphviz description text
    DiagramSource,
    /// One line per target that has dependencies
    Adjacency,
    /// Drawn by the diagram engine in the named output format
    Image(String),
}

impl Format {
    /// Looks up a format identifier
    pub fn resolve(id: &str, engine: &dyn DiagramEngine) -> Result<Self, RenderError> {
        match id {
            "dot" | "gv" => Ok(Format::DiagramSource),
            "sif" => Ok(Format::Adjacency),
            other if engine.supports(other) => Ok(Format::Image(other.to_string())),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Returns true if the renderer produces a text payload for the sink
    pub fn is_text(&self) -> bool {
        !matches!(self, Format::Image(_))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::DiagramSource => f.write_str("dot"),
            Format::Adjacency => f.write_str("sif"),
            Format::Image(name) => f.write_str(name),
        }
    }
}

/// Where rendered output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Everything a renderer needs besides the graph
#[derive(Debug, Clone)]
pub struct RenderConfiguration {
    pub format: Format,
    pub destination: Destination,
    /// `None` draws every target in the neutral color
    pub statuses: Option<StatusMap>,
}

/// Result of a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Text payload for the sink (possibly empty)
    Text(String),
    /// The engine wrote the output itself
    Drawn,
}

/// Renders `visited` (a traversal result) in the configured format
///
/// Text formats return their payload; image formats hand the diagram to the
/// engine, which writes the destination directly.
pub fn render<G: GraphProvider + ?Sized>(
    graph: &G,
    visited: &[Target],
    config: &RenderConfiguration,
    engine: &dyn DiagramEngine,
) -> Result<Rendered, RenderError> {
    if let Some(statuses) = &config.statuses {
        if let Some(missing) = visited.iter().find(|t| !statuses.contains_key(*t)) {
            return Err(RenderError::MissingStatus(missing.clone()));
        }
    }

    match &config.format {
        Format::Adjacency => Ok(Rendered::Text(adjacency_listing(graph, visited))),
        Format::DiagramSource => {
            let source = diagram_source(graph, visited, config.statuses.as_ref())?;
            Ok(Rendered::Text(source))
        }
        Format::Image(format) => {
            let source = diagram_source(graph, visited, config.statuses.as_ref())?;
            engine.render(&source, format, &config.destination)?;
            Ok(Rendered::Drawn)
        }
    }
}

/// Renders and, for text formats, writes the payload to the destination
///
/// Nothing is written until the whole payload has been computed.
pub fn render_to_destination<G: GraphProvider + ?Sized>(
    graph: &G,
    visited: &[Target],
    config: &RenderConfiguration,
    engine: &dyn DiagramEngine,
) -> Result<Rendered, RenderError> {
    let rendered = render(graph, visited, config, engine)?;
    if let Rendered::Text(payload) = &rendered {
        emit(payload, &config.destination)?;
    }
    Ok(rendered)
}
