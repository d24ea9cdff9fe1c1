//! # Command-Line Interface
//!
//! ```bash
//! gwf-graph                          # every target, dependency_graph.svg
//! gwf-graph -f sif                   # adjacency listing on stdout
//! gwf-graph -f dot 'align_*' report  # diagram source for matching targets
//! gwf-graph --status -f png -o run.png
//! ```
//!
//! ## Output Formats
//!
//! - `dot`, `gv` - Graphviz source text (stdout by default)
//! - `sif` - adjacency listing (stdout by default)
//! - any Graphviz output format - drawn by `dot` to `dependency_graph.<format>`
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute.

mod app;
mod output;
mod graph;

pub use app::{Cli, run};
pub use graph::GraphOptions;
pub use output::Output;
