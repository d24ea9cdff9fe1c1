//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::graph::{self, GraphOptions};
use super::output::Output;

#[derive(Parser)]
#[command(name = "gwf-graph")]
#[command(author, version, about = "Render the dependency graph of a workflow")]
pub struct Cli {
    /// Targets to draw, as glob patterns (all targets when omitted)
    pub targets: Vec<String>,

    /// Workflow file
    #[arg(long, short = 'w', env = "GWF_WORKFLOW", default_value = "workflow.toml")]
    pub workflow: PathBuf,

    /// Output format: dot, gv, sif or any Graphviz format (svg, png, pdf, ...)
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Output file [default: stdout for dot/gv/sif, dependency_graph.<format> for images]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Color targets by execution status
    #[arg(long, short = 's')]
    pub status: bool,

    /// Graphviz command used to draw images
    #[arg(long, env = "GWF_GRAPH_DOT")]
    pub dot_command: Option<String>,

    /// List supported output formats and exit
    #[arg(long)]
    pub list_formats: bool,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Suppress success messages
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.verbose, cli.quiet);

    output.verbose("gwf-graph starting");

    if cli.list_formats {
        return graph::list_formats(&cli.workflow, cli.dot_command.as_deref());
    }

    let options = GraphOptions {
        patterns: cli.targets,
        workflow: cli.workflow,
        format: cli.format,
        output: cli.output,
        status: cli.status,
        dot_command: cli.dot_command,
    };

    graph::run(&options, &output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "gwf-graph", "align_*", "report", "-w", "flow.toml", "-f", "png", "-o", "out.png", "-s",
        ])
        .unwrap();

        assert_eq!(cli.targets, vec!["align_*", "report"]);
        assert_eq!(cli.workflow, PathBuf::from("flow.toml"));
        assert_eq!(cli.format.as_deref(), Some("png"));
        assert_eq!(cli.output, Some(PathBuf::from("out.png")));
        assert!(cli.status);
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["gwf-graph"]).unwrap();

        assert!(cli.targets.is_empty());
        assert!(cli.format.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.status);
        assert!(!cli.list_formats);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["gwf-graph", "-q", "-v"]).is_err());
    }
}
