//! Graph rendering command
//!
//! Load workflow -> select roots -> traverse -> resolve statuses (optional)
//! -> render -> write. Every step completes before the next starts, and
//! nothing is written until the payload is complete.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{select_roots, traverse, DependencyGraph, StatusMap, Target};
use crate::render::{
    render_to_destination, Destination, Format, GraphvizEngine, RenderConfiguration, Rendered,
    BUILTIN_FORMATS, GRAPHVIZ_FORMATS,
};
use crate::status::{resolve_statuses, FilesystemScheduler};
use crate::storage::{Config, JobStore, Workflow};

/// Options for one render
#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Root name patterns; empty selects every target
    pub patterns: Vec<String>,
    pub workflow: PathBuf,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub status: bool,
    pub dot_command: Option<String>,
}

/// Render the dependency graph
pub fn run(options: &GraphOptions, output: &Output) -> Result<()> {
    let workflow = Workflow::load(&options.workflow)?;
    output.verbose_ctx(
        "workflow",
        &format!(
            "Loaded {} targets from {}",
            workflow.targets().len(),
            options.workflow.display()
        ),
    );

    let config = Config::load(workflow.root())?;
    let graph = workflow
        .graph()
        .with_context(|| format!("Invalid workflow: {}", options.workflow.display()))?;

    let engine = engine_for(options.dot_command.as_deref(), &config);

    let format_id = options
        .format
        .as_deref()
        .unwrap_or_else(|| config.default_format());
    let format = Format::resolve(format_id, &engine)?;
    let destination = match &options.output {
        Some(path) => Destination::File(path.clone()),
        None if format.is_text() => Destination::Stdout,
        None => Destination::File(config.default_image_path(&format.to_string())),
    };
    output.verbose_ctx("render", &format!("Format {} to {}", format, destination));

    let roots = select_roots(&graph, &options.patterns)?;
    output.verbose_ctx("select", &format!("{} root targets", roots.len()));

    let visited = traverse(&graph, &roots)?;
    output.verbose_ctx("traverse", &format!("{} targets reachable", visited.len()));
    if output.is_verbose() {
        output.verbose_ctx("traverse", &format!("Order: {}", join_names(&visited)));
    }

    let statuses = if options.status {
        Some(resolve_target_statuses(&workflow, &config, &graph, &visited, output)?)
    } else {
        None
    };

    let render_config = RenderConfiguration {
        format,
        destination,
        statuses,
    };
    let rendered = render_to_destination(&graph, &visited, &render_config, &engine)?;

    match (&rendered, &render_config.destination) {
        (Rendered::Text(payload), Destination::File(path)) if payload.is_empty() => {
            output.verbose_ctx(
                "render",
                &format!("Nothing to write, {} not created", path.display()),
            );
        }
        (_, Destination::File(path)) => {
            output.success(&format!("Wrote dependency graph to {}", path.display()));
        }
        (_, Destination::Stdout) => {}
    }

    Ok(())
}

/// Ask the scheduler for the status of every visited target
///
/// The scheduler only lives for the duration of this call.
fn resolve_target_statuses(
    workflow: &Workflow,
    config: &Config,
    graph: &DependencyGraph,
    visited: &[Target],
    output: &Output,
) -> Result<StatusMap> {
    let jobs = JobStore::new(workflow.resolve(&config.project.jobs_file));
    output.verbose_ctx("status", &format!("Reading job log {}", jobs.path().display()));

    let mut scheduler = FilesystemScheduler::open(workflow, graph, &jobs)?;
    let statuses =
        resolve_statuses(&mut scheduler, visited).context("Failed to resolve target status")?;

    if output.is_verbose() {
        for target in visited {
            if let Some(status) = statuses.get(target) {
                output.verbose_ctx("status", &format!("{}: {}", target, status));
            }
        }
    }

    Ok(statuses)
}

/// Flag or environment first, then project and global config
fn engine_for(dot_command: Option<&str>, config: &Config) -> GraphvizEngine {
    GraphvizEngine::new(dot_command.unwrap_or_else(|| config.dot_command()))
}

/// Print the formats this build can produce
///
/// The workflow file itself need not exist; only its directory is used to
/// find the project config.
pub fn list_formats(workflow: &Path, dot_command: Option<&str>) -> Result<()> {
    let config = Config::load(&Workflow::root_of(workflow))?;
    let engine = engine_for(dot_command, &config);
    println!("Built-in formats: {}", BUILTIN_FORMATS.join(" "));
    println!(
        "Graphviz formats (via {}): {}",
        engine.program(),
        GRAPHVIZ_FORMATS.join(" ")
    );
    Ok(())
}

fn join_names(targets: &[Target]) -> String {
    targets
        .iter()
        .map(Target::name)
        .collect::<Vec<_>>()
        .join(" ")
}
