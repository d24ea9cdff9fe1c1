//! External diagram engine
//!
//! Image formats are drawn by Graphviz. The engine receives the diagram
//! source on stdin and writes the image itself, either to `-o <path>` or to
//! our stdout.

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use super::Destination;
use crate::storage::DEFAULT_DOT_COMMAND;

/// Output format names understood by Graphviz
pub const GRAPHVIZ_FORMATS: &[&str] = &[
    "bmp", "canon", "cmap", "cmapx", "cmapx_np", "dot_json", "eps", "fig", "gd", "gd2", "gif",
    "gtk", "ico", "imap", "imap_np", "ismap", "jpe", "jpeg", "jpg", "json", "json0", "mp", "pdf",
    "pic", "plain", "plain-ext", "png", "pov", "ps", "ps2", "svg", "svgz", "tif", "tiff", "tk",
    "vml", "vmlz", "vrml", "wbmp", "webp", "x11", "xdot", "xdot1.2", "xdot1.4", "xdot_json",
    "xlib",
];

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to run diagram engine '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Diagram engine '{command}' failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Something that can draw a diagram description in an output format
pub trait DiagramEngine {
    /// Output format names this engine can produce
    fn formats(&self) -> &[&str];

    /// Returns true if the engine can produce `format`
    fn supports(&self, format: &str) -> bool {
        self.formats().contains(&format)
    }

    /// Draws `source` in `format`, writing to `destination`
    fn render(&self, source: &str, format: &str, destination: &Destination) -> Result<(), EngineError>;
}

/// Runs the Graphviz `dot` executable
#[derive(Debug, Clone)]
pub struct GraphvizEngine {
    program: String,
    args: Vec<String>,
}

impl GraphvizEngine {
    /// Creates an engine from a command line such as `dot` or `/opt/gv/bin/dot -q`
    pub fn new(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .unwrap_or_else(|| DEFAULT_DOT_COMMAND.to_string());
        Self {
            program,
            args: parts.collect(),
        }
    }

    /// Returns the executable that will be run
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for GraphvizEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DOT_COMMAND)
    }
}

impl DiagramEngine for GraphvizEngine {
    fn formats(&self) -> &[&str] {
        GRAPHVIZ_FORMATS
    }

    fn render(&self, source: &str, format: &str, destination: &Destination) -> Result<(), EngineError> {
        let spawn_err = |err: io::Error| EngineError::Spawn {
            command: self.program.clone(),
            source: err,
        };

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(format!("-T{format}"));
        match destination {
            Destination::File(path) => {
                cmd.arg("-o").arg(path).stdout(Stdio::null());
            }
            Destination::Stdout => {
                cmd.stdout(Stdio::inherit());
            }
        }
        cmd.stdin(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            // An engine that exits early closes the pipe; its exit status says why
            match stdin.write_all(source.as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(spawn_err(e)),
            }
        }

        let output = child.wait_with_output().map_err(spawn_err)?;
        if !output.status.success() {
            return Err(EngineError::Failed {
                command: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
