//! Workflow file loading
//!
//! A workflow is a TOML file with one `[[target]]` table per target:
//!
//! ```toml
//! [[target]]
//! name = "align"
//! inputs = ["reads.fq", "genome.idx"]
//! outputs = ["aligned.bam"]
//! after = ["prepare"]
//! ```
//!
//! A target depends on every target named in `after` and on the target that
//! provides each of its inputs. File paths are relative to the directory
//! containing the workflow file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::{DependencyGraph, GraphError, Target};

/// One target as declared in the workflow file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    pub name: String,

    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    #[serde(default)]
    pub outputs: Vec<PathBuf>,

    /// Targets that must run first regardless of files
    #[serde(default)]
    pub after: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WorkflowFile {
    #[serde(default, rename = "target")]
    targets: Vec<TargetSpec>,
}

/// A loaded workflow
#[derive(Debug, Clone)]
pub struct Workflow {
    root: PathBuf,
    targets: Vec<TargetSpec>,
    /// Target name to position in `targets`, first declaration wins
    index: HashMap<String, usize>,
}

impl Workflow {
    /// Loads a workflow file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read workflow: {}", path.display()))?;

        Self::parse(&content, Self::root_of(path))
            .with_context(|| format!("Failed to parse workflow: {}", path.display()))
    }

    /// Parses workflow content; `root` anchors relative file paths
    pub fn parse(content: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let file: WorkflowFile = toml::from_str(content)?;

        let mut index = HashMap::with_capacity(file.targets.len());
        for (i, spec) in file.targets.iter().enumerate() {
            index.entry(spec.name.clone()).or_insert(i);
        }

        Ok(Self {
            root: root.into(),
            targets: file.targets,
            index,
        })
    }

    /// Returns the directory a workflow file's relative paths are anchored at
    pub fn root_of(path: &Path) -> PathBuf {
        path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Returns the directory that relative paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns all target declarations in file order
    pub fn targets(&self) -> &[TargetSpec] {
        &self.targets
    }

    /// Returns the declaration of a target
    pub fn spec(&self, target: &Target) -> Option<&TargetSpec> {
        self.index.get(target.name()).map(|&i| &self.targets[i])
    }

    /// Resolves a declared path against the workflow root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Builds the dependency graph
    ///
    /// Dependencies of a target are its `after` targets followed by the
    /// providers of its inputs, without repeats.
    pub fn graph(&self) -> Result<DependencyGraph, GraphError> {
        let mut graph = DependencyGraph::new();
        let mut providers: HashMap<PathBuf, &str> = HashMap::new();

        for spec in &self.targets {
            if !graph.add_target(Target::new(spec.name.as_str())) {
                return Err(GraphError::DuplicateTarget(Target::new(spec.name.as_str())));
            }

            for output in &spec.outputs {
                let path = self.resolve(output);
                if let Some(first) = providers.insert(path, spec.name.as_str()) {
                    return Err(GraphError::ConflictingProviders {
                        path: output.display().to_string(),
                        first: Target::new(first),
                        second: Target::new(spec.name.as_str()),
                    });
                }
            }
        }

        for spec in &self.targets {
            let target = Target::new(spec.name.as_str());

            for name in &spec.after {
                graph.add_dependency(&target, &Target::new(name.as_str()))?;
            }

            for input in &spec.inputs {
                if let Some(provider) = providers.get(&self.resolve(input)) {
                    graph.add_dependency(&target, &Target::new(*provider))?;
                }
            }
        }

        Ok(graph)
    }
}
