//! File-timestamp scheduler
//!
//! Reports SUBMITTED/RUNNING from the backend's job log. Every other target
//! is SHOULD-RUN or COMPLETED depending on its files: a target should run
//! when it declares no outputs, when a dependency should run, when an input
//! or output is missing, or when its newest input is newer than its oldest
//! output.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use anyhow::Result;

use super::{StatusError, StatusProvider};
use crate::domain::{GraphProvider, Target, TargetStatus};
use crate::storage::{JobState, JobStore, TargetSpec, Workflow};

/// Scheduler backed by the workflow's files and the backend job log
///
/// Opened once per invocation; job states are read when it is opened.
pub struct FilesystemScheduler<'a> {
    workflow: &'a Workflow,
    graph: &'a dyn GraphProvider,
    jobs: HashMap<Target, JobState>,
    should_run: HashMap<Target, bool>,
    visiting: HashSet<Target>,
}

impl<'a> FilesystemScheduler<'a> {
    /// Opens the scheduler, reading the current job log
    pub fn open(workflow: &'a Workflow, graph: &'a dyn GraphProvider, jobs: &JobStore) -> Result<Self> {
        let jobs = jobs.read_all()?;
        Ok(Self::with_jobs(workflow, graph, jobs))
    }

    /// Creates a scheduler over already known job states
    pub fn with_jobs(
        workflow: &'a Workflow,
        graph: &'a dyn GraphProvider,
        jobs: HashMap<Target, JobState>,
    ) -> Self {
        Self {
            workflow,
            graph,
            jobs,
            should_run: HashMap::new(),
            visiting: HashSet::new(),
        }
    }

    /// Returns true if the target is out of date
    pub fn should_run(&mut self, target: &Target) -> Result<bool, StatusError> {
        if let Some(&cached) = self.should_run.get(target) {
            return Ok(cached);
        }
        if !self.visiting.insert(target.clone()) {
            return Err(StatusError::Cycle(target.clone()));
        }

        let workflow = self.workflow;
        let graph = self.graph;
        let spec = workflow
            .spec(target)
            .ok_or_else(|| StatusError::UnknownTarget(target.clone()))?;

        let mut result = spec.outputs.is_empty();
        if !result {
            for dep in graph.dependencies(target) {
                if self.should_run(&dep)? {
                    result = true;
                    break;
                }
            }
        }
        if !result {
            result = is_stale(workflow, spec)?;
        }

        self.visiting.remove(target);
        self.should_run.insert(target.clone(), result);
        Ok(result)
    }
}

impl StatusProvider for FilesystemScheduler<'_> {
    fn status(&mut self, target: &Target) -> Result<TargetStatus, StatusError> {
        match self.jobs.get(target) {
            Some(JobState::Submitted) => return Ok(TargetStatus::Submitted),
            Some(JobState::Running) => return Ok(TargetStatus::Running),
            _ => {}
        }

        if self.should_run(target)? {
            Ok(TargetStatus::ShouldRun)
        } else {
            Ok(TargetStatus::Completed)
        }
    }
}

/// Returns true if an output is missing or older than an input
fn is_stale(workflow: &Workflow, spec: &TargetSpec) -> Result<bool, StatusError> {
    let mut oldest_output: Option<SystemTime> = None;
    for output in &spec.outputs {
        match modified(&workflow.resolve(output))? {
            Some(time) => {
                oldest_output = Some(oldest_output.map_or(time, |oldest| oldest.min(time)));
            }
            None => return Ok(true),
        }
    }

    let Some(oldest_output) = oldest_output else {
        return Ok(true);
    };

    for input in &spec.inputs {
        match modified(&workflow.resolve(input))? {
            Some(time) if time > oldest_output => return Ok(true),
            Some(_) => {}
            None => return Ok(true),
        }
    }

    Ok(false)
}

/// Modification time of a file, `None` if it does not exist
fn modified(path: &Path) -> Result<Option<SystemTime>, StatusError> {
    let io_err = |source: io::Error| StatusError::Io {
        path: path.to_path_buf(),
        source,
    };

    match fs::metadata(path) {
        Ok(meta) => meta.modified().map(Some).map_err(io_err),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyGraph;
    use crate::status::resolve_statuses;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    const PIPELINE: &str = r#"
[[target]]
name = "index"
inputs = ["genome.fa"]
outputs = ["genome.idx"]

[[target]]
name = "align"
inputs = ["genome.idx"]
outputs = ["aligned.bam"]

[[target]]
name = "cleanup"
"#;

    fn touch(dir: &Path, name: &str, age_secs: u64) {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let time = SystemTime::now() - Duration::from_secs(age_secs);
        file.set_modified(time).unwrap();
    }

    fn load(dir: &TempDir) -> (Workflow, DependencyGraph) {
        let workflow = Workflow::parse(PIPELINE, dir.path()).unwrap();
        let graph = workflow.graph().unwrap();
        (workflow, graph)
    }

    fn t(name: &str) -> Target {
        Target::new(name)
    }

    #[test]
    fn missing_outputs_should_run() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "genome.fa", 100);
        let (workflow, graph) = load(&dir);

        let mut scheduler = FilesystemScheduler::with_jobs(&workflow, &graph, HashMap::new());

        assert_eq!(scheduler.status(&t("index")).unwrap(), TargetStatus::ShouldRun);
        // align's input is produced by index, which should run
        assert_eq!(scheduler.status(&t("align")).unwrap(), TargetStatus::ShouldRun);
    }

    #[test]
    fn up_to_date_outputs_are_completed() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "genome.fa", 300);
        touch(dir.path(), "genome.idx", 200);
        touch(dir.path(), "aligned.bam", 100);
        let (workflow, graph) = load(&dir);

        let mut scheduler = FilesystemScheduler::with_jobs(&workflow, &graph, HashMap::new());

        assert_eq!(scheduler.status(&t("index")).unwrap(), TargetStatus::Completed);
        assert_eq!(scheduler.status(&t("align")).unwrap(), TargetStatus::Completed);
    }

    #[test]
    fn newer_input_makes_target_stale() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "genome.fa", 100);
        touch(dir.path(), "genome.idx", 200);
        touch(dir.path(), "aligned.bam", 150);
        let (workflow, graph) = load(&dir);

        let mut scheduler = FilesystemScheduler::with_jobs(&workflow, &graph, HashMap::new());

        assert_eq!(scheduler.status(&t("index")).unwrap(), TargetStatus::ShouldRun);
        assert_eq!(scheduler.status(&t("align")).unwrap(), TargetStatus::ShouldRun);
    }

    #[test]
    fn target_without_outputs_always_runs() {
        let dir = TempDir::new().unwrap();
        let (workflow, graph) = load(&dir);

        let mut scheduler = FilesystemScheduler::with_jobs(&workflow, &graph, HashMap::new());
        assert_eq!(scheduler.status(&t("cleanup")).unwrap(), TargetStatus::ShouldRun);
    }

    #[test]
    fn job_log_overrides_files() {
        let dir = TempDir::new().unwrap();
        let (workflow, graph) = load(&dir);
        let jobs = HashMap::from([
            (t("index"), JobState::Running),
            (t("align"), JobState::Submitted),
            (t("cleanup"), JobState::Failed),
        ]);

        let mut scheduler = FilesystemScheduler::with_jobs(&workflow, &graph, jobs);

        assert_eq!(scheduler.status(&t("index")).unwrap(), TargetStatus::Running);
        assert_eq!(scheduler.status(&t("align")).unwrap(), TargetStatus::Submitted);
        assert_eq!(scheduler.status(&t("cleanup")).unwrap(), TargetStatus::ShouldRun);
    }

    #[test]
    fn unknown_target() {
        let dir = TempDir::new().unwrap();
        let (workflow, graph) = load(&dir);

        let mut scheduler = FilesystemScheduler::with_jobs(&workflow, &graph, HashMap::new());
        assert!(matches!(
            scheduler.status(&t("ghost")),
            Err(StatusError::UnknownTarget(_))
        ));
    }

    #[test]
    fn cyclic_dependencies_are_reported() {
        let dir = TempDir::new().unwrap();
        let content = r#"
[[target]]
name = "x"
outputs = ["x.txt"]
after = ["y"]

[[target]]
name = "y"
outputs = ["y.txt"]
after = ["x"]
"#;
        let workflow = Workflow::parse(content, dir.path()).unwrap();
        let graph = workflow.graph().unwrap();

        let mut scheduler = FilesystemScheduler::with_jobs(&workflow, &graph, HashMap::new());
        assert!(matches!(scheduler.status(&t("x")), Err(StatusError::Cycle(_))));
    }

    #[test]
    fn open_reads_job_log() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("jobs.jsonl");
        fs::write(&log, "{\"target\": \"index\", \"state\": \"running\"}\n").unwrap();
        let (workflow, graph) = load(&dir);

        let mut scheduler =
            FilesystemScheduler::open(&workflow, &graph, &JobStore::new(&log)).unwrap();
        let statuses = resolve_statuses(&mut scheduler, &[t("index"), t("cleanup")]).unwrap();

        assert_eq!(statuses.get("index"), Some(&TargetStatus::Running));
        assert_eq!(statuses.get("cleanup"), Some(&TargetStatus::ShouldRun));
    }
}
