//! # Status Annotation
//!
//! Execution status of targets, as answered by a scheduler backend. The
//! renderer only sees the resulting [`StatusMap`]; how statuses are worked
//! out is up to the [`StatusProvider`].

mod scheduler;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{StatusMap, Target, TargetStatus};

pub use scheduler::FilesystemScheduler;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Scheduler has no record of target: {0}")]
    UnknownTarget(Target),

    #[error("Dependency cycle through {0} while resolving status")]
    Cycle(Target),

    #[error("Failed to inspect {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A scheduler backend that can report the status of a target
pub trait StatusProvider {
    /// Returns the current status of a target
    fn status(&mut self, target: &Target) -> Result<TargetStatus, StatusError>;
}

/// Resolves the status of every target in `targets`
///
/// The returned map covers every target or the call fails; nothing is
/// defaulted.
pub fn resolve_statuses<P: StatusProvider + ?Sized>(
    provider: &mut P,
    targets: &[Target],
) -> Result<StatusMap, StatusError> {
    let mut statuses = StatusMap::with_capacity(targets.len());
    for target in targets {
        let status = provider.status(target)?;
        statuses.insert(target.clone(), status);
    }
    Ok(statuses)
}
