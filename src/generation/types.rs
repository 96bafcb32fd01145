//! Core types for the generation domain

use std::fmt;
use std::path::{Path, PathBuf};

/// Whether the materializer touches the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Create directories and write files
    Apply,
    /// Make every decision but leave the filesystem untouched
    DryRun,
}

impl Mode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Mode::DryRun } else { Mode::Apply }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Mode::DryRun)
    }
}

/// Kind of filesystem entry an outcome refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory => write!(f, "directory"),
            EntryKind::File => write!(f, "file"),
        }
    }
}

/// Result of processing one directory or file node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The entry was created (or already existed, for directories)
    Created {
        path: PathBuf,
        kind: EntryKind,
        executable: bool,
    },
    /// Dry run: the entry would be created
    Planned {
        path: PathBuf,
        kind: EntryKind,
        executable: bool,
    },
    /// The generated path escapes its parent; the node and its subtree were skipped
    Rejected { path: PathBuf, kind: EntryKind },
    /// The filesystem refused the operation
    Failed {
        path: PathBuf,
        kind: EntryKind,
        error: String,
    },
}

impl Outcome {
    pub fn path(&self) -> &Path {
        match self {
            Outcome::Created { path, .. }
            | Outcome::Planned { path, .. }
            | Outcome::Rejected { path, .. }
            | Outcome::Failed { path, .. } => path,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Outcome::Created { kind, .. }
            | Outcome::Planned { kind, .. }
            | Outcome::Rejected { kind, .. }
            | Outcome::Failed { kind, .. } => *kind,
        }
    }

    /// Created or planned, as opposed to rejected or failed.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Created { .. } | Outcome::Planned { .. })
    }
}

/// Tally of a materialization run, for summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeSummary {
    pub created: usize,
    pub planned: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl OutcomeSummary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome {
                    Outcome::Created { .. } => summary.created += 1,
                    Outcome::Planned { .. } => summary.planned += 1,
                    Outcome::Rejected { .. } => summary.rejected += 1,
                    Outcome::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }

    pub fn has_problems(&self) -> bool {
        self.rejected > 0 || self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_dry_run() {
        assert_eq!(Mode::from_dry_run(true), Mode::DryRun);
        assert_eq!(Mode::from_dry_run(false), Mode::Apply);
        assert!(Mode::DryRun.is_dry_run());
    }

    #[test]
    fn test_outcome_accessors_and_summary() {
        let outcomes = vec![
            Outcome::Created {
                path: PathBuf::from("/p/recon"),
                kind: EntryKind::Directory,
                executable: false,
            },
            Outcome::Rejected {
                path: PathBuf::from("/p/.."),
                kind: EntryKind::Directory,
            },
            Outcome::Failed {
                path: PathBuf::from("/p/x.sh"),
                kind: EntryKind::File,
                error: "Permission denied".to_string(),
            },
        ];

        assert_eq!(outcomes[2].path(), Path::new("/p/x.sh"));
        assert_eq!(outcomes[2].kind(), EntryKind::File);
        assert!(outcomes[0].is_accepted());
        assert!(!outcomes[1].is_accepted());

        let summary = OutcomeSummary::from_outcomes(&outcomes);
        assert_eq!(
            summary,
            OutcomeSummary {
                created: 1,
                planned: 0,
                rejected: 1,
                failed: 1
            }
        );
        assert!(summary.has_problems());
    }
}
