//! Structure materializer.
//!
//! Walks a validated template tree depth-first, in document order: a
//! directory is created, then its `subdirs`, then its `files`. Each generated
//! segment goes through token substitution and sanitizing, and must resolve
//! strictly inside the directory it is created in. Items that fail that check
//! are rejected together with their subtree; filesystem errors fail only the
//! item concerned. Neither stops the walk, so the caller always receives a
//! complete, ordered list of outcomes.
//!
//! A dry run takes exactly the same decisions and only skips the
//! [`OutputService`] calls.

use std::path::Path;

use tracing::{debug, warn};

use crate::generation::containment::is_strictly_within;
use crate::generation::sanitizers::{DIR_REPLACEMENT, FILE_REPLACEMENT, sanitize_name, substitute};
use crate::generation::{EntryKind, Mode, Outcome, OutputService, VariableSet};
use crate::infrastructure::output::FileSystemOutputService;
use crate::infrastructure::templates::{DirNode, FileNode, TemplateDocument};

/// Materialize `structure` under `base` against the local filesystem.
pub fn materialize(
    base: &Path,
    structure: &[DirNode],
    variables: &VariableSet,
    mode: Mode,
) -> Vec<Outcome> {
    Materializer::new(&FileSystemOutputService, variables, mode).structure(base, structure)
}

/// Materialize a whole template: `structure` first, then `global_files`
/// anchored at `base`.
pub fn materialize_template(
    base: &Path,
    template: &TemplateDocument,
    variables: &VariableSet,
    mode: Mode,
) -> Vec<Outcome> {
    let materializer = Materializer::new(&FileSystemOutputService, variables, mode);
    let mut outcomes = materializer.structure(base, &template.structure);
    outcomes.extend(materializer.files(base, &template.global_files));
    outcomes
}

/// Recursive tree walker parameterised over the output service
pub struct Materializer<'a, O: OutputService> {
    output: &'a O,
    variables: &'a VariableSet,
    mode: Mode,
}

impl<'a, O: OutputService> Materializer<'a, O> {
    pub fn new(output: &'a O, variables: &'a VariableSet, mode: Mode) -> Self {
        Self {
            output,
            variables,
            mode,
        }
    }

    /// Process each directory node under `base`, in order.
    pub fn structure(&self, base: &Path, nodes: &[DirNode]) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        for node in nodes {
            self.dir_node(base, node, &mut outcomes);
        }
        outcomes
    }

    /// Process each file node directly under `base`, in order.
    pub fn files(&self, base: &Path, nodes: &[FileNode]) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        for node in nodes {
            self.file_node(base, node, &mut outcomes);
        }
        outcomes
    }

    fn dir_node(&self, base: &Path, node: &DirNode, outcomes: &mut Vec<Outcome>) {
        let name = sanitize_name(&substitute(&node.dir, self.variables.as_map()), DIR_REPLACEMENT);
        let path = base.join(&name);

        if !is_strictly_within(base, &path) {
            warn!(
                raw = %node.dir,
                path = %path.display(),
                base = %base.display(),
                "Directory resolves outside its parent, skipping subtree"
            );
            outcomes.push(Outcome::Rejected {
                path,
                kind: EntryKind::Directory,
            });
            return;
        }

        match self.mode {
            Mode::DryRun => outcomes.push(Outcome::Planned {
                path: path.clone(),
                kind: EntryKind::Directory,
                executable: false,
            }),
            Mode::Apply => match self.output.ensure_directory(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Created directory");
                    outcomes.push(Outcome::Created {
                        path: path.clone(),
                        kind: EntryKind::Directory,
                        executable: false,
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to create directory");
                    outcomes.push(Outcome::Failed {
                        path,
                        kind: EntryKind::Directory,
                        error: e.to_string(),
                    });
                    return;
                }
            },
        }

        for subdir in &node.subdirs {
            self.dir_node(&path, subdir, outcomes);
        }

        for file in &node.files {
            self.file_node(&path, file, outcomes);
        }
    }

    fn file_node(&self, base: &Path, node: &FileNode, outcomes: &mut Vec<Outcome>) {
        let vars = self.variables.as_map();
        let name = sanitize_name(&substitute(&node.name, vars), FILE_REPLACEMENT);
        let path = base.join(&name);

        if !is_strictly_within(base, &path) {
            warn!(
                raw = %node.name,
                path = %path.display(),
                base = %base.display(),
                "File resolves outside its parent, skipping"
            );
            outcomes.push(Outcome::Rejected {
                path,
                kind: EntryKind::File,
            });
            return;
        }

        if self.mode.is_dry_run() {
            outcomes.push(Outcome::Planned {
                path,
                kind: EntryKind::File,
                executable: node.executable,
            });
            return;
        }

        let content = substitute(&node.content, vars);
        if let Err(e) = self.output.write_file(&path, &content) {
            warn!(path = %path.display(), error = %e, "Failed to write file");
            outcomes.push(Outcome::Failed {
                path,
                kind: EntryKind::File,
                error: e.to_string(),
            });
            return;
        }

        let executable = node.executable && self.mark_executable(&path);
        debug!(path = %path.display(), executable, "Wrote file");
        outcomes.push(Outcome::Created {
            path,
            kind: EntryKind::File,
            executable,
        });
    }

    /// Failure to set the bit never fails the file.
    fn mark_executable(&self, path: &Path) -> bool {
        match self.output.set_executable(path) {
            Ok(applied) => {
                if !applied {
                    debug!(path = %path.display(), "Execute bit not supported on this platform");
                }
                applied
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to mark file executable");
                false
            }
        }
    }
}
