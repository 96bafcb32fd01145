//! Port interfaces for the generation domain

use std::io;
use std::path::Path;

/// Service performing the filesystem mutations of a materialization
///
/// Only consulted in [`Mode::Apply`](crate::generation::Mode::Apply); a dry
/// run never reaches it.
pub trait OutputService {
    /// Create `path` as a directory; an existing directory is not an error
    fn ensure_directory(&self, path: &Path) -> io::Result<()>;

    /// Write `content` to `path`, replacing any existing file
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Set the execute permission bits on `path`.
    ///
    /// Returns `Ok(false)` on platforms without that permission model.
    fn set_executable(&self, path: &Path) -> io::Result<bool>;
}
