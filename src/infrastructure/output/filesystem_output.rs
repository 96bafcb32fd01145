//! Filesystem-based output service implementation

use std::fs;
use std::io;
use std::path::Path;

use crate::generation::OutputService;

/// Mode applied to files marked executable
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Output service that writes directly to the local filesystem
#[derive(Debug, Clone, Copy)]
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }
}

impl OutputService for FileSystemOutputService {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }

    #[cfg(unix)]
    fn set_executable(&self, path: &Path) -> io::Result<bool> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))?;
        Ok(true)
    }

    #[cfg(not(unix))]
    fn set_executable(&self, _path: &Path) -> io::Result<bool> {
        Ok(false)
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new()
    }
}
