//! Path containment checks for generated entries.
//!
//! Both paths are resolved to their canonical, symlink-free form before being
//! compared. Trailing components that do not exist yet (a directory about to be
//! created, or anything in a dry run) are appended lexically onto the deepest
//! existing ancestor, so `..` in such a tail still climbs out of the base.
//!
//! The comparison is component-wise: `/a/bc` is not inside `/a/b`.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

/// Returns true when `target` resolves to `base` or to a path below it.
///
/// Any resolution failure other than a missing trailing segment (permission
/// denied, a file used as a directory, a symlink loop) yields `false`.
pub fn is_within(base: &Path, target: &Path) -> bool {
    match (resolve(base), resolve(target)) {
        (Ok(base), Ok(target)) => target.starts_with(&base),
        (Err(e), _) | (_, Err(e)) => {
            debug!(base = %base.display(), target = %target.display(), error = %e, "Path resolution failed");
            false
        }
    }
}

/// Like [`is_within`], but `target` must not resolve to `base` itself.
pub fn is_strictly_within(base: &Path, target: &Path) -> bool {
    match (resolve(base), resolve(target)) {
        (Ok(base), Ok(target)) => target != base && target.starts_with(&base),
        _ => false,
    }
}

/// Upper bound on dangling symlinks followed while resolving one path
const MAX_LINK_DEPTH: usize = 40;

/// Canonicalizes `path`, tolerating a tail of not-yet-existing components.
///
/// A dangling symlink is followed to its target, so a link pointing at a
/// missing file outside the base is still seen as outside.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    resolve_with_depth(path, 0)
}

fn resolve_with_depth(path: &Path, depth: usize) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let components: Vec<Component<'_>> = absolute.components().collect();

    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        match fs::canonicalize(&prefix) {
            Ok(mut resolved) => {
                for component in &components[split..] {
                    match component {
                        Component::Normal(segment) => resolved.push(segment),
                        Component::ParentDir => {
                            resolved.pop();
                        }
                        Component::CurDir => {}
                        Component::RootDir | Component::Prefix(_) => resolved.push(component),
                    }
                }
                return Ok(resolved);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(mut redirected) = dangling_link_target(&prefix)? {
                    if depth >= MAX_LINK_DEPTH {
                        return Err(io::Error::other(format!(
                            "too many symbolic links resolving {}",
                            absolute.display()
                        )));
                    }
                    redirected.extend(&components[split..]);
                    return resolve_with_depth(&redirected, depth + 1);
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no existing ancestor for {}", absolute.display()),
    ))
}

/// Target of `path` when it is a symlink, made absolute against its parent.
fn dangling_link_target(path: &Path) -> io::Result<Option<PathBuf>> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let target = fs::read_link(path)?;
            if target.is_absolute() {
                Ok(Some(target))
            } else {
                let parent = path.parent().unwrap_or_else(|| Path::new("/"));
                Ok(Some(parent.join(target)))
            }
        }
        _ => Ok(None),
    }
}
