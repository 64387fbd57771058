use std::path::{Component, Path, PathBuf};

/// Normalizes a path without touching the filesystem: `.` is dropped, `..`
/// pops a component but never climbs above the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Resolves the client's repository argument to an absolute path under
/// `root`.
///
/// Relative arguments (`~alice/proj`, `/`-less paths) are taken relative to
/// the root. A result outside the root is re-anchored by joining the
/// normalized path onto the root, so the returned path always lies under it.
pub fn resolve_repo_path(root: &Path, arg: &str) -> PathBuf {
    let root = normalize_lexically(root);
    let candidate = normalize_lexically(&root.join(arg));

    if candidate.starts_with(&root) {
        return candidate;
    }

    let relative = candidate.strip_prefix("/").unwrap_or(&candidate);
    normalize_lexically(&root.join(relative))
}
