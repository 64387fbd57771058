use std::fs;
use std::io;
use std::path::Path;

use git2::Repository;
use tracing::{info, warn};

use super::Rejection;
use super::access::check_suspension;
use super::command::GitService;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{PusherIdentity, RepoLookup, Visibility};

/// Hooks that run the site's update script in an autocreated repository.
const LINKED_HOOKS: &[&str] = &["update", "post-update"];

/// Repository and owner names implied by a path like `<root>/~owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub name: &'a str,
    pub owner: &'a str,
}

/// Splits `path` into its last segment and the `~`-stripped segment above it.
pub fn candidate(path: &Path) -> Option<Candidate<'_>> {
    let name = path.file_name()?.to_str()?;
    let owner = path.parent()?.file_name()?.to_str()?.strip_prefix('~')?;

    if name.is_empty() || owner.is_empty() {
        return None;
    }

    Some(Candidate { name, owner })
}

/// Creates the repository a first push targets, when the pusher owns the
/// namespace it would live in.
///
/// Every failure is reported to the client as "not found"; the cause is
/// only logged. A suspended pusher is refused before anything is written.
pub fn autocreate(
    store: &dyn Store,
    post_update_script: &Path,
    support_contact: &str,
    pusher: &PusherIdentity,
    service: GitService,
    path: &Path,
) -> std::result::Result<RepoLookup, Rejection> {
    let Some(candidate) = candidate(path) else {
        info!("Not autocreating {}: no owner namespace in path", path.display());
        return Err(Rejection::NotFound);
    };

    if !service.is_write() || candidate.owner != pusher.name {
        info!(
            "Not autocreating {}: service {}, namespace owner '{}', pusher '{}'",
            path.display(),
            service.command_name(),
            candidate.owner,
            pusher.name
        );
        return Err(Rejection::NotFound);
    }

    let not_found = |step: &str, e: Error| {
        warn!("Error autocreating repo: {step}: {e}");
        Rejection::NotFound
    };

    let account = store
        .lookup_pusher(pusher.id)
        .map_err(|e| not_found("pusher lookup", e))?
        .ok_or_else(|| {
            warn!("Error autocreating repo: pusher {} has no account", pusher.id);
            Rejection::NotFound
        })?;

    check_suspension(&account, support_contact).inspect_err(|_| {
        info!("Not autocreating {}: pusher {} is suspended", path.display(), pusher.id);
    })?;

    let path_str = path.to_string_lossy();
    let repo_id = store
        .create_autocreated_repository(candidate.name, pusher.id, &path_str)
        .map_err(|e| not_found("insert", e))?
        .ok_or_else(|| {
            warn!("Error autocreating repo: {path_str} is owned by another user");
            Rejection::NotFound
        })?;

    provision_repository(path, repo_id, post_update_script)
        .map_err(|e| not_found("provision", e))?;

    info!("Autocreated repo {} (id {repo_id})", path.display());

    Ok(RepoLookup {
        id: repo_id,
        name: candidate.name.to_string(),
        owner_id: pusher.id,
        owner_name: pusher.name.clone(),
        path: path_str.into_owned(),
        visibility: Visibility::Autocreated,
        pusher: account,
        access: None,
        redirected: false,
    })
}

/// Lays out a bare repository at `path` with the site's hooks. Safe to run
/// again over a repository it already provisioned.
pub fn provision_repository(path: &Path, repo_id: i64, post_update_script: &Path) -> Result<()> {
    fs::create_dir_all(path)?;

    let repo = Repository::init_bare(path)?;
    let mut config = repo.config()?;
    config.set_str("receive.denyDeleteCurrent", "ignore")?;
    config.set_i64("srht.repo-id", repo_id)?;

    let hooks = path.join("hooks");
    fs::create_dir_all(&hooks)?;
    for hook in LINKED_HOOKS {
        link_hook(post_update_script, &hooks.join(hook))?;
    }

    Ok(())
}

fn link_hook(target: &Path, link: &Path) -> Result<()> {
    match std::os::unix::fs::symlink(target, link) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            if fs::read_link(link).is_ok_and(|existing| existing == target) {
                Ok(())
            } else {
                Err(Error::HookConflict {
                    link: link.display().to_string(),
                    target: target.display().to_string(),
                })
            }
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_from_namespaced_path() {
        assert_eq!(
            candidate(Path::new("/repos/~bob/newproj")),
            Some(Candidate {
                name: "newproj",
                owner: "bob"
            })
        );
    }

    #[test]
    fn test_candidate_requires_owner_sigil() {
        assert_eq!(candidate(Path::new("/repos/bob/newproj")), None);
        assert_eq!(candidate(Path::new("/repos/~/newproj")), None);
        assert_eq!(candidate(Path::new("/newproj")), None);
    }

    #[test]
    fn test_provision_repository() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("~bob").join("newproj");
        let hook = temp.path().join("update-hook");

        provision_repository(&path, 42, &hook).unwrap();

        let repo = Repository::open_bare(&path).unwrap();
        assert!(repo.is_bare());
        let config = repo.config().unwrap();
        assert_eq!(
            config.get_string("receive.denyDeleteCurrent").unwrap(),
            "ignore"
        );
        assert_eq!(config.get_i64("srht.repo-id").unwrap(), 42);

        for name in LINKED_HOOKS {
            assert_eq!(fs::read_link(path.join("hooks").join(name)).unwrap(), hook);
        }
    }

    #[test]
    fn test_provision_repository_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("~bob").join("newproj");
        let hook = temp.path().join("update-hook");

        provision_repository(&path, 1, &hook).unwrap();
        provision_repository(&path, 1, &hook).unwrap();
    }

    #[test]
    fn test_foreign_hook_is_a_conflict() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("~bob").join("newproj");
        fs::create_dir_all(path.join("hooks")).unwrap();
        fs::write(path.join("hooks").join("update"), "#!/bin/sh\n").unwrap();

        let err = provision_repository(&path, 1, &temp.path().join("update-hook")).unwrap_err();
        assert!(matches!(err, Error::HookConflict { .. }));
    }
}
