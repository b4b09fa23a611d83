//! Installing and removing the `commit-msg` hook.
//!
//! Both operations run against a [`Repository`] root and narrate every
//! existence check to the supplied writer.

pub mod script;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::path::{self, Existence, ProbeError};

pub use script::{HookInvocation, HookScript, ScriptError};

/// Directory whose presence marks a repository root.
pub const MARKER_DIR: &str = ".git";

/// Hook file location relative to the repository root.
pub const HOOK_PATH: &str = ".git/hooks/commit-msg";

#[cfg(unix)]
const HOOK_MODE: u32 = 0o755;

/// Errors from hook installation or removal.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum HookError {
    #[error("can not find .git folder in {}", .0.display())]
    #[diagnostic(
        code(koche::hook::not_a_repository),
        help("run this from the root of a git repository")
    )]
    NotAGitRepository(PathBuf),

    #[error(".git/hooks/commit-msg already exists")]
    #[diagnostic(
        code(koche::hook::already_exists),
        help("remove the existing hook first, or run `koche -r` if koche installed it")
    )]
    HookAlreadyExists,

    #[error(".git/hooks/commit-msg does not exist")]
    #[diagnostic(
        code(koche::hook::not_installed),
        help("install the hook with `koche -i`")
    )]
    HookNotInstalled,

    #[error("failed to write {}: {source}", .path.display())]
    #[diagnostic(code(koche::hook::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {}: {source}", .path.display())]
    #[diagnostic(code(koche::hook::delete))]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Probe(#[from] ProbeError),
}

/// A repository root on disk. Nothing is checked at construction.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Repository { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn marker(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR).join("hooks")
    }

    pub fn hook_path(&self) -> PathBuf {
        self.root.join(HOOK_PATH)
    }

    fn require_marker(&self, out: &mut dyn Write) -> Result<(), HookError> {
        match path::check(&self.marker(), MARKER_DIR, out)? {
            Existence::Present => Ok(()),
            Existence::Absent => Err(HookError::NotAGitRepository(self.root.clone())),
        }
    }
}

/// Install `script` as the repository's `commit-msg` hook.
///
/// Refuses to overwrite an existing hook. On unix the file is made
/// executable for owner, group and other, writable by the owner only.
/// Returns the hook path.
pub fn install(
    repo: &Repository,
    script: &HookScript,
    out: &mut dyn Write,
) -> Result<PathBuf, HookError> {
    repo.require_marker(out)?;

    let hook_path = repo.hook_path();
    if path::check(&hook_path, HOOK_PATH, out)? == Existence::Present {
        return Err(HookError::HookAlreadyExists);
    }

    let hooks_dir = repo.hooks_dir();
    std::fs::create_dir_all(&hooks_dir).map_err(write_error(&hooks_dir))?;
    std::fs::write(&hook_path, script.render()).map_err(write_error(&hook_path))?;
    make_executable(&hook_path).map_err(write_error(&hook_path))?;

    tracing::info!(path = %hook_path.display(), program = %script.program, "installed commit-msg hook");
    Ok(hook_path)
}

/// Remove the repository's `commit-msg` hook.
///
/// Fails with [`HookError::HookNotInstalled`] when there is nothing to
/// remove. A hook that does not look like `expected` is still removed, with
/// a warning logged.
pub fn remove(
    repo: &Repository,
    expected: &HookScript,
    out: &mut dyn Write,
) -> Result<PathBuf, HookError> {
    repo.require_marker(out)?;

    let hook_path = repo.hook_path();
    if path::check(&hook_path, HOOK_PATH, out)? == Existence::Absent {
        return Err(HookError::HookNotInstalled);
    }

    match std::fs::read_to_string(&hook_path) {
        Ok(content) if expected.matches(&content) => {}
        Ok(_) => tracing::warn!(
            path = %hook_path.display(),
            "removing a commit-msg hook that koche did not install"
        ),
        Err(e) => tracing::warn!(path = %hook_path.display(), error = %e, "could not read hook before removal"),
    }

    std::fs::remove_file(&hook_path).map_err(|source| HookError::Delete {
        path: hook_path.clone(),
        source,
    })?;

    tracing::info!(path = %hook_path.display(), "removed commit-msg hook");
    Ok(hook_path)
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> HookError {
    let path = path.to_path_buf();
    move |source| HookError::Write { path, source }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(HOOK_MODE))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
