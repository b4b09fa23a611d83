use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Outcome of a successful existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Present,
    Absent,
}

/// A stat failure other than "not found" (permission denied, I/O error, ...).
///
/// This is the indeterminate outcome: the path may or may not exist, and
/// callers must not treat it as either.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("could not check {}: {source}", .path.display())]
#[diagnostic(code(koche::path::indeterminate))]
pub struct ProbeError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Report whether `path` exists.
///
/// Only `NotFound` maps to [`Existence::Absent`]; every other error is
/// returned as [`ProbeError`].
pub fn probe(path: &Path) -> Result<Existence, ProbeError> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(Existence::Present),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Existence::Absent),
        Err(source) => Err(ProbeError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// [`probe`], writing one diagnostic line to `out` for whichever outcome
/// was observed. `label` is the path as shown to the user.
pub fn check(path: &Path, label: &str, out: &mut dyn Write) -> Result<Existence, ProbeError> {
    let result = probe(path);
    // Diagnostics are best effort; a closed stdout must not change the outcome.
    let _ = match &result {
        Ok(Existence::Present) => writeln!(out, "{label} exists"),
        Ok(Existence::Absent) => writeln!(out, "{label} does not exist"),
        Err(e) => writeln!(out, "{label} could not be checked: {}", e.source),
    };
    tracing::debug!(path = %path.display(), outcome = ?result.as_ref().ok(), "existence check");
    result
}
