//! Commit message reading and conventional-commit validation.
//!
//! Everything here returns `Result`; printing and exit statuses belong to
//! `cli::validate`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{CommitType, ConventionalHeader};

/// Conventional-commit header grammar, anchored at the start of the message only.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^({})(?:\((.+)\))?(!)?: (.+)",
        CommitType::alternation()
    ))
    .expect("header grammar is a valid regex")
});

/// Shown when the message is run outside a hook (wrong argument count).
pub const USAGE_HINT: &str = "This command must be run from within a Git commit hook directory\n\
To setup Koche, run 'koche -i' in a Git repository";

/// Shown after a read failure on an already-open message file.
pub const REINSTALL_HINT: &str =
    "If this problem continues, remove the commit-msg hook and run koche -i again.";

/// Errors from argument checking, reading, or validating a commit message.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum MessageError {
    #[error("expected exactly one commit message file, got {0}")]
    #[diagnostic(code(koche::message::argument_count))]
    ArgumentCount(usize),

    #[error("Could not open {} file: {source}", .path.display())]
    #[diagnostic(code(koche::message::unreadable))]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read {} file: {source}", .path.display())]
    #[diagnostic(code(koche::message::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "\nInvalid commit-message. The commit message needs to follow this format:\n\n    \
         <type>[optional scope]: <description>\n\n    \
         [optional body]\n\n    \
         [optional footer(s)]\n\n\n\
         Valid types: {}\n",
        CommitType::list()
    )]
    #[diagnostic(code(koche::message::invalid_format))]
    InvalidFormat,
}

/// Exactly one message file path, as git passes to `commit-msg` hooks.
pub fn single_path(args: &[PathBuf]) -> Result<&Path, MessageError> {
    match args {
        [path] => Ok(path),
        _ => Err(MessageError::ArgumentCount(args.len())),
    }
}

/// Read a commit message file.
///
/// Lines are split on `\n` with a trailing `\r` dropped, decoded lossily as
/// UTF-8, and rejoined with every line (including the last) ending in `\n`.
/// The file handle is released when this returns, on every path.
pub fn read(path: &Path) -> Result<String, MessageError> {
    let file = File::open(path).map_err(|source| MessageError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut message = String::new();
    for line in BufReader::new(file).split(b'\n') {
        let mut line = line.map_err(|source| MessageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        message.push_str(&String::from_utf8_lossy(&line));
        message.push('\n');
    }

    tracing::debug!(path = %path.display(), bytes = message.len(), "read commit message");
    Ok(message)
}

/// Check a commit message against the conventional-commit grammar.
///
/// Only the start of `message` is matched, so the first line decides;
/// anything after a valid header (trailing text, body, footers) is accepted.
pub fn validate(message: &str) -> Result<ConventionalHeader, MessageError> {
    let caps = HEADER.captures(message).ok_or(MessageError::InvalidFormat)?;

    let kind = CommitType::from_token(&caps[1]).ok_or(MessageError::InvalidFormat)?;
    let header = ConventionalHeader {
        kind,
        scope: caps.get(2).map(|m| m.as_str().to_string()),
        breaking: caps.get(3).is_some(),
        description: caps[4].to_string(),
    };

    tracing::debug!(%header, "commit message accepted");
    Ok(header)
}

/// Read and validate the message file at `path`.
pub fn check_file(path: &Path) -> Result<ConventionalHeader, MessageError> {
    validate(&read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn message_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    // ---- validate: accepted ----

    #[test]
    fn accepts_plain_feat() {
        let header = validate("feat: add login flow\n").unwrap();
        assert_eq!(header.kind, CommitType::Feat);
        assert_eq!(header.scope, None);
        assert!(!header.breaking);
        assert_eq!(header.description, "add login flow");
    }

    #[test]
    fn accepts_scope() {
        let header = validate("fix(auth): handle null token\n").unwrap();
        assert_eq!(header.kind, CommitType::Fix);
        assert_eq!(header.scope.as_deref(), Some("auth"));
    }

    #[test]
    fn accepts_breaking_marker() {
        let header = validate("chore!: drop legacy config\n").unwrap();
        assert_eq!(header.kind, CommitType::Chore);
        assert!(header.breaking);
    }

    #[test]
    fn accepts_scope_and_breaking_marker() {
        let header = validate("refactor(core)!: split parser\n").unwrap();
        assert_eq!(header.scope.as_deref(), Some("core"));
        assert!(header.breaking);
    }

    #[test]
    fn accepts_every_type() {
        for kind in CommitType::ALL {
            let message = format!("{kind}: something\n");
            assert_eq!(validate(&message).unwrap().kind, kind, "{message}");
        }
    }

    #[test]
    fn accepts_body_and_footer() {
        let message = "docs: explain hooks\n\nLonger body.\n\nRefs: #12\n";
        assert!(validate(message).is_ok());
    }

    #[test]
    fn accepts_without_trailing_newline() {
        assert!(validate("perf: cache regex").is_ok());
    }

    #[test]
    fn accepts_colons_in_description() {
        assert!(validate("test: a: b: c\n").is_ok());
    }

    // ---- validate: rejected ----

    #[test]
    fn rejects_free_text() {
        assert!(matches!(
            validate("Added login flow\n"),
            Err(MessageError::InvalidFormat)
        ));
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(validate("ci: run tests\n").is_err());
        assert!(validate("feature: add login\n").is_err());
    }

    #[test]
    fn rejects_uppercase_type() {
        assert!(validate("Feat: add login\n").is_err());
    }

    #[test]
    fn rejects_missing_space_after_colon() {
        assert!(validate("feat:add login\n").is_err());
    }

    #[test]
    fn rejects_empty_description() {
        assert!(validate("feat: \n").is_err());
        assert!(validate("feat: ").is_err());
    }

    #[test]
    fn rejects_empty_scope() {
        assert!(validate("fix(): handle null token\n").is_err());
    }

    #[test]
    fn rejects_leading_whitespace() {
        assert!(validate(" feat: add login\n").is_err());
    }

    #[test]
    fn rejects_valid_header_on_second_line() {
        assert!(validate("wip\nfeat: add login\n").is_err());
    }

    #[test]
    fn rejects_empty_message() {
        assert!(validate("").is_err());
    }

    #[test]
    fn invalid_format_text_lists_types() {
        let text = MessageError::InvalidFormat.to_string();
        assert!(text.contains("Invalid commit-message"));
        assert!(text.contains("<type>[optional scope]: <description>"));
        assert!(text.contains("[optional footer(s)]"));
        assert!(text.contains("Valid types: feat, fix, docs, style, refactor, perf, test, chore"));
    }

    // ---- single_path ----

    #[test]
    fn single_path_accepts_one() {
        let args = vec![PathBuf::from(".git/COMMIT_EDITMSG")];
        assert_eq!(single_path(&args).unwrap(), Path::new(".git/COMMIT_EDITMSG"));
    }

    #[test]
    fn single_path_rejects_none() {
        assert!(matches!(single_path(&[]), Err(MessageError::ArgumentCount(0))));
    }

    #[test]
    fn single_path_rejects_two() {
        let args = vec![PathBuf::from("a"), PathBuf::from("b")];
        assert!(matches!(single_path(&args), Err(MessageError::ArgumentCount(2))));
    }

    // ---- read ----

    #[test]
    fn read_terminates_every_line() {
        let file = message_file(b"feat: one\n\nbody");
        assert_eq!(read(file.path()).unwrap(), "feat: one\n\nbody\n");
    }

    #[test]
    fn read_strips_carriage_returns() {
        let file = message_file(b"fix: crlf\r\nbody\r\n");
        assert_eq!(read(file.path()).unwrap(), "fix: crlf\nbody\n");
    }

    #[test]
    fn read_empty_file() {
        let file = message_file(b"");
        assert_eq!(read(file.path()).unwrap(), "");
    }

    #[test]
    fn read_invalid_utf8_is_lossy() {
        let file = message_file(b"feat: caf\xe9\n");
        assert_eq!(read(file.path()).unwrap(), "feat: caf\u{FFFD}\n");
    }

    #[test]
    fn read_missing_file_is_unreadable() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read(&dir.path().join("COMMIT_EDITMSG")).unwrap_err();
        assert!(matches!(err, MessageError::Unreadable { .. }));
        assert!(err.to_string().starts_with("Could not open "));
    }

    #[cfg(unix)]
    #[test]
    fn read_directory_fails_after_open() {
        // Opening a directory succeeds on unix; reading it fails with EISDIR.
        let dir = tempfile::TempDir::new().unwrap();
        let err = read(dir.path()).unwrap_err();
        assert!(matches!(err, MessageError::Read { .. }), "got: {err:?}");
        assert!(err.to_string().starts_with("Could not read "), "got: {err}");
    }

    // ---- check_file ----

    #[test]
    fn check_file_valid() {
        let file = message_file(b"fix(auth): handle null token\n");
        assert_eq!(check_file(file.path()).unwrap().kind, CommitType::Fix);
    }

    #[test]
    fn check_file_invalid() {
        let file = message_file(b"Added login flow\n");
        assert!(matches!(
            check_file(file.path()),
            Err(MessageError::InvalidFormat)
        ));
    }
}
