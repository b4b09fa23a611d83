use std::io::Write;
use std::path::PathBuf;

use super::{exit, Console};
use crate::message::{self, MessageError, REINSTALL_HINT, USAGE_HINT};

/// Execute the default mode: validate the commit message file git passed in.
///
/// Prints nothing on success. Every failure prints its diagnostic and
/// exits with [`exit::INVALID_MESSAGE`], which makes git abort the commit.
pub(crate) fn run(paths: &[PathBuf], console: &mut Console<'_>) -> u8 {
    let err = match message::single_path(paths).and_then(message::check_file) {
        Ok(_) => return exit::SUCCESS,
        Err(e) => e,
    };

    let sink = console.error();
    let _ = match err {
        MessageError::ArgumentCount(_) => writeln!(sink, "{USAGE_HINT}"),
        MessageError::Read { .. } => writeln!(sink, "{err}\n{REINSTALL_HINT}"),
        _ => writeln!(sink, "{err}"),
    };
    exit::INVALID_MESSAGE
}
