use std::io::Write;
use std::path::Path;

use super::{exit, Console};
use crate::config::Config;
use crate::hook::{self, Repository};

/// Execute `-i`: install the commit-msg hook in the repository at `root`.
///
/// Existence checks and the outcome are narrated; failures exit with
/// [`exit::HOOK_FAILURE`].
pub(crate) fn install(root: &Path, config: &Config, console: &mut Console<'_>) -> u8 {
    let repo = Repository::new(root);
    match hook::install(&repo, &config.hook, console.out()) {
        Ok(_) => {
            let _ = writeln!(console.out(), "Added conventional commits to Git repository");
            exit::SUCCESS
        }
        Err(e) => {
            let _ = writeln!(
                console.error(),
                "Failed to add conventional commits to Git repository"
            );
            console.report(&e);
            exit::HOOK_FAILURE
        }
    }
}

/// Execute `-r`: remove the commit-msg hook from the repository at `root`.
pub(crate) fn remove(root: &Path, config: &Config, console: &mut Console<'_>) -> u8 {
    let repo = Repository::new(root);
    match hook::remove(&repo, &config.hook, console.out()) {
        Ok(_) => {
            let _ = writeln!(console.out(), "Removed conventional commits from Git repository");
            exit::SUCCESS
        }
        Err(e) => {
            let _ = writeln!(
                console.error(),
                "Failed to remove conventional commits from Git repository"
            );
            console.report(&e);
            exit::HOOK_FAILURE
        }
    }
}
