pub mod config;
pub mod domain;
pub mod hook;
pub mod message;
pub mod path;

pub(crate) mod cli;

pub use cli::{exit, Invocation, Mode};

/// Version printed by `koche -v`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run one invocation against the process stdout/stderr.
///
/// Used by the `koche` binary; the returned status is the process exit code.
/// Library users call [`hook`] and [`message`] directly.
pub fn run(invocation: &Invocation) -> std::process::ExitCode {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let code = cli::run(invocation, &mut stdout.lock(), &mut stderr.lock());
    std::process::ExitCode::from(code)
}
