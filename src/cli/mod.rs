pub mod hook;
pub mod validate;

use std::io::Write;
use std::path::PathBuf;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

use crate::config::{Config, Stream};

/// Process exit statuses.
pub mod exit {
    pub const SUCCESS: u8 = 0;
    /// Invalid commit message, wrong argument count, or unreadable message file.
    pub const INVALID_MESSAGE: u8 = 1;
    /// Install or remove failed.
    pub const HOOK_FAILURE: u8 = 3;
    pub const CONFIG_ERROR: u8 = 4;
}

/// What a single invocation does. Exactly one mode runs per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Version,
    Install,
    Remove,
    /// Validate the commit message file; holds every positional argument
    /// so the argument count can be checked by the validator.
    Validate(Vec<PathBuf>),
}

/// Parsed command line, built once and passed to the selected operation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub mode: Mode,
    pub config: Option<PathBuf>,
    /// Repository root; the process working directory.
    pub root: PathBuf,
}

/// Stdout and stderr, with error diagnostics routed per config.
pub(crate) struct Console<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    errors: Stream,
}

impl<'a> Console<'a> {
    pub(crate) fn new(out: &'a mut dyn Write, err: &'a mut dyn Write, errors: Stream) -> Self {
        Console { out, err, errors }
    }

    /// Narration and existence-check lines.
    pub(crate) fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// User-facing failures.
    pub(crate) fn error(&mut self) -> &mut dyn Write {
        match self.errors {
            Stream::Stdout => &mut *self.out,
            Stream::Stderr => &mut *self.err,
        }
    }

    /// Print a diagnostic's message, then its help as a `hint:` line.
    pub(crate) fn report(&mut self, diagnostic: &dyn Diagnostic) {
        let sink = self.error();
        let _ = writeln!(sink, "{diagnostic}");
        if let Some(help) = diagnostic.help() {
            let _ = writeln!(sink, "hint: {help}");
        }
    }
}

/// Run one invocation, writing to `out`/`err`, and return the exit status.
pub fn run(invocation: &Invocation, out: &mut dyn Write, err: &mut dyn Write) -> u8 {
    if invocation.mode == Mode::Version {
        let _ = writeln!(out, "version: {}", crate::VERSION);
        return exit::SUCCESS;
    }

    let config = match Config::discover(invocation.config.as_deref(), &invocation.root) {
        Ok(config) => config,
        Err(e) => {
            // Output routing is itself configured, so config failures always go to stderr.
            let _ = write!(err, "{}", render(&e));
            return exit::CONFIG_ERROR;
        }
    };

    tracing::debug!(mode = ?invocation.mode, root = %invocation.root.display(), "dispatch");
    let mut console = Console::new(out, err, config.output.errors);
    match &invocation.mode {
        Mode::Version => exit::SUCCESS,
        Mode::Install => hook::install(&invocation.root, &config, &mut console),
        Mode::Remove => hook::remove(&invocation.root, &config, &mut console),
        Mode::Validate(paths) => validate::run(paths, &mut console),
    }
}

/// Render a diagnostic with source snippets, without colour.
fn render(diagnostic: &dyn Diagnostic) -> String {
    let mut rendered = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut rendered, diagnostic).is_err() {
        rendered = format!("{diagnostic}\n");
    }
    rendered
}
