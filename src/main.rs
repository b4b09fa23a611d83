use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use koche::{Invocation, Mode};
use tracing_subscriber::EnvFilter;

/// Enforce conventional commits through a git commit-msg hook.
///
/// Without flags, validates the commit message file git passes to the hook.
#[derive(Debug, Parser)]
#[command(name = "koche", about, disable_version_flag = true)]
#[command(group(ArgGroup::new("mode").args(["print_version", "install", "remove"])))]
struct Cli {
    /// Print the version number
    #[arg(short = 'v')]
    print_version: bool,

    /// Set up conventional commits in the current git repository
    #[arg(short = 'i')]
    install: bool,

    /// Remove conventional commit validation from the current git repository
    #[arg(short = 'r')]
    remove: bool,

    /// Path to a KDL config file (default: .koche.kdl in the repository root)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Commit message file, as passed by git to the commit-msg hook
    #[arg(value_name = "COMMIT_MSG_FILE", conflicts_with = "mode")]
    files: Vec<PathBuf>,
}

impl Cli {
    fn mode(self) -> Mode {
        if self.print_version {
            Mode::Version
        } else if self.install {
            Mode::Install
        } else if self.remove {
            Mode::Remove
        } else {
            Mode::Validate(self.files)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("KOCHE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config = cli.config.clone();
    let invocation = Invocation {
        mode: cli.mode(),
        config,
        root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    koche::run(&invocation)
}
