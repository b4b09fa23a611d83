mod document;

use std::path::{Path, PathBuf};

use self::document::{KdlParse, ParseNode};
use crate::hook::HookScript;

/// Config file looked up in the repository root when `--config` is not given.
pub const DEFAULT_FILE: &str = ".koche.kdl";

/// Top-level configuration loaded from a KDL file.
///
/// ```kdl
/// hook {
///     shell "/bin/sh"
///     program "koche"
/// }
/// output {
///     errors "stderr"
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub hook: HookScript,
    pub output: OutputConfig,
}

/// Where user-facing diagnostics are written.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub errors: Stream,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    #[default]
    Stdout,
    Stderr,
}

/// Errors that can occur when loading or parsing a config file.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    #[diagnostic(code(koche::config::not_found))]
    NotFound(PathBuf),

    #[error("failed to read config: {0}")]
    #[diagnostic(code(koche::config::read))]
    ReadError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ParseError(#[from] kdl::KdlError),

    #[error("invalid config: {0}")]
    #[diagnostic(
        code(koche::config::invalid),
        help("valid sections are `hook` (shell, program) and `output` (errors)")
    )]
    ValidationError(String),
}

impl Config {
    /// Load a config from a KDL file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::ReadError(e)
            }
        })?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Resolve the config for a run.
    ///
    /// An explicit path must exist. Without one, `<root>/.koche.kdl` is used
    /// when present; otherwise the defaults apply.
    pub fn discover(explicit: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = root.join(DEFAULT_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a KDL string into a Config.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let doc = document::parse_document(content)?;
        let root = KdlParse::new(&doc, content);

        let mut config = Config::default();
        for node in root.nodes() {
            match node.name() {
                "hook" => parse_hook(&node, &mut config.hook)?,
                "output" => parse_output(&node, &mut config.output)?,
                other => return Err(node.invalid(format!("unknown section `{other}`"))),
            }
        }
        Ok(config)
    }
}

fn parse_hook(section: &ParseNode<'_>, hook: &mut HookScript) -> Result<(), ConfigError> {
    for node in section_children(section)? {
        match node.name() {
            "shell" => hook.shell = node.single_string()?.to_string(),
            "program" => hook.program = node.single_string()?.to_string(),
            other => return Err(node.invalid(format!("unknown hook setting `{other}`"))),
        }
    }
    Ok(())
}

fn parse_output(section: &ParseNode<'_>, output: &mut OutputConfig) -> Result<(), ConfigError> {
    for node in section_children(section)? {
        match node.name() {
            "errors" => {
                output.errors = match node.single_string()? {
                    "stdout" => Stream::Stdout,
                    "stderr" => Stream::Stderr,
                    other => {
                        return Err(node.invalid(format!(
                            "unknown stream `{other}` (expected \"stdout\" or \"stderr\")"
                        )))
                    }
                }
            }
            other => return Err(node.invalid(format!("unknown output setting `{other}`"))),
        }
    }
    Ok(())
}

fn section_children<'a>(section: &ParseNode<'a>) -> Result<Vec<ParseNode<'a>>, ConfigError> {
    section
        .children()
        .map(|children| children.nodes())
        .ok_or_else(|| section.invalid(format!("`{}` expects a children block", section.name())))
}
