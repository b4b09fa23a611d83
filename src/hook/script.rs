use brush_parser::ast;

/// Default shebang interpreter for the installed hook.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Default program the installed hook invokes.
pub const DEFAULT_PROGRAM: &str = "koche";

/// The `commit-msg` hook script: a shebang line plus one line that runs the
/// validator with git's message-file path forwarded as `"$1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookScript {
    pub shell: String,
    pub program: String,
}

impl Default for HookScript {
    fn default() -> Self {
        HookScript {
            shell: DEFAULT_SHELL.to_string(),
            program: DEFAULT_PROGRAM.to_string(),
        }
    }
}

impl HookScript {
    pub fn new(shell: impl Into<String>, program: impl Into<String>) -> Self {
        HookScript {
            shell: shell.into(),
            program: program.into(),
        }
    }

    /// Render the script text.
    ///
    /// ```text
    /// #!/bin/sh
    /// koche "$1"
    /// ```
    pub fn render(&self) -> String {
        format!("#!{}\n{} \"$1\"\n", self.shell, shell_quote(&self.program))
    }

    /// Whether `script` is an invocation of this hook's program forwarding `"$1"`.
    pub fn matches(&self, script: &str) -> bool {
        match inspect(script) {
            Ok(invocation) => invocation.program == self.program && invocation.args == ["$1"],
            Err(_) => false,
        }
    }
}

/// Single-quote `word` unless every character is shell-safe.
fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./+:@%,=".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// The program and arguments of the first command in a hook script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookInvocation {
    pub program: String,
    pub args: Vec<String>,
}

/// Error returned when a hook script cannot be inspected.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ScriptError {
    #[error("hook script is not valid shell: {0}")]
    #[diagnostic(code(koche::script::parse))]
    Parse(String),
    #[error("hook script runs no command")]
    #[diagnostic(code(koche::script::empty))]
    NoCommand,
}

/// Parse a hook script and return its first simple command.
///
/// The shebang line is skipped; the body is parsed with brush-parser so
/// quoting is handled the way a shell would. Outer quotes are stripped from
/// the program and each argument, so `koche "$1"` yields `koche` and `["$1"]`.
pub fn inspect(script: &str) -> Result<HookInvocation, ScriptError> {
    let body = match script.strip_prefix("#!") {
        Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body),
        None => script,
    };
    if body.trim().is_empty() {
        return Err(ScriptError::NoCommand);
    }

    let mut parser = brush_parser::Parser::builder()
        .reader(std::io::Cursor::new(body.to_string()))
        .build();
    let program = parser
        .parse_program()
        .map_err(|e| ScriptError::Parse(e.to_string()))?;

    first_simple_command(&program).ok_or(ScriptError::NoCommand)
}

fn first_simple_command(program: &ast::Program) -> Option<HookInvocation> {
    for complete_command in &program.complete_commands {
        for item in &complete_command.0 {
            let list = &item.0;
            let rest = list.additional.iter().map(|and_or| match and_or {
                ast::AndOr::And(pipeline) | ast::AndOr::Or(pipeline) => pipeline,
            });
            for pipeline in std::iter::once(&list.first).chain(rest) {
                for command in &pipeline.seq {
                    if let ast::Command::Simple(simple) = command {
                        if let Some(invocation) = simple_invocation(simple) {
                            return Some(invocation);
                        }
                    }
                }
            }
        }
    }
    None
}

fn simple_invocation(simple: &ast::SimpleCommand) -> Option<HookInvocation> {
    let name = simple.word_or_name.as_ref()?.flatten();
    if name.is_empty() {
        return None;
    }
    let args = simple
        .suffix
        .iter()
        .flat_map(|suffix| suffix.0.iter())
        .filter_map(|item| match item {
            ast::CommandPrefixOrSuffixItem::Word(word) => Some(strip_outer_quotes(&word.flatten())),
            // IoRedirect, AssignmentWord, ProcessSubstitution
            _ => None,
        })
        .collect();
    Some(HookInvocation {
        program: strip_outer_quotes(&name),
        args,
    })
}

/// Strip matching outer quotes. brush-parser keeps quotes in the raw word text.
fn strip_outer_quotes(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && ((bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\''))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
