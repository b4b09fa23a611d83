use super::CommitType;

/// The parsed first line of a conventional commit message.
///
/// `fix(auth)!: handle null token` parses to type `fix`, scope `auth`,
/// breaking `true`, description `handle null token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalHeader {
    pub kind: CommitType,
    pub scope: Option<String>,
    pub breaking: bool,
    pub description: String,
}

impl std::fmt::Display for ConventionalHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(scope) = &self.scope {
            write!(f, "({scope})")?;
        }
        if self.breaking {
            f.write_str("!")?;
        }
        write!(f, ": {}", self.description)
    }
}
