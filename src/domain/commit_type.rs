/// One of the fixed conventional-commit type tokens.
///
/// The vocabulary is closed: anything outside these eight tokens is rejected
/// by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Chore,
}

impl CommitType {
    /// Every type token, in the order they are listed to users.
    pub const ALL: [CommitType; 8] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Perf,
        CommitType::Test,
        CommitType::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Perf => "perf",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }

    /// Look up a token. Matching is exact and case-sensitive (`Feat` is not a type).
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }

    /// `feat, fix, docs, ...` as shown in the help block.
    pub fn list() -> String {
        Self::ALL
            .iter()
            .map(CommitType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `feat|fix|docs|...` for building the header grammar.
    pub(crate) fn alternation() -> String {
        Self::ALL
            .iter()
            .map(CommitType::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
