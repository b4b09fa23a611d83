//! KDL document access.
//!
//! `KdlParse` and `ParseNode` wrap the `kdl` crate types so the rest of the
//! config module never touches KDL entries or spans directly.

use super::ConfigError;

/// Parsed KDL document paired with its source text.
pub(super) struct KdlParse<'a> {
    doc: &'a kdl::KdlDocument,
    source: &'a str,
}

/// Single KDL node with source context for line-number reporting.
pub(super) struct ParseNode<'a> {
    node: &'a kdl::KdlNode,
    source: &'a str,
}

/// Parse a KDL source string into a document.
pub(super) fn parse_document(source: &str) -> Result<kdl::KdlDocument, ConfigError> {
    Ok(source.parse::<kdl::KdlDocument>()?)
}

impl<'a> KdlParse<'a> {
    pub(super) fn new(doc: &'a kdl::KdlDocument, source: &'a str) -> Self {
        Self { doc, source }
    }

    /// Iterate over all nodes at this level.
    pub(super) fn nodes(&self) -> Vec<ParseNode<'a>> {
        self.doc
            .nodes()
            .iter()
            .map(|node| ParseNode {
                node,
                source: self.source,
            })
            .collect()
    }
}

impl<'a> ParseNode<'a> {
    /// The node's identifier (e.g. `"hook"`, `"program"`).
    pub(super) fn name(&self) -> &str {
        self.node.name().value()
    }

    /// Get the children block as a new `KdlParse` (preserving source).
    pub(super) fn children(&self) -> Option<KdlParse<'a>> {
        self.node.children().map(|doc| KdlParse {
            doc,
            source: self.source,
        })
    }

    /// The node's single string argument, e.g. `"/bin/sh"` in `shell "/bin/sh"`.
    ///
    /// Any other shape (no arguments, several, a non-string, an empty string)
    /// is a validation error naming this node's line.
    pub(super) fn single_string(&self) -> Result<&'a str, ConfigError> {
        let entries = self.node.entries();
        let value = match entries {
            [entry] if entry.name().is_none() => entry.value().as_string(),
            _ => None,
        };
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(self.invalid(format!(
                "`{}` expects exactly one non-empty string value",
                self.name()
            ))),
        }
    }

    /// A validation error prefixed with this node's line number.
    pub(super) fn invalid(&self, message: impl std::fmt::Display) -> ConfigError {
        ConfigError::ValidationError(format!("line {}: {message}", self.line()))
    }

    /// 1-based line number of this node in the original source.
    pub(super) fn line(&self) -> usize {
        let offset = self.node.span().offset();
        self.source[..offset.min(self.source.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }
}
