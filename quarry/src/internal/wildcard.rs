//! Expansion of path patterns with wildcard segments into concrete paths.

use std::fmt;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use tracing::{debug, trace};

use crate::internal::fsx::PathBufUtf8Ext;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    // Hidden entries, like lock files or `.git` directories, are never matched by wildcards.
    require_literal_leading_dot: true,
};

/// A path pattern built segment by segment.
///
/// All literal parts (the root and every [`PathPattern::literal`] segment) are escaped, so only
/// segments added with [`PathPattern::wildcard`] can match more than one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPattern {
    pattern: String,
}

impl PathPattern {
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            pattern: Pattern::escape(root.as_str()),
        }
    }

    /// Append a segment which matches exactly `segment`.
    pub fn literal(&self, segment: &str) -> Self {
        self.push(&Pattern::escape(segment))
    }

    /// Append a segment which matches any non-hidden name ending with `suffix`.
    pub fn wildcard(&self, suffix: &str) -> Self {
        self.push(&format!("*{}", Pattern::escape(suffix)))
    }

    fn push(&self, segment: &str) -> Self {
        let mut pattern = self.pattern.clone();
        if !pattern.ends_with('/') && !pattern.ends_with(std::path::MAIN_SEPARATOR) {
            pattern.push('/');
        }
        pattern.push_str(segment);
        Self { pattern }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Find all existing paths matching this pattern, in lexicographic order.
    ///
    /// Finding nothing is not an error. Paths which cannot be inspected, or are not UTF-8, are
    /// skipped.
    pub fn expand(&self) -> Result<Vec<Utf8PathBuf>> {
        let paths = glob::glob_with(&self.pattern, MATCH_OPTIONS)
            .with_context(|| format!("invalid path pattern: {}", self.pattern))?;

        let mut matches = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) => match path.try_into_utf8() {
                    Ok(path) => matches.push(path),
                    Err(err) => debug!("skipping non UTF-8 path: {err}"),
                },
                Err(err) => debug!("skipping unreadable path: {err}"),
            }
        }

        trace!(pattern = %self.pattern, matches = matches.len(), "expanded path pattern");
        Ok(matches)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
