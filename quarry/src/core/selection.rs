use itertools::Itertools;

use crate::core::dependency::{DependencyName, DependencySpec, ScopeName};
use crate::core::errors::UsageError;

/// Which dependencies a `quarry deps` subcommand operates on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Dependencies named on the command line, deduplicated, in the order given.
    Explicit(Vec<DependencyName>),
    /// Every dependency with a directory on disk.
    All,
    /// Dependencies with a directory on disk which the current manifest no longer uses.
    Unused,
}

impl Selection {
    /// Pick the selection from raw command line intent.
    ///
    /// Explicit names take precedence over `all`, which takes precedence over `unused`.
    /// Having none of them is a [`UsageError`], reported on behalf of `command`.
    pub fn from_args(
        names: Vec<DependencyName>,
        all: bool,
        unused: bool,
        command: &'static str,
    ) -> Result<Self, UsageError> {
        if !names.is_empty() {
            Ok(Self::Explicit(names.into_iter().unique().collect()))
        } else if all {
            Ok(Self::All)
        } else if unused {
            Ok(Self::Unused)
        } else {
            Err(UsageError::MissingSelection { command })
        }
    }
}

/// Environment and target restriction of a `quarry deps` subcommand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    /// Only consider this build environment, or all of them if not set.
    pub env: Option<ScopeName>,
    /// Only consider dependencies used for this target, or all of them if not set.
    pub target: Option<ScopeName>,
}

impl Scope {
    /// Whether `dep` is used within this scope.
    pub fn includes(&self, dep: &DependencySpec) -> bool {
        fn tag_matches(tags: &[ScopeName], wanted: Option<&ScopeName>) -> bool {
            match wanted {
                Some(wanted) => tags.is_empty() || tags.contains(wanted),
                None => true,
            }
        }

        tag_matches(&dep.only, self.env.as_ref()) && tag_matches(&dep.targets, self.target.as_ref())
    }
}
