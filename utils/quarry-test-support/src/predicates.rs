use std::fs;
use std::path::Path;

use predicates::Predicate;
use predicates::function::function;

/// An existing directory with no entries, hidden ones included.
pub fn empty_dir() -> impl Predicate<Path> {
    function(|path: &Path| {
        fs::read_dir(path)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    })
}
