//! Run resumption: which exchanges already have a completed output.
//!
//! The set is computed once at run start from whatever artifacts exist in
//! the output directory and consulted read-only afterwards — the aggregator
//! receives it as a value and never touches the filesystem itself.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

/// Exchange identifiers with an existing output artifact.
#[derive(Debug, Clone, Default)]
pub struct CompletedSet(BTreeSet<String>);

impl CompletedSet {
    /// An empty set — every exchange is treated as pending.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Scan a directory for output artifacts; each file stem (extension
    /// stripped) counts as a completed exchange. A missing directory is a
    /// first run, not an error.
    pub fn from_dir(dir: &Path) -> io::Result<Self> {
        if !dir.exists() {
            return Ok(Self::empty());
        }

        let mut names = BTreeSet::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.insert(stem.to_string());
            }
        }
        Ok(Self(names))
    }

    pub fn is_done(&self, exchange: &str) -> bool {
        self.0.contains(exchange)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_has_nothing_done() {
        let set = CompletedSet::empty();
        assert!(!set.is_done("Kraken"));
        assert!(set.is_empty());
    }

    #[test]
    fn membership_by_name() {
        let set = CompletedSet::from_names(["Kraken", "Bitstamp"]);
        assert!(set.is_done("Kraken"));
        assert!(set.is_done("Bitstamp"));
        assert!(!set.is_done("Coinbase"));
    }

    #[test]
    fn from_dir_strips_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Kraken.csv"), "Date\n").unwrap();
        std::fs::write(dir.path().join("Bitstamp.csv"), "Date\n").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let set = CompletedSet::from_dir(dir.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.is_done("Kraken"));
        assert!(set.is_done("Bitstamp"));
        assert!(!set.is_done("subdir"));
    }

    #[test]
    fn missing_dir_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-there");
        let set = CompletedSet::from_dir(&missing).unwrap();
        assert!(set.is_empty());
    }
}
