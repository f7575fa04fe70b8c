use std::fmt;

/// Where a resolved version string came from.
///
/// Ordered by precedence: a tag beats a branch, a branch beats the raw hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Provenance {
    Commit,
    Branch,
    Tag,
}

impl Provenance {
    /// Human readable label used in log output
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Commit => "commit",
            Provenance::Branch => "branch",
            Provenance::Tag => "tag",
        }
    }
}

/// The single canonical version string for the current commit.
///
/// The string is always usable as a filename component: path separators are
/// replaced with `-` and whitespace never survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    value: String,
    provenance: Provenance,
}

impl ResolvedVersion {
    pub(crate) fn new(raw: &str, provenance: Provenance) -> Self {
        ResolvedVersion {
            value: to_file_component(raw),
            provenance,
        }
    }

    pub(crate) fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Borrow the version string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume and return the version string
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn to_file_component(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_are_kept() {
        let version = ResolvedVersion::new("v1.2.0", Provenance::Tag);
        assert_eq!(version.as_str(), "v1.2.0");
        assert_eq!(version.provenance(), Provenance::Tag);
    }

    #[test]
    fn test_path_separators_replaced() {
        let version = ResolvedVersion::new("feature/x", Provenance::Branch);
        assert_eq!(version.to_string(), "feature-x");

        let version = ResolvedVersion::new("release\\1.0", Provenance::Tag);
        assert_eq!(version.into_string(), "release-1.0");
    }

    #[test]
    fn test_provenance_precedence_order() {
        assert!(Provenance::Tag > Provenance::Branch);
        assert!(Provenance::Branch > Provenance::Commit);
    }
}
