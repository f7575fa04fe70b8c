/// Represents a git tag peeled to the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            commit: commit.into(),
        }
    }

    /// Check if this tag targets the given commit hash
    pub fn targets(&self, hash: &str) -> bool {
        self.commit == hash
    }
}
