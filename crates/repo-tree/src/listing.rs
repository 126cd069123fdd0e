use serde::Deserialize;

/// Body of `GET /repos/{owner}/{repo}/git/trees/{tree_sha}`.
///
/// Only the fields the normalizer reads are modelled; `url` and the per-entry
/// `mode`/`size`/`url` are dropped during deserialization.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct TreeListing {
    pub sha: String,
    #[serde(default)]
    pub tree: Vec<RawEntry>,
    /// Set by the API when the recursive listing exceeded its size limit.
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RawEntry {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub sha: Option<String>,
}

impl RawEntry {
    pub fn new(path: impl Into<String>, kind: EntryKind, sha: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            kind,
            sha: Some(sha.into()),
        }
    }

    /// The entry's path, treating an empty string the same as a missing one.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref().filter(|path| !path.is_empty())
    }

    #[inline]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Tree
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// A submodule pointer.
    Commit,
    #[serde(other)]
    Other,
}
