use std::collections::{HashMap, HashSet};

use crate::listing::{RawEntry, TreeListing};
use crate::node::{NodeSequence, TreeNode};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The parent directory of `path` was never seen as a `tree` entry.
    #[error("parent directory `{parent_path}` of `{path}` is not in the listing")]
    UnresolvedParent { path: String, parent_path: String },
    #[error("entry `{path}` has no sha")]
    MissingSha { path: String },
}

/// Order in which entries are visited so that directories are registered before
/// anything nested under them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntryOrder {
    /// Stable sort on the path's byte length.
    ///
    /// An ancestor is a strict prefix of its descendant followed by `/`, so it is
    /// always strictly shorter; two paths of equal length are never in an
    /// ancestor relation, whatever order they end up in.
    #[default]
    PathLength,
    /// Sort by number of segments, then lexicographically by path.
    Depth,
}

impl EntryOrder {
    fn sort(self, entries: &mut [(&str, &RawEntry)]) {
        match self {
            Self::PathLength => entries.sort_by_key(|(path, _)| path.len()),
            Self::Depth => entries.sort_by(|(a, _), (b, _)| {
                depth(a).cmp(&depth(b)).then_with(|| a.cmp(b))
            }),
        }
    }
}

fn depth(path: &str) -> usize {
    path.split('/').count()
}

/// Turn a flat tree listing into a parent-linked node sequence.
pub fn normalize(entries: &[RawEntry], root_id: &str) -> Result<NodeSequence, NormalizeError> {
    normalize_with(entries, root_id, EntryOrder::default())
}

pub fn normalize_with(
    entries: &[RawEntry],
    root_id: &str,
    order: EntryOrder,
) -> Result<NodeSequence, NormalizeError> {
    let mut ordered: Vec<(&str, &RawEntry)> = entries
        .iter()
        .filter_map(|entry| entry.path().map(|path| (path, entry)))
        .collect();
    tracing::debug!(
        total = entries.len(),
        with_path = ordered.len(),
        ?order,
        "normalizing tree listing"
    );
    order.sort(&mut ordered);

    let mut folder_to_id: HashMap<&str, String> = HashMap::new();
    let mut seen_ids: HashSet<&str> = HashSet::from([root_id]);
    let mut nodes = Vec::with_capacity(ordered.len());

    for (path, entry) in ordered {
        let sha = entry
            .sha
            .as_deref()
            .ok_or_else(|| NormalizeError::MissingSha {
                path: path.to_string(),
            })?;

        // Identical content shares a sha (every empty file, every identical
        // directory). The first entry keeps the bare sha.
        let id = if seen_ids.insert(sha) {
            sha.to_string()
        } else {
            let id = format!("{sha}:{path}");
            tracing::warn!(path, sha, %id, "sha already used by another entry");
            id
        };

        if entry.is_directory() {
            folder_to_id.insert(path, id.clone());
        }

        let (parent, text) = match path.rsplit_once('/') {
            None => (root_id.to_string(), path),
            Some((parent_path, name)) => {
                let parent = folder_to_id.get(parent_path).cloned().ok_or_else(|| {
                    NormalizeError::UnresolvedParent {
                        path: path.to_string(),
                        parent_path: parent_path.to_string(),
                    }
                })?;
                (parent, name)
            }
        };

        nodes.push(TreeNode {
            id,
            parent,
            droppable: entry.is_directory(),
            text: text.to_string(),
        });
    }

    Ok(NodeSequence::new(root_id, nodes))
}

impl TreeListing {
    /// Normalize this listing with its own sha as the root id.
    pub fn normalize(&self) -> Result<NodeSequence, NormalizeError> {
        normalize(&self.tree, &self.sha)
    }
}
