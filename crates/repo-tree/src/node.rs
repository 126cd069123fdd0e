/// A renderable node with its parent resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TreeNode {
    /// The entry's sha.
    pub id: String,
    /// Id of the enclosing directory, or the listing's root id for top-level entries.
    pub parent: String,
    /// Directories can hold children and accept drops.
    pub droppable: bool,
    /// Final path segment.
    pub text: String,
}

/// Normalized output: nodes in processing order plus the id every top-level node points at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeSequence {
    pub nodes: Vec<TreeNode>,
    pub root_id: String,
}

impl NodeSequence {
    pub fn new(root_id: impl Into<String>, nodes: Vec<TreeNode>) -> Self {
        Self {
            nodes,
            root_id: root_id.into(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_directory(&self, id: &str) -> bool {
        self.get(id).is_some_and(|node| node.droppable)
    }

    /// Direct children of `parent_id`, in sequence order.
    pub fn children<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a TreeNode> + 'a {
        self.nodes.iter().filter(move |node| node.parent == parent_id)
    }

    /// Rebuild the slash-separated path of `id` by walking parent links up to the root.
    ///
    /// Returns `None` if `id` is unknown or a link along the way does not resolve.
    pub fn path_of(&self, id: &str) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self.get(id)?;
        // A sequence edited by drag and drop could in principle contain a cycle.
        for _ in 0..=self.nodes.len() {
            segments.push(current.text.as_str());
            if current.parent == self.root_id {
                segments.reverse();
                return Some(segments.join("/"));
            }
            current = self.get(&current.parent)?;
        }
        None
    }
}
