use anyhow::Result;
use gpui::SharedString;
use gpui_dnd_tree::DndTreeNode;
use repo_tree::{EntryOrder, NodeSequence, TreeListing, TreeNode, normalize_with};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum TreeLoad {
    #[default]
    Loading,
    Loaded(NodeSequence),
    Failed(SharedString),
}

/// The single selected file, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    selected: Option<SharedString>,
}

impl Selection {
    pub(crate) fn current(&self) -> Option<&SharedString> {
        self.selected.as_ref()
    }

    pub(crate) fn is_selected(&self, id: &SharedString) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Select `node` if it is a leaf. Returns whether the selection changed.
    pub(crate) fn select_leaf(&mut self, node: &DndTreeNode) -> bool {
        if node.droppable || self.is_selected(&node.id) {
            return false;
        }
        self.selected = Some(node.id.clone());
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClickOutcome {
    Selected,
    Unchanged,
}

/// Everything the tree view controller owns, minus the widget itself.
#[derive(Clone, Debug, Default)]
pub(crate) struct ViewerModel {
    load: TreeLoad,
    selection: Selection,
}

impl ViewerModel {
    pub(crate) fn load(&self) -> &TreeLoad {
        &self.load
    }

    pub(crate) fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn sequence(&self) -> Option<&NodeSequence> {
        match &self.load {
            TreeLoad::Loaded(seq) => Some(seq),
            _ => None,
        }
    }

    /// Settle the loading state with the outcome of the one fetch.
    pub(crate) fn apply_fetch(&mut self, fetched: Result<TreeListing>, order: EntryOrder) {
        let listing = match fetched {
            Ok(listing) => listing,
            Err(err) => {
                tracing::error!("tree listing fetch failed: {err:#}");
                self.load = TreeLoad::Failed(format!("{err:#}").into());
                return;
            }
        };

        tracing::debug!(entries = listing.tree.len(), "received tree listing");
        if listing.truncated {
            tracing::warn!(
                entries = listing.tree.len(),
                "tree listing was truncated by the API; some paths are missing"
            );
        }

        self.load = match normalize_with(&listing.tree, &listing.sha, order) {
            Ok(seq) => {
                tracing::info!(nodes = seq.len(), root = %seq.root_id, "tree loaded");
                TreeLoad::Loaded(seq)
            }
            Err(err) => {
                tracing::error!("tree listing could not be normalized: {err}");
                TreeLoad::Failed(err.to_string().into())
            }
        };
    }

    /// Adopt the sequence produced by a drag and drop. Nothing is written back.
    pub(crate) fn replace_nodes(&mut self, nodes: &[DndTreeNode]) {
        if let TreeLoad::Loaded(seq) = &mut self.load {
            seq.nodes = nodes.iter().map(tree_node).collect();
        }
    }

    /// A click on a row body. Only leaves react; folders open and close through
    /// their `[+]`/`[-]` glyph.
    pub(crate) fn click(&mut self, node: &DndTreeNode) -> ClickOutcome {
        if self.selection.select_leaf(node) {
            ClickOutcome::Selected
        } else {
            ClickOutcome::Unchanged
        }
    }

    /// Path of the selected file, rebuilt from the current parent links.
    pub(crate) fn selected_path(&self) -> Option<String> {
        let id = self.selection.current()?;
        self.sequence()?.path_of(id)
    }
}

pub(crate) fn dnd_nodes(seq: &NodeSequence) -> Vec<DndTreeNode> {
    seq.nodes
        .iter()
        .map(|node| {
            DndTreeNode::new(node.id.clone(), node.parent.clone(), node.text.clone())
                .droppable(node.droppable)
        })
        .collect()
}

fn tree_node(node: &DndTreeNode) -> TreeNode {
    TreeNode {
        id: node.id.to_string(),
        parent: node.parent.to_string(),
        droppable: node.droppable,
        text: node.text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use repo_tree::{EntryKind, RawEntry};

    use super::*;

    fn listing() -> TreeListing {
        TreeListing {
            sha: "R".into(),
            tree: vec![
                RawEntry::new("src", EntryKind::Tree, "A"),
                RawEntry::new("src/app.ts", EntryKind::Blob, "B"),
                RawEntry::new("README.md", EntryKind::Blob, "C"),
            ],
            truncated: false,
        }
    }

    fn loaded() -> ViewerModel {
        let mut model = ViewerModel::default();
        model.apply_fetch(Ok(listing()), EntryOrder::PathLength);
        model
    }

    fn node(model: &ViewerModel, id: &str) -> DndTreeNode {
        let seq = model.sequence().unwrap();
        dnd_nodes(seq)
            .into_iter()
            .find(|node| node.id.as_str() == id)
            .unwrap()
    }

    #[test]
    fn starts_loading_then_loads() {
        assert_eq!(*ViewerModel::default().load(), TreeLoad::Loading);
        let model = loaded();
        let seq = model.sequence().unwrap();
        assert_eq!(seq.root_id, "R");
        assert_eq!(seq.len(), 3);
        assert_eq!(model.selection().current(), None);
    }

    #[test]
    fn fetch_failure_becomes_error_state() {
        let mut model = ViewerModel::default();
        model.apply_fetch(
            Err(anyhow!("connection refused").context("request failed")),
            EntryOrder::PathLength,
        );
        assert_eq!(
            *model.load(),
            TreeLoad::Failed("request failed: connection refused".into())
        );
        assert!(model.sequence().is_none());
    }

    #[test]
    fn unresolved_parent_becomes_error_state() {
        let mut model = ViewerModel::default();
        let mut listing = listing();
        listing.tree.remove(0);
        model.apply_fetch(Ok(listing), EntryOrder::PathLength);
        assert!(matches!(model.load(), TreeLoad::Failed(msg) if msg.contains("`src`")));
    }

    #[test]
    fn selecting_another_leaf_replaces_selection() {
        let mut model = loaded();
        let app = node(&model, "B");
        let readme = node(&model, "C");

        assert_eq!(model.click(&app), ClickOutcome::Selected);
        assert!(model.selection().is_selected(&"B".into()));

        assert_eq!(model.click(&readme), ClickOutcome::Selected);
        assert!(model.selection().is_selected(&"C".into()));
        assert!(!model.selection().is_selected(&"B".into()));
        assert_eq!(model.selected_path().as_deref(), Some("README.md"));

        assert_eq!(model.click(&readme), ClickOutcome::Unchanged);
    }

    #[test]
    fn directory_row_click_leaves_selection_alone() {
        let mut model = loaded();
        let app = node(&model, "B");
        let src = node(&model, "A");

        model.click(&app);
        assert_eq!(model.click(&src), ClickOutcome::Unchanged);
        assert_eq!(model.selection().current(), Some(&"B".into()));
        assert_eq!(model.selected_path().as_deref(), Some("src/app.ts"));
    }

    #[test]
    fn drop_replaces_sequence_and_keeps_selection() {
        let mut model = loaded();
        let app = node(&model, "B");
        model.click(&app);

        let mut nodes = dnd_nodes(model.sequence().unwrap());
        for node in &mut nodes {
            if node.id.as_str() == "B" {
                node.parent = "R".into();
            }
        }
        model.replace_nodes(&nodes);

        assert_eq!(model.sequence().unwrap().get("B").unwrap().parent, "R");
        assert_eq!(model.selected_path().as_deref(), Some("app.ts"));
    }

    #[test]
    fn identical_files_are_selected_one_at_a_time() {
        let mut model = ViewerModel::default();
        let listing = TreeListing {
            sha: "R".into(),
            tree: vec![
                RawEntry::new("a.txt", EntryKind::Blob, "E"),
                RawEntry::new("b.txt", EntryKind::Blob, "E"),
            ],
            truncated: false,
        };
        model.apply_fetch(Ok(listing), EntryOrder::PathLength);

        let nodes = dnd_nodes(model.sequence().unwrap());
        let b = nodes.iter().find(|n| n.text.as_str() == "b.txt").unwrap();
        assert_eq!(model.click(b), ClickOutcome::Selected);

        let marked = nodes
            .iter()
            .filter(|n| model.selection().is_selected(&n.id))
            .count();
        assert_eq!(marked, 1);
        assert_eq!(model.selected_path().as_deref(), Some("b.txt"));
    }
}
