use std::collections::{HashMap, HashSet};

use gpui::SharedString;

/// A node in a flat, parent-linked tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DndTreeNode {
    pub id: SharedString,
    pub parent: SharedString,
    /// Whether other nodes may be dropped inside this one.
    pub droppable: bool,
    pub text: SharedString,
}

impl DndTreeNode {
    pub fn new(
        id: impl Into<SharedString>,
        parent: impl Into<SharedString>,
        text: impl Into<SharedString>,
    ) -> Self {
        Self {
            id: id.into(),
            parent: parent.into(),
            droppable: false,
            text: text.into(),
        }
    }

    pub fn droppable(mut self, droppable: bool) -> Self {
        self.droppable = droppable;
        self
    }
}

/// A visible row: a node plus where it sits in the rendered tree.
#[derive(Clone, Debug)]
pub struct DndTreeEntry {
    node: DndTreeNode,
    depth: usize,
    is_open: bool,
    has_children: bool,
}

impl DndTreeEntry {
    #[inline]
    pub fn node(&self) -> &DndTreeNode {
        &self.node
    }

    #[inline]
    pub fn id(&self) -> &SharedString {
        &self.node.id
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.has_children
    }

    #[inline]
    pub fn is_droppable(&self) -> bool {
        self.node.droppable
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DropPreviewTarget {
    Before { target_id: SharedString },
    After { target_id: SharedString },
    Inside { target_id: SharedString },
    Root,
}

/// Depth-first rows reachable from `root_id`, descending only into open droppable nodes.
///
/// Siblings keep their order in `nodes`. Nodes whose parent chain never reaches
/// `root_id` are not shown.
pub fn visible_rows(
    root_id: &SharedString,
    nodes: &[DndTreeNode],
    open: &HashSet<SharedString>,
) -> Vec<DndTreeEntry> {
    let mut children: HashMap<&SharedString, Vec<usize>> = HashMap::new();
    for (ix, node) in nodes.iter().enumerate() {
        children.entry(&node.parent).or_default().push(ix);
    }

    let mut rows = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(usize, usize)> = children
        .get(root_id)
        .map(|ixs| ixs.iter().rev().map(|ix| (*ix, 0)).collect())
        .unwrap_or_default();

    while let Some((ix, depth)) = stack.pop() {
        if !visited.insert(ix) {
            continue;
        }
        let node = &nodes[ix];
        let kids = children.get(&node.id);
        let has_children = kids.is_some_and(|kids| !kids.is_empty());
        let is_open = node.droppable && open.contains(&node.id);
        rows.push(DndTreeEntry {
            node: node.clone(),
            depth,
            is_open,
            has_children,
        });
        if is_open && let Some(kids) = kids {
            stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
        }
    }

    rows
}

/// Whether `id` is `ancestor_id` or sits somewhere below it.
pub fn is_descendant(
    nodes: &[DndTreeNode],
    id: &SharedString,
    ancestor_id: &SharedString,
) -> bool {
    let mut current = id;
    // Bounded so that a malformed sequence with a cycle cannot spin forever.
    for _ in 0..=nodes.len() {
        if current == ancestor_id {
            return true;
        }
        match nodes.iter().find(|node| node.id == *current) {
            Some(node) => current = &node.parent,
            None => return false,
        }
    }
    false
}

/// Forget open ids that no longer name a droppable node.
pub(crate) fn retain_open(open: &mut HashSet<SharedString>, nodes: &[DndTreeNode]) {
    let folders: HashSet<&SharedString> = nodes
        .iter()
        .filter(|node| node.droppable)
        .map(|node| &node.id)
        .collect();
    open.retain(|id| folders.contains(id));
}

/// Flip `id` in the open set. Returns `false` for unknown ids and leaves.
pub(crate) fn toggle_open(
    open: &mut HashSet<SharedString>,
    nodes: &[DndTreeNode],
    id: &SharedString,
) -> bool {
    if !nodes.iter().any(|node| node.id == *id && node.droppable) {
        return false;
    }
    if !open.remove(id) {
        open.insert(id.clone());
    }
    true
}

/// Where a drop lands when the pointer is over `entry`.
///
/// `y_fraction` is the pointer's position within the row, 0.0 at the top edge.
/// Folders take the middle band, and the lower half too when their children are
/// showing. Holding `inside` forces an inside drop on a folder.
pub(crate) fn hover_target(
    entry: &DndTreeEntry,
    y_fraction: f32,
    inside: bool,
) -> DropPreviewTarget {
    let target_id = entry.id().clone();
    let expanded = entry.is_open() && entry.has_children();
    if entry.is_droppable()
        && (inside || (0.25..=0.75).contains(&y_fraction) || (expanded && y_fraction > 0.75))
    {
        return DropPreviewTarget::Inside { target_id };
    }
    if y_fraction < 0.5 {
        DropPreviewTarget::Before { target_id }
    } else {
        DropPreviewTarget::After { target_id }
    }
}

/// Whether dropping `dragged_id` onto `target` is allowed at all.
///
/// A node never lands inside or next to its own subtree, and only droppable
/// nodes take children.
pub(crate) fn accepts_drop(
    nodes: &[DndTreeNode],
    dragged_id: &SharedString,
    target: &DropPreviewTarget,
) -> bool {
    match target {
        DropPreviewTarget::Root => true,
        DropPreviewTarget::Before { target_id } | DropPreviewTarget::After { target_id } => {
            !is_descendant(nodes, target_id, dragged_id)
        }
        DropPreviewTarget::Inside { target_id } => {
            !is_descendant(nodes, target_id, dragged_id)
                && nodes
                    .iter()
                    .any(|node| node.id == *target_id && node.droppable)
        }
    }
}

/// Apply a drop to a copy of `nodes`.
///
/// Returns the whole new sequence, or `None` when the drop is refused or changes nothing.
pub(crate) fn move_node(
    nodes: &[DndTreeNode],
    root_id: &SharedString,
    dragged_id: &SharedString,
    target: &DropPreviewTarget,
) -> Option<Vec<DndTreeNode>> {
    let from_ix = nodes.iter().position(|node| node.id == *dragged_id)?;
    if !accepts_drop(nodes, dragged_id, target) {
        return None;
    }

    let new_parent = match target {
        DropPreviewTarget::Root => root_id.clone(),
        DropPreviewTarget::Before { target_id } | DropPreviewTarget::After { target_id } => {
            nodes.iter().find(|node| node.id == *target_id)?.parent.clone()
        }
        DropPreviewTarget::Inside { target_id } => target_id.clone(),
    };

    let mut next = nodes.to_vec();
    let mut moved = next.remove(from_ix);
    moved.parent = new_parent;

    let insert_ix = match target {
        DropPreviewTarget::Root => next.len(),
        DropPreviewTarget::Before { target_id } => {
            next.iter().position(|node| node.id == *target_id)?
        }
        DropPreviewTarget::After { target_id } => {
            next.iter().position(|node| node.id == *target_id)? + 1
        }
        DropPreviewTarget::Inside { target_id } => {
            let target_ix = next.iter().position(|node| node.id == *target_id)?;
            next.iter()
                .rposition(|node| node.parent == *target_id)
                .map_or(target_ix, |last_child| last_child.max(target_ix))
                + 1
        }
    };
    next.insert(insert_ix.min(next.len()), moved);

    (next != nodes).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(id: &'static str, parent: &'static str) -> DndTreeNode {
        DndTreeNode::new(id, parent, id).droppable(true)
    }

    fn file(id: &'static str, parent: &'static str) -> DndTreeNode {
        DndTreeNode::new(id, parent, id)
    }

    fn sample() -> Vec<DndTreeNode> {
        vec![
            dir("src", "R"),
            file("README", "R"),
            dir("ui", "src"),
            file("main", "src"),
            file("button", "ui"),
        ]
    }

    fn dump(rows: &[DndTreeEntry]) -> String {
        let mut out = String::new();
        for row in rows {
            out.push_str(&"  ".repeat(row.depth()));
            out.push_str(row.id().as_str());
            out.push('\n');
        }
        out
    }

    fn open(ids: &[&'static str]) -> HashSet<SharedString> {
        ids.iter().map(|id| SharedString::from(*id)).collect()
    }

    #[test]
    fn closed_folders_hide_their_children() {
        let rows = visible_rows(&"R".into(), &sample(), &HashSet::new());
        assert_eq!(dump(&rows).trim(), "src\nREADME");
        assert!(rows[0].has_children());
        assert!(!rows[0].is_open());
    }

    #[test]
    fn open_folders_show_children_in_sequence_order() {
        let rows = visible_rows(&"R".into(), &sample(), &open(&["src", "ui"]));
        assert_eq!(
            dump(&rows).trim(),
            r#"src
  ui
    button
  main
README"#
        );
    }

    #[test]
    fn leaf_in_open_set_is_never_open() {
        let rows = visible_rows(&"R".into(), &sample(), &open(&["README"]));
        let readme = rows.iter().find(|row| row.id().as_str() == "README").unwrap();
        assert!(!readme.is_open());
    }

    #[test]
    fn drop_inside_reparents_after_last_child() {
        let nodes = sample();
        let next = move_node(
            &nodes,
            &"R".into(),
            &"README".into(),
            &DropPreviewTarget::Inside {
                target_id: "src".into(),
            },
        )
        .unwrap();

        let readme = next.iter().find(|n| n.id.as_str() == "README").unwrap();
        assert_eq!(readme.parent.as_str(), "src");
        let rows = visible_rows(&"R".into(), &next, &open(&["src"]));
        assert_eq!(dump(&rows).trim(), "src\n  ui\n  main\n  README");
    }

    #[test]
    fn drop_before_takes_target_parent() {
        let nodes = sample();
        let next = move_node(
            &nodes,
            &"R".into(),
            &"button".into(),
            &DropPreviewTarget::Before {
                target_id: "src".into(),
            },
        )
        .unwrap();
        let rows = visible_rows(&"R".into(), &next, &HashSet::new());
        assert_eq!(dump(&rows).trim(), "button\nsrc\nREADME");
    }

    #[test]
    fn drop_after_last_moves_to_root_end() {
        let nodes = sample();
        let next = move_node(&nodes, &"R".into(), &"main".into(), &DropPreviewTarget::Root)
            .unwrap();
        assert_eq!(next.last().unwrap().id.as_str(), "main");
        assert_eq!(next.last().unwrap().parent.as_str(), "R");
    }

    #[test]
    fn refuse_drop_into_own_subtree() {
        let nodes = sample();
        let target = DropPreviewTarget::Inside {
            target_id: "ui".into(),
        };
        assert!(move_node(&nodes, &"R".into(), &"src".into(), &target).is_none());

        let target = DropPreviewTarget::After {
            target_id: "button".into(),
        };
        assert!(move_node(&nodes, &"R".into(), &"src".into(), &target).is_none());
    }

    #[test]
    fn refuse_drop_inside_a_leaf() {
        let nodes = sample();
        let target = DropPreviewTarget::Inside {
            target_id: "main".into(),
        };
        assert!(move_node(&nodes, &"R".into(), &"README".into(), &target).is_none());
    }

    #[test]
    fn noop_drop_reports_nothing() {
        let nodes = sample();
        let target = DropPreviewTarget::Before {
            target_id: "README".into(),
        };
        assert!(move_node(&nodes, &"R".into(), &"src".into(), &target).is_none());
    }

    #[test]
    fn descendant_walk() {
        let nodes = sample();
        assert!(is_descendant(&nodes, &"button".into(), &"src".into()));
        assert!(is_descendant(&nodes, &"src".into(), &"src".into()));
        assert!(!is_descendant(&nodes, &"README".into(), &"src".into()));
    }

    #[test]
    fn reload_keeps_folders_that_survive() {
        let mut open = open(&["src", "ui", "gone", "README"]);
        retain_open(&mut open, &sample());
        let mut kept: Vec<_> = open.iter().map(|id| id.as_str()).collect();
        kept.sort();
        assert_eq!(kept, ["src", "ui"]);
    }

    #[test]
    fn toggle_flips_folders_and_ignores_leaves() {
        let nodes = sample();
        let mut open = HashSet::new();

        assert!(toggle_open(&mut open, &nodes, &"src".into()));
        assert!(open.contains(&SharedString::from("src")));
        assert!(toggle_open(&mut open, &nodes, &"src".into()));
        assert!(open.is_empty());

        assert!(!toggle_open(&mut open, &nodes, &"main".into()));
        assert!(!toggle_open(&mut open, &nodes, &"missing".into()));
        assert!(open.is_empty());
    }

    #[test]
    fn hover_zones() {
        let rows = visible_rows(&"R".into(), &sample(), &open(&["src"]));
        let closed_dir = DndTreeEntry {
            is_open: false,
            ..rows[0].clone()
        };
        let open_dir = &rows[0];
        let leaf = rows.iter().find(|row| row.id().as_str() == "main").unwrap();

        let kind = |target: DropPreviewTarget| match target {
            DropPreviewTarget::Before { .. } => "before",
            DropPreviewTarget::After { .. } => "after",
            DropPreviewTarget::Inside { .. } => "inside",
            DropPreviewTarget::Root => "root",
        };

        assert_eq!(kind(hover_target(leaf, 0.1, false)), "before");
        assert_eq!(kind(hover_target(leaf, 0.5, false)), "after");
        assert_eq!(kind(hover_target(leaf, 0.5, true)), "after");

        assert_eq!(kind(hover_target(&closed_dir, 0.1, false)), "before");
        assert_eq!(kind(hover_target(&closed_dir, 0.5, false)), "inside");
        assert_eq!(kind(hover_target(&closed_dir, 0.9, false)), "after");
        assert_eq!(kind(hover_target(&closed_dir, 0.9, true)), "inside");

        assert_eq!(kind(hover_target(open_dir, 0.9, false)), "inside");
    }

    #[test]
    fn accepts_drop_matches_move_rules() {
        let nodes = sample();
        let inside = |id: &'static str| DropPreviewTarget::Inside {
            target_id: id.into(),
        };
        assert!(accepts_drop(&nodes, &"README".into(), &inside("ui")));
        assert!(!accepts_drop(&nodes, &"README".into(), &inside("main")));
        assert!(!accepts_drop(&nodes, &"src".into(), &inside("src")));
        assert!(!accepts_drop(&nodes, &"src".into(), &inside("ui")));
        assert!(accepts_drop(&nodes, &"src".into(), &DropPreviewTarget::Root));
    }
}
