mod model;
mod tree;

pub use model::{DndTreeEntry, DndTreeNode, is_descendant, visible_rows};
pub use tree::{DndTree, DndTreeDropTarget, DndTreeRenderParams, DndTreeState, dnd_tree};
