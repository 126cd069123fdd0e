use std::{collections::HashSet, ops::Range, rc::Rc};

use gpui::{
    App, AppContext as _, ClickEvent, Context, ElementId, Entity, EntityId, FocusHandle,
    InteractiveElement as _, IntoElement, ListSizingBehavior, ParentElement as _,
    Pixels, Render, RenderOnce, SharedString, StatefulInteractiveElement as _,
    StyleRefinement, Styled, UniformListScrollHandle, WeakEntity, Window, div,
    prelude::FluentBuilder as _, px, uniform_list,
};
use gpui_component::list::ListItem;
use gpui_component::scroll::{Scrollbar, ScrollbarState};
use gpui_component::{ActiveTheme as _, StyledExt as _};

use crate::model::{
    DndTreeEntry, DndTreeNode, DropPreviewTarget, accepts_drop, hover_target, move_node,
    retain_open, toggle_open, visible_rows,
};

const CONTEXT: &str = "DndTree";

type RenderItem =
    Rc<dyn Fn(usize, &DndTreeEntry, DndTreeRenderParams, &mut Window, &mut App) -> ListItem>;
type OnDrop = Rc<dyn Fn(&[DndTreeNode], &mut Window, &mut App)>;

/// Create a [`DndTree`].
pub fn dnd_tree<R>(state: &Entity<DndTreeState>, render_item: R) -> DndTree
where
    R: Fn(usize, &DndTreeEntry, DndTreeRenderParams, &mut Window, &mut App) -> ListItem + 'static,
{
    DndTree::new(state, render_item)
}

#[derive(Clone)]
struct DndTreeDrag {
    tree_id: EntityId,
    node_id: SharedString,
    label: SharedString,
}

struct DragGhost {
    label: SharedString,
}

impl DragGhost {
    fn new(label: SharedString) -> Self {
        Self { label }
    }
}

impl Render for DragGhost {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        div()
            .px(px(10.))
            .py(px(6.))
            .rounded(px(8.))
            .bg(theme.popover)
            .border_1()
            .border_color(theme.border)
            .shadow_md()
            .text_color(theme.popover_foreground)
            .text_sm()
            .child(self.label.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DndTreeDropTarget {
    Before,
    After,
    Inside,
}

/// Per-row values handed to the render callback.
#[derive(Clone)]
pub struct DndTreeRenderParams {
    pub depth: usize,
    pub is_open: bool,
    pub has_children: bool,
    pub dragging: bool,
    pub drop_target: Option<DndTreeDropTarget>,
    state: WeakEntity<DndTreeState>,
    id: SharedString,
}

impl DndTreeRenderParams {
    /// A click handler that opens or closes this row.
    ///
    /// The tree itself does not react to clicks; attach this wherever the row
    /// should toggle.
    pub fn on_toggle(&self) -> impl Fn(&ClickEvent, &mut Window, &mut App) + 'static {
        let state = self.state.clone();
        let id = self.id.clone();
        move |_, _, cx| {
            let _ = state.update(cx, |state, cx| state.toggle(&id, cx));
        }
    }
}

/// The drop that would happen if the pointer were released now.
#[derive(Clone, Debug, PartialEq)]
struct DropPreview {
    row_ix: usize,
    target: DropPreviewTarget,
}

impl DropPreview {
    fn marker(&self) -> DndTreeDropTarget {
        match self.target {
            DropPreviewTarget::Before { .. } => DndTreeDropTarget::Before,
            DropPreviewTarget::Inside { .. } => DndTreeDropTarget::Inside,
            DropPreviewTarget::After { .. } | DropPreviewTarget::Root => DndTreeDropTarget::After,
        }
    }
}

/// State for a tree built from a flat, parent-linked node sequence.
pub struct DndTreeState {
    focus_handle: FocusHandle,
    root_id: SharedString,
    nodes: Vec<DndTreeNode>,
    open: HashSet<SharedString>,
    entries: Vec<DndTreeEntry>,
    indent_width: Pixels,
    indent_offset: Pixels,
    scrollbar_state: ScrollbarState,
    scroll_handle: UniformListScrollHandle,
    dragged_id: Option<SharedString>,
    drop_preview: Option<DropPreview>,
    on_drop: Option<OnDrop>,
    render_item: RenderItem,
}

impl DndTreeState {
    pub fn new(cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            root_id: SharedString::default(),
            nodes: Vec::new(),
            open: HashSet::new(),
            entries: Vec::new(),
            indent_width: px(16.),
            indent_offset: px(0.),
            scrollbar_state: ScrollbarState::default(),
            scroll_handle: UniformListScrollHandle::default(),
            dragged_id: None,
            drop_preview: None,
            on_drop: None,
            render_item: Rc::new(|_, _, _, _, _| ListItem::new("dnd-tree-empty")),
        }
    }

    /// Indentation per depth level, used to line the drop marker up with the row's text.
    ///
    /// This should match the indentation used by your row renderer.
    pub fn indent_width(mut self, indent_width: Pixels) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Left offset of the drop marker at depth 0.
    pub fn indent_offset(mut self, indent_offset: Pixels) -> Self {
        self.indent_offset = indent_offset;
        self
    }

    /// Called with the full new sequence after every accepted drop.
    pub fn on_drop(
        mut self,
        on_drop: impl Fn(&[DndTreeNode], &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_drop = Some(Rc::new(on_drop));
        self
    }

    /// Replace the whole sequence. Open folders that still exist stay open.
    pub fn set_tree(
        &mut self,
        root_id: impl Into<SharedString>,
        nodes: impl Into<Vec<DndTreeNode>>,
        cx: &mut Context<Self>,
    ) {
        self.root_id = root_id.into();
        self.nodes = nodes.into();
        retain_open(&mut self.open, &self.nodes);
        self.clear_drag();
        self.rebuild_entries();
        cx.notify();
    }

    /// Open or close a droppable node. Leaves are ignored.
    pub fn toggle(&mut self, id: &SharedString, cx: &mut Context<Self>) {
        if toggle_open(&mut self.open, &self.nodes, id) {
            self.rebuild_entries();
            cx.notify();
        }
    }

    fn rebuild_entries(&mut self) {
        self.entries = visible_rows(&self.root_id, &self.nodes, &self.open);
    }

    fn clear_drag(&mut self) {
        self.drop_preview = None;
        self.dragged_id = None;
    }

    fn on_drag_start(&mut self, drag: &DndTreeDrag, cx: &mut Context<Self>) {
        self.dragged_id = Some(drag.node_id.clone());
        self.drop_preview = None;
        cx.notify();
    }

    fn on_drag_move(
        &mut self,
        event: &gpui::DragMoveEvent<DndTreeDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let outside = !event.bounds.contains(&event.event.position);
        let foreign = event.drag(cx).tree_id != cx.entity_id();
        if (outside || foreign) && self.drop_preview.take().is_some() {
            cx.notify();
        }
    }

    fn on_row_drag_move(
        &mut self,
        row_ix: usize,
        event: &gpui::DragMoveEvent<DndTreeDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !cx.has_active_drag() || event.drag(cx).tree_id != cx.entity_id() {
            return;
        }
        let position = event.event.position;
        if !event.bounds.contains(&position) {
            return;
        }
        let Some(dragged_id) = self.dragged_id.as_ref() else {
            return;
        };
        let Some(entry) = self.entries.get(row_ix) else {
            return;
        };

        let y_fraction = (position.y - event.bounds.origin.y) / event.bounds.size.height;
        let target = hover_target(entry, y_fraction, event.event.modifiers.alt);
        let preview = accepts_drop(&self.nodes, dragged_id, &target)
            .then_some(DropPreview { row_ix, target });

        if self.drop_preview != preview {
            self.drop_preview = preview;
            cx.notify();
        }
    }

    fn apply_drop_target(
        &mut self,
        drag: &DndTreeDrag,
        target: DropPreviewTarget,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let next = move_node(&self.nodes, &self.root_id, &drag.node_id, &target);
        self.clear_drag();

        let Some(next) = next else {
            cx.notify();
            return;
        };

        if let DropPreviewTarget::Inside { target_id } = &target {
            self.open.insert(target_id.clone());
        }
        self.nodes = next;
        self.rebuild_entries();
        cx.notify();

        if let Some(on_drop) = self.on_drop.clone() {
            on_drop(&self.nodes, window, cx);
        }
    }

    fn on_drop_on_row(
        &mut self,
        drag: &DndTreeDrag,
        row_ix: usize,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let preview = self.drop_preview.take();
        match preview {
            Some(preview) if drag.tree_id == cx.entity_id() && preview.row_ix == row_ix => {
                self.apply_drop_target(drag, preview.target, window, cx);
            }
            _ => {
                self.clear_drag();
                cx.notify();
            }
        }
    }

    fn on_drop_after_last(
        &mut self,
        drag: &DndTreeDrag,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if drag.tree_id != cx.entity_id() {
            self.clear_drag();
            cx.notify();
            return;
        }
        self.apply_drop_target(drag, DropPreviewTarget::Root, window, cx);
    }
}

impl Render for DndTreeState {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if !cx.has_active_drag() {
            self.clear_drag();
        }

        let render_item = Rc::clone(&self.render_item);
        let state_entity = cx.entity();
        let weak_state = cx.weak_entity();

        div()
            .id("dnd-tree-state")
            .size_full()
            .relative()
            .child(
                uniform_list("entries", self.entries.len(), {
                    cx.processor(move |state, visible_range: Range<usize>, window, cx| {
                        let marker_color = cx.theme().drag_border;
                        let mut rows = Vec::with_capacity(visible_range.len());
                        for ix in visible_range {
                            let entry = &state.entries[ix];
                            let drop_target = state
                                .drop_preview
                                .as_ref()
                                .filter(|preview| preview.row_ix == ix)
                                .map(DropPreview::marker);
                            let params = DndTreeRenderParams {
                                depth: entry.depth(),
                                is_open: entry.is_open(),
                                has_children: entry.has_children(),
                                dragging: cx.has_active_drag()
                                    && state.dragged_id.as_ref() == Some(entry.id()),
                                drop_target,
                                state: weak_state.clone(),
                                id: entry.id().clone(),
                            };
                            let item = (render_item)(ix, entry, params, window, cx);

                            let marker_x = state.indent_offset + state.indent_width * entry.depth();
                            let marker = |edge: DndTreeDropTarget| {
                                div()
                                    .absolute()
                                    .left(marker_x)
                                    .right_0()
                                    .h(px(2.))
                                    .bg(marker_color)
                                    .map(|this| match edge {
                                        DndTreeDropTarget::Before => this.top_0(),
                                        _ => this.bottom_0(),
                                    })
                            };

                            let drag_value = DndTreeDrag {
                                tree_id: cx.entity_id(),
                                node_id: entry.id().clone(),
                                label: entry.node().text.clone(),
                            };
                            let state_entity = state_entity.clone();
                            rows.push(
                                div()
                                    .id(ix)
                                    .relative()
                                    .child(item)
                                    .when_some(
                                        drop_target.filter(|t| *t != DndTreeDropTarget::Inside),
                                        |this, edge| this.child(marker(edge)),
                                    )
                                    .on_drag_move::<DndTreeDrag>(cx.listener(
                                        move |this, ev, window, cx| {
                                            this.on_row_drag_move(ix, ev, window, cx);
                                        },
                                    ))
                                    .on_drop::<DndTreeDrag>(cx.listener(
                                        move |this, drag, window, cx| {
                                            this.on_drop_on_row(drag, ix, window, cx);
                                        },
                                    ))
                                    .on_drag(drag_value, move |drag, _, _, cx| {
                                        state_entity
                                            .update(cx, |state, cx| state.on_drag_start(drag, cx));
                                        let label = drag.label.clone();
                                        cx.new(|_| DragGhost::new(label))
                                    }),
                            );
                        }
                        rows
                    })
                })
                .on_drag_move::<DndTreeDrag>(cx.listener(Self::on_drag_move))
                .on_drop::<DndTreeDrag>(cx.listener(Self::on_drop_after_last))
                .flex_grow()
                .size_full()
                .track_scroll(self.scroll_handle.clone())
                .with_sizing_behavior(ListSizingBehavior::Auto)
                .into_any_element(),
            )
            .child(
                div()
                    .absolute()
                    .top_0()
                    .right_0()
                    .bottom_0()
                    .w(px(12.))
                    .child(Scrollbar::uniform_scroll(
                        &self.scrollbar_state,
                        &self.scroll_handle,
                    )),
            )
    }
}

/// A draggable tree view over a flat node sequence.
#[derive(IntoElement)]
pub struct DndTree {
    id: ElementId,
    state: Entity<DndTreeState>,
    style: StyleRefinement,
    render_item: RenderItem,
}

impl DndTree {
    pub fn new<R>(state: &Entity<DndTreeState>, render_item: R) -> Self
    where
        R: Fn(usize, &DndTreeEntry, DndTreeRenderParams, &mut Window, &mut App) -> ListItem
            + 'static,
    {
        Self {
            id: ElementId::Name(format!("dnd-tree-{}", state.entity_id()).into()),
            state: state.clone(),
            style: StyleRefinement::default(),
            render_item: Rc::new(render_item),
        }
    }
}

impl Styled for DndTree {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl RenderOnce for DndTree {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let focus_handle = self.state.read(cx).focus_handle.clone();
        self.state
            .update(cx, |state, _| state.render_item = self.render_item);

        div()
            .id(self.id)
            .key_context(CONTEXT)
            .track_focus(&focus_handle)
            .size_full()
            .child(self.state)
            .refine_style(&self.style)
    }
}
