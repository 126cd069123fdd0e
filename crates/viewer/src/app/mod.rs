use anyhow::Result;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    ActiveTheme as _, Icon, IconName, Sizable as _, StyledExt as _, TitleBar, WindowExt as _,
    h_flex, list::ListItem, notification::Notification, v_flex,
};
use gpui_dnd_tree::{
    DndTreeDropTarget, DndTreeEntry, DndTreeNode, DndTreeRenderParams, DndTreeState, dnd_tree,
};
use repo_tree::TreeListing;

use crate::config::TreeTarget;
use crate::github::fetch_tree_listing;
use crate::model::{ClickOutcome, TreeLoad, ViewerModel, dnd_nodes};

mod row;
mod ui;

use row::{RowContext, render_tree_row};

const INDENT_WIDTH: f32 = 14.;
const ROW_PADDING: f32 = 8.;

pub(crate) struct TreeViewerApp {
    focus_handle: FocusHandle,
    target: TreeTarget,
    model: ViewerModel,
    tree: Entity<DndTreeState>,
}

impl TreeViewerApp {
    pub(crate) fn new(window: &mut Window, cx: &mut Context<Self>, target: TreeTarget) -> Self {
        let app = cx.weak_entity();
        let tree = cx.new(|cx| {
            DndTreeState::new(cx)
                .indent_width(px(INDENT_WIDTH))
                .indent_offset(px(ROW_PADDING))
                .on_drop(move |nodes, _window, cx| {
                    let _ = app.update(cx, |this, cx| this.on_tree_drop(nodes, cx));
                })
        });

        window.set_window_title(&target.to_string());

        let this = Self {
            focus_handle: cx.focus_handle().tab_stop(true),
            target,
            model: ViewerModel::default(),
            tree,
        };
        this.spawn_fetch(window, cx);
        this
    }

    pub(crate) fn focus_handle(&self) -> FocusHandle {
        self.focus_handle.clone()
    }

    /// Issue the one and only listing request; the view stays in `Loading` until it settles.
    fn spawn_fetch(&self, window: &mut Window, cx: &mut Context<Self>) {
        let target = self.target.clone();
        cx.spawn_in(window, async move |this, window| {
            let fetched = window
                .background_executor()
                .spawn(async move { fetch_tree_listing(&target) })
                .await;

            let _ = window.update(|window, cx| {
                this.update(cx, |this, cx| this.finish_fetch(fetched, window, cx))
            });
        })
        .detach();
    }

    fn finish_fetch(
        &mut self,
        fetched: Result<TreeListing>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.model.apply_fetch(fetched, self.target.order);

        match self.model.load() {
            TreeLoad::Loaded(seq) => {
                let root_id = seq.root_id.clone();
                let nodes = dnd_nodes(seq);
                self.tree
                    .update(cx, |tree, cx| tree.set_tree(root_id, nodes, cx));
            }
            TreeLoad::Failed(message) => {
                let message = message.clone();
                window.push_notification(
                    Notification::new().message(format!("Could not load tree: {message}")),
                    cx,
                );
            }
            TreeLoad::Loading => {}
        }
        cx.notify();
    }

    fn on_tree_drop(&mut self, nodes: &[DndTreeNode], cx: &mut Context<Self>) {
        tracing::debug!(nodes = nodes.len(), "tree rearranged by drag and drop");
        self.model.replace_nodes(nodes);
        cx.notify();
    }

    fn on_row_click(&mut self, node: &DndTreeNode, cx: &mut Context<Self>) {
        if self.model.click(node) == ClickOutcome::Selected {
            tracing::debug!(id = %node.id, name = %node.text, "file selected");
            self.tree.update(cx, |_, cx| cx.notify());
            cx.notify();
        }
    }

    fn row_context(&self, cx: &Context<Self>) -> RowContext {
        RowContext {
            app: cx.weak_entity(),
            selected: self.model.selection().current().cloned(),
        }
    }
}
