use super::*;

/// What a row needs from the controller, handed over explicitly on every render.
#[derive(Clone)]
pub(super) struct RowContext {
    pub(super) app: WeakEntity<TreeViewerApp>,
    pub(super) selected: Option<SharedString>,
}

pub(super) fn render_tree_row(
    ix: usize,
    entry: &DndTreeEntry,
    params: DndTreeRenderParams,
    row_cx: &RowContext,
    cx: &mut App,
) -> ListItem {
    let theme = cx.theme();
    let node = entry.node().clone();
    let selected = row_cx.selected.as_ref() == Some(&node.id);
    let indent = px(INDENT_WIDTH) * params.depth;

    let icon = if node.droppable {
        if params.is_open {
            IconName::FolderOpen
        } else {
            IconName::FolderClosed
        }
    } else {
        IconName::File
    };
    let icon_color = if selected {
        theme.foreground
    } else {
        theme.muted_foreground
    };

    let row = h_flex()
        .gap_x_2()
        .items_center()
        .min_w(px(0.))
        .when(node.droppable, |this| {
            let toggle = params.on_toggle();
            this.child(
                div()
                    .id("toggle")
                    .w(px(20.))
                    .flex_none()
                    .cursor_pointer()
                    .text_color(theme.muted_foreground)
                    .child(if params.is_open { "[-]" } else { "[+]" })
                    .on_click(move |event, window, cx| {
                        cx.stop_propagation();
                        toggle(event, window, cx);
                    }),
            )
        })
        .child(Icon::new(icon).xsmall().text_color(icon_color))
        .child(div().truncate().child(node.text.clone()))
        .when(selected, |this| {
            this.child(div().text_color(theme.muted_foreground).child("←"))
        });

    let app = row_cx.app.clone();
    ListItem::new(ix)
        .pl(px(ROW_PADDING) + indent)
        .selected(selected)
        .when(params.dragging, |this| this.opacity(0.4))
        .when(params.drop_target == Some(DndTreeDropTarget::Inside), |this| {
            this.bg(theme.drop_target)
        })
        .child(row)
        .on_click(move |_, _, cx| {
            let _ = app.update(cx, |this, cx| this.on_row_click(&node, cx));
        })
}
