use super::*;

impl Render for TreeViewerApp {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let row_cx = self.row_context(cx);
        let status = self.status_text();
        let theme = cx.theme();

        let title_bar = TitleBar::new().child(
            div()
                .w_full()
                .flex()
                .items_center()
                .justify_center()
                .child(
                    div()
                        .text_sm()
                        .font_semibold()
                        .text_color(theme.foreground)
                        .child(self.target.to_string()),
                ),
        );

        let placeholder = |text: SharedString| {
            div()
                .size_full()
                .flex()
                .items_center()
                .justify_center()
                .text_sm()
                .text_color(theme.muted_foreground)
                .child(text)
                .into_any_element()
        };

        let body = match self.model.load() {
            TreeLoad::Loading => placeholder("Loading tree…".into()),
            TreeLoad::Failed(message) => v_flex()
                .size_full()
                .items_center()
                .justify_center()
                .gap_y_1()
                .child(
                    h_flex()
                        .gap_x_2()
                        .items_center()
                        .text_color(theme.red)
                        .child(Icon::new(IconName::Info).small())
                        .child("Could not load tree"),
                )
                .child(
                    div()
                        .max_w(px(480.))
                        .text_sm()
                        .text_color(theme.muted_foreground)
                        .child(message.clone()),
                )
                .into_any_element(),
            TreeLoad::Loaded(seq) if seq.is_empty() => placeholder("Empty tree".into()),
            TreeLoad::Loaded(_) => dnd_tree(&self.tree, move |ix, entry, params, _window, cx| {
                render_tree_row(ix, entry, params, &row_cx, cx)
            })
            .into_any_element(),
        };

        v_flex()
            .id("repo-tree-root")
            .key_context("RepoTreeViewer")
            .track_focus(&self.focus_handle)
            .size_full()
            .bg(theme.background)
            .child(title_bar)
            .child(div().flex_1().min_h(px(0.)).p(px(8.)).child(body))
            .child(
                div()
                    .px(px(12.))
                    .py(px(6.))
                    .border_t_1()
                    .border_color(theme.border)
                    .text_xs()
                    .text_color(theme.muted_foreground)
                    .child(status),
            )
    }
}

impl TreeViewerApp {
    fn status_text(&self) -> SharedString {
        let state = match self.model.load() {
            TreeLoad::Loading => "loading".to_string(),
            TreeLoad::Failed(_) => "failed".to_string(),
            TreeLoad::Loaded(seq) => format!("{} entries", seq.len()),
        };
        let selected = self
            .model
            .selected_path()
            .unwrap_or_else(|| "<none>".to_string());
        format!("{} · {state} · Selected: {selected}", self.target).into()
    }
}
