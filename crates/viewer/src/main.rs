use clap::Parser as _;
use gpui::*;
use gpui_component::{Root, TitleBar};
use tracing_subscriber::EnvFilter;

use crate::app::TreeViewerApp;
use crate::config::{Args, TreeTarget};

mod app;
mod config;
mod github;
mod model;

const DEFAULT_LOG_FILTER: &str = "repo_tree_viewer=info,repo_tree=info";

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
}

fn main() {
    init_logging();
    let target = TreeTarget::from(Args::parse());
    tracing::info!(%target, order = ?target.order, "starting");

    let app = Application::new();

    app.run(move |cx| {
        gpui_component::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitleBar::title_bar_options()),
                    ..Default::default()
                },
                |window, cx| {
                    let view = cx.new(|cx| TreeViewerApp::new(window, cx, target));
                    let handle = view.read(cx).focus_handle();
                    window.focus(&handle);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });
}
