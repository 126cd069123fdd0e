use anyhow::Context as _;
use anyhow::{Result, anyhow};
use repo_tree::TreeListing;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::config::TreeTarget;

const API_VERSION: &str = "2022-11-28";

/// Blocking fetch of the recursive tree listing. Run it off the UI thread.
pub(crate) fn fetch_tree_listing(target: &TreeTarget) -> Result<TreeListing> {
    let url = target.listing_url();
    tracing::info!(%url, "fetching tree listing");

    let response = reqwest::blocking::Client::new()
        .get(&url)
        .header(ACCEPT, "application/vnd.github+json")
        .header(USER_AGENT, concat!("repo-tree-viewer/", env!("CARGO_PKG_VERSION")))
        .header("X-GitHub-Api-Version", API_VERSION)
        .send()
        .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(anyhow!("{target} listing returned {status}: {}", body.trim()));
    }

    response
        .json::<TreeListing>()
        .with_context(|| format!("failed to decode tree listing for {target}"))
}
