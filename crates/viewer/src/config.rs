use std::fmt;

use clap::{Parser, ValueEnum};
use repo_tree::EntryOrder;

pub(crate) const DEFAULT_OWNER: &str = "mintlify-onboarding";
pub(crate) const DEFAULT_REPO: &str = "agaveapi";
pub(crate) const DEFAULT_REF: &str = "main";
pub(crate) const DEFAULT_API_URL: &str = "https://api.github.com";

/// Browse a GitHub repository's file tree.
#[derive(Clone, Debug, Parser)]
#[command(name = "repo-tree-viewer", version)]
pub(crate) struct Args {
    /// Repository owner (user or organization).
    #[arg(long, env = "REPO_TREE_OWNER", default_value = DEFAULT_OWNER)]
    pub(crate) owner: String,

    #[arg(long, env = "REPO_TREE_REPO", default_value = DEFAULT_REPO)]
    pub(crate) repo: String,

    /// Branch, tag or tree sha to list.
    #[arg(long = "ref", env = "REPO_TREE_REF", default_value = DEFAULT_REF)]
    pub(crate) reference: String,

    #[arg(long, env = "REPO_TREE_API_URL", default_value = DEFAULT_API_URL)]
    pub(crate) api_url: String,

    /// How entries are ordered before parents are resolved.
    #[arg(long, value_enum, default_value_t = OrderArg::PathLength)]
    pub(crate) order: OrderArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OrderArg {
    PathLength,
    Depth,
}

impl From<OrderArg> for EntryOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::PathLength => EntryOrder::PathLength,
            OrderArg::Depth => EntryOrder::Depth,
        }
    }
}

/// The repository tree to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TreeTarget {
    pub(crate) owner: String,
    pub(crate) repo: String,
    pub(crate) reference: String,
    pub(crate) api_url: String,
    pub(crate) order: EntryOrder,
}

impl TreeTarget {
    pub(crate) fn listing_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=true",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.reference
        )
    }
}

impl Default for TreeTarget {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            reference: DEFAULT_REF.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            order: EntryOrder::default(),
        }
    }
}

impl From<Args> for TreeTarget {
    fn from(args: Args) -> Self {
        Self {
            owner: args.owner,
            repo: args.repo,
            reference: args.reference,
            api_url: args.api_url,
            order: args.order.into(),
        }
    }
}

impl fmt::Display for TreeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.reference)
    }
}
