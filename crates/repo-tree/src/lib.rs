pub mod listing;
pub mod node;
pub mod normalize;

pub use listing::{EntryKind, RawEntry, TreeListing};
pub use node::{NodeSequence, TreeNode};
pub use normalize::{EntryOrder, NormalizeError, normalize, normalize_with};
