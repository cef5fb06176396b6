//! The nested projection of items and the pure functions over it.

pub mod codec;
pub mod naming;
pub mod node;

pub use codec::{
    ancestor_ids_of, build_tree, collect_folders, find_by_id, flatten, flatten_visible,
    is_descendant, merge_pending, path_to, resolve_by_slug_path, url_path_for,
};
pub use naming::{generate_sibling_copy_name, slugify};
pub use node::{NodeKind, TreeNode};
