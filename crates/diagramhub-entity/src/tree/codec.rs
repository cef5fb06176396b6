//! Conversion between the flat item list and the nested tree.
//!
//! Every function here is total: malformed input (orphans, parents that
//! are files, parent cycles, unknown ids) never panics and never drops an
//! item. Lookups that miss return `None` or an empty result.

use std::collections::{HashMap, HashSet};

use diagramhub_core::ItemId;

use super::naming::slugify;
use super::node::TreeNode;
use crate::item::Item;

/// Build root-level nodes from a flat item list.
///
/// Children keep the relative order they have in `rows`. An item is
/// promoted to a root when its parent is absent from the list or is not a
/// folder. Items trapped in a parent cycle are promoted too, so every row
/// appears exactly once.
pub fn build_tree(rows: &[Item]) -> Vec<TreeNode> {
    TreeBuilder::new(rows).build()
}

/// Build the tree from `rows` and splice `pending` nodes onto their
/// declared parents.
///
/// A pending node whose parent is missing lands at the top level.
pub fn merge_pending(rows: &[Item], pending: &[TreeNode]) -> Vec<TreeNode> {
    let mut tree = build_tree(rows);
    for node in pending {
        splice(&mut tree, node.clone());
    }
    tree
}

fn splice(tree: &mut Vec<TreeNode>, node: TreeNode) {
    let Some(parent_id) = node.parent_id.clone() else {
        tree.push(node);
        return;
    };
    match find_folder_mut(tree, &parent_id) {
        Some(children) => children.push(node),
        None => tree.push(node),
    }
}

fn find_folder_mut<'a>(nodes: &'a mut [TreeNode], id: &ItemId) -> Option<&'a mut Vec<TreeNode>> {
    for node in nodes.iter_mut() {
        if &node.id == id {
            return node.children.as_mut();
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_folder_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

struct TreeBuilder<'a> {
    rows: &'a [Item],
    children_of: HashMap<&'a ItemId, Vec<usize>>,
    visited: HashSet<&'a ItemId>,
}

impl<'a> TreeBuilder<'a> {
    fn new(rows: &'a [Item]) -> Self {
        let mut by_id: HashMap<&ItemId, &Item> = HashMap::with_capacity(rows.len());
        for row in rows {
            by_id.entry(&row.id).or_insert(row);
        }

        let mut children_of: HashMap<&ItemId, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            if let Some(parent_id) = row.parent_id.as_ref() {
                let parent_is_folder = by_id.get(parent_id).is_some_and(|p| p.is_folder);
                if parent_is_folder && parent_id != &row.id {
                    children_of.entry(parent_id).or_default().push(idx);
                }
            }
        }

        Self {
            rows,
            children_of,
            visited: HashSet::with_capacity(rows.len()),
        }
    }

    fn is_attached(&self, idx: usize) -> bool {
        let row = &self.rows[idx];
        match row.parent_id.as_ref() {
            None => false,
            Some(parent_id) => self
                .children_of
                .get(parent_id)
                .is_some_and(|kids| kids.contains(&idx)),
        }
    }

    fn build(mut self) -> Vec<TreeNode> {
        let mut roots = Vec::new();
        for idx in 0..self.rows.len() {
            if !self.is_attached(idx) && !self.visited.contains(&self.rows[idx].id) {
                roots.push(self.attach(idx));
            }
        }
        // Whatever is still unvisited hangs off a parent cycle.
        for idx in 0..self.rows.len() {
            if !self.visited.contains(&self.rows[idx].id) {
                roots.push(self.attach(idx));
            }
        }
        roots
    }

    fn attach(&mut self, idx: usize) -> TreeNode {
        let rows = self.rows;
        let row = &rows[idx];
        self.visited.insert(&row.id);

        let mut node = TreeNode::from_item(row);
        if row.is_folder {
            let kids = self.children_of.get(&row.id).cloned().unwrap_or_default();
            let mut children = Vec::with_capacity(kids.len());
            for kid in kids {
                if !self.visited.contains(&rows[kid].id) {
                    children.push(self.attach(kid));
                }
            }
            node.children = Some(children);
        }
        node
    }
}

/// Nodes from a root down to `id`, inclusive. Empty when absent.
pub fn path_to<'a>(tree: &'a [TreeNode], id: &ItemId) -> Vec<&'a TreeNode> {
    fn search<'a>(nodes: &'a [TreeNode], id: &ItemId, path: &mut Vec<&'a TreeNode>) -> bool {
        for node in nodes {
            path.push(node);
            if &node.id == id || search(node.children(), id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    if search(tree, id, &mut path) {
        path
    } else {
        Vec::new()
    }
}

/// Ids strictly above `id` on its path, outermost first.
pub fn ancestor_ids_of(tree: &[TreeNode], id: &ItemId) -> Vec<ItemId> {
    let path = path_to(tree, id);
    let above = path.len().saturating_sub(1);
    path.into_iter().take(above).map(|n| n.id.clone()).collect()
}

/// Find a node anywhere in the tree.
pub fn find_by_id<'a>(tree: &'a [TreeNode], id: &ItemId) -> Option<&'a TreeNode> {
    for node in tree {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(node.children(), id) {
            return Some(found);
        }
    }
    None
}

/// Walk the tree matching one slug per level.
///
/// At each level the first node whose slug matches is taken; siblings with
/// colliding slugs after it are unreachable.
pub fn resolve_by_slug_path<'a, S: AsRef<str>>(
    tree: &'a [TreeNode],
    segments: &[S],
    extension: &str,
) -> Option<&'a TreeNode> {
    let (first, rest) = segments.split_first()?;
    let node = tree
        .iter()
        .find(|n| slugify(&n.name, extension) == first.as_ref())?;
    if rest.is_empty() {
        return Some(node);
    }
    node.children
        .as_deref()
        .and_then(|children| resolve_by_slug_path(children, rest, extension))
}

/// URL of a node: `prefix` followed by the slug of every node on its path.
pub fn url_path_for(tree: &[TreeNode], id: &ItemId, prefix: &str, extension: &str) -> Option<String> {
    let path = path_to(tree, id);
    if path.is_empty() {
        return None;
    }
    let slugs: Vec<String> = path.iter().map(|n| slugify(&n.name, extension)).collect();
    Some(format!("{}/{}", prefix.trim_end_matches('/'), slugs.join("/")))
}

/// Whether `node_id` lies anywhere below `ancestor_id`.
///
/// A node is not its own descendant.
pub fn is_descendant(tree: &[TreeNode], ancestor_id: &ItemId, node_id: &ItemId) -> bool {
    find_by_id(tree, ancestor_id)
        .is_some_and(|ancestor| find_by_id(ancestor.children(), node_id).is_some())
}

/// Pre-order list of visible nodes.
///
/// A folder's children are included only when the folder is expanded.
/// This is the order shift-click ranges are taken over.
pub fn flatten_visible<'a>(tree: &'a [TreeNode], expanded: &HashSet<ItemId>) -> Vec<&'a TreeNode> {
    fn walk<'a>(nodes: &'a [TreeNode], expanded: &HashSet<ItemId>, out: &mut Vec<&'a TreeNode>) {
        for node in nodes {
            out.push(node);
            if node.is_folder() && expanded.contains(&node.id) {
                walk(node.children(), expanded, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(tree, expanded, &mut out);
    out
}

/// Every `(id, structural parent)` pair in pre-order.
pub fn flatten(tree: &[TreeNode]) -> Vec<(ItemId, Option<ItemId>)> {
    fn walk(nodes: &[TreeNode], parent: Option<&ItemId>, out: &mut Vec<(ItemId, Option<ItemId>)>) {
        for node in nodes {
            out.push((node.id.clone(), parent.cloned()));
            walk(node.children(), Some(&node.id), out);
        }
    }

    let mut out = Vec::new();
    walk(tree, None, &mut out);
    out
}

/// Every folder in pre-order.
pub fn collect_folders(tree: &[TreeNode]) -> Vec<&TreeNode> {
    fn walk<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a TreeNode>) {
        for node in nodes {
            if node.is_folder() {
                out.push(node);
                walk(node.children(), out);
            }
        }
    }

    let mut out = Vec::new();
    walk(tree, &mut out);
    out
}
