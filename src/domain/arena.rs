use std::collections::BTreeSet;

use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{Node, NodeKind};

/// Flat, index-addressed menu tree.
///
/// Nodes are stored in pre-order (document) order, so a node's parent always
/// has a smaller index and a node's descendants form the contiguous run that
/// follows it. The active path is the set of indices matching the current
/// request location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuTree {
    /// Accepted nodes in pre-order
    nodes: Vec<Node>,
    /// Indices on the active path
    active: BTreeSet<usize>,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, attaching it to its parent.
    ///
    /// The parent, if any, becomes a branch. Returns the new node's index.
    pub(crate) fn push(&mut self, node: Node) -> usize {
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.kind = NodeKind::Branch;
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn mark_active(&mut self, idx: usize) {
        self.active.insert(idx);
    }

    pub fn get(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn last(&self) -> Option<(usize, &Node)> {
        self.nodes.last().map(|n| (self.nodes.len() - 1, n))
    }

    pub fn is_active(&self, idx: usize) -> bool {
        self.active.contains(&idx)
    }

    pub fn active_set(&self) -> &BTreeSet<usize> {
        &self.active
    }

    /// Indices of the direct children of `idx`, in document order.
    pub fn children(&self, idx: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .skip(idx + 1)
            .filter(|(_, n)| n.parent == Some(idx))
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of the top-level nodes.
    pub fn roots(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// First index after the descendants of `idx`.
    ///
    /// Descendants are the contiguous run of deeper nodes following `idx`.
    pub fn subtree_end(&self, idx: usize) -> usize {
        let Some(node) = self.nodes.get(idx) else {
            return self.nodes.len();
        };
        self.nodes
            .iter()
            .enumerate()
            .skip(idx + 1)
            .find(|(_, n)| n.level <= node.level)
            .map(|(i, _)| i)
            .unwrap_or(self.nodes.len())
    }

    /// Nearest earlier node at `level`, scanning backward from `before`.
    pub fn find_previous_at_level(&self, before: usize, level: usize) -> Option<usize> {
        self.nodes[..before.min(self.nodes.len())]
            .iter()
            .rposition(|n| n.level == level)
    }

    /// Number of levels spanned by the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let min = self.nodes.iter().map(|n| n.level).min();
        let max = self.nodes.iter().map(|n| n.level).max();
        match (min, max) {
            (Some(min), Some(max)) => max - min + 1,
            _ => 0,
        }
    }

    /// Collects the labels of all leaf nodes in document order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Leaf)
            .map(|n| n.display_label().to_string())
            .collect()
    }

    /// Active nodes in document order (home first, then outer to inner).
    pub fn breadcrumbs(&self) -> Vec<(usize, &Node)> {
        self.active
            .iter()
            .filter_map(|&i| self.nodes.get(i).map(|n| (i, n)))
            .collect()
    }

    /// Copy of this tree with every node on the active path.
    pub fn expanded(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            active: (0..self.nodes.len()).collect(),
        }
    }

    /// Inspection view with active nodes marked by `*`.
    pub fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_with(|node, active| {
            if active {
                format!("{} *", node.display_label())
            } else {
                node.display_label().to_string()
            }
        })
    }

    /// Inspection view with caller-provided labels.
    pub fn to_tree_with<F>(&self, label: F) -> Tree<String>
    where
        F: Fn(&Node, bool) -> String,
    {
        fn build<F: Fn(&Node, bool) -> String>(tree: &MenuTree, idx: usize, label: &F) -> Tree<String> {
            let leaves: Vec<_> = tree
                .children(idx)
                .into_iter()
                .map(|child| build(tree, child, label))
                .collect();
            Tree::new(label(&tree.nodes[idx], tree.is_active(idx))).with_leaves(leaves)
        }

        let leaves: Vec<_> = self
            .roots()
            .into_iter()
            .map(|r| build(self, r, &label))
            .collect();
        Tree::new("menu".to_string()).with_leaves(leaves)
    }
}
