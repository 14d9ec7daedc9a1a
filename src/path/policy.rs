//! The valid policy tree.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::oid::Oid;
use crate::x509::{PolicyQualifier, oid};


//------------ PolicyNode ----------------------------------------------------

/// A node of the valid policy tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyNode {
    valid_policy: Oid,
    qualifiers: Vec<PolicyQualifier>,
    expected_policy_set: Vec<Oid>,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    removed: bool,
}

impl PolicyNode {
    pub fn valid_policy(&self) -> &Oid {
        &self.valid_policy
    }

    pub fn qualifiers(&self) -> &[PolicyQualifier] {
        &self.qualifiers
    }

    pub fn expected_policy_set(&self) -> &[Oid] {
        &self.expected_policy_set
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn is_any_policy(&self) -> bool {
        self.valid_policy == oid::ANY_POLICY
    }
}


//------------ PolicyTree ----------------------------------------------------

/// The valid policy tree of RFC 5280, section 6.1.2.
///
/// The tree is kept as an arena of nodes referring to each other via their
/// indexes. Nodes are never moved. Deleting a node only marks it and its
/// subtree as removed and unlinks it from its parent. The root lives at
/// index 0. Once the root is removed, the tree is empty which corresponds
/// to a NULL tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyTree {
    nodes: Vec<PolicyNode>,
}

impl Default for PolicyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyTree {
    /// Creates the initial tree with a single anyPolicy node.
    pub fn new() -> Self {
        PolicyTree {
            nodes: vec![PolicyNode {
                valid_policy: oid::ANY_POLICY.to_bytes_oid(),
                qualifiers: Vec::new(),
                expected_policy_set: vec![oid::ANY_POLICY.to_bytes_oid()],
                depth: 0,
                parent: None,
                children: Vec::new(),
                removed: false,
            }]
        }
    }

    /// Returns whether the tree is NULL.
    pub fn is_empty(&self) -> bool {
        self.nodes.first().map(|node| node.removed).unwrap_or(true)
    }

    /// Returns the node at `index`.
    ///
    /// Returns `None` for unknown indexes or removed nodes.
    pub fn node(&self, index: usize) -> Option<&PolicyNode> {
        self.nodes.get(index).filter(|node| !node.removed)
    }

    /// Returns the indexes of all nodes at `depth`.
    pub fn indexes_at_depth(&self, depth: usize) -> Vec<usize> {
        self.nodes.iter().enumerate().filter(|(_, node)| {
            !node.removed && node.depth == depth
        }).map(|(idx, _)| idx).collect()
    }

    /// Returns all nodes at `depth`.
    pub fn policies_at_depth(
        &self, depth: usize
    ) -> impl Iterator<Item = &PolicyNode> + '_ {
        self.nodes.iter().filter(move |node| {
            !node.removed && node.depth == depth
        })
    }

    /// Adds a child to the node at `parent` and returns its index.
    pub(super) fn add_child(
        &mut self,
        parent: usize,
        valid_policy: Oid,
        qualifiers: Vec<PolicyQualifier>,
        expected_policy_set: Vec<Oid>,
    ) -> usize {
        let index = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(PolicyNode {
            valid_policy, qualifiers, expected_policy_set, depth,
            parent: Some(parent),
            children: Vec::new(),
            removed: false,
        });
        self.nodes[parent].children.push(index);
        index
    }

    pub(super) fn set_expected_policy_set(
        &mut self, index: usize, set: Vec<Oid>
    ) {
        self.nodes[index].expected_policy_set = set
    }

    /// Removes the node at `index` and its subtree.
    pub(super) fn remove(&mut self, index: usize) {
        if let Some(parent) = self.nodes[index].parent {
            self.nodes[parent].children.retain(|&child| child != index);
        }
        let mut pending = vec![index];
        while let Some(index) = pending.pop() {
            let node = &mut self.nodes[index];
            node.removed = true;
            pending.append(&mut node.children);
        }
    }

    /// Removes all nodes above `depth` without children.
    ///
    /// Nodes are removed bottom up so that nodes losing their last child
    /// are removed as well. This may remove the root.
    pub(super) fn prune(&mut self, depth: usize) {
        for level in (0..depth).rev() {
            for index in self.indexes_at_depth(level) {
                if self.nodes[index].children.is_empty() {
                    self.remove(index)
                }
            }
        }
    }

    /// Returns whether a child of `parent` has the given valid policy.
    pub(super) fn has_child_with_policy(
        &self, parent: usize, policy: &Oid
    ) -> bool {
        self.nodes[parent].children.iter().any(|&child| {
            self.nodes[child].valid_policy == *policy
        })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn oid(s: &str) -> Oid {
        s.parse().unwrap()
    }

    #[test]
    fn prune_and_remove() {
        let mut tree = PolicyTree::new();
        let a = tree.add_child(0, oid("1.2.3"), Vec::new(), vec![oid("1.2.3")]);
        let b = tree.add_child(0, oid("1.2.4"), Vec::new(), vec![oid("1.2.4")]);
        let a1 = tree.add_child(a, oid("1.2.3"), Vec::new(), vec![oid("1.2.3")]);
        assert_eq!(tree.indexes_at_depth(1), vec![a, b]);
        assert!(tree.has_child_with_policy(0, &oid("1.2.4")));

        tree.prune(2);
        assert!(tree.node(b).is_none());
        assert!(tree.node(a).is_some());
        assert_eq!(tree.policies_at_depth(2).count(), 1);

        tree.remove(a1);
        assert!(!tree.is_empty());
        tree.prune(2);
        assert!(tree.is_empty());
        assert_eq!(tree.policies_at_depth(0).count(), 0);
    }
}
