//! Leftist Heap
//!
//! A min-heap stored as a binary tree where every node's left subtree has a null path length
//! at least as large as its right subtree. The right spine is therefore the shortest root-to-leaf
//! path, with at most `log2(N+1)` nodes, and merging two heaps only ever walks the right spines.
//! Every mutating operation is a special case of [`merge`].
//!

use crate::derivative::Derivative;
use more_asserts::debug_assert_ge;
use crate::util::*;
use crate::visualize::*;

type BoxedNode = Box<LeftistNode>;

pub struct LeftistNode {
    /// the ordering key
    pub key: Key,
    /// length of the shortest path from this node to a node with a missing child
    pub npl: Npl,
    left: Option<BoxedNode>,
    right: Option<BoxedNode>,
}

impl LeftistNode {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            npl: 0,
            left: None,
            right: None,
        }
    }

    pub fn left(&self) -> Option<&LeftistNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&LeftistNode> {
        self.right.as_deref()
    }

    fn swap_children(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

impl std::fmt::Debug for LeftistNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeftistNode")
            .field("key", &self.key)
            .field("npl", &self.npl)
            .field("left", &self.left().map(|node| node.key))
            .field("right", &self.right().map(|node| node.key))
            .finish()
    }
}

/// null path length of a possibly absent node
pub fn npl_of(node: Option<&LeftistNode>) -> Npl {
    node.map_or(-1, |node| node.npl)
}

/// merge two leftist trees, descending only along the right spine of the smaller root;
/// on equal keys `node_a` stays on top
fn merge(node_a: Option<BoxedNode>, node_b: Option<BoxedNode>) -> Option<BoxedNode> {
    match (node_a, node_b) {
        (None, node_b) => node_b,
        (node_a, None) => node_a,
        (Some(mut a), Some(mut b)) => {
            if a.key > b.key {
                std::mem::swap(&mut a, &mut b);
            }
            a.right = merge(a.right.take(), Some(b));
            if npl_of(a.left()) < npl_of(a.right()) {
                a.swap_children();
            }
            debug_assert_ge!(npl_of(a.left()), npl_of(a.right()));
            a.npl = npl_of(a.right()) + 1;
            Some(a)
        }
    }
}

/// the reason why [`LeftistHeap::peek_min`] or [`LeftistHeap::extract_min`] failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyHeapError {
    /// nothing to look at
    Peek,
    /// nothing to remove
    Extract,
}

impl std::fmt::Display for EmptyHeapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Peek => write!(f, "Heap is empty!"),
            Self::Extract => write!(f, "Heap is empty! Cannot extract min."),
        }
    }
}

impl std::error::Error for EmptyHeapError {}

pub type HeapResult<T> = Result<T, EmptyHeapError>;

#[derive(Derivative)]
#[derivative(Default(new = "true"))]
pub struct LeftistHeap {
    root: Option<BoxedNode>,
}

impl LeftistHeap {
    pub fn from_keys(keys: &[Key]) -> Self {
        keys.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&LeftistNode> {
        self.root.as_deref()
    }

    pub fn insert(&mut self, key: Key) {
        self.root = merge(self.root.take(), Some(Box::new(LeftistNode::new(key))));
    }

    pub fn peek_min(&self) -> HeapResult<Key> {
        self.root.as_ref().map(|node| node.key).ok_or(EmptyHeapError::Peek)
    }

    /// remove the root and merge its two subtrees into the new root
    pub fn extract_min(&mut self) -> HeapResult<Key> {
        let mut root = self.root.take().ok_or(EmptyHeapError::Extract)?;
        self.root = merge(root.left.take(), root.right.take());
        Ok(root.key)
    }

    /// move every node of `other` into `self`, leaving `other` empty; no node is copied.
    /// Exclusive borrows already rule out merging a heap into itself, see
    /// [`crate::pointers::LeftistHeapPtr::merge_with`] for shared handles.
    pub fn merge_with(&mut self, other: &mut LeftistHeap) {
        self.root = merge(self.root.take(), other.root.take());
    }

    /// consume both heaps and return the merged one
    pub fn merge(mut self, mut other: LeftistHeap) -> LeftistHeap {
        self.merge_with(&mut other);
        self
    }

    /// release every node without recursion, a left spine can be as long as the heap
    pub fn clear(&mut self) {
        let mut pending: Vec<BoxedNode> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }

    /// visit every node in pre-order (node, left subtree, right subtree)
    pub fn iter_nodes(&self) -> impl Iterator<Item = &LeftistNode> {
        let mut pending: Vec<&LeftistNode> = self.root().into_iter().collect();
        std::iter::from_fn(move || {
            let node = pending.pop()?;
            pending.extend(node.right());
            pending.extend(node.left());
            Some(node)
        })
    }

    /// the node count is not stored, this walks the whole tree
    pub fn count_nodes(&self) -> usize {
        self.iter_nodes().count()
    }

    pub fn right_spine_length(&self) -> usize {
        std::iter::successors(self.root(), |node| node.right()).count()
    }

    pub fn into_sorted_vec(mut self) -> Vec<Key> {
        let mut keys = Vec::new();
        while let Ok(key) = self.extract_min() {
            keys.push(key);
        }
        keys
    }

    /// check both the heap order and the leftist property at every node
    pub fn sanity_check(&self) -> Result<(), String> {
        for node in self.iter_nodes() {
            for child in [node.left(), node.right()].into_iter().flatten() {
                if child.key < node.key {
                    return Err(format!(
                        "heap order violated: node {} has child {}",
                        node.key, child.key
                    ));
                }
            }
            let (left_npl, right_npl) = (npl_of(node.left()), npl_of(node.right()));
            if left_npl < right_npl {
                return Err(format!(
                    "leftist property violated at node {}: left npl {left_npl} < right npl {right_npl}",
                    node.key
                ));
            }
            if node.npl != right_npl + 1 {
                return Err(format!(
                    "node {} has npl {} but its right child has npl {right_npl}",
                    node.key, node.npl
                ));
            }
        }
        Ok(())
    }

    /// render the tree with one line per node, left child before right child
    pub fn tree_string(&self) -> String {
        let mut output = String::new();
        let Some(root) = self.root() else {
            output.push_str("Tree is empty.\n");
            return output;
        };
        let mut pending: Vec<(&LeftistNode, String, bool)> = vec![(root, String::new(), false)];
        while let Some((node, prefix, is_left)) = pending.pop() {
            let branch = if is_left { "├──L:" } else { "└──R:" };
            output.push_str(&format!("{prefix}{branch}{} (npl:{})\n", node.key, node.npl));
            let child_prefix = format!("{prefix}{}", if is_left { "│   " } else { "    " });
            if let Some(right) = node.right() {
                pending.push((right, child_prefix.clone(), false));
            }
            if let Some(left) = node.left() {
                pending.push((left, child_prefix, true));
            }
        }
        output
    }

    pub fn print_tree(&self) {
        print!("{}", self.tree_string());
    }
}

impl Drop for LeftistHeap {
    fn drop(&mut self) {
        self.clear();
    }
}

/// `(key, npl)` of every node in pre-order
impl std::fmt::Debug for LeftistHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LeftistHeap ")?;
        f.debug_list()
            .entries(self.iter_nodes().map(|node| (node.key, node.npl)))
            .finish()
    }
}

impl std::fmt::Display for LeftistHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tree_string())
    }
}

impl FromIterator<Key> for LeftistHeap {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl Extend<Key> for LeftistHeap {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl HeapVisualizer for LeftistHeap {
    fn snapshot(&self, abbrev: bool) -> serde_json::Value {
        // breadth-first numbering, children refer to their parent-assigned index
        let mut order: Vec<&LeftistNode> = self.root().into_iter().collect();
        let mut nodes = Vec::<serde_json::Value>::new();
        let mut index = 0;
        while index < order.len() {
            let node = order[index];
            let mut children = [None, None];
            for (slot, child) in children.iter_mut().zip([node.left(), node.right()]) {
                if let Some(child) = child {
                    order.push(child);
                    *slot = Some(order.len() - 1);
                }
            }
            let [left, right] = children;
            nodes.push(json!({
                if abbrev { "k" } else { "key" }: node.key,
                if abbrev { "n" } else { "npl" }: node.npl,
                if abbrev { "l" } else { "left" }: left,
                if abbrev { "r" } else { "right" }: right,
            }));
            index += 1;
        }
        let root: Option<usize> = self.root().map(|_| 0);
        json!({
            "empty": self.is_empty(),
            "root": root,
            "right_spine": self.right_spine_length(),
            "nodes": nodes,
        })
    }
}
