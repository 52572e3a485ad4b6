use crate::arena::{Arena, Handle};
use crate::comparator::Comparator;
use crate::treap::node::Node;
use log::trace;
use std::cmp::{self, Ordering};

/// The node storage and root of a treap with parent links.
///
/// Every structural change goes through `rotate_left` and `rotate_right`. Priorities follow the
/// min-heap convention: a node's priority never exceeds the priorities of its children.
#[derive(Clone)]
pub struct Tree<T> {
    nodes: Arena<Node<T>>,
    root: Option<Handle>,
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        trace!("clearing treap with {} nodes", self.len());
        self.nodes.clear();
        self.root = None;
    }

    pub fn key(&self, handle: Handle) -> &T {
        &self.nodes[handle].key
    }

    pub fn search<C>(&self, key: &T, comparator: &C) -> Option<Handle>
    where
        C: Comparator<T>,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            curr = match comparator.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Inserts `key` as a new leaf and bubbles it up until the heap invariant holds. The priority
    /// is only drawn once the key is known to be absent. Returns `false` if an equal key exists.
    pub fn insert<C, F>(&mut self, key: T, comparator: &C, priority: F) -> bool
    where
        C: Comparator<T>,
        F: FnOnce() -> u32,
    {
        let mut parent = None;
        let mut curr = self.root;
        let mut ordering = Ordering::Equal;

        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            parent = Some(handle);
            ordering = comparator.compare(&key, &node.key);
            curr = match ordering {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return false,
            };
        }

        let new_handle = self.nodes.allocate(Node::new(key, priority(), parent));
        match parent {
            None => self.root = Some(new_handle),
            Some(parent_handle) => {
                // the last comparison was against the parent, so it decides the side
                let parent_node = &mut self.nodes[parent_handle];
                if ordering == Ordering::Less {
                    parent_node.left = Some(new_handle);
                } else {
                    parent_node.right = Some(new_handle);
                }
            },
        }

        let rotations = self.bubble_up(new_handle);
        trace!("inserted node after {} rotations, len = {}", rotations, self.len());
        true
    }

    pub fn remove<C>(&mut self, key: &T, comparator: &C) -> Option<T>
    where
        C: Comparator<T>,
    {
        self.search(key, comparator).map(|handle| self.remove_node(handle))
    }

    /// Rotates the node down until it is a leaf, then detaches and frees it.
    pub fn remove_node(&mut self, handle: Handle) -> T {
        let mut rotations = 0;
        while !self.nodes[handle].is_leaf() {
            self.rotate_down(handle);
            rotations += 1;
        }

        let parent = self.nodes[handle].parent;
        match parent {
            None => self.root = None,
            Some(parent_handle) => {
                let parent_node = &mut self.nodes[parent_handle];
                if parent_node.left == Some(handle) {
                    parent_node.left = None;
                } else {
                    debug_assert_eq!(parent_node.right, Some(handle));
                    parent_node.right = None;
                }
            },
        }

        let node = self.nodes.free(handle);
        trace!("removed node after {} rotations, len = {}", rotations, self.len());
        node.key
    }

    fn bubble_up(&mut self, handle: Handle) -> usize {
        let mut rotations = 0;
        loop {
            let parent_handle = match self.nodes[handle].parent {
                Some(parent_handle) => parent_handle,
                None => break,
            };
            if self.nodes[handle].priority >= self.nodes[parent_handle].priority {
                break;
            }
            if self.nodes[parent_handle].left == Some(handle) {
                self.rotate_right(parent_handle);
            } else {
                debug_assert_eq!(self.nodes[parent_handle].right, Some(handle));
                self.rotate_left(parent_handle);
            }
            rotations += 1;
        }
        rotations
    }

    // Moves the node one level down. On equal child priorities the right child is promoted.
    fn rotate_down(&mut self, handle: Handle) {
        let node = &self.nodes[handle];
        match (node.left, node.right) {
            (None, Some(_)) => self.rotate_left(handle),
            (Some(_), None) => self.rotate_right(handle),
            (Some(left_handle), Some(right_handle)) => {
                if self.nodes[left_handle].priority < self.nodes[right_handle].priority {
                    self.rotate_right(handle);
                } else {
                    self.rotate_left(handle);
                }
            },
            (None, None) => panic!("Error: rotate_down called on a leaf."),
        }
    }

    // Points whatever referenced `old` (its parent or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Handle) {
        match parent {
            None => self.root = Some(new),
            Some(parent_handle) => {
                let parent_node = &mut self.nodes[parent_handle];
                if parent_node.left == Some(old) {
                    parent_node.left = Some(new);
                } else {
                    debug_assert_eq!(parent_node.right, Some(old));
                    parent_node.right = Some(new);
                }
            },
        }
    }

    fn rotate_right(&mut self, handle: Handle) {
        let child = self.nodes[handle]
            .left
            .expect("Error: rotate_right called on a node without a left child.");
        let parent = self.nodes[handle].parent;
        let middle = self.nodes[child].right;

        self.replace_child(parent, handle, child);
        self.nodes[handle].left = middle;
        self.nodes[child].right = Some(handle);

        self.nodes[handle].parent = Some(child);
        self.nodes[child].parent = parent;
        if let Some(middle_handle) = middle {
            self.nodes[middle_handle].parent = Some(handle);
        }
    }

    fn rotate_left(&mut self, handle: Handle) {
        let child = self.nodes[handle]
            .right
            .expect("Error: rotate_left called on a node without a right child.");
        let parent = self.nodes[handle].parent;
        let middle = self.nodes[child].left;

        self.replace_child(parent, handle, child);
        self.nodes[handle].right = middle;
        self.nodes[child].left = Some(handle);

        self.nodes[handle].parent = Some(child);
        self.nodes[child].parent = parent;
        if let Some(middle_handle) = middle {
            self.nodes[middle_handle].parent = Some(handle);
        }
    }

    pub fn first(&self) -> Option<Handle> {
        let mut curr = self.root?;
        while let Some(left_handle) = self.nodes[curr].left {
            curr = left_handle;
        }
        Some(curr)
    }

    pub fn last(&self) -> Option<Handle> {
        let mut curr = self.root?;
        while let Some(right_handle) = self.nodes[curr].right {
            curr = right_handle;
        }
        Some(curr)
    }

    /// Returns the greatest node less than `key`, or less than or equal to it if `inclusive`.
    pub fn predecessor<C>(&self, key: &T, comparator: &C, inclusive: bool) -> Option<Handle>
    where
        C: Comparator<T>,
    {
        let mut curr = self.root;
        let mut best = None;
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            match comparator.compare(&node.key, key) {
                Ordering::Less => {
                    best = Some(handle);
                    curr = node.right;
                },
                Ordering::Equal if inclusive => return Some(handle),
                _ => curr = node.left,
            }
        }
        best
    }

    /// Returns the least node greater than `key`, or greater than or equal to it if `inclusive`.
    pub fn successor<C>(&self, key: &T, comparator: &C, inclusive: bool) -> Option<Handle>
    where
        C: Comparator<T>,
    {
        let mut curr = self.root;
        let mut best = None;
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            match comparator.compare(&node.key, key) {
                Ordering::Greater => {
                    best = Some(handle);
                    curr = node.left;
                },
                Ordering::Equal if inclusive => return Some(handle),
                _ => curr = node.right,
            }
        }
        best
    }

    pub fn depth(&self) -> usize {
        self.subtree_depth(self.root)
    }

    fn subtree_depth(&self, tree: Option<Handle>) -> usize {
        match tree {
            None => 0,
            Some(handle) => {
                let node = &self.nodes[handle];
                1 + cmp::max(self.subtree_depth(node.left), self.subtree_depth(node.right))
            },
        }
    }

    pub fn mean_weight_balance(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        let len = self.accumulate_weight_balance(self.root, &mut sum);
        debug_assert_eq!(len, self.len());
        Some(sum / len as f64)
    }

    // Returns the size of the subtree and adds the balance of each of its nodes to `sum`.
    fn accumulate_weight_balance(&self, tree: Option<Handle>, sum: &mut f64) -> usize {
        match tree {
            None => 0,
            Some(handle) => {
                let node = &self.nodes[handle];
                let left_len = self.accumulate_weight_balance(node.left, sum);
                let right_len = self.accumulate_weight_balance(node.right, sum);
                let len = 1 + left_len + right_len;
                *sum += 2.0 * (1 + cmp::min(left_len, right_len)) as f64 / (1 + len) as f64;
                len
            },
        }
    }

    #[cfg(test)]
    pub fn root(&self) -> Option<Handle> {
        self.root
    }

    #[cfg(test)]
    pub fn node(&self, handle: Handle) -> &Node<T> {
        &self.nodes[handle]
    }

    /// Panics unless the ordering, heap, parent and size invariants hold.
    #[cfg(test)]
    pub fn assert_invariants<C>(&self, comparator: &C)
    where
        C: Comparator<T>,
    {
        if let Some(root_handle) = self.root {
            assert_eq!(self.nodes[root_handle].parent, None);
        }

        let mut in_order = Vec::new();
        self.collect_checked(self.root, &mut in_order);
        assert_eq!(in_order.len(), self.len());

        for pair in in_order.windows(2) {
            assert_eq!(
                comparator.compare(self.key(pair[0]), self.key(pair[1])),
                Ordering::Less,
            );
        }
    }

    #[cfg(test)]
    fn collect_checked(&self, tree: Option<Handle>, in_order: &mut Vec<Handle>) {
        if let Some(handle) = tree {
            let node = &self.nodes[handle];
            for child in &[node.left, node.right] {
                if let Some(child_handle) = *child {
                    let child_node = &self.nodes[child_handle];
                    assert_eq!(child_node.parent, Some(handle));
                    assert!(node.priority <= child_node.priority);
                }
            }
            self.collect_checked(node.left, in_order);
            in_order.push(handle);
            self.collect_checked(node.right, in_order);
        }
    }
}
