use crate::arena::Handle;

/// A struct representing an internal node of a treap.
#[derive(Clone)]
pub struct Node<T> {
    pub key: T,
    pub priority: u32,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T> Node<T> {
    pub fn new(key: T, priority: u32, parent: Option<Handle>) -> Self {
        Node {
            key,
            priority,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
