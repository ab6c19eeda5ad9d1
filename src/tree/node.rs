/// An owned, possibly absent, child subtree.
pub type Link<T> = Option<Box<BalancedNode<T>>>;

/// A tree node that exclusively owns both of its children.
///
/// The cached height is only ever recomputed when a child is swapped out
/// through [`set_left`](BalancedNode::set_left) or
/// [`set_right`](BalancedNode::set_right), so every structural change has to
/// go through those two calls.
#[derive(Debug, Clone)]
pub struct BalancedNode<T> {
    height: usize,
    left: Link<T>,
    right: Link<T>,
    pub data: T,
}

impl<T> BalancedNode<T> {
    pub fn new(data: T) -> BalancedNode<T> {
        BalancedNode {
            height: 1,
            left: None,
            right: None,
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Height of a subtree, 0 when absent.
    pub fn height_of(link: &Link<T>) -> usize {
        link.as_ref().map_or(0, |node| node.height)
    }

    /// height(left) - height(right)
    pub fn balance(&self) -> isize {
        Self::height_of(&self.left) as isize - Self::height_of(&self.right) as isize
    }

    pub fn left(&self) -> Option<&BalancedNode<T>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&BalancedNode<T>> {
        self.right.as_deref()
    }

    pub(super) fn left_mut(&mut self) -> Option<&mut BalancedNode<T>> {
        self.left.as_deref_mut()
    }

    pub(super) fn right_mut(&mut self) -> Option<&mut BalancedNode<T>> {
        self.right.as_deref_mut()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Replaces the left subtree, returning the previous one.
    pub fn set_left(&mut self, node: Link<T>) -> Link<T> {
        let old = std::mem::replace(&mut self.left, node);
        self.update_height();
        old
    }

    /// Replaces the right subtree, returning the previous one.
    pub fn set_right(&mut self, node: Link<T>) -> Link<T> {
        let old = std::mem::replace(&mut self.right, node);
        self.update_height();
        old
    }

    pub fn into_parts(self) -> (Link<T>, T, Link<T>) {
        (self.left, self.data, self.right)
    }

    fn update_height(&mut self) {
        self.height = 1 + Self::height_of(&self.left).max(Self::height_of(&self.right));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_a_leaf_of_height_one() {
        let node = BalancedNode::new(7);
        assert_eq!(node.height(), 1);
        assert_eq!(node.balance(), 0);
        assert!(node.is_leaf());
        assert_eq!(BalancedNode::<i32>::height_of(&None), 0);
    }

    #[test]
    fn test_setting_children_recomputes_height() {
        let mut child = BalancedNode::new(2);
        child.set_left(Some(Box::new(BalancedNode::new(1))));
        assert_eq!(child.height(), 2);

        let mut root = BalancedNode::new(3);
        root.set_left(Some(Box::new(child)));
        assert_eq!(root.height(), 3);
        assert_eq!(root.balance(), 2);

        root.set_right(Some(Box::new(BalancedNode::new(4))));
        assert_eq!(root.height(), 3);
        assert_eq!(root.balance(), 1);

        let detached = root.set_left(None);
        assert_eq!(detached.map(|node| node.data), Some(2));
        assert_eq!(root.height(), 2);
        assert_eq!(root.balance(), -1);
    }

    #[test]
    fn test_into_parts_hands_back_both_subtrees() {
        let mut node = BalancedNode::new("b");
        node.set_left(Some(Box::new(BalancedNode::new("a"))));
        node.set_right(Some(Box::new(BalancedNode::new("c"))));

        let (left, data, right) = node.into_parts();
        assert_eq!(left.map(|n| n.data), Some("a"));
        assert_eq!(data, "b");
        assert_eq!(right.map(|n| n.data), Some("c"));
    }
}
