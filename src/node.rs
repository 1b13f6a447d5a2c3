use std::cmp;
use std::fmt;

use log::trace;

use crate::interval::Interval;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Node<T> {
    pub interval: Interval<T>,
    pub max_end: T, // Max end-point of the subtree.
    pub height: usize,
    pub left: Option<Box<Node<T>>>,
    pub right: Option<Box<Node<T>>>,
}

impl<T> fmt::Display for Node<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, " {{ {} ({})", self.interval, self.max_end)?;
        if let Some(ref left) = self.left {
            write!(f, " left:{}", left)?;
        }
        if let Some(ref right) = self.right {
            write!(f, " right:{}", right)?;
        }
        write!(f, "}} ")
    }
}

pub(crate) fn height<T>(node: &Option<Box<Node<T>>>) -> usize {
    node.as_ref().map_or(0, |n| n.height)
}

impl<T> Node<T>
where
    T: Ord + Clone,
{
    pub fn new(interval: Interval<T>) -> Node<T> {
        let max_end = interval.end().clone();

        Node {
            interval,
            max_end,
            height: 1,
            left: None,
            right: None,
        }
    }

    /// Inserts `interval` below this node and returns the (possibly rotated)
    /// root of the subtree. Intervals equal to this node's go to the right.
    pub fn insert(mut self: Box<Self>, interval: Interval<T>) -> Box<Node<T>> {
        let child = if interval < self.interval {
            &mut self.left
        } else {
            &mut self.right
        };
        *child = Some(match child.take() {
            Some(node) => node.insert(interval),
            None => Box::new(Node::new(interval)),
        });

        self.update();
        self.rebalance()
    }

    /// Recomputes height and max end-point from the children.
    fn update(&mut self) {
        self.height = 1 + cmp::max(height(&self.left), height(&self.right));

        let mut max_end = self.interval.end();
        for child in [&self.left, &self.right].into_iter().flatten() {
            if child.max_end > *max_end {
                max_end = &child.max_end;
            }
        }
        self.max_end = max_end.clone();
    }

    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    fn rebalance(mut self: Box<Self>) -> Box<Node<T>> {
        match self.balance_factor() {
            2 => {
                if self.left.as_ref().map_or(0, |n| n.balance_factor()) < 0 {
                    trace!("left-right case at height {}", self.height);
                    self.left = self.left.take().map(Node::rotate_left);
                }
                self.rotate_right()
            }
            -2 => {
                if self.right.as_ref().map_or(0, |n| n.balance_factor()) > 0 {
                    trace!("right-left case at height {}", self.height);
                    self.right = self.right.take().map(Node::rotate_right);
                }
                self.rotate_left()
            }
            _ => self,
        }
    }

    //      self            pivot
    //     /    \          /     \
    //   pivot   c   =>   a      self
    //   /   \                  /    \
    //  a     b                b      c
    fn rotate_right(mut self: Box<Self>) -> Box<Node<T>> {
        let mut pivot = match self.left.take() {
            Some(pivot) => pivot,
            None => return self,
        };
        trace!("rotating right at height {}", self.height);

        self.left = pivot.right.take();
        self.update();
        pivot.right = Some(self);
        pivot.update();
        pivot
    }

    //    self                 pivot
    //   /    \               /     \
    //  a    pivot    =>    self     c
    //       /   \         /    \
    //      b     c       a      b
    fn rotate_left(mut self: Box<Self>) -> Box<Node<T>> {
        let mut pivot = match self.right.take() {
            Some(pivot) => pivot,
            None => return self,
        };
        trace!("rotating left at height {}", self.height);

        self.right = pivot.left.take();
        self.update();
        pivot.left = Some(self);
        pivot.update();
        pivot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(start: i32, end: i32) -> Box<Node<i32>> {
        Box::new(Node::new(Interval::new(start, end)))
    }

    #[test]
    fn it_creates_leaf() {
        let node = Node::new(Interval::closed_open(3, 9));

        assert_eq!(node.max_end, 9);
        assert_eq!(node.height, 1);
        assert!(node.left.is_none() && node.right.is_none());
    }

    #[test]
    fn it_updates_max_end_on_insert() {
        let node = leaf(10, 12).insert(Interval::new(0, 50));

        assert_eq!(node.max_end, 50);
        assert_eq!(node.height, 2);
        assert_eq!(node.left.as_ref().map(|n| n.max_end), Some(50));
    }

    #[test]
    fn it_rotates_left_on_ascending_inserts() {
        let node = leaf(1, 100)
            .insert(Interval::new(2, 3))
            .insert(Interval::new(4, 5));

        assert_eq!(node.interval, Interval::new(2, 3));
        assert_eq!(node.height, 2);
        assert_eq!(node.max_end, 100);
        assert_eq!(node.left.as_ref().map(|n| n.max_end), Some(100));
        assert_eq!(node.right.as_ref().map(|n| n.max_end), Some(5));
    }

    #[test]
    fn it_rotates_right_on_descending_inserts() {
        let node = leaf(4, 5)
            .insert(Interval::new(2, 3))
            .insert(Interval::new(1, 100));

        assert_eq!(node.interval, Interval::new(2, 3));
        assert_eq!(node.height, 2);
        assert_eq!(node.max_end, 100);
        assert_eq!(node.right.as_ref().map(|n| n.max_end), Some(5));
    }

    #[test]
    fn it_double_rotates() {
        let left_right = leaf(10, 11)
            .insert(Interval::new(2, 3))
            .insert(Interval::new(5, 60));
        assert_eq!(left_right.interval, Interval::new(5, 60));
        assert_eq!(left_right.height, 2);
        assert_eq!(left_right.max_end, 60);
        assert_eq!(left_right.left.as_ref().map(|n| n.max_end), Some(3));
        assert_eq!(left_right.right.as_ref().map(|n| n.max_end), Some(11));

        let right_left = leaf(2, 3)
            .insert(Interval::new(10, 11))
            .insert(Interval::new(5, 6));
        assert_eq!(right_left.interval, Interval::new(5, 6));
        assert_eq!(right_left.height, 2);
        assert_eq!(right_left.max_end, 11);
    }

    #[test]
    fn display_works_as_expected() {
        let node = leaf(2, 3)
            .insert(Interval::new(1, 4))
            .insert(Interval::closed_open(5, 6));

        assert_eq!(
            node.to_string(),
            " { [2, 3] (6) left: { [1, 4] (4)}  right: { [5, 6) (6)} } "
        );
    }
}
