use std::fmt;

use crate::interval::{starts_before_end, Boundary, Interval};
use crate::node::{height, Node};

/// A multiset of [`Interval`]s kept in an AVL tree ordered by [`Interval`]'s
/// [`Ord`] implementation, with every node augmented by the maximum end-point
/// of its subtree.
///
/// See [the crate documentation](crate) for more information.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalTree<T> {
    root: Option<Box<Node<T>>>,
    size: usize,
}

/// An inorder iterator through the interval tree.
pub struct IntervalTreeIter<'a, T> {
    to_visit: Vec<&'a Node<T>>,
    curr: Option<&'a Node<T>>,
}

/// A lazy iterator over the intervals of a tree matching a query, returned
/// by [`IntervalTree::search`] and [`IntervalTree::search_point`].
///
/// Intervals are yielded in tree order.
pub struct Search<'a, T> {
    probe: Probe<T>,
    to_visit: Vec<&'a Node<T>>,
    curr: Option<&'a Node<T>>,
}

enum Probe<T> {
    Overlaps(Interval<T>),
    Contains(T),
}

impl<T> fmt::Display for IntervalTree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.root {
            Some(ref root) => write!(f, "{}", root),
            None => write!(f, "Empty tree"),
        }
    }
}

impl<T> Default for IntervalTree<T> {
    fn default() -> IntervalTree<T> {
        IntervalTree {
            root: None,
            size: 0,
        }
    }
}

impl<T> IntervalTree<T>
where
    T: Ord + Clone,
{
    /// Creates an empty tree.
    pub fn new() -> IntervalTree<T> {
        Self::default()
    }

    /// Produces an inorder iterator for the interval tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    /// use bounded_interval_tree::interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    ///
    /// tree.insert(0..=10);
    /// tree.insert(-5..=-1);
    /// tree.insert(Interval::open(0, 10));
    ///
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&Interval::new(-5, -1)));
    /// assert_eq!(iter.next(), Some(&Interval::new(0, 10)));
    /// assert_eq!(iter.next(), Some(&Interval::open(0, 10)));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> IntervalTreeIter<'_, T> {
        IntervalTreeIter {
            to_visit: vec![],
            curr: self.root.as_deref(),
        }
    }

    /// Inserts an interval into the tree, then rebalances the path back to
    /// the root. Inserting an interval equal to one already stored keeps
    /// both.
    ///
    /// # Examples
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    /// use bounded_interval_tree::interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    ///
    /// tree.insert(Interval::closed_open(5, 9));
    /// tree.insert(5..9);
    /// tree.insert(10..=10);
    ///
    /// assert_eq!(tree.len(), 3);
    /// ```
    pub fn insert<I>(&mut self, interval: I)
    where
        I: Into<Interval<T>>,
    {
        let interval = interval.into();
        self.root = Some(match self.root.take() {
            Some(root) => root.insert(interval),
            None => Box::new(Node::new(interval)),
        });
        self.size += 1;
    }

    /// Returns every stored interval that [overlaps](Interval::overlaps) the
    /// query, partially or completely.
    ///
    /// Subtrees whose max end-point falls short of the query are skipped, and
    /// the walk stops at the first node starting past the query.
    ///
    /// # Examples
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    /// use bounded_interval_tree::interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    ///
    /// tree.insert(0..=100);
    /// tree.insert(100..=130);
    /// tree.insert(200..=230);
    ///
    /// assert_eq!(tree.search(0..=100).count(), 2);
    /// assert_eq!(tree.search(0..100).collect::<Vec<_>>(), vec![&Interval::new(0, 100)]);
    /// assert_eq!(tree.search(150..=155).count(), 0);
    /// ```
    pub fn search<I>(&self, query: I) -> Search<'_, T>
    where
        I: Into<Interval<T>>,
    {
        let query = query.into();
        let curr = if query.is_empty() {
            None
        } else {
            self.root.as_deref()
        };

        Search {
            probe: Probe::Overlaps(query),
            to_visit: vec![],
            curr,
        }
    }

    /// A "stabbing query" in the jargon: returns every stored interval that
    /// [contains](Interval::contains_point) `point`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    /// use bounded_interval_tree::interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    ///
    /// tree.insert(Interval::open(2, 10));
    /// tree.insert(Interval::new(2, 10));
    ///
    /// assert_eq!(tree.search_point(2).collect::<Vec<_>>(), vec![&Interval::new(2, 10)]);
    /// assert_eq!(tree.search_point(7).count(), 2);
    /// ```
    ///
    /// Any type implementing `Ord + Clone` works as a bound.
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    /// use bounded_interval_tree::interval_tree::IntervalTree;
    ///
    /// let mut tree = IntervalTree::new();
    ///
    /// tree.insert(Interval::open_closed("apple", "mango"));
    ///
    /// assert_eq!(tree.search_point("kiwi").count(), 1);
    /// assert_eq!(tree.search_point("apple").count(), 0);
    /// ```
    pub fn search_point(&self, point: T) -> Search<'_, T> {
        Search {
            probe: Probe::Contains(point),
            to_visit: vec![],
            curr: self.root.as_deref(),
        }
    }

    /// Returns the number of intervals stored in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree contains no interval.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of nodes on the longest path from the root to a
    /// leaf, `0` for an empty tree.
    ///
    /// ```
    /// use bounded_interval_tree::interval_tree::IntervalTree;
    ///
    /// let tree: IntervalTree<u32> = (0..1023).map(|i| i..=i + 1).collect();
    ///
    /// assert_eq!(tree.height(), 10);
    /// ```
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Clear the interval tree, removing all values stored.
    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
    }
}

impl<T> Probe<T>
where
    T: Ord,
{
    /// Whether a subtree whose intervals end at or before `max_end` may hold
    /// a match.
    fn reaches(&self, max_end: &T) -> bool {
        match self {
            Probe::Overlaps(q) => match q.lower() {
                Boundary::Open => max_end > q.start(),
                Boundary::Closed => max_end >= q.start(),
            },
            Probe::Contains(point) => max_end >= point,
        }
    }

    /// Whether `interval`, or anything ordered after it, may still match.
    fn admits_start(&self, interval: &Interval<T>) -> bool {
        match self {
            Probe::Overlaps(q) => {
                starts_before_end(interval.start(), interval.lower(), q.end(), q.upper())
            }
            Probe::Contains(point) => {
                starts_before_end(interval.start(), interval.lower(), point, Boundary::Closed)
            }
        }
    }

    fn matches(&self, interval: &Interval<T>) -> bool {
        match self {
            Probe::Overlaps(q) => interval.overlaps(q),
            Probe::Contains(point) => interval.contains_point(point),
        }
    }
}

impl<'a, T> Iterator for Search<'a, T>
where
    T: Ord + Clone,
{
    type Item = &'a Interval<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(node) = self.curr.take() {
                if self.probe.reaches(&node.max_end) {
                    self.to_visit.push(node);
                    self.curr = node.left.as_deref();
                }
            }

            let visited = self.to_visit.pop()?;
            if !self.probe.admits_start(&visited.interval) {
                // Every node left to visit is ordered after this one.
                self.to_visit.clear();
                return None;
            }

            self.curr = visited.right.as_deref();
            if self.probe.matches(&visited.interval) {
                return Some(&visited.interval);
            }
        }
    }
}

impl<'a, T> Iterator for IntervalTreeIter<'a, T> {
    type Item = &'a Interval<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.curr {
            self.to_visit.push(node);
            self.curr = node.left.as_deref();
        }

        let visited = self.to_visit.pop()?;
        self.curr = visited.right.as_deref();
        Some(&visited.interval)
    }
}

impl<'a, T> IntoIterator for &'a IntervalTree<T>
where
    T: Ord + Clone,
{
    type Item = &'a Interval<T>;
    type IntoIter = IntervalTreeIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, I> FromIterator<I> for IntervalTree<T>
where
    T: Ord + Clone,
    I: Into<Interval<T>>,
{
    fn from_iter<It: IntoIterator<Item = I>>(iter: It) -> Self {
        let mut tree = IntervalTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T, I> Extend<I> for IntervalTree<T>
where
    T: Ord + Clone,
    I: Into<Interval<T>>,
{
    fn extend<It: IntoIterator<Item = I>>(&mut self, iter: It) {
        for interval in iter {
            self.insert(interval);
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialized as the inorder sequence of its intervals.
    impl<T> Serialize for IntervalTree<T>
    where
        T: Ord + Clone + Serialize,
    {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.iter())
        }
    }

    /// Rebuilt by inserting each interval, so the balance and max end-point
    /// invariants hold whatever the input shape.
    impl<'de, T> Deserialize<'de> for IntervalTree<T>
    where
        T: Ord + Clone + Deserialize<'de>,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let intervals = Vec::<Interval<T>>::deserialize(deserializer)?;
            Ok(intervals.into_iter().collect())
        }
    }
}

#[cfg(feature = "arbitrary")]
impl<T> proptest::arbitrary::Arbitrary for IntervalTree<T>
where
    T: proptest::arbitrary::Arbitrary + Ord + Clone + 'static,
{
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        proptest::collection::vec(any::<Interval<T>>(), 0..64)
            .prop_map(|intervals: Vec<Interval<T>>| intervals.into_iter().collect::<IntervalTree<T>>())
            .boxed()
    }
}
