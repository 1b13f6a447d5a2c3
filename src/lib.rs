//! Implementation of an interval tree ([`interval_tree::IntervalTree`]) over bounded
//! [`interval::Interval`]s whose ends are independently open or closed. It is based on the
//! data structure described in Cormen et al.
//! (2009, Section 14.3: Interval trees, pp. 348–354), kept balanced as an AVL tree. It provides
//! "stabbing queries" (as in "which stored intervals contain point `p`?") and overlap queries
//! (as in "which stored intervals share at least one point with `q`?").
//!
//! # Implementation
//!
//! The tree is a multiset of intervals ordered by [`Interval`](interval::Interval)'s total order:
//! by start, then closed lower bounds before open ones, then by end, then open upper bounds
//! before closed ones. Every node is augmented with the maximum end-point of its subtree, and
//! that augmentation is recomputed bottom-up along the insertion path and through every
//! rotation.
//!
//! Queries walk the tree lazily, skipping every subtree whose maximum end-point falls short of
//! the query, and stopping at the first node starting past it. With the height kept at
//! `O(log n)` a query costs `O(log n + k)` for `k` results.
//!
//! ```
//! use bounded_interval_tree::interval::Interval;
//! use bounded_interval_tree::interval_tree::IntervalTree;
//!
//! let mut tree = IntervalTree::new();
//! tree.insert(Interval::closed_open(0, 60));
//! tree.insert(Interval::closed_open(50, 70));
//! tree.insert(Interval::new(60, 560));
//!
//! assert_eq!(tree.search(Interval::open(55, 60)).count(), 2);
//! assert_eq!(tree.search_point(60).count(), 2);
//! ```
//!
//! Note that any type satisfying the [`Ord`] and [`Clone`] traits can be stored in this tree.
//! The tree is not synchronized; share it across threads behind a lock.

/// Intervals with open or closed ends.
pub mod interval;
/// An interval tree implemented with an AVL tree.
pub mod interval_tree;
mod node;
