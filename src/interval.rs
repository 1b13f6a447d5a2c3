use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, Range, RangeBounds, RangeInclusive};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use Boundary::*;
use Ordering::*;

/// Whether an end of an [`Interval`] includes its end-point.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// The end-point is excluded, drawn as `(` or `)`.
    Open,
    /// The end-point is included, drawn as `[` or `]`.
    #[default]
    Closed,
}

impl Boundary {
    /// Lower-side test: does a lower bound at `start` admit `x`?
    fn admits_above<T: Ord>(self, start: &T, x: &T) -> bool {
        match self {
            Open => start < x,
            Closed => start <= x,
        }
    }

    /// Upper-side test: does an upper bound at `end` admit `x`?
    fn admits_below<T: Ord>(self, end: &T, x: &T) -> bool {
        match self {
            Open => end > x,
            Closed => end >= x,
        }
    }

    /// Tie-break between two lower bounds sitting on the same point. A closed lower bound
    /// includes its start, so it begins earlier.
    fn cmp_lower(self, other: Boundary) -> Ordering {
        match (self, other) {
            (Closed, Open) => Less,
            (Open, Closed) => Greater,
            (Open, Open) | (Closed, Closed) => Equal,
        }
    }

    /// Tie-break between two upper bounds sitting on the same point. An open upper bound
    /// excludes its end, so it finishes earlier.
    fn cmp_upper(self, other: Boundary) -> Ordering {
        match (self, other) {
            (Open, Closed) => Less,
            (Closed, Open) => Greater,
            (Open, Open) | (Closed, Closed) => Equal,
        }
    }

    fn bound<T>(self, x: &T) -> Bound<&T> {
        match self {
            Open => Bound::Excluded(x),
            Closed => Bound::Included(x),
        }
    }
}

/// A bounded interval `start..end` whose ends are independently [open or
/// closed](Boundary).
///
/// Intervals are vectorless: the constructors swap the end-points when given
/// in reverse, so `start <= end` always holds. The boundary types stay on the
/// side they were given for.
///
/// # Examples
///
/// ```
/// use bounded_interval_tree::interval::{Boundary, Interval};
///
/// let i = Interval::with_boundaries(10, 2, Boundary::Open, Boundary::Closed);
///
/// assert_eq!(i.start(), &2);
/// assert_eq!(i.end(), &10);
/// assert_eq!(i.to_string(), "(2, 10]");
/// assert!(!i.contains_point(&2));
/// assert!(i.contains_point(&10));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "RawInterval<T>",
        bound(deserialize = "T: Deserialize<'de> + Ord")
    )
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    start: T,
    end: T,
    lower: Boundary,
    upper: Boundary,
}

impl<T: Ord> Interval<T> {
    /// Creates the closed interval `[start, end]`.
    pub fn new(start: T, end: T) -> Self {
        Self::with_boundaries(start, end, Closed, Closed)
    }

    /// Creates an interval with the given boundary types on its lower and
    /// upper side.
    pub fn with_boundaries(start: T, end: T, lower: Boundary, upper: Boundary) -> Self {
        let (start, end) = if start > end {
            (end, start)
        } else {
            (start, end)
        };

        Interval {
            start,
            end,
            lower,
            upper,
        }
    }

    /// Creates the open interval `(start, end)`.
    pub fn open(start: T, end: T) -> Self {
        Self::with_boundaries(start, end, Open, Open)
    }

    /// Creates the half-open interval `[start, end)`.
    pub fn closed_open(start: T, end: T) -> Self {
        Self::with_boundaries(start, end, Closed, Open)
    }

    /// Creates the half-open interval `(start, end]`.
    pub fn open_closed(start: T, end: T) -> Self {
        Self::with_boundaries(start, end, Open, Closed)
    }

    /// Creates the degenerate interval `[point, point]`.
    pub fn point(point: T) -> Self
    where
        T: Clone,
    {
        Self::new(point.clone(), point)
    }

    pub fn start(&self) -> &T {
        &self.start
    }

    pub fn end(&self) -> &T {
        &self.end
    }

    pub fn lower(&self) -> Boundary {
        self.lower
    }

    pub fn upper(&self) -> Boundary {
        self.upper
    }

    /// Returns `true` if no point lies in this interval, which happens when
    /// both end-points coincide and at least one side is open.
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    ///
    /// assert!(Interval::open(0, 0).is_empty());
    /// assert!(Interval::closed_open(0, 0).is_empty());
    /// assert!(!Interval::new(0, 0).is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.start == self.end && (self.lower == Open || self.upper == Open)
    }

    /// Returns whether `point` lies within this interval, honouring the
    /// openness of each side.
    pub fn contains_point(&self, point: &T) -> bool {
        self.lower.admits_above(&self.start, point) && self.upper.admits_below(&self.end, point)
    }

    /// Returns whether `other` lies entirely within this interval.
    ///
    /// An interval always contains itself. Otherwise `other.start` and
    /// `other.end` are tested against this interval's sides the same way
    /// points are, so an open side never contains an interval that shares its
    /// end-point.
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    ///
    /// let closed = Interval::new(2, 10);
    /// let open = Interval::open(2, 10);
    ///
    /// assert!(closed.contains(&open));
    /// assert!(!open.contains(&closed));
    /// assert!(open.contains(&open));
    /// assert!(open.contains(&Interval::new(4, 8)));
    /// ```
    pub fn contains(&self, other: &Interval<T>) -> bool {
        if self == other {
            return true;
        }

        self.lower.admits_above(&self.start, &other.start)
            && self.upper.admits_below(&self.end, &other.end)
    }

    /// Returns whether the two intervals share at least one point.
    ///
    /// The relation is symmetric, and an [empty](Interval::is_empty) interval
    /// overlaps nothing.
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    ///
    /// let left = Interval::closed_open(0, 5);
    /// let right = Interval::new(5, 10);
    ///
    /// assert!(!left.overlaps(&right));
    /// assert!(Interval::new(0, 5).overlaps(&right));
    /// assert!(!Interval::open(5, 5).overlaps(&right));
    /// ```
    pub fn overlaps(&self, other: &Interval<T>) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        starts_before_end(&self.start, self.lower, &other.end, other.upper)
            && starts_before_end(&other.start, other.lower, &self.end, self.upper)
    }
}

/// Whether a lower side at `start` lies at or before an upper side at `end`
/// such that a point can satisfy both.
pub(crate) fn starts_before_end<T: Ord>(
    start: &T,
    lower: Boundary,
    end: &T,
    upper: Boundary,
) -> bool {
    match start.cmp(end) {
        Less => true,
        Equal => lower == Closed && upper == Closed,
        Greater => false,
    }
}

impl<T: Ord> Ord for Interval<T> {
    /// Orders by start, then lower boundary (closed first), then end, then
    /// upper boundary (open first).
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.lower.cmp_lower(other.lower))
            .then_with(|| self.end.cmp(&other.end))
            .then_with(|| self.upper.cmp_upper(other.upper))
    }
}

impl<T: Ord> PartialOrd for Interval<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> fmt::Display for Interval<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let open = match self.lower {
            Open => '(',
            Closed => '[',
        };
        let close = match self.upper {
            Open => ')',
            Closed => ']',
        };
        write!(f, "{}{}, {}{}", open, self.start, self.end, close)
    }
}

impl<T> RangeBounds<T> for Interval<T> {
    fn start_bound(&self) -> Bound<&T> {
        self.lower.bound(&self.start)
    }

    fn end_bound(&self) -> Bound<&T> {
        self.upper.bound(&self.end)
    }
}

impl<T: Ord> From<RangeInclusive<T>> for Interval<T> {
    fn from(range: RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        Interval::new(start, end)
    }
}

impl<T: Ord> From<Range<T>> for Interval<T> {
    fn from(range: Range<T>) -> Self {
        Interval::closed_open(range.start, range.end)
    }
}

/// An error returned when parsing an [`Interval`] from its textual form.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseIntervalError {
    #[error("cannot parse interval from empty string")]
    Empty,
    #[error("interval must start with `[` or `(`")]
    MissingLowerBracket,
    #[error("interval must end with `]` or `)`")]
    MissingUpperBracket,
    #[error("interval bounds must be separated by `,`")]
    MissingSeparator,
    #[error("invalid interval bound `{bound}`: {reason}")]
    InvalidBound { bound: String, reason: String },
}

impl<T> FromStr for Interval<T>
where
    T: FromStr + Ord,
    T::Err: fmt::Display,
{
    type Err = ParseIntervalError;

    /// Parses the form produced by [`Display`](fmt::Display), such as
    /// `"[2, 10)"`.
    ///
    /// ```
    /// use bounded_interval_tree::interval::Interval;
    ///
    /// let i: Interval<i32> = "(2, 10]".parse().unwrap();
    /// assert_eq!(i, Interval::open_closed(2, 10));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseIntervalError::Empty);
        }

        let (lower, rest) = if let Some(rest) = s.strip_prefix('[') {
            (Closed, rest)
        } else if let Some(rest) = s.strip_prefix('(') {
            (Open, rest)
        } else {
            return Err(ParseIntervalError::MissingLowerBracket);
        };

        let (upper, rest) = if let Some(rest) = rest.strip_suffix(']') {
            (Closed, rest)
        } else if let Some(rest) = rest.strip_suffix(')') {
            (Open, rest)
        } else {
            return Err(ParseIntervalError::MissingUpperBracket);
        };

        let (start, end) = rest
            .split_once(',')
            .ok_or(ParseIntervalError::MissingSeparator)?;

        Ok(Interval::with_boundaries(
            parse_bound(start)?,
            parse_bound(end)?,
            lower,
            upper,
        ))
    }
}

fn parse_bound<T>(s: &str) -> Result<T, ParseIntervalError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let s = s.trim();
    s.parse().map_err(|e: T::Err| ParseIntervalError::InvalidBound {
        bound: s.to_owned(),
        reason: e.to_string(),
    })
}

/// Wire shape of an [`Interval`]. Deserializing goes through the constructor
/// so reversed end-points get normalized.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawInterval<T> {
    start: T,
    end: T,
    lower: Boundary,
    upper: Boundary,
}

#[cfg(feature = "serde")]
impl<T: Ord> From<RawInterval<T>> for Interval<T> {
    fn from(raw: RawInterval<T>) -> Self {
        Interval::with_boundaries(raw.start, raw.end, raw.lower, raw.upper)
    }
}

#[cfg(feature = "arbitrary")]
mod arbitrary {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for Boundary {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            prop_oneof![Just(Open), Just(Closed)].boxed()
        }
    }

    impl<T> Arbitrary for Interval<T>
    where
        T: Arbitrary + Ord + 'static,
    {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            (
                any::<T>(),
                any::<T>(),
                any::<Boundary>(),
                any::<Boundary>(),
            )
                .prop_map(|(start, end, lower, upper)| {
                    Interval::with_boundaries(start, end, lower, upper)
                })
                .boxed()
        }
    }
}
