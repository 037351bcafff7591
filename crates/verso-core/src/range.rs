//! A single version interval with open or closed endpoints.

use std::cmp::Ordering;
use std::fmt;

use crate::version::SchemeVersion;

/// A contiguous interval of versions, either endpoint optional.
///
/// An absent endpoint means the range is unbounded on that side. The
/// denoted set is `{v : lower bound satisfied and upper bound satisfied}`
/// where an absent bound is always satisfied.
///
/// Ranges render in bracket notation: `[1.0,2.0)`, `(,2.0)` for an
/// unbounded lower side, `[1.5]` for a single version, `(,)` for the
/// unbounded range.
#[derive(Debug, Clone)]
pub struct VersionRange<V> {
    min: Option<V>,
    max: Option<V>,
    min_included: bool,
    max_included: bool,
}

impl<V: SchemeVersion> VersionRange<V> {
    /// Build a range from optional endpoints and their inclusivity.
    ///
    /// An absent endpoint forces its flag to `false` so that equivalent
    /// ranges always compare and render identically.
    pub fn new(min: Option<V>, min_included: bool, max: Option<V>, max_included: bool) -> Self {
        let min_included = min.is_some() && min_included;
        let max_included = max.is_some() && max_included;
        Self {
            min,
            max,
            min_included,
            max_included,
        }
    }

    /// The unbounded range `(,)`.
    pub fn any() -> Self {
        Self::new(None, false, None, false)
    }

    /// The single-point range `[v]`.
    pub fn exactly(version: V) -> Self {
        Self::new(Some(version.clone()), true, Some(version), true)
    }

    /// The range `[v,)`.
    pub fn at_least(version: V) -> Self {
        Self::lower(version, true)
    }

    /// A range bounded only from below.
    pub fn lower(version: V, included: bool) -> Self {
        Self::new(Some(version), included, None, false)
    }

    /// A range bounded only from above.
    pub fn upper(version: V, included: bool) -> Self {
        Self::new(None, false, Some(version), included)
    }

    /// A range with both endpoints present.
    pub fn between(min: V, min_included: bool, max: V, max_included: bool) -> Self {
        Self::new(Some(min), min_included, Some(max), max_included)
    }

    pub fn min(&self) -> Option<&V> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&V> {
        self.max.as_ref()
    }

    pub fn min_included(&self) -> bool {
        self.min_included
    }

    pub fn max_included(&self) -> bool {
        self.max_included
    }

    /// Whether the range has no bound on either side.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether the range denotes no versions at all.
    ///
    /// Empty ranges are never parsed; they arise from constructing a
    /// range whose lower endpoint exceeds its upper, or a point with an
    /// exclusive side.
    pub fn is_empty(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(lo), Some(hi)) => match lo.compare(hi) {
                Ordering::Greater => true,
                Ordering::Equal => !(self.min_included && self.max_included),
                Ordering::Less => false,
            },
            _ => false,
        }
    }

    /// Whether the range admits exactly one version.
    pub fn is_single_point(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(lo), Some(hi)) => {
                self.min_included && self.max_included && lo.compare(hi) == Ordering::Equal
            }
            _ => false,
        }
    }

    /// Check whether a version falls inside this range.
    pub fn contains(&self, version: &V) -> bool {
        if let Some(ref lo) = self.min {
            let cmp = version.compare(lo);
            if self.min_included {
                if cmp == Ordering::Less {
                    return false;
                }
            } else if cmp != Ordering::Greater {
                return false;
            }
        }
        if let Some(ref hi) = self.max {
            let cmp = version.compare(hi);
            if self.max_included {
                if cmp == Ordering::Greater {
                    return false;
                }
            } else if cmp != Ordering::Less {
                return false;
            }
        }
        true
    }

    /// Intersect two ranges.
    ///
    /// Takes the greater lower endpoint and the lesser upper endpoint,
    /// with exclusivity winning ties. Returns `None` when the ranges do
    /// not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let (min, min_included) = if self.cmp_lower(other) == Ordering::Less {
            (other.min.clone(), other.min_included)
        } else {
            (self.min.clone(), self.min_included)
        };
        let (max, max_included) = if self.cmp_upper(other) == Ordering::Greater {
            (other.max.clone(), other.max_included)
        } else {
            (self.max.clone(), self.max_included)
        };
        let result = Self::new(min, min_included, max, max_included);
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// Whether the two ranges overlap or touch with an inclusive endpoint,
    /// so that their union is again a single interval.
    pub fn can_union(&self, other: &Self) -> bool {
        !self.gap_before(other) && !other.gap_before(self)
    }

    /// Union two ranges into one interval.
    ///
    /// Takes the lesser lower endpoint and the greater upper endpoint,
    /// with inclusivity winning ties. Returns `None` when the ranges are
    /// neither overlapping nor adjacent; the constraint layer keeps such
    /// ranges apart.
    pub fn union(&self, other: &Self) -> Option<Self> {
        if !self.can_union(other) {
            return None;
        }
        let (min, min_included) = if self.cmp_lower(other) == Ordering::Greater {
            (other.min.clone(), other.min_included)
        } else {
            (self.min.clone(), self.min_included)
        };
        let (max, max_included) = if self.cmp_upper(other) == Ordering::Less {
            (other.max.clone(), other.max_included)
        } else {
            (self.max.clone(), self.max_included)
        };
        Some(Self::new(min, min_included, max, max_included))
    }

    /// Whether `self` lies entirely below `other` with a real gap in
    /// between, i.e. no version is in both and none sits exactly on the
    /// shared boundary.
    fn gap_before(&self, other: &Self) -> bool {
        let (Some(hi), Some(lo)) = (&self.max, &other.min) else {
            return false;
        };
        match hi.compare(lo) {
            Ordering::Less => true,
            Ordering::Equal => !self.max_included && !other.min_included,
            Ordering::Greater => false,
        }
    }

    /// Order two ranges by their lower endpoint.
    ///
    /// An absent lower endpoint sorts below any concrete bound; on equal
    /// versions the inclusive bound sorts first (it starts earlier).
    pub(crate) fn cmp_lower(&self, other: &Self) -> Ordering {
        match (&self.min, &other.min) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a
                .compare(b)
                .then_with(|| match (self.min_included, other.min_included) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                }),
        }
    }

    /// Order two ranges by their upper endpoint.
    ///
    /// An absent upper endpoint sorts above any concrete bound; on equal
    /// versions the exclusive bound sorts first (it ends earlier).
    pub(crate) fn cmp_upper(&self, other: &Self) -> Ordering {
        match (&self.max, &other.max) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a
                .compare(b)
                .then_with(|| match (self.max_included, other.max_included) {
                    (false, true) => Ordering::Less,
                    (true, false) => Ordering::Greater,
                    _ => Ordering::Equal,
                }),
        }
    }

    /// Whether every version in `other` is also in `self`.
    pub(crate) fn encloses(&self, other: &Self) -> bool {
        self.cmp_lower(other) != Ordering::Greater && self.cmp_upper(other) != Ordering::Less
    }
}

impl<V: SchemeVersion> PartialEq for VersionRange<V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_lower(other) == Ordering::Equal && self.cmp_upper(other) == Ordering::Equal
    }
}

impl<V: SchemeVersion> fmt::Display for VersionRange<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_point() {
            if let Some(point) = &self.min {
                return write!(f, "[{}]", point.original());
            }
        }
        let open = if self.min_included { '[' } else { '(' };
        let close = if self.max_included { ']' } else { ')' };
        let lo = self.min.as_ref().map(V::original).unwrap_or_default();
        let hi = self.max.as_ref().map(V::original).unwrap_or_default();
        write!(f, "{open}{lo},{hi}{close}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal scheme for exercising the algebra: a bare revision number.
    #[derive(Debug, Clone)]
    struct Rev(u32, String);

    impl Rev {
        fn new(n: u32) -> Self {
            Self(n, n.to_string())
        }
    }

    impl fmt::Display for Rev {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.1)
        }
    }

    impl SchemeVersion for Rev {
        fn original(&self) -> &str {
            &self.1
        }

        fn is_pre_release(&self) -> bool {
            false
        }

        fn compare(&self, other: &Self) -> Ordering {
            self.0.cmp(&other.0)
        }
    }

    fn between(lo: u32, lo_incl: bool, hi: u32, hi_incl: bool) -> VersionRange<Rev> {
        VersionRange::between(Rev::new(lo), lo_incl, Rev::new(hi), hi_incl)
    }

    #[test]
    fn contains_respects_inclusivity() {
        let range = between(1, true, 5, false);
        assert!(range.contains(&Rev::new(1)));
        assert!(range.contains(&Rev::new(4)));
        assert!(!range.contains(&Rev::new(5)));
        assert!(!range.contains(&Rev::new(0)));
    }

    #[test]
    fn contains_with_absent_endpoints() {
        let any = VersionRange::<Rev>::any();
        assert!(any.contains(&Rev::new(0)));
        assert!(any.contains(&Rev::new(1000)));

        let upper = VersionRange::upper(Rev::new(3), false);
        assert!(upper.contains(&Rev::new(2)));
        assert!(!upper.contains(&Rev::new(3)));
    }

    #[test]
    fn intersect_overlapping() {
        let a = between(1, true, 5, false);
        let b = between(3, true, 8, true);
        let both = a.intersect(&b).unwrap();
        assert_eq!(both, between(3, true, 5, false));
    }

    #[test]
    fn intersect_exclusive_wins_ties() {
        let a = between(1, true, 5, true);
        let b = between(1, false, 5, false);
        let both = a.intersect(&b).unwrap();
        assert_eq!(both, between(1, false, 5, false));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = between(1, true, 2, true);
        let b = between(3, true, 4, true);
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn intersect_touching_exclusive_is_none() {
        let a = between(1, true, 3, false);
        let b = between(3, false, 5, true);
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn intersect_single_shared_point() {
        let a = between(1, true, 3, true);
        let b = between(3, true, 5, true);
        let point = a.intersect(&b).unwrap();
        assert!(point.is_single_point());
    }

    #[test]
    fn union_adjacent() {
        let a = between(1, true, 3, false);
        let b = between(3, true, 5, true);
        assert!(a.can_union(&b));
        assert_eq!(a.union(&b).unwrap(), between(1, true, 5, true));
    }

    #[test]
    fn union_rejects_gap() {
        let a = between(1, true, 3, false);
        let b = between(3, false, 5, true);
        assert!(!a.can_union(&b));
        assert!(a.union(&b).is_none());

        let c = between(4, true, 5, true);
        assert!(!a.can_union(&c));
    }

    #[test]
    fn union_inclusive_wins_ties() {
        let a = between(1, false, 5, false);
        let b = between(1, true, 5, true);
        assert_eq!(a.union(&b).unwrap(), between(1, true, 5, true));
    }

    #[test]
    fn empty_when_bounds_cross() {
        let crossed = between(5, true, 1, true);
        assert!(crossed.is_empty());
        let half_open_point = between(2, true, 2, false);
        assert!(half_open_point.is_empty());
        assert!(!between(2, true, 2, true).is_empty());
    }

    #[test]
    fn display_forms() {
        assert_eq!(between(1, true, 2, false).to_string(), "[1,2)");
        assert_eq!(between(1, false, 2, true).to_string(), "(1,2]");
        assert_eq!(VersionRange::upper(Rev::new(2), false).to_string(), "(,2)");
        assert_eq!(VersionRange::at_least(Rev::new(1)).to_string(), "[1,)");
        assert_eq!(VersionRange::<Rev>::any().to_string(), "(,)");
        assert_eq!(VersionRange::exactly(Rev::new(7)).to_string(), "[7]");
    }
}
