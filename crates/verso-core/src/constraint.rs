//! Disjoint unions of version ranges with full set algebra.

use std::cmp::Ordering;
use std::fmt;

use crate::range::VersionRange;
use crate::version::SchemeVersion;

/// A set of admissible versions, kept as an ordered list of pairwise
/// disjoint, non-adjacent ranges.
///
/// Constraints are normalised on construction: empty ranges are dropped,
/// the rest are sorted by lower endpoint and overlapping or adjacent
/// neighbours are folded together. The empty constraint (no ranges) and
/// the `any` constraint (one unbounded range) are the two canonical
/// extremes.
///
/// The `weak` flag marks a preferred-but-not-enforced constraint. It is
/// carried through copies but never influences the set semantics, and
/// every algebra result clears it.
#[derive(Debug, Clone)]
pub struct VersionConstraint<V> {
    ranges: Vec<VersionRange<V>>,
    weak: bool,
}

impl<V: SchemeVersion> VersionConstraint<V> {
    /// The constraint admitting no versions.
    pub fn empty() -> Self {
        Self {
            ranges: Vec::new(),
            weak: false,
        }
    }

    /// The constraint admitting every version.
    pub fn any() -> Self {
        Self {
            ranges: vec![VersionRange::any()],
            weak: false,
        }
    }

    /// Build a normalised constraint from arbitrary ranges.
    pub fn new(ranges: Vec<VersionRange<V>>) -> Self {
        Self {
            ranges: normalize(ranges),
            weak: false,
        }
    }

    /// Build a normalised *weak* constraint from arbitrary ranges.
    pub fn weak(ranges: Vec<VersionRange<V>>) -> Self {
        Self {
            ranges: normalize(ranges),
            weak: true,
        }
    }

    /// The ranges, sorted by lower endpoint, pairwise disjoint and
    /// non-adjacent.
    pub fn ranges(&self) -> &[VersionRange<V>] {
        &self.ranges
    }

    /// Whether no version satisfies this constraint.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether this constraint is preferred but not enforced.
    pub fn is_weak(&self) -> bool {
        self.weak
    }

    /// Whether the given version satisfies this constraint.
    pub fn allows(&self, version: &V) -> bool {
        self.ranges.iter().any(|r| r.contains(version))
    }

    /// Whether every version admitted by `other` is admitted by `self`.
    ///
    /// Because both range lists are canonical, each range of `other` must
    /// be enclosed by a single range of `self`, and the candidate index
    /// only ever moves forward.
    pub fn allows_all(&self, other: &Self) -> bool {
        let mut i = 0;
        for theirs in &other.ranges {
            while i + 1 < self.ranges.len()
                && self.ranges[i + 1].cmp_lower(theirs) != Ordering::Greater
            {
                i += 1;
            }
            match self.ranges.get(i) {
                Some(ours) if ours.encloses(theirs) => {}
                _ => return false,
            }
        }
        true
    }

    /// Whether some version is admitted by both constraints.
    pub fn allows_any(&self, other: &Self) -> bool {
        let mut i = 0;
        let mut j = 0;
        while let (Some(ours), Some(theirs)) = (self.ranges.get(i), other.ranges.get(j)) {
            if ours.intersect(theirs).is_some() {
                return true;
            }
            if ours.cmp_upper(theirs) == Ordering::Less {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }

    /// The set intersection of two constraints.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let mut i = 0;
        let mut j = 0;
        while let (Some(ours), Some(theirs)) = (self.ranges.get(i), other.ranges.get(j)) {
            if let Some(common) = ours.intersect(theirs) {
                out.push(common);
            }
            // The range that ends first cannot overlap anything further.
            if ours.cmp_upper(theirs) == Ordering::Less {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self {
            ranges: out,
            weak: false,
        }
    }

    /// The set union of two constraints.
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = Vec::with_capacity(self.ranges.len() + other.ranges.len());
        merged.extend(self.ranges.iter().cloned());
        merged.extend(other.ranges.iter().cloned());
        Self {
            ranges: normalize(merged),
            weak: false,
        }
    }

    /// The complement: every version not admitted by this constraint.
    ///
    /// Scans the canonical range list and emits the gaps, flipping
    /// inclusivity at each boundary.
    pub fn complement(&self) -> Self {
        let Some(first) = self.ranges.first() else {
            return Self::any();
        };
        let mut out = Vec::with_capacity(self.ranges.len() + 1);
        if let Some(lo) = first.min() {
            out.push(VersionRange::upper(lo.clone(), !first.min_included()));
        }
        for pair in self.ranges.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if let (Some(hi), Some(lo)) = (prev.max(), next.min()) {
                out.push(VersionRange::between(
                    hi.clone(),
                    !prev.max_included(),
                    lo.clone(),
                    !next.min_included(),
                ));
            }
        }
        if let Some(last) = self.ranges.last() {
            if let Some(hi) = last.max() {
                out.push(VersionRange::lower(hi.clone(), !last.max_included()));
            }
        }
        Self {
            ranges: out,
            weak: false,
        }
    }
}

impl<V: SchemeVersion> From<VersionRange<V>> for VersionConstraint<V> {
    fn from(range: VersionRange<V>) -> Self {
        Self::new(vec![range])
    }
}

/// Canonicalise a range list: drop empties, sort by lower endpoint, fold
/// every overlapping or adjacent pair into one range.
fn normalize<V: SchemeVersion>(mut ranges: Vec<VersionRange<V>>) -> Vec<VersionRange<V>> {
    ranges.retain(|r| !r.is_empty());
    ranges.sort_by(|a, b| a.cmp_lower(b).then_with(|| a.cmp_upper(b)));
    let mut out: Vec<VersionRange<V>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        if let Some(prev) = out.last_mut() {
            if let Some(folded) = prev.union(&range) {
                *prev = folded;
                continue;
            }
        }
        out.push(range);
    }
    out
}

impl<V: SchemeVersion> PartialEq for VersionConstraint<V> {
    /// Set equality: same canonical range list. The weak flag carries no
    /// set meaning and is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
    }
}

impl<V: SchemeVersion> fmt::Display for VersionConstraint<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for range in &self.ranges {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
            first = false;
        }
        Ok(())
    }
}
