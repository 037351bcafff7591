use std::cmp::Ordering;
use std::fmt;

/// A version belonging to some versioning scheme.
///
/// The range and constraint algebra needs exactly three things from a
/// version: its verbatim input string (for display), whether it is a
/// pre-release, and a total order within its scheme. Each ecosystem in
/// `verso-schemes` supplies its own implementation.
///
/// The algebra is generic over the implementing type, so versions of
/// different schemes can never meet in a comparison: mixing them is a
/// type error, not a runtime failure.
///
/// `compare` is deliberately not `Ord`. SemVer's precedence ignores
/// build metadata while its equality does not, so `compare` may return
/// `Equal` for versions that are not `==`. Schemes whose equality does
/// follow the comparator also implement `Ord` directly.
pub trait SchemeVersion: Clone + fmt::Display {
    /// The version string exactly as it was given to the parser.
    fn original(&self) -> &str;

    /// Whether this version marks a not-yet-final release.
    fn is_pre_release(&self) -> bool;

    /// The scheme's total order.
    fn compare(&self, other: &Self) -> Ordering;
}
