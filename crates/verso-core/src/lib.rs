//! Scheme-agnostic version constraint algebra.
//!
//! This crate defines the core types every versioning ecosystem shares:
//! the [`SchemeVersion`] comparator trait, a single interval with
//! open/closed bounds ([`VersionRange`]), and an ordered disjoint union
//! of intervals with full set operations ([`VersionConstraint`]).
//!
//! Nothing here knows how any particular ecosystem spells its versions;
//! the per-ecosystem parsers and comparators live in `verso-schemes`.
//! This crate is intentionally free of regexes, I/O, and shared state.

pub mod constraint;
pub mod error;
pub mod range;
pub mod version;

pub use constraint::VersionConstraint;
pub use error::{VersionError, VersionResult};
pub use range::VersionRange;
pub use version::SchemeVersion;
