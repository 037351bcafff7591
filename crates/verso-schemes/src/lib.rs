//! Ecosystem version parsers and comparators for verso.
//!
//! Each module covers one versioning ecosystem: its version grammar, its
//! total order, and its constraint syntax rewritten into the interval
//! algebra of `verso-core`. The ecosystems share the number/text
//! component tokeniser in [`component`] and the Ivy bracket notation in
//! the Maven-family constraint grammars.
//!
//! Everything here is pure string processing; the only process-wide
//! state is the lazily probed Java runtime version.

pub mod calver;
pub mod component;
pub mod gem;
pub mod gradle;
mod ivy;
pub mod java;
pub mod maven;
pub mod npm;
pub mod semver;

pub use calver::{CalendarComponent, CalendarVersion, CalendarVersionScheme, ComponentCategory};
pub use component::Component;
pub use gem::GemVersion;
pub use gradle::GradleVersion;
pub use java::JavaVersion;
pub use maven::MavenVersion;
pub use semver::SemanticVersion;

pub use verso_core::{SchemeVersion, VersionConstraint, VersionError, VersionRange, VersionResult};
