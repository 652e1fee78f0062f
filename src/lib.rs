//! Release Deprecation
//!
//! Marks functions and constructors as deprecated. Every call of a marked
//! target logs a notice naming the release it was deprecated in, an optional
//! replacement and the release in which it may be removed.
//!
//! # Features
//!
//! - **Ordered Releases**: removal targets are computed by offset into the
//!   known release sequence
//! - **Function Wrapping**: wrapped callables keep their argument and return types
//! - **Constructor Wrapping**: one notice per constructed instance
//! - **Pluggable Logging**: notices go to `tracing` by default, or any [`NoticeSink`]
//! - **Manifests**: declare deprecations in YAML and validate them up front
//!
//! # Example
//!
//! ```
//! use release_deprecation::{Function, Marker};
//!
//! let d = Marker::new("icehouse")
//!     .remove_in(0)
//!     .apply(Function::new("d", || ()))
//!     .unwrap();
//!
//! assert_eq!(
//!     d.notice().message,
//!     "d() is deprecated as of ICEHOUSE. It will not be superseded."
//! );
//! d.call(());
//! ```
//!
//! # Example Manifest
//!
//! ```yaml
//! deprecations:
//!   - target: get_user
//!     kind: function
//!     as_of: ICEHOUSE
//!     in_favor_of: "fetch_user()"
//! ```

pub mod config;
pub mod deprecated;
pub mod error;
pub mod releases;
pub mod sink;
pub mod target;

pub use config::DeprecationConfig;
pub use deprecated::{Deprecated, DeprecationNotice, Marker, ReleaseRef};
pub use error::{DeprecationError, Result};
pub use releases::Release;
pub use sink::{default_sink, NoticeSink, Translate, TracingSink};
pub use target::{Constructor, DeclaredTarget, Deprecatable, Function, Invoke, TargetKind};
