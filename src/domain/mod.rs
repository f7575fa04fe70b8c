//! Domain types - plain values shared by resolution and packaging

pub mod branch;
pub mod context;
pub mod tag;
pub mod version;

pub use branch::Branch;
pub use context::{ReleaseContext, ReleaseStamp};
pub use tag::Tag;
pub use version::{Provenance, ResolvedVersion};
