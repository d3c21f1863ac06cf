//! Named entry points into conditions history.
//!
//! Revision specifiers like `main`, `v1.0.0` or `HEAD` are looked up here
//! before the backend falls back to object id prefixes. Branches move,
//! tags are written once, and HEAD names a branch or is detached.

pub mod error;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use memory::InMemoryRefStore;
pub use names::{validate_branch_name, validate_tag_name};
pub use traits::RefStore;
pub use types::{Head, Ref};
