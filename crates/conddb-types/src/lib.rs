//! Foundation types for the conditions database.
//!
//! Conditions are versioned, time-varying payloads addressed by three
//! coordinates: a revision tag, a hierarchical path, and optionally a point
//! in time. This crate holds the value types shared by every other crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Opaque identifier of an object in the backing store
//! - [`TimePoint`] -- Unsigned tick counter, unit chosen by the caller
//! - [`Iov`] -- Half-open Interval Of Validity `[since, until)`
//! - [`ConditionKey`] -- `(tag, path, time?)` query coordinates

pub mod error;
pub mod iov;
pub mod key;
pub mod object;
pub mod time;

pub use error::TypeError;
pub use iov::Iov;
pub use key::ConditionKey;
pub use object::ObjectId;
pub use time::{TimePoint, TimeUnit};
