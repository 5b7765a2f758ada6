//! State module for tracking monitor progress
//!
//! # Components
//!
//! - `SeenIds`: bounded, insertion-ordered set of listing IDs already handled

mod seen_ids;

pub use seen_ids::SeenIds;
