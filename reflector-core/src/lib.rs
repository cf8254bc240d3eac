#![no_std]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

/// Maximum number of entries a reflected type may expose, after array flattening.
pub const MAX_FIELDS: usize = 64;

/// Longest array for which [`Member`] is implemented.
///
/// Equal to [`MAX_FIELDS`]: a longer array could never fit in a field list.
pub const MAX_ARRAY_LEN: usize = 64;

// Type-level lists for field types and field references
mod hlist;
pub use hlist::*;

// Storage cells and the layout engine
mod cell;
pub use cell::*;

// Types that can sit in a field slot
mod member;
pub use member::*;

// Descriptors and their validation
mod descriptor;
pub use descriptor::*;

// Generic iteration over reflected fields
mod visit;
pub use visit::*;

// The manual provider
mod provide;
