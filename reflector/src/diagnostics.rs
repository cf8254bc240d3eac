//! What the compiler says when a type cannot be reflected.
//!
//! Every failure happens at compile time. Nothing can go wrong once a program
//! builds, which is why no reflector API returns a `Result`.
//!
//! # Unions
//!
//! ```compile_fail
//! #[derive(Clone, Copy, reflector::Reflect)]
//! #[repr(C)]
//! union Bits {
//!     int: u32,
//!     float: f32,
//! }
//! ```
//!
//! The derive reports `union types cannot be reflected`. A hand-written
//! description is rejected too, because selecting a union field needs `unsafe`:
//!
//! ```compile_fail,E0133
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! union Bits {
//!     int: u32,
//!     float: f32,
//! }
//!
//! reflector::provide!(Bits { int: u32, float: f32 });
//! ```
//!
//! # Enums
//!
//! ```compile_fail
//! #[derive(Clone, Copy, reflector::Reflect)]
//! #[repr(C)]
//! enum Choice {
//!     Left,
//!     Right,
//! }
//! ```
//!
//! # Types that are not trivial
//!
//! Derived types must be `Copy`; otherwise the compiler reports
//! `reflected type must be trivial`.
//!
//! ```compile_fail,E0277
//! #[derive(reflector::Reflect)]
//! #[repr(C)]
//! struct Counter {
//!     hits: u32,
//! }
//! ```
//!
//! # Unfixed layouts
//!
//! Without `#[repr(C)]` the compiler may reorder fields, so the derive reports
//! `reflected type must be #[repr(C)]`.
//!
//! ```compile_fail
//! #[derive(Clone, Copy, reflector::Reflect)]
//! struct Loose {
//!     a: u8,
//!     b: u64,
//! }
//! ```
//!
//! # Field types that are not members
//!
//! ```compile_fail,E0277
//! #[derive(Clone, Copy, reflector::Reflect)]
//! #[repr(C)]
//! struct Pairing {
//!     pair: (u8, u8),
//! }
//! ```
//!
//! # Descriptions that do not match the layout
//!
//! Listing fields out of order, or leaving one out, fails with
//! `reflection tuple is not compatible with target type`:
//!
//! ```compile_fail,E0080
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! struct Header {
//!     tag: u8,
//!     len: u32,
//! }
//!
//! reflector::provide!(Header { len: u32, tag: u8 });
//! ```
//!
//! ```compile_fail,E0080
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! struct Header {
//!     tag: u8,
//!     len: u32,
//! }
//!
//! reflector::provide!(Header { tag: u8 });
//! ```
//!
//! Declaring the wrong type for a field does not compile either:
//!
//! ```compile_fail,E0308
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! struct Header {
//!     tag: u8,
//!     len: u32,
//! }
//!
//! reflector::provide!(Header { tag: u8, len: i32 });
//! ```
//!
//! Nor does a type the field merely dereferences to:
//!
//! ```compile_fail,E0308
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! struct Holder {
//!     value: &'static u64,
//! }
//!
//! reflector::provide!(Holder { value: u64 });
//! ```
//!
//! The `Header` description with the right types is accepted:
//!
//! ```
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! struct Header {
//!     tag: u8,
//!     len: u32,
//! }
//!
//! reflector::provide!(Header { tag: u8, len: u32 });
//! ```
//!
//! # Types without a description
//!
//! ```compile_fail,E0277
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! struct Opaque {
//!     id: u32,
//! }
//!
//! let mut opaque = Opaque { id: 1 };
//! let _view = reflector::reflect(&mut opaque);
//! ```
//!
//! # Positions past the end
//!
//! ```compile_fail,E0277
//! use reflector::ReflectExt;
//!
//! #[derive(Clone, Copy, reflector::Reflect)]
//! #[repr(C)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! let mut point = Point { x: 0.0, y: 0.0 };
//! let _ = point.reflect().get::<2>();
//! ```
