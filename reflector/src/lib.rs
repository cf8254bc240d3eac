#![no_std]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

// derived impls name `::reflector`
extern crate self as reflector;

pub use reflector_core::*;
pub use reflector_view::*;

pub use reflector_core::Reflect;

#[cfg(feature = "derive")]
#[doc = include_str!("derive_reflect.md")]
pub use reflector_macros::Reflect;

pub mod diagnostics;
