#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod parsed;
pub use parsed::*;

mod counter;
pub use counter::*;

mod registry;
pub use registry::*;

mod process_struct;

mod derive;
pub use derive::*;
