//! C ABI conformance fixture.
//!
//! Exposes a fixed table of `extern "C"` entry points, each exercising one
//! memory-layout pattern a foreign caller must marshal: scalars of every
//! width, counted arrays, matrices in contiguous and row-pointer layouts,
//! heap blocks the caller releases, C strings, and structs that mix
//! copied fields with pointers into caller memory.
//!
//! There is no error channel. Bounds, ownership, and encoding mistakes on
//! the caller's side are undefined behaviour by contract; the fixture's
//! job is to let the caller observe them, not to mask them.
//!
//! This is the only crate in the workspace that contains `unsafe` code.
//! Every entry point that dereferences caller memory opts in with
//! `#[allow(unsafe_code)]` and states its pointer contract.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod composite;
pub mod echo;
pub mod heap;
pub mod layout;
pub mod matrix;
mod raw;
pub mod record;
pub mod types;

pub use composite::{ComplexPassing, ComplexStruct};
pub use layout::{FieldDescriptor, MarshalFieldInfo};
pub use record::{FixedArray, PassingData, SimpleStruct};
pub use types::{Borrowed, MarshalOwnership, MarshalStructKind};
