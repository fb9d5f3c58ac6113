//! Foundation types for gog.
//!
//! Every other gog crate depends on `gog-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (SHA-1 of the framed object)
//! - [`ObjectKind`] -- The four object kinds known to the object database

pub mod error;
pub mod kind;
pub mod object;

pub use error::TypeError;
pub use kind::ObjectKind;
pub use object::ObjectId;
