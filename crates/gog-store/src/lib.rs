//! Object model and codecs for gog.
//!
//! This crate turns typed objects into the bytes of a git-style loose object
//! database and back. It does no file I/O of its own; `gog-repo` decides where
//! the bytes live.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw content, serialized as-is
//! - [`Commit`] -- commit metadata, serialized through the [`Kvlm`] codec
//!
//! `tree` and `tag` are recognized kinds without an implementation.
//!
//! # Encoding
//!
//! [`LooseCodec`] frames a payload as `"<kind> <len>\0<payload>"`, addresses it
//! by the SHA-1 of those bytes and zlib-compresses it for storage.

pub mod codec;
pub mod error;
pub mod kvlm;
pub mod object;

pub use codec::{EncodedObject, LooseCodec};
pub use error::{StoreError, StoreResult};
pub use kvlm::Kvlm;
pub use object::{Blob, Commit, Object, StoredObject};
