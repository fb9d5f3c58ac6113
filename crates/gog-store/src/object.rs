use gog_types::{ObjectId, ObjectKind};

use crate::error::{StoreError, StoreResult};
use crate::kvlm::Kvlm;

/// A stored object: kind tag + serialized payload.
///
/// `StoredObject` is the unit handed between the object model and the codec.
/// Its address is the SHA-1 of [`StoredObject::to_bytes`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The serialized payload.
    pub data: Vec<u8>,
}

impl StoredObject {
    /// Create a new stored object from kind and payload.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// The `"<kind> <len>\0"` header.
    pub fn header(&self) -> Vec<u8> {
        format!("{} {}\0", self.kind, self.data.len()).into_bytes()
    }

    /// Header followed by payload: the exact bytes that are hashed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header();
        out.extend_from_slice(&self.data);
        out
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ObjectId {
        ObjectId::hash(&self.to_bytes())
    }

    fn expect_kind(&self, expected: ObjectKind) -> StoreResult<()> {
        if self.kind != expected {
            return Err(StoreError::KindMismatch {
                expected,
                actual: self.kind.to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Blob)?;
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// Commit object: a KVLM header block plus message.
///
/// Only the encoding is modelled; nothing here walks the commit graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Commit {
    pub kvlm: Kvlm,
}

impl Commit {
    /// Wrap a parsed KVLM.
    pub fn new(kvlm: Kvlm) -> Self {
        Self { kvlm }
    }

    /// The `tree` header, if present.
    pub fn tree(&self) -> Option<&str> {
        self.kvlm.get("tree")
    }

    /// All `parent` headers in order.
    pub fn parents(&self) -> Vec<&str> {
        self.kvlm.get_all("parent")
    }

    /// The `author` header, if present.
    pub fn author(&self) -> Option<&str> {
        self.kvlm.get("author")
    }

    /// The `committer` header, if present.
    pub fn committer(&self) -> Option<&str> {
        self.kvlm.get("committer")
    }

    /// The commit message.
    pub fn message(&self) -> &str {
        self.kvlm.message()
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Commit, self.kvlm.serialize())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Commit)?;
        Ok(Self {
            kvlm: Kvlm::parse(&obj.data)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// Any object the store knows how to build.
///
/// `tree` and `tag` are valid kinds on disk but have no implementation; asking
/// for one fails with [`StoreError::UnsupportedKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Commit(Commit),
}

impl Object {
    /// The kind written into this object's header.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Commit(_) => ObjectKind::Commit,
        }
    }

    /// The serialized payload (no header).
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Self::Blob(blob) => blob.data.clone(),
            Self::Commit(commit) => commit.kvlm.serialize(),
        }
    }

    /// Build an object of `kind` from its payload.
    pub fn deserialize(kind: ObjectKind, data: Vec<u8>) -> StoreResult<Self> {
        match kind {
            ObjectKind::Blob => Ok(Self::Blob(Blob::new(data))),
            ObjectKind::Commit => Ok(Self::Commit(Commit::new(Kvlm::parse(&data)?))),
            ObjectKind::Tree | ObjectKind::Tag => Err(StoreError::UnsupportedKind(kind)),
        }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        match self {
            Self::Blob(blob) => blob.to_stored_object(),
            Self::Commit(commit) => commit.to_stored_object(),
        }
    }

    /// Decode from a `StoredObject`, dispatching on its kind.
    pub fn from_stored_object(obj: StoredObject) -> StoreResult<Self> {
        Self::deserialize(obj.kind, obj.data)
    }

    /// Content-addressed ID of this object.
    pub fn id(&self) -> ObjectId {
        self.to_stored_object().compute_id()
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Self::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            Self::Commit(commit) => Some(commit),
            _ => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Self::Commit(commit)
    }
}
