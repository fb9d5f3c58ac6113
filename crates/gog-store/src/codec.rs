//! Loose object encoding.
//!
//! On-disk format of a single object file:
//! ```text
//! zlib( "<kind>" SP "<decimal length>" NUL <payload> )
//! ```
//! The address is the SHA-1 of the bytes *before* compression, so it does not
//! depend on the compression level or library.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use gog_types::{ObjectId, ObjectKind};

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// An object ready to be written: its address and compressed bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedObject {
    pub id: ObjectId,
    pub compressed: Vec<u8>,
}

/// Codec for loose object files.
pub struct LooseCodec;

impl LooseCodec {
    /// Frame, hash and compress an object.
    pub fn encode(obj: &StoredObject) -> StoreResult<EncodedObject> {
        let framed = obj.to_bytes();
        let id = ObjectId::hash(&framed);
        let compressed = compress(&framed)?;
        Ok(EncodedObject { id, compressed })
    }

    /// Decompress and unframe an object, checking it is of `expected` kind.
    pub fn decode(compressed: &[u8], expected: ObjectKind) -> StoreResult<StoredObject> {
        let framed = decompress(compressed)?;
        Self::unframe(&framed, expected)
    }

    /// Split uncompressed `"<kind> <len>\0<payload>"` bytes.
    ///
    /// Checks run in header order: the kind is compared before the length is
    /// even looked at, so a wrong guess at the kind is reported as such.
    pub fn unframe(framed: &[u8], expected: ObjectKind) -> StoreResult<StoredObject> {
        let header_end = framed.iter().position(|&b| b == 0);
        let header = &framed[..header_end.unwrap_or(framed.len())];

        let space = header
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| StoreError::MalformedHeader("missing space after object type".into()))?;

        let kind = &header[..space];
        if kind != expected.as_str().as_bytes() {
            return Err(StoreError::KindMismatch {
                expected,
                actual: String::from_utf8_lossy(kind).into_owned(),
            });
        }

        let header_end = header_end
            .ok_or_else(|| StoreError::MalformedHeader("missing NUL after object length".into()))?;

        let declared = parse_length(&header[space + 1..])?;
        let data = &framed[header_end + 1..];
        if declared != data.len() {
            return Err(StoreError::LengthMismatch {
                declared,
                actual: data.len(),
            });
        }

        Ok(StoredObject::new(expected, data.to_vec()))
    }
}

fn parse_length(digits: &[u8]) -> StoreResult<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(StoreError::MalformedHeader(format!(
            "invalid object length {:?}",
            String::from_utf8_lossy(digits)
        )));
    }
    // Only ASCII digits remain, so the sole failure mode is overflow.
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| StoreError::MalformedHeader("object length overflows".into()))
}

fn compress(data: &[u8]) -> StoreResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn decompress(data: &[u8]) -> StoreResult<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(StoreError::Decompress)?;
    Ok(out)
}
