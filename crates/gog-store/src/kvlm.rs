//! Key-value list with message ("KVLM"), the text format of commit objects.
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  <continuation lines start with a single space>
//!  -----END PGP SIGNATURE-----
//!
//! free-text message
//! ```
//!
//! Headers keep their original order and a key may repeat (merge commits carry
//! several `parent` lines). A newline followed by a space folds a multi-line
//! value. A blank line separates the headers from the message.

use std::collections::HashSet;

use crate::error::{StoreError, StoreResult};

/// Parsed key-value list with a trailing message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Kvlm {
    /// Header entries in insertion order. Keys may repeat.
    entries: Vec<(String, String)>,
    /// The free-text message (the entry under the empty key).
    message: String,
}

impl Kvlm {
    /// Create an empty KVLM with no headers and an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`.
    ///
    /// The empty key is reserved for the message, so `insert("", m)` replaces
    /// the message instead of adding a header. Keys containing a space or a
    /// newline cannot be written back unambiguously and are rejected, with the
    /// offset of the offending byte within the key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> StoreResult<()> {
        let key = key.into();
        if key.is_empty() {
            self.message = value.into();
            return Ok(());
        }
        if let Some(offset) = key.bytes().position(|b| b == b' ' || b == b'\n') {
            return Err(malformed(offset, "key contains a space or newline"));
        }
        self.entries.push((key, value.into()));
        Ok(())
    }

    /// Builder form of [`Kvlm::insert`].
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> StoreResult<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Replace the message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// The free-text message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// First value stored under `key`. The empty key yields the message.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return Some(&self.message);
        }
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        if key.is_empty() {
            return vec![&self.message];
        }
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Distinct header keys in order of first appearance.
    pub fn keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries()
            .map(|(k, _)| k)
            .filter(|k| seen.insert(*k))
            .collect()
    }

    /// Header entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of header entries (the message is not counted).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no header entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse raw KVLM bytes.
    pub fn parse(raw: &[u8]) -> StoreResult<Self> {
        let mut kvlm = Self::new();
        let mut cursor = 0;

        loop {
            let rest = &raw[cursor..];
            let space = find_byte(rest, b' ');
            let newline = find_byte(rest, b'\n');

            let space = match (space, newline) {
                (Some(sp), Some(nl)) if sp < nl => sp,
                (Some(sp), None) => sp,
                // No space before the next newline: this must be the blank
                // separator line, and everything after it is the message.
                (_, nl) => {
                    if nl != Some(0) {
                        return Err(malformed(cursor, "expected blank line before message"));
                    }
                    kvlm.message = utf8(&rest[1..], cursor + 1)?.to_string();
                    return Ok(kvlm);
                }
            };

            if space == 0 {
                return Err(malformed(cursor, "empty key"));
            }

            // The value ends at the first newline that does not start a
            // continuation line.
            let mut search = space + 1;
            let end = loop {
                let nl = match find_byte(&rest[search..], b'\n') {
                    Some(offset) => search + offset,
                    None => return Err(malformed(cursor + search, "unterminated value")),
                };
                if rest.get(nl + 1) == Some(&b' ') {
                    search = nl + 1;
                } else {
                    break nl;
                }
            };

            let key = utf8(&rest[..space], cursor)?;
            let value = utf8(&rest[space + 1..end], cursor + space + 1)?.replace("\n ", "\n");
            kvlm.entries.push((key.to_string(), value));

            cursor += end + 1;
        }
    }

    /// Serialize back to raw bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            out.extend_from_slice(key.as_bytes());
            out.push(b' ');
            out.extend_from_slice(value.replace('\n', "\n ").as_bytes());
            out.push(b'\n');
        }
        out.push(b'\n');
        out.extend_from_slice(self.message.as_bytes());
        out
    }
}

fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

fn utf8(bytes: &[u8], offset: usize) -> StoreResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| malformed(offset + e.valid_up_to(), "invalid utf-8"))
}

fn malformed(offset: usize, reason: &str) -> StoreError {
    StoreError::MalformedKvlm {
        offset,
        reason: reason.to_string(),
    }
}
