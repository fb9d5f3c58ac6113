use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of object stored in the object database.
///
/// The name is part of every object's header and therefore of its address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Raw content (file contents, arbitrary data).
    Blob,
    /// Commit metadata encoded as a key-value list with message.
    Commit,
    /// Directory listing.
    Tree,
    /// Annotated tag.
    Tag,
}

impl ObjectKind {
    /// All kinds, in header-name order.
    pub const ALL: [ObjectKind; 4] = [Self::Blob, Self::Commit, Self::Tree, Self::Tag];

    /// The header name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Commit => "commit",
            Self::Tree => "tree",
            Self::Tag => "tag",
        }
    }

    /// Parse a header name. Returns `None` for names that are not object kinds.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"blob" => Some(Self::Blob),
            b"commit" => Some(Self::Commit),
            b"tree" => Some(Self::Tree),
            b"tag" => Some(Self::Tag),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_header_names() {
        assert_eq!(format!("{}", ObjectKind::Blob), "blob");
        assert_eq!(format!("{}", ObjectKind::Commit), "commit");
        assert_eq!(format!("{}", ObjectKind::Tree), "tree");
        assert_eq!(format!("{}", ObjectKind::Tag), "tag");
    }

    #[test]
    fn parse_every_kind() {
        for kind in ObjectKind::ALL {
            assert_eq!(kind.as_str().parse::<ObjectKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        let err = "Blob".parse::<ObjectKind>().unwrap_err();
        assert_eq!(err, TypeError::UnknownKind("Blob".into()));
    }

    #[test]
    fn unknown_name() {
        assert!(ObjectKind::from_name(b"receipt").is_none());
        assert!(ObjectKind::from_name(b"").is_none());
    }

    #[test]
    fn serde_uses_header_names() {
        let json = serde_json::to_string(&ObjectKind::Commit).unwrap();
        assert_eq!(json, "\"commit\"");
    }
}
