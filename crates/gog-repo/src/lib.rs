//! On-disk repositories for gog.
//!
//! A repository is a work tree with a `.git` directory laid out like git's:
//! `HEAD`, `config`, `description`, `refs/` and a loose `objects/` database.
//! This crate finds and creates repositories and moves objects between
//! [`gog_store`]'s codecs and the filesystem.
//!
//! The entire surface the command line needs:
//!
//! - [`Repository::locate`] -- find the repository containing a path
//! - [`Repository::init`] -- create a new repository
//! - [`Repository::read_object`] / [`Repository::write_object`]
//! - [`hash_object`] -- hash (and optionally store) a file's contents

pub mod config;
pub mod error;
pub mod fs;
pub mod repository;

use std::path::Path;

use gog_store::Object;
use gog_types::{ObjectId, ObjectKind};
use tracing::debug;

pub use config::Config;
pub use error::{RepoError, RepoResult};
pub use repository::{Repository, DEFAULT_DESCRIPTION, DEFAULT_HEAD, GIT_DIR_NAME};

/// Build an object of `kind` from the contents of `file` and return its address.
///
/// Unless `dry_run` is set the object is written to the repository containing
/// `file`, which must exist. A dry run outside any repository still reports the
/// address.
pub fn hash_object(file: impl AsRef<Path>, kind: ObjectKind, dry_run: bool) -> RepoResult<ObjectId> {
    let file = file.as_ref();
    let data = std::fs::read(file).map_err(|e| RepoError::io(file, e))?;
    let object = Object::deserialize(kind, data)?;

    match Repository::locate(file, !dry_run)? {
        Some(repo) => repo.write_object(&object, dry_run),
        None => {
            debug!(file = %file.display(), "hashing outside a repository");
            Ok(object.id())
        }
    }
}
