use std::fs::File;
use std::path::{Path, PathBuf};

use gog_store::{LooseCodec, Object};
use gog_types::{ObjectId, ObjectKind};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{RepoError, RepoResult};
use crate::fs;

/// Name of the metadata directory inside a work tree.
pub const GIT_DIR_NAME: &str = ".git";

/// Placeholder written to `.git/description` by `init`.
pub const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

/// Initial content of `.git/HEAD`.
pub const DEFAULT_HEAD: &str = "ref: refs/heads/master\n";

/// Directories created under `.git` by `init`.
const SKELETON_DIRS: [&[&str]; 4] = [
    &["branches"],
    &["objects"],
    &["refs", "tags"],
    &["refs", "heads"],
];

/// A repository on disk: a work tree with a `.git` directory inside it.
///
/// Manages the `.git/` directory structure:
/// ```text
/// .git/
///   description
///   HEAD
///   config
///   branches/
///   objects/
///     <2 hex>/<38 hex>
///   refs/
///     heads/
///     tags/
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    work_tree: PathBuf,
    git_dir: PathBuf,
    config: Config,
}

impl Repository {
    /// Open the repository whose work tree is `work_tree`.
    ///
    /// Unless `force` is set, `.git` must be a directory and contain a config
    /// file. With `force` both checks are skipped and a missing config file
    /// leaves the default settings in place.
    pub fn open(work_tree: impl AsRef<Path>, force: bool) -> RepoResult<Self> {
        let work_tree = work_tree.as_ref().to_path_buf();
        let git_dir = work_tree.join(GIT_DIR_NAME);

        if !force && !fs::is_dir(&git_dir) {
            return Err(RepoError::RepositoryNotFound(git_dir));
        }

        let mut repo = Self {
            work_tree,
            git_dir,
            config: Config::DEFAULT,
        };

        let config_path = repo.git_path(&["config"]);
        if fs::is_file(&config_path) {
            let file = File::open(&config_path).map_err(|e| RepoError::io(&config_path, e))?;
            repo.config = Config::from_reader(file).map_err(|e| RepoError::io(&config_path, e))?;
        } else if !force {
            return Err(RepoError::ConfigFileNotFound(config_path));
        }

        debug!(work_tree = %repo.work_tree.display(), force, "opened repository");
        Ok(repo)
    }

    /// Find the repository containing `start` by walking up its ancestors.
    ///
    /// Returns `Ok(None)` when nothing is found and `required` is false.
    pub fn locate(start: impl AsRef<Path>, required: bool) -> RepoResult<Option<Self>> {
        let start = start.as_ref();
        let start = std::fs::canonicalize(start).map_err(|e| RepoError::io(start, e))?;

        for dir in start.ancestors() {
            if fs::is_dir(&dir.join(GIT_DIR_NAME)) {
                debug!(start = %start.display(), root = %dir.display(), "located repository");
                return Self::open(dir, false).map(Some);
            }
        }

        if required {
            return Err(RepoError::RepositoryNotFound(start));
        }
        debug!(start = %start.display(), "no repository found");
        Ok(None)
    }

    /// Create a new repository at `work_tree`.
    ///
    /// The work tree must either not exist or be an empty directory; nothing
    /// is touched when it is not.
    pub fn init(work_tree: impl AsRef<Path>) -> RepoResult<Self> {
        let work_tree = work_tree.as_ref();

        if work_tree.exists() {
            if !fs::is_dir(work_tree) {
                return Err(RepoError::PathIsFile(work_tree.to_path_buf()));
            }
            let empty = fs::is_empty_dir(work_tree).map_err(|e| RepoError::io(work_tree, e))?;
            if !empty {
                return Err(RepoError::WorkTreeNotEmpty(work_tree.to_path_buf()));
            }
        } else {
            std::fs::create_dir_all(work_tree).map_err(|e| RepoError::io(work_tree, e))?;
        }

        let repo = Self::open(work_tree, true)?;

        for dir in SKELETON_DIRS {
            repo.git_dir_path(true, dir)?;
        }
        repo.write_git_file(&["description"], DEFAULT_DESCRIPTION)?;
        repo.write_git_file(&["HEAD"], DEFAULT_HEAD)?;
        repo.write_git_file(&["config"], &repo.config.format())?;

        info!(git_dir = %repo.git_dir.display(), "initialized empty repository");
        Ok(repo)
    }

    /// Root of the work tree.
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// The `.git` directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Settings loaded from `.git/config`.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Join `segments` under the git dir without touching the filesystem.
    pub fn git_path(&self, segments: &[&str]) -> PathBuf {
        let mut path = self.git_dir.clone();
        path.extend(segments);
        path
    }

    /// Resolve a directory under the git dir.
    ///
    /// With `mkdir` the directory and any missing parents are created;
    /// otherwise a missing directory is [`RepoError::NotADirectory`].
    pub fn git_dir_path(&self, mkdir: bool, segments: &[&str]) -> RepoResult<PathBuf> {
        let path = self.git_path(segments);
        if fs::is_dir(&path) {
            return Ok(path);
        }
        if !mkdir {
            return Err(RepoError::NotADirectory(path));
        }
        std::fs::create_dir_all(&path).map_err(|e| RepoError::io(&path, e))?;
        Ok(path)
    }

    /// Resolve a file under the git dir. Only the parent directory is
    /// checked (or created); the file itself need not exist.
    pub fn git_file_path(&self, mkdir: bool, segments: &[&str]) -> RepoResult<PathBuf> {
        let (file, dirs) = segments.split_last().ok_or(RepoError::EmptyPath)?;
        Ok(self.git_dir_path(mkdir, dirs)?.join(file))
    }

    fn write_git_file(&self, segments: &[&str], content: &str) -> RepoResult<()> {
        let path = self.git_file_path(false, segments)?;
        std::fs::write(&path, content).map_err(|e| RepoError::io(&path, e))
    }

    /// Read the object stored at `id`, which must be of kind `kind`.
    pub fn read_object(&self, id: &ObjectId, kind: ObjectKind) -> RepoResult<Object> {
        let (dir, file) = id.fan_out();
        let path = self.git_file_path(false, &["objects", &dir, &file])?;
        if !fs::is_file(&path) {
            return Err(RepoError::ObjectNotFound(*id));
        }

        let compressed = std::fs::read(&path).map_err(|e| RepoError::io(&path, e))?;
        let stored = LooseCodec::decode(&compressed, kind)?;
        let object = Object::from_stored_object(stored)?;

        debug!(%id, %kind, "read object");
        Ok(object)
    }

    /// Store `object` and return its address.
    ///
    /// With `dry_run` the address is computed but nothing is written.
    /// Writing an object that already exists rewrites identical bytes.
    pub fn write_object(&self, object: &Object, dry_run: bool) -> RepoResult<ObjectId> {
        let stored = object.to_stored_object();
        if dry_run {
            let id = stored.compute_id();
            debug!(%id, kind = %stored.kind, "computed object id (dry run)");
            return Ok(id);
        }

        let encoded = LooseCodec::encode(&stored)?;
        let (dir, file) = encoded.id.fan_out();
        let path = self.git_file_path(true, &["objects", &dir, &file])?;
        std::fs::write(&path, &encoded.compressed).map_err(|e| RepoError::io(&path, e))?;

        debug!(id = %encoded.id, kind = %stored.kind, size = stored.data.len(), "wrote object");
        Ok(encoded.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gog_store::{Blob, Commit, Kvlm, StoreError, StoredObject};
    use proptest::prelude::*;
    use tempfile::TempDir;

    const HELLO_ID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    fn new_repo() -> (TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn hello() -> Object {
        Object::from(Blob::new(b"hello\n".to_vec()))
    }

    // -----------------------------------------------------------------------
    // init
    // -----------------------------------------------------------------------

    #[test]
    fn init_creates_layout() {
        let (dir, repo) = new_repo();
        let git = dir.path().join(".git");

        assert_eq!(repo.work_tree(), dir.path());
        assert_eq!(repo.git_dir(), git);
        assert_eq!(repo.config(), &Config::DEFAULT);

        for sub in ["branches", "objects", "refs/tags", "refs/heads"] {
            assert!(fs::is_dir(&git.join(sub)), "{sub}");
        }
        assert_eq!(
            std::fs::read_to_string(git.join("HEAD")).unwrap(),
            "ref: refs/heads/master\n"
        );
        assert_eq!(
            std::fs::read_to_string(git.join("description")).unwrap(),
            DEFAULT_DESCRIPTION
        );
        assert_eq!(
            std::fs::read_to_string(git.join("config")).unwrap(),
            Config::DEFAULT.format()
        );
    }

    #[test]
    fn init_creates_missing_work_tree() {
        let dir = tempfile::tempdir().unwrap();
        let work_tree = dir.path().join("a/b/project");
        let repo = Repository::init(&work_tree).unwrap();
        assert!(fs::is_dir(&work_tree.join(".git/objects")));
        assert_eq!(repo.work_tree(), work_tree);
    }

    #[test]
    fn init_rejects_non_empty_dir_without_touching_it() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README"), b"hi").unwrap();

        let err = Repository::init(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::WorkTreeNotEmpty(_)));

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(!dir.path().join(".git").exists());
    }

    #[test]
    fn init_rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        let err = Repository::init(&file).unwrap_err();
        assert!(matches!(err, RepoError::PathIsFile(p) if p == file));
        assert_eq!(std::fs::read(&file).unwrap(), b"x");
    }

    #[test]
    fn init_twice_fails() {
        let (dir, _repo) = new_repo();
        let err = Repository::init(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::WorkTreeNotEmpty(_)));
    }

    // -----------------------------------------------------------------------
    // open / locate
    // -----------------------------------------------------------------------

    #[test]
    fn open_without_git_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = Repository::open(dir.path(), false).unwrap_err();
        assert!(matches!(err, RepoError::RepositoryNotFound(p) if p == dir.path().join(".git")));
    }

    #[test]
    fn open_forced_without_git_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::open(dir.path(), true).unwrap();
        assert_eq!(repo.config(), &Config::DEFAULT);
        assert!(!dir.path().join(".git").exists());
    }

    #[test]
    fn open_without_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let err = Repository::open(dir.path(), false).unwrap_err();
        assert!(matches!(err, RepoError::ConfigFileNotFound(_)));
    }

    #[test]
    fn open_reads_config() {
        let (dir, _repo) = new_repo();
        std::fs::write(
            dir.path().join(".git/config"),
            "[core]\n\trepositoryformatversion = 0\n\tfilemode = false\n\tbare = true\n[remote \"origin\"]\n\turl = x\n",
        )
        .unwrap();

        let repo = Repository::open(dir.path(), false).unwrap();
        assert!(repo.config().bare);
        assert!(!repo.config().file_mode);
    }

    #[test]
    fn open_tolerates_non_utf8_config() {
        let (dir, _repo) = new_repo();
        std::fs::write(
            dir.path().join(".git/config"),
            b"[core]\n\tbare = true\n[user]\n\tname = J\xf6rg\n",
        )
        .unwrap();

        let repo = Repository::open(dir.path(), false).unwrap();
        assert!(repo.config().bare);
        assert!(Repository::locate(dir.path(), true).unwrap().is_some());
    }

    #[test]
    fn locate_from_nested_dir() {
        let (dir, _repo) = new_repo();
        let nested = dir.path().join("src/deep/er");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Repository::locate(&nested, true).unwrap().unwrap();
        assert_eq!(found.work_tree(), std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn locate_from_file_inside_repo() {
        let (dir, _repo) = new_repo();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(Repository::locate(&file, true).unwrap().is_some());
    }

    #[test]
    fn locate_without_repository() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x/y");
        std::fs::create_dir_all(&nested).unwrap();

        assert!(Repository::locate(&nested, false).unwrap().is_none());
        let err = Repository::locate(&nested, true).unwrap_err();
        assert!(matches!(err, RepoError::RepositoryNotFound(_)));
    }

    #[test]
    fn locate_missing_start_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Repository::locate(dir.path().join("missing"), false).unwrap_err();
        assert!(matches!(err, RepoError::Io { .. }));
    }

    // -----------------------------------------------------------------------
    // path resolution
    // -----------------------------------------------------------------------

    #[test]
    fn git_dir_path_read_only_missing() {
        let (_dir, repo) = new_repo();
        let err = repo.git_dir_path(false, &["refs", "remotes"]).unwrap_err();
        assert!(matches!(err, RepoError::NotADirectory(p) if p == repo.git_path(&["refs", "remotes"])));
    }

    #[test]
    fn git_dir_path_mkdir_creates_parents() {
        let (_dir, repo) = new_repo();
        let path = repo.git_dir_path(true, &["refs", "remotes", "origin"]).unwrap();
        assert!(fs::is_dir(&path));
        // Second call is a no-op.
        assert_eq!(repo.git_dir_path(true, &["refs", "remotes", "origin"]).unwrap(), path);
    }

    #[test]
    fn git_file_path_checks_parent_only() {
        let (_dir, repo) = new_repo();
        let path = repo.git_file_path(false, &["refs", "heads", "master"]).unwrap();
        assert_eq!(path, repo.git_path(&["refs", "heads", "master"]));
        assert!(!path.exists());

        let err = repo.git_file_path(false, &["nope", "file"]).unwrap_err();
        assert!(matches!(err, RepoError::NotADirectory(_)));
    }

    #[test]
    fn git_file_path_needs_a_segment() {
        let (_dir, repo) = new_repo();
        assert!(matches!(repo.git_file_path(true, &[]), Err(RepoError::EmptyPath)));
    }

    // -----------------------------------------------------------------------
    // objects
    // -----------------------------------------------------------------------

    #[test]
    fn write_hello_blob() {
        let (dir, repo) = new_repo();
        let id = repo.write_object(&hello(), false).unwrap();
        assert_eq!(id.to_hex(), HELLO_ID);
        assert!(fs::is_file(
            &dir.path().join(".git/objects/ce/013625030ba8dba906f756967f9e9ca394464a")
        ));

        let read = repo.read_object(&id, ObjectKind::Blob).unwrap();
        assert_eq!(read, hello());
    }

    #[test]
    fn dry_run_returns_address_without_writing() {
        let (dir, repo) = new_repo();
        let dry = repo.write_object(&hello(), true).unwrap();
        assert_eq!(dry.to_hex(), HELLO_ID);
        assert!(!dir.path().join(".git/objects/ce").exists());

        let real = repo.write_object(&hello(), false).unwrap();
        assert_eq!(dry, real);
    }

    #[test]
    fn rewriting_is_harmless() {
        let (_dir, repo) = new_repo();
        let first = repo.write_object(&hello(), false).unwrap();
        let second = repo.write_object(&hello(), false).unwrap();
        assert_eq!(first, second);
        assert_eq!(repo.read_object(&first, ObjectKind::Blob).unwrap(), hello());
    }

    #[test]
    fn commit_roundtrip() {
        let (_dir, repo) = new_repo();
        let kvlm = Kvlm::new()
            .with("tree", "29ff16c9c14e2652b22f8b78bb08a5a07930c147")
            .and_then(|k| k.with("author", "Jane Doe <jane@example.com> 1527025023 +0200"))
            .and_then(|k| k.with("", "First\n\nWith body\n"))
            .unwrap();
        let commit = Object::from(Commit::new(kvlm));
        let id = repo.write_object(&commit, false).unwrap();
        assert_eq!(repo.read_object(&id, ObjectKind::Commit).unwrap(), commit);
    }

    #[test]
    fn read_with_wrong_kind() {
        let (_dir, repo) = new_repo();
        let id = repo.write_object(&hello(), false).unwrap();
        let err = repo.read_object(&id, ObjectKind::Commit).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Store(StoreError::KindMismatch {
                expected: ObjectKind::Commit,
                ..
            })
        ));
    }

    #[test]
    fn read_missing_fan_out_dir() {
        let (_dir, repo) = new_repo();
        let id = ObjectId::from_hex(HELLO_ID).unwrap();
        let err = repo.read_object(&id, ObjectKind::Blob).unwrap_err();
        assert!(matches!(err, RepoError::NotADirectory(_)));
    }

    #[test]
    fn read_missing_object_file() {
        let (_dir, repo) = new_repo();
        repo.git_dir_path(true, &["objects", "ce"]).unwrap();
        let id = ObjectId::from_hex(HELLO_ID).unwrap();
        let err = repo.read_object(&id, ObjectKind::Blob).unwrap_err();
        assert!(matches!(err, RepoError::ObjectNotFound(missing) if missing == id));
    }

    #[test]
    fn read_tree_is_unsupported() {
        let (_dir, repo) = new_repo();
        let encoded =
            LooseCodec::encode(&StoredObject::new(ObjectKind::Tree, b"opaque".to_vec())).unwrap();
        let (dir, file) = encoded.id.fan_out();
        let path = repo.git_file_path(true, &["objects", &dir, &file]).unwrap();
        std::fs::write(path, &encoded.compressed).unwrap();

        let err = repo.read_object(&encoded.id, ObjectKind::Tree).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Store(StoreError::UnsupportedKind(ObjectKind::Tree))
        ));
    }

    #[test]
    fn read_corrupt_object() {
        let (_dir, repo) = new_repo();
        let id = ObjectId::from_hex(HELLO_ID).unwrap();
        let (dir, file) = id.fan_out();
        let path = repo.git_file_path(true, &["objects", &dir, &file]).unwrap();
        std::fs::write(path, b"garbage").unwrap();

        let err = repo.read_object(&id, ObjectKind::Blob).unwrap_err();
        assert!(matches!(err, RepoError::Store(StoreError::Decompress(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn write_then_read(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
            let (_dir, repo) = new_repo();
            let object = Object::from(Blob::new(data));
            let id = repo.write_object(&object, false).unwrap();
            prop_assert_eq!(id, object.id());
            prop_assert_eq!(repo.read_object(&id, ObjectKind::Blob).unwrap(), object);
        }
    }
}
