use std::fs;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::aggregate::CommentIndex;
use crate::error::CommenterError;
use crate::message::read_comment;

/// A directory tree of mail files, one comment per file.
///
/// Every regular file at any depth is treated as a message, not just the
/// `cur`/`new` subdirectories of a strict Maildir.
#[derive(Debug, Clone)]
pub struct Maildir {
    root: PathBuf,
}

impl Maildir {
    /// Open `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CommenterError> {
        let root = root.into();
        let metadata = fs::metadata(&root).map_err(|source| CommenterError::Open {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(CommenterError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    /// Paths of every regular file below the root, sorted by name within
    /// each directory. Symlinks are followed.
    ///
    /// The iterator is lazy; call again to restart the walk.
    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf, CommenterError>> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
                Ok(_) => None,
                Err(err) => Some(Err(CommenterError::from(err))),
            })
    }

    /// Parse every file into a comment and group them by page.
    ///
    /// Stops at the first file that cannot be read or parsed.
    pub fn comments(&self) -> Result<CommentIndex, CommenterError> {
        let mut index = CommentIndex::new();
        for path in self.files() {
            let path = path?;
            let comment = read_comment(&path)?;
            tracing::debug!(
                path = %path.display(),
                url = %comment.url,
                id = %comment.id,
                "parsed comment"
            );
            index.insert(comment);
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_files_descends_into_subdirectories() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "cur/b");
        touch(tmp.path(), "cur/a");
        touch(tmp.path(), "new/c");
        touch(tmp.path(), "top");
        fs::create_dir_all(tmp.path().join("tmp")).unwrap();

        let maildir = Maildir::open(tmp.path()).unwrap();
        let files: Vec<PathBuf> = maildir
            .files()
            .map(|p| p.unwrap().strip_prefix(tmp.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            files,
            vec![
                PathBuf::from("cur/a"),
                PathBuf::from("cur/b"),
                PathBuf::from("new/c"),
                PathBuf::from("top"),
            ]
        );
    }

    #[test]
    fn test_files_is_restartable() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "cur/a");
        let maildir = Maildir::open(tmp.path()).unwrap();
        assert_eq!(maildir.files().count(), 1);
        assert_eq!(maildir.files().count(), 1);
    }

    #[test]
    fn test_empty_maildir_has_no_comments() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("cur")).unwrap();
        let index = Maildir::open(tmp.path()).unwrap().comments().unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_open_missing_root() {
        let tmp = TempDir::new().unwrap();
        let err = Maildir::open(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CommenterError::Open { .. }));
    }

    #[test]
    fn test_open_file_root() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "mail");
        let err = Maildir::open(tmp.path().join("mail")).unwrap_err();
        assert!(matches!(err, CommenterError::NotADirectory(_)));
    }

    #[test]
    fn test_unparseable_file_aborts() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("cur")).unwrap();
        fs::write(tmp.path().join("cur/bad"), "Subject: x\r\n\r\nnot json").unwrap();
        let err = Maildir::open(tmp.path()).unwrap().comments().unwrap_err();
        match err {
            CommenterError::Message { path, .. } => assert!(path.ends_with("cur/bad")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_aborts() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("cur")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("cur/link")).unwrap();

        let maildir = Maildir::open(tmp.path()).unwrap();
        let err = maildir.comments().unwrap_err();
        assert!(matches!(err, CommenterError::Walk(_)), "{err:?}");
    }
}
