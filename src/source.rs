//! Input sources that resolve an [`ObjectRef`] to its text.

use crate::error::SourceError;
use crate::trigger::ObjectRef;
use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Fetches the raw contents of an uploaded object.
pub trait Source {
    fn fetch(&self, object: &ObjectRef) -> Result<String, SourceError>;
}

/// Object store backed by a local directory.
///
/// `(container, key)` resolves to `<root>/<container>/<key>`. Containers and
/// keys may only contain plain path segments; `..`, absolute paths and drive
/// prefixes are refused so every read stays under the root.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, object: &ObjectRef) -> Result<PathBuf, SourceError> {
        if !is_relative_segment(&object.container) || !is_relative_segment(&object.key) {
            return Err(SourceError::InvalidPath {
                object: object.clone(),
            });
        }
        Ok(self.root.join(&object.container).join(&object.key))
    }
}

/// `true` if `raw` is non-empty and made only of normal (or `.`) components.
fn is_relative_segment(raw: &str) -> bool {
    let mut components = Path::new(raw).components().peekable();
    components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl Source for FsSource {
    fn fetch(&self, object: &ObjectRef) -> Result<String, SourceError> {
        let path = self.path_for(object)?;
        debug!("Reading {} from {}", object, path.display());

        fs::read_to_string(&path).map_err(|source| SourceError::Read {
            object: object.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_reads_container_key_path() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("uploads/input")).unwrap();
        fs::write(root.path().join("uploads/input/a.csv"), "id,type,amount,date\n").unwrap();

        let source = FsSource::new(root.path());
        let text = source
            .fetch(&ObjectRef::new("uploads", "input/a.csv"))
            .unwrap();
        assert_eq!(text, "id,type,amount,date\n");
    }

    #[test]
    fn test_missing_object() {
        let root = TempDir::new().unwrap();
        let source = FsSource::new(root.path());

        let err = source
            .fetch(&ObjectRef::new("uploads", "input/missing.csv"))
            .unwrap_err();
        match err {
            SourceError::Read { object, source } => {
                assert_eq!(object.key, "input/missing.csv");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected Read, got {other:?}"),
        }
    }

    #[test]
    fn test_parent_dir_key_cannot_escape_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir_all(root.join("uploads/input")).unwrap();
        fs::write(tmp.path().join("secret.csv"), "id,type,amount,date\n").unwrap();

        let source = FsSource::new(&root);
        let object = ObjectRef::new("uploads", "input/../../../secret.csv");
        assert!(object.is_under("input/"));
        assert!(matches!(
            source.fetch(&object),
            Err(SourceError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_absolute_and_empty_segments_rejected() {
        let root = TempDir::new().unwrap();
        let source = FsSource::new(root.path());

        for object in [
            ObjectRef::new("uploads", "/etc/passwd"),
            ObjectRef::new("..", "input/a.csv"),
            ObjectRef::new("", "input/a.csv"),
            ObjectRef::new("uploads", ""),
        ] {
            assert!(
                matches!(source.fetch(&object), Err(SourceError::InvalidPath { .. })),
                "{object} should be refused"
            );
        }
    }

    #[test]
    fn test_dot_segments_are_allowed() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("uploads/input")).unwrap();
        fs::write(root.path().join("uploads/input/a.csv"), "h\n").unwrap();

        let source = FsSource::new(root.path());
        assert!(source.fetch(&ObjectRef::new("uploads", "./input/a.csv")).is_ok());
    }
}
