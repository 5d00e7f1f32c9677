//! Catalog persistence.
//!
//! The catalog is one JSON document (see [`CatalogDocument`]) that is read
//! fresh on every call and rewritten in full on every write. There is no
//! partial update and no in-process cache.
//!
//! Access goes through the [`CatalogStore`] trait so the submission pipeline
//! does not depend on the file format. [`JsonFileStore`] is the only
//! production backend.
//!
//! ## Concurrency
//!
//! No locking is done. Two writers that both read before either writes will
//! each produce a full document and the later write wins. This is accepted
//! for a single-editor catalog.
//!
//! ## Document format
//!
//! Pretty-printed with two-space indentation and a trailing newline, so that
//! `write_all(read_all())` reproduces a conventionally formatted file
//! byte-for-byte. Keys outside the record types make [`read_all`] fail
//! with [`StoreError::Parse`] instead of being discarded on the next write.
//!
//! [`read_all`]: CatalogStore::read_all

use crate::types::{CatalogDocument, Category};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot read catalog {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid catalog document {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cannot write catalog {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Whole-document access to the category list.
pub trait CatalogStore {
    /// Load every category, in document order.
    fn read_all(&self) -> Result<Vec<Category>, StoreError>;

    /// Replace the stored document with `categories`.
    fn write_all(&self, categories: &[Category]) -> Result<(), StoreError>;
}

/// [`CatalogStore`] backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonFileStore {
    fn read_all(&self) -> Result<Vec<Category>, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let document: CatalogDocument =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            categories = document.categories.len(),
            "catalog loaded"
        );
        Ok(document.categories)
    }

    fn write_all(&self, categories: &[Category]) -> Result<(), StoreError> {
        let json = to_document_string(categories)?;
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_err)?;

        // One temp file per write, renamed over the document.
        let mut staging = NamedTempFile::new_in(dir).map_err(write_err)?;
        staging.write_all(json.as_bytes()).map_err(write_err)?;
        staging.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            categories = categories.len(),
            "catalog written"
        );
        Ok(())
    }
}

/// Serialize categories in the canonical document format.
pub fn to_document_string(categories: &[Category]) -> Result<String, serde_json::Error> {
    let document = CatalogDocument {
        categories: categories.to_vec(),
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}

/// Find a category by id.
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id == id)
}

/// Mutable variant of [`find_category`].
pub fn find_category_mut<'a>(categories: &'a mut [Category], id: &str) -> Option<&'a mut Category> {
    categories.iter_mut().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Entry;
    use tempfile::TempDir;

    #[test]
    fn read_all_parses_fixture_document() {
        let tmp = setup_fixtures();
        let store = JsonFileStore::new(fixture_data_file(tmp.path()));
        let categories = store.read_all().unwrap();

        assert_eq!(category_ids(&categories), vec!["image-prompt", "tools"]);
        let prompts = find_category(&categories, "image-prompt").unwrap();
        assert_eq!(prompts.tools.len(), 2);
        assert!(prompts.tools[0].prompt.is_some());
        let tools = find_category(&categories, "tools").unwrap();
        assert!(tools.tools.iter().all(|t| t.prompt.is_none()));
    }

    #[test]
    fn read_all_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("nope.json"));
        let err = store.read_all().unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn read_all_invalid_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tools.json");
        fs::write(&path, "{ \"categories\": [ ").unwrap();
        let err = JsonFileStore::new(&path).read_all().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn read_all_wrong_shape_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tools.json");
        fs::write(&path, "[]").unwrap();
        let err = JsonFileStore::new(&path).read_all().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn unknown_category_key_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tools.json");
        let document = r#"{
  "categories": [
    {
      "id": "a",
      "title": "A",
      "description": "About a",
      "icon": "star",
      "tools": []
    }
  ]
}
"#;
        fs::write(&path, document).unwrap();
        let store = JsonFileStore::new(&path);

        let err = store.read_all().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("icon"));
        assert_eq!(fs::read_to_string(&path).unwrap(), document);
    }

    #[test]
    fn unknown_entry_key_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tools.json");
        fs::write(
            &path,
            r#"{"categories":[{"id":"a","title":"A","description":"d","tools":[
                {"name":"n","description":"d","image":"/uploads/n.png","url":"u","rating":5}
            ]}]}"#,
        )
        .unwrap();
        let err = JsonFileStore::new(&path).read_all().unwrap_err();
        assert!(err.to_string().contains("rating"));
    }

    #[test]
    fn write_all_read_all_round_trip_is_byte_identical() {
        let tmp = setup_fixtures();
        let path = fixture_data_file(tmp.path());
        let before = fs::read_to_string(&path).unwrap();

        let store = JsonFileStore::new(&path);
        let categories = store.read_all().unwrap();
        store.write_all(&categories).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn write_all_uses_two_space_indent_and_trailing_newline() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tools.json");
        let store = JsonFileStore::new(&path);
        store
            .write_all(&[sample_category("tools", vec![sample_entry("Alpha", None)])])
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"categories\": [\n    {\n"));
        assert!(written.ends_with("}\n"));
        assert!(!written.contains("prompt"));
    }

    #[test]
    fn write_all_replaces_previous_contents() {
        let tmp = setup_fixtures();
        let store = JsonFileStore::new(fixture_data_file(tmp.path()));
        store.write_all(&[]).unwrap();
        assert!(store.read_all().unwrap().is_empty());
        let dir = store.path().parent().unwrap();
        let names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["tools.json"]);
    }

    #[test]
    fn write_all_creates_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("data/nested/tools.json"));
        store.write_all(&[]).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn write_all_into_unwritable_location_is_write_error() {
        let tmp = TempDir::new().unwrap();
        // A regular file where a directory is expected.
        let blocker = tmp.path().join("data");
        fs::write(&blocker, "not a dir").unwrap();
        let store = JsonFileStore::new(blocker.join("tools.json"));
        let err = store.write_all(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn overlapping_writers_all_succeed() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("tools.json"));
        store.write_all(&[]).unwrap();

        let failures: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|writer| {
                    let store = &store;
                    s.spawn(move || {
                        let categories = vec![sample_category(&format!("writer-{writer}"), vec![])];
                        (0..200)
                            .filter(|_| store.write_all(&categories).is_err())
                            .count()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(failures, 0);
        let categories = store.read_all().unwrap();
        assert_eq!(categories.len(), 1);
        assert!(categories[0].id.starts_with("writer-"));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn prompt_present_only_when_set() {
        let categories = vec![sample_category(
            "image-prompt",
            vec![
                sample_entry("With", Some("neon, rain")),
                sample_entry("Without", None),
            ],
        )];
        let json = to_document_string(&categories).unwrap();
        assert_eq!(json.matches("\"prompt\"").count(), 1);
    }

    #[test]
    fn find_category_by_id() {
        let categories = vec![
            sample_category("a", vec![]),
            sample_category("b", vec![sample_entry("x", None)]),
        ];
        assert_eq!(find_category(&categories, "b").unwrap().tools.len(), 1);
        assert!(find_category(&categories, "c").is_none());
    }

    #[test]
    fn find_category_mut_allows_prepend() {
        let mut categories = vec![sample_category("a", vec![sample_entry("old", None)])];
        let category = find_category_mut(&mut categories, "a").unwrap();
        category.tools.insert(0, sample_entry("new", None));
        let names: Vec<&str> = categories[0].tools.iter().map(|t: &Entry| t.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
    }
}
