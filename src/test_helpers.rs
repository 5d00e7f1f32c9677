//! Shared test utilities for the toolshelf test suite.
//!
//! Provides a fixture library copied into a temp directory, builders for
//! records and submissions, and lookups that panic with a clear message on
//! miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let lib = TestLibrary::new();
//! let outcome = lib.submit(&valid_form("tools"));
//! assert!(outcome.is_accepted());
//! assert_eq!(lib.read_category("tools").tools[0].name, "Test Tool");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{LibraryConfig, LibraryPaths};
use crate::persist::{ImagePersister, ImageUpload};
use crate::store::{self, CatalogStore, JsonFileStore};
use crate::submit::{SubmissionOutcome, Submitter};
use crate::types::{Category, Entry};
use crate::validate::SubmissionForm;

/// Minimal PNG signature plus an IHDR-looking tail; enough for a payload.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/library/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/library");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Catalog document inside a fixture copy.
pub fn fixture_data_file(root: &Path) -> PathBuf {
    LibraryConfig::default().paths(root).data_file
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// A fixture library with default config, ready for submissions.
pub struct TestLibrary {
    pub dir: TempDir,
    pub config: LibraryConfig,
    /// Files in the upload directory before the test did anything.
    pub initial_uploads: usize,
}

impl TestLibrary {
    pub fn new() -> Self {
        let dir = setup_fixtures();
        let config = LibraryConfig::default();
        let uploads = config.paths(dir.path()).uploads_dir;
        let initial_uploads = fs::read_dir(&uploads).map(|d| d.count()).unwrap_or(0);
        Self {
            dir,
            config,
            initial_uploads,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> LibraryPaths {
        self.config.paths(self.root())
    }

    pub fn data_file(&self) -> PathBuf {
        self.paths().data_file
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.paths().uploads_dir
    }

    /// Disk location of a public path such as `/uploads/x.png`.
    pub fn public_file(&self, public_path: &str) -> PathBuf {
        self.paths()
            .public_dir
            .join(public_path.trim_start_matches('/'))
    }

    pub fn document_bytes(&self) -> Vec<u8> {
        fs::read(self.data_file()).unwrap()
    }

    pub fn document_string(&self) -> String {
        fs::read_to_string(self.data_file()).unwrap()
    }

    pub fn read_categories(&self) -> Vec<Category> {
        JsonFileStore::new(self.data_file()).read_all().unwrap()
    }

    /// Panics if the category is missing.
    pub fn read_category(&self, id: &str) -> Category {
        let categories = self.read_categories();
        store::find_category(&categories, id)
            .cloned()
            .unwrap_or_else(|| {
                let ids = category_ids(&categories);
                panic!("category '{id}' not found. Available: {ids:?}")
            })
    }

    /// Submit through a file-backed pipeline using the default config.
    pub fn submit(&self, form: &SubmissionForm) -> SubmissionOutcome {
        let paths = self.paths();
        let store = JsonFileStore::new(&paths.data_file);
        let persister = ImagePersister::new(&paths.uploads_dir, paths.uploads_prefix);
        Submitter::new(&store, &persister, &self.config.prompt_category).submit(form)
    }
}

// =========================================================================
// Builders
// =========================================================================

pub fn png_upload(file_name: &str) -> ImageUpload {
    ImageUpload {
        bytes: PNG_BYTES.to_vec(),
        mime_type: "image/png".to_string(),
        file_name: file_name.to_string(),
    }
}

/// A form that passes validation for `category_id`. Prompt text is only
/// filled in for `image-prompt`.
pub fn valid_form(category_id: &str) -> SubmissionForm {
    SubmissionForm {
        category_id: Some(category_id.to_string()),
        name: Some("Test Tool".to_string()),
        description: Some("Does useful things".to_string()),
        url: Some("https://example.com/tool".to_string()),
        prompt: (category_id == "image-prompt").then(|| "a quiet harbor at dawn".to_string()),
        image: Some(png_upload("preview.png")),
    }
}

pub fn sample_entry(name: &str, prompt: Option<&str>) -> Entry {
    let slug = crate::naming::slugify(name);
    Entry {
        name: name.to_string(),
        description: format!("About {name}"),
        image: format!("/uploads/{slug}.png"),
        url: format!("https://example.com/{slug}"),
        prompt: prompt.map(str::to_string),
    }
}

pub fn sample_category(id: &str, tools: Vec<Entry>) -> Category {
    Category {
        id: id.to_string(),
        title: id.replace('-', " "),
        description: format!("Everything in {id}"),
        tools,
    }
}

// =========================================================================
// Extractors
// =========================================================================

/// All category ids in document order.
pub fn category_ids(categories: &[Category]) -> Vec<&str> {
    categories.iter().map(|c| c.id.as_str()).collect()
}
