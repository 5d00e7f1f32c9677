//! Library integrity check.
//!
//! Reads the catalog and the upload directory without changing either and
//! reports what breaks the catalog's invariants:
//!
//! - duplicate category ids
//! - category ids that cannot be used as a page directory
//! - entries whose local image (`/...`) has no file under the public root
//! - files in the upload directory that no entry references
//! - a configured prompt category that does not exist
//!
//! Remote images (`https://...`) are not checked.

use crate::config::{LibraryConfig, LibraryPaths};
use crate::generate::category_page_usable;
use crate::store::{CatalogStore, StoreError};
use crate::types::Category;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cannot scan upload directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// An entry whose image file is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingImage {
    pub category_id: String,
    pub entry_name: String,
    pub image: String,
}

/// Findings of [`check_library`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub categories: usize,
    pub entries: usize,
    /// Ids that occur more than once, with their count.
    pub duplicate_ids: Vec<(String, usize)>,
    /// Ids that are not slugs or clash with a file in the public root.
    pub unusable_ids: Vec<String>,
    pub missing_images: Vec<MissingImage>,
    /// Upload files referenced by no entry, relative to the public root.
    pub orphaned_uploads: Vec<PathBuf>,
    /// The configured prompt category, when absent from the catalog.
    pub missing_prompt_category: Option<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.unusable_ids.is_empty()
            && self.missing_images.is_empty()
            && self.orphaned_uploads.is_empty()
            && self.missing_prompt_category.is_none()
    }
}

/// Check the catalog in `store` against the files under `paths`.
pub fn check_library(
    store: &impl CatalogStore,
    config: &LibraryConfig,
    paths: &LibraryPaths,
) -> Result<CheckReport, CheckError> {
    let categories = store.read_all()?;
    let mut report = CheckReport {
        categories: categories.len(),
        entries: categories.iter().map(|c| c.tools.len()).sum(),
        duplicate_ids: duplicate_ids(&categories),
        unusable_ids: categories
            .iter()
            .filter(|c| !category_page_usable(&c.id, &paths.public_dir))
            .map(|c| c.id.clone())
            .collect(),
        ..CheckReport::default()
    };

    if !categories.iter().any(|c| c.id == config.prompt_category) {
        report.missing_prompt_category = Some(config.prompt_category.clone());
    }

    let mut referenced = HashSet::new();
    for category in &categories {
        for entry in &category.tools {
            let Some(relative) = local_asset(&entry.image) else {
                continue;
            };
            if !paths.public_dir.join(&relative).is_file() {
                report.missing_images.push(MissingImage {
                    category_id: category.id.clone(),
                    entry_name: entry.name.clone(),
                    image: entry.image.clone(),
                });
            }
            referenced.insert(relative);
        }
    }

    if paths.uploads_dir.is_dir() {
        for dirent in WalkDir::new(&paths.uploads_dir).sort_by_file_name() {
            let dirent = dirent?;
            if !dirent.file_type().is_file() {
                continue;
            }
            let Ok(relative) = dirent.path().strip_prefix(&paths.public_dir) else {
                continue;
            };
            if !referenced.contains(relative) {
                report.orphaned_uploads.push(relative.to_path_buf());
            }
        }
    }

    Ok(report)
}

/// `/uploads/a.png` → `uploads/a.png`; `None` for remote or relative paths.
fn local_asset(image: &str) -> Option<PathBuf> {
    let relative = image.strip_prefix('/')?;
    if relative.starts_with('/') || relative.is_empty() {
        return None;
    }
    Some(Path::new(relative).to_path_buf())
}

fn duplicate_ids(categories: &[Category]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for category in categories {
        *counts.entry(category.id.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, n)| (id.to_string(), n))
        .collect()
}
