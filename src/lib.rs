//! # Toolshelf
//!
//! A small catalog of categorized tools and prompts. Each entry has a name,
//! description, preview image, link, and optional prompt text. The whole
//! catalog is one JSON document; preview images are files in a public
//! upload directory.
//!
//! # Architecture: Submission Pipeline
//!
//! The only state change is adding an entry, and it always runs the same
//! four stages:
//!
//! ```text
//! 1. Validate   form fields     →  ValidatedEntry   (pure, first failure wins)
//! 2. Persist    upload bytes    →  /uploads/<slug>-<millis>.<ext>
//! 3. Load       tools.json      →  Vec<Category>
//! 4. Commit     prepend entry   →  tools.json       (full rewrite)
//! ```
//!
//! The image is on disk before the document changes, so every entry points
//! at a real file. Failures at any stage become a single user-facing
//! message; the document is either fully updated or untouched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Catalog records; the JSON document shape |
//! | [`store`] | `CatalogStore` trait and the JSON file backend |
//! | [`validate`] | Field rules for new entries |
//! | [`naming`] | Slugs, extension resolution, upload file names |
//! | [`persist`] | Writes uploads without overwriting |
//! | [`submit`] | The pipeline; turns every failure into a message |
//! | [`filter`] | Case-insensitive name search |
//! | [`check`] | Catalog/upload consistency report |
//! | [`generate`] | Static HTML pages rendered with Maud |
//! | [`config`] | `toolshelf.toml` loading, merging, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Document, Rewritten Whole
//!
//! The catalog is small and hand-editable, so there is no database: every
//! read parses the file and every write replaces it. Writes go through a
//! sibling file and a rename so a reader never sees half a document.
//!
//! ## Last Write Wins
//!
//! Nothing serializes concurrent submissions. Two writers that read the
//! same snapshot each write a full document and the later one wins. The
//! catalog has one editor; the store trait leaves room for a backend with
//! real transactions.
//!
//! ## Time-Based Upload Names
//!
//! Upload names are `<slug>-<unix millis><ext>`, which sort by upload time
//! without a stored counter. Files are created exclusively, and a same-millisecond
//! collision falls back to a content-hash suffix instead of overwriting.

pub mod check;
pub mod config;
pub mod filter;
pub mod generate;
pub mod naming;
pub mod output;
pub mod persist;
pub mod store;
pub mod submit;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
