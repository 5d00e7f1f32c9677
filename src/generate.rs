//! Static HTML rendering of the catalog.
//!
//! Reads the catalog through a [`CatalogStore`] and writes a browsable site:
//!
//! ```text
//! dist/
//! ├── index.html               # Overview: every category with its cards
//! ├── image-prompt/
//! │   └── index.html           # Category page with name search
//! ├── tools/
//! │   └── index.html
//! └── uploads/                 # Copied from the public directory
//!     └── ...
//! ```
//!
//! Category pages embed a tiny script (`static/filter.js`) that hides cards
//! whose name does not contain the search text; it applies the same rule as
//! [`crate::filter::filter_entries`]. Everything else is plain HTML built
//! with [maud](https://maud.lambda.xyz/), auto-escaped.
//!
//! A category gets its own page only when its id is a slug that does not
//! collide with anything copied from the public directory (see
//! [`category_page_usable`]). Other categories are left out of the site and
//! listed in [`GeneratedSite::skipped`].
//!
//! After a successful submission the overview and the category page are
//! stale; re-running [`generate`] refreshes them.

use crate::config::SiteConfig;
use crate::naming;
use crate::store::{CatalogStore, StoreError};
use crate::types::{Category, Entry};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

const CSS: &str = include_str!("../static/style.css");
const FILTER_JS: &str = include_str!("../static/filter.js");

/// Pages written by one [`generate`] run, relative to the output directory.
#[derive(Debug, Default)]
pub struct GeneratedSite {
    pub pages: Vec<String>,
    pub copied_assets: usize,
    /// Category ids that could not be used as a page directory.
    pub skipped: Vec<String>,
}

/// Whether `id` can name a page directory next to the copied public files.
pub fn category_page_usable(id: &str, public_dir: &Path) -> bool {
    naming::is_slug(id) && !public_dir.join(id).exists()
}

/// Render every page into `output_dir` and copy `public_dir` alongside.
pub fn generate(
    store: &impl CatalogStore,
    site: &SiteConfig,
    public_dir: &Path,
    output_dir: &Path,
) -> Result<GeneratedSite, GenerateError> {
    let mut generated = GeneratedSite::default();
    let (categories, skipped): (Vec<Category>, Vec<Category>) = store
        .read_all()?
        .into_iter()
        .partition(|c| category_page_usable(&c.id, public_dir));
    for category in skipped {
        tracing::warn!(category = %category.id, "category id unusable as a page path, skipped");
        generated.skipped.push(category.id);
    }

    fs::create_dir_all(output_dir)?;
    if public_dir.is_dir() {
        generated.copied_assets = copy_dir_recursive(public_dir, output_dir)?;
    }

    fs::write(
        output_dir.join("index.html"),
        render_index(&categories, site).into_string(),
    )?;
    generated.pages.push("index.html".to_string());

    for category in &categories {
        let dir = output_dir.join(&category.id);
        fs::create_dir_all(&dir)?;
        let page = render_category_page(category, &categories, site);
        fs::write(dir.join("index.html"), page.into_string())?;
        generated.pages.push(format!("{}/index.html", category.id));
    }

    tracing::debug!(
        output = %output_dir.display(),
        pages = generated.pages.len(),
        "site generated"
    );
    Ok(generated)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, description: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(description);
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Primary navigation: overview plus one link per category.
///
/// `current` is the category id being shown, or `None` on the overview.
pub fn render_nav(categories: &[Category], current: Option<&str>) -> Markup {
    html! {
        nav.site-nav aria-label="Primary" {
            ul {
                li class=[current.is_none().then_some("current")] {
                    a href="/" { "Overview" }
                }
                @for category in categories {
                    @let is_current = current == Some(category.id.as_str());
                    li class=[is_current.then_some("current")] {
                        a href={ "/" (category.id) "/" } { (category.title) }
                    }
                }
            }
        }
    }
}

/// A card for one entry. Prompt text, when present, sits in a disclosure.
fn entry_card(entry: &Entry) -> Markup {
    html! {
        article.card data-name=(entry.name.to_lowercase()) {
            div.card-image {
                img src=(entry.image) alt=(entry.name) loading="lazy";
            }
            h3.card-title { (entry.name) }
            p.card-description { (entry.description) }
            details.card-details {
                summary { (entry.action_label()) }
                @if let Some(prompt) = &entry.prompt {
                    pre.card-prompt { (prompt) }
                }
                a.card-link href=(entry.url) target="_blank" rel="noreferrer" {
                    "Visit " (entry.name)
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Overview page listing every category with all of its entries.
fn render_index(categories: &[Category], site: &SiteConfig) -> Markup {
    let content = html! {
        (render_nav(categories, None))
        main.overview {
            header.page-header {
                h1 { (site.title) }
                p.subtitle { (site.description) }
            }
            @for category in categories {
                section.category-section {
                    div.category-header {
                        h2 {
                            a href={ "/" (category.id) "/" } { (category.title) }
                        }
                        p { (category.description) }
                    }
                    div.card-grid {
                        @for entry in &category.tools {
                            (entry_card(entry))
                        }
                    }
                }
            }
        }
    };

    base_document(&site.title, &site.description, content)
}

/// Category page with a search-by-name box.
fn render_category_page(category: &Category, categories: &[Category], site: &SiteConfig) -> Markup {
    let page_title = format!("{} - {}", category.title, site.title);

    let content = html! {
        (render_nav(categories, Some(category.id.as_str())))
        main.category-page {
            header.page-header {
                p.eyebrow { "Collection" }
                h1 { (category.title) }
                p.subtitle { (category.description) }
            }
            form.search-form role="search" onsubmit="return false" {
                label for="search" { "Search by name" }
                input id="search" type="search" placeholder="Start typing a tool name..." autocomplete="off";
            }
            div.card-grid {
                @for entry in &category.tools {
                    (entry_card(entry))
                }
            }
            p.empty-state hidden[!category.tools.is_empty()] {
                "No tools found."
            }
            div.footer-cta {
                a.back-link href="/" { "← Back to overview" }
            }
        }
        script { (PreEscaped(FILTER_JS)) }
    };

    base_document(&page_title, &category.description, content)
}

// ============================================================================
// Tests
// ============================================================================
