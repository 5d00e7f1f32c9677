//! Entry submission pipeline.
//!
//! One submission runs these steps strictly in order, stopping at the first
//! failure:
//!
//! ```text
//! 0. category chosen?       (validate)      → Rejected, nothing touched
//!    read category ids      (store)         → Rejected, nothing touched
//! 1. validate fields        (validate)      → Rejected, nothing touched
//! 2. persist image          (persist)       → Rejected, store untouched
//! 3. load store             (store)         → Rejected
//! 4. locate category                        → Rejected
//! 5. build entry, prepend to category
//! 6. write store            (store)         → Rejected
//! 7. Accepted
//! ```
//!
//! The store is never written before the image file exists, so every entry
//! in the document references a real asset. When a later step fails, the
//! freshly written image is removed again so the upload directory does not
//! collect files that no entry references.
//!
//! Every failure is turned into [`SubmissionOutcome::Rejected`] with a
//! user-facing message; internal details (paths, I/O errors) only go to the
//! log.
//!
//! Step 1 checks the category against the read from step 0 and step 4
//! against another. A category removed in between is reported as unknown.

use crate::persist::{ImagePersister, PersistError, PersistedImage};
use crate::store::{self, CatalogStore};
use crate::types::Entry;
use crate::validate::{self, Rejection, SubmissionForm, ValidatedEntry};

pub const MSG_UNSUPPORTED_IMAGE: &str = "Use a PNG, JPG, SVG, or WEBP image.";
pub const MSG_IMAGE_SAVE_FAILED: &str = "Unable to save the image. Try again.";
pub const MSG_STORE_UNAVAILABLE: &str = "Catalog data is unavailable. Try again.";
pub const MSG_STORE_WRITE_FAILED: &str = "Could not write to tools data.";

/// Result of one submission. Exactly one message is shown to the submitter.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Accepted {
        /// `"<name> added to <category title>."`
        message: String,
        category_id: String,
        entry: Entry,
    },
    Rejected {
        message: String,
    },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Accepted { message, .. } | SubmissionOutcome::Rejected { message } => {
                message
            }
        }
    }

    /// Views that show the changed data: the overview and the category page.
    /// Empty for rejections.
    pub fn stale_views(&self) -> Vec<String> {
        match self {
            SubmissionOutcome::Accepted { category_id, .. } => {
                vec!["/".to_string(), format!("/{category_id}")]
            }
            SubmissionOutcome::Rejected { .. } => Vec::new(),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        SubmissionOutcome::Rejected {
            message: message.into(),
        }
    }
}

impl From<Rejection> for SubmissionOutcome {
    fn from(rejection: Rejection) -> Self {
        SubmissionOutcome::rejected(rejection.0)
    }
}

/// Wires a store and a persister together for submissions.
pub struct Submitter<'a, S: CatalogStore> {
    store: &'a S,
    persister: &'a ImagePersister,
    prompt_category: &'a str,
}

impl<'a, S: CatalogStore> Submitter<'a, S> {
    pub fn new(store: &'a S, persister: &'a ImagePersister, prompt_category: &'a str) -> Self {
        Self {
            store,
            persister,
            prompt_category,
        }
    }

    /// Run one submission end to end.
    pub fn submit(&self, form: &SubmissionForm) -> SubmissionOutcome {
        if let Err(rejection) = validate::chosen_category(form) {
            return rejection.into();
        }

        let known_ids = match self.store.read_all() {
            Ok(categories) => categories.into_iter().map(|c| c.id).collect::<Vec<_>>(),
            Err(e) => {
                tracing::error!(error = %e, "cannot load categories for validation");
                return SubmissionOutcome::rejected(MSG_STORE_UNAVAILABLE);
            }
        };

        let fields = match validate::validate(form, &known_ids, self.prompt_category) {
            Ok(fields) => fields,
            Err(rejection) => {
                tracing::debug!(reason = %rejection, "submission rejected");
                return rejection.into();
            }
        };

        let image = match self.persister.persist(fields.image, fields.name) {
            Ok(image) => image,
            Err(PersistError::UnsupportedImageType(unsupported)) => {
                tracing::debug!(?unsupported, "upload type refused");
                return SubmissionOutcome::rejected(MSG_UNSUPPORTED_IMAGE);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to persist uploaded image");
                return SubmissionOutcome::rejected(MSG_IMAGE_SAVE_FAILED);
            }
        };

        let outcome = self.commit(&fields, &image);
        if !outcome.is_accepted() {
            discard_upload(&image);
        }
        outcome
    }

    /// Steps 3 to 7: load, mutate, write.
    fn commit(&self, fields: &ValidatedEntry<'_>, image: &PersistedImage) -> SubmissionOutcome {
        let mut categories = match self.store.read_all() {
            Ok(categories) => categories,
            Err(e) => {
                tracing::error!(error = %e, "failed to load catalog");
                return SubmissionOutcome::rejected(MSG_STORE_UNAVAILABLE);
            }
        };

        let Some(category) = store::find_category_mut(&mut categories, fields.category_id) else {
            tracing::warn!(
                category = fields.category_id,
                "category disappeared before commit"
            );
            return SubmissionOutcome::rejected(validate::MSG_UNKNOWN_CATEGORY);
        };

        let entry = Entry {
            name: fields.name.to_string(),
            description: fields.description.to_string(),
            image: image.public_path.clone(),
            url: fields.url.to_string(),
            prompt: fields.prompt.map(str::to_string),
        };
        category.tools.insert(0, entry.clone());
        let message = format!("{} added to {}.", entry.name, category.title);

        if let Err(e) = self.store.write_all(&categories) {
            tracing::error!(error = %e, "failed to update catalog");
            return SubmissionOutcome::rejected(MSG_STORE_WRITE_FAILED);
        }

        tracing::info!(
            category = fields.category_id,
            name = %entry.name,
            image = %entry.image,
            "entry added"
        );
        SubmissionOutcome::Accepted {
            message,
            category_id: fields.category_id.to_string(),
            entry,
        }
    }
}

fn discard_upload(image: &PersistedImage) {
    if let Err(e) = std::fs::remove_file(&image.file_path) {
        tracing::warn!(
            path = %image.file_path.display(),
            error = %e,
            "could not remove upload of rejected submission"
        );
    }
}
