//! Field validation for new catalog entries.
//!
//! Rules run in a fixed order and the first failure wins, so the submitter
//! always sees exactly one reason:
//!
//! 1. category chosen and known
//! 2. name
//! 3. description
//! 4. url
//! 5. prompt, only for the prompt category
//! 6. non-empty image payload
//!
//! Text fields are trimmed; the validated record holds the trimmed values.

use crate::persist::ImageUpload;
use std::fmt;

pub const MSG_CHOOSE_CATEGORY: &str = "Choose a destination category.";
pub const MSG_UNKNOWN_CATEGORY: &str = "Unknown category selected.";
pub const MSG_NAME_REQUIRED: &str = "Enter a name for the tool or prompt.";
pub const MSG_DESCRIPTION_REQUIRED: &str = "Add a short description.";
pub const MSG_URL_REQUIRED: &str = "Provide a link to the tool.";
pub const MSG_PROMPT_REQUIRED: &str = "Prompt text is required for image prompts.";
pub const MSG_IMAGE_REQUIRED: &str = "Upload an image preview.";

/// Raw submitted fields. `None` means the field was not sent at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub prompt: Option<String>,
    pub image: Option<ImageUpload>,
}

/// A human-readable reason a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection(pub String);

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Rejection {}

/// Fields that passed every rule, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry<'a> {
    pub category_id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    /// `None` when blank.
    pub prompt: Option<&'a str>,
    pub image: &'a ImageUpload,
}

/// Validate `form` against the ids of the categories currently in the
/// store. `prompt_category` names the category that requires prompt text.
pub fn validate<'a, S: AsRef<str>>(
    form: &'a SubmissionForm,
    known_category_ids: &[S],
    prompt_category: &str,
) -> Result<ValidatedEntry<'a>, Rejection> {
    let category_id = chosen_category(form)?;
    if !known_category_ids.iter().any(|id| id.as_ref() == category_id) {
        return Err(Rejection::new(MSG_UNKNOWN_CATEGORY));
    }

    let name = required(form.name.as_deref(), MSG_NAME_REQUIRED)?;
    let description = required(form.description.as_deref(), MSG_DESCRIPTION_REQUIRED)?;
    let url = required(form.url.as_deref(), MSG_URL_REQUIRED)?;

    let prompt = trimmed(form.prompt.as_deref());
    if category_id == prompt_category && prompt.is_none() {
        return Err(Rejection::new(MSG_PROMPT_REQUIRED));
    }

    let image = match &form.image {
        Some(image) if !image.bytes.is_empty() => image,
        _ => return Err(Rejection::new(MSG_IMAGE_REQUIRED)),
    };

    Ok(ValidatedEntry {
        category_id,
        name,
        description,
        url,
        prompt,
        image,
    })
}

/// The first rule on its own: a destination category must be chosen. Needs
/// no catalog data, so callers can check it before touching the store.
pub fn chosen_category(form: &SubmissionForm) -> Result<&str, Rejection> {
    match form.category_id.as_deref() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(Rejection::new(MSG_CHOOSE_CATEGORY)),
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, Rejection> {
    trimmed(value).ok_or_else(|| Rejection::new(message))
}
