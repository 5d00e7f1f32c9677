//! Upload file naming: slugs, extensions, and collision-free names.
//!
//! Every uploaded image is stored as `<slug>-<unix millis><ext>`:
//!
//! - `"GPT-4 Vision!!"`, `photo.JPEG` → `gpt-4-vision-1700000000000.jpg`
//! - `"  "`, `image/webp`, no file extension → `asset-1700000000000.webp`
//!
//! The slug comes from the entry's display name, the extension from the
//! uploaded file name or its declared MIME type. Everything here is pure;
//! the filesystem side lives in [`crate::persist`].

use sha2::{Digest, Sha256};
use std::path::Path;

/// Maximum slug length in characters.
pub const SLUG_MAX_LEN: usize = 60;

/// Slug used when a display name has no usable characters.
pub const FALLBACK_SLUG: &str = "asset";

/// Extensions accepted for uploads, already normalized.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".webp", ".svg"];

/// Extension used when nothing else could be determined.
const FALLBACK_EXTENSION: &str = ".png";

/// Map an accepted MIME type to its file extension.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/png" => Some(".png"),
        "image/jpeg" => Some(".jpg"),
        "image/webp" => Some(".webp"),
        "image/svg+xml" => Some(".svg"),
        _ => None,
    }
}

/// Turn a display name into a filesystem-safe slug.
///
/// Lower-cases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, strips leading and trailing hyphens, and keeps at most
/// [`SLUG_MAX_LEN`] characters. An empty result becomes [`FALLBACK_SLUG`].
///
/// - `"GPT-4 Vision!!"` → `"gpt-4-vision"`
/// - `"Café Déjà Vu"` → `"caf-d-j-vu"`
/// - `"!!!"` → `"asset"`
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    // Only ASCII is ever pushed, so byte truncation is char truncation.
    slug.truncate(SLUG_MAX_LEN);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// True when `value` is already in slug form: non-empty, only `[a-z0-9-]`,
/// no hyphen at either end and no doubled hyphens.
pub fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
}

/// Why an upload's type was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedImageType {
    pub mime_type: String,
    pub extension: Option<String>,
}

/// Pick the stored extension for an upload.
///
/// Precedence: the lower-cased extension of `file_name`, else the MIME table.
/// `.jpeg` normalizes to `.jpg`. The upload is refused only when the MIME
/// type is not in the table *and* the extension is not allowed; a known MIME
/// type alone is enough to accept.
///
/// - `image/jpeg`, `"photo"` → `.jpg`
/// - `image/png`, `"photo.JPEG"` → `.jpg`
/// - `application/pdf`, `"doc.pdf"` → refused
pub fn resolve_extension(
    mime_type: &str,
    file_name: &str,
) -> Result<String, UnsupportedImageType> {
    let from_mime = extension_for_mime(mime_type);
    let mut extension = Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .or_else(|| from_mime.map(str::to_string));

    if extension.as_deref() == Some(".jpeg") {
        extension = Some(".jpg".to_string());
    }

    let allowed = extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext));
    if from_mime.is_none() && !allowed {
        return Err(UnsupportedImageType {
            mime_type: mime_type.to_string(),
            extension,
        });
    }

    Ok(extension.unwrap_or_else(|| FALLBACK_EXTENSION.to_string()))
}

/// `<slug>-<millis><extension>`.
pub fn upload_file_name(slug: &str, millis: u128, extension: &str) -> String {
    format!("{slug}-{millis}{extension}")
}

/// Collision variant: `<slug>-<millis>-<hash8>[-<n>]<extension>`, where
/// `hash8` is the first 8 hex digits of the SHA-256 of the upload bytes.
pub fn disambiguated_file_name(
    slug: &str,
    millis: u128,
    extension: &str,
    bytes: &[u8],
    attempt: u32,
) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    let short = &digest[..8];
    if attempt == 0 {
        format!("{slug}-{millis}-{short}{extension}")
    } else {
        format!("{slug}-{millis}-{short}-{attempt}{extension}")
    }
}
