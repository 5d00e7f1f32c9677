//! Upload persistence.
//!
//! [`ImagePersister`] turns an uploaded payload into a file under the public
//! upload directory and returns the public path recorded on the entry
//! (`/uploads/<file name>`). File names come from [`crate::naming`].
//!
//! Files are created exclusively: an existing upload is never overwritten.
//! When two submissions with the same slug land in the same millisecond, the
//! second name gains a content-hash suffix.

use crate::naming::{self, UnsupportedImageType};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Give up after this many suffixed names; only reachable on a broken
/// filesystem.
const MAX_NAME_ATTEMPTS: u32 = 16;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("unsupported image type (mime {:?}, extension {:?})", .0.mime_type, .0.extension)]
    UnsupportedImageType(UnsupportedImageType),
    #[error("cannot create upload directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write upload {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// An uploaded image as received from the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// MIME type declared by the client; may be empty.
    pub mime_type: String,
    /// Client-side file name; only its extension is used.
    pub file_name: String,
}

impl ImageUpload {
    /// Read an upload from a local file, declaring `mime_type`.
    pub fn from_path(path: &Path, mime_type: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            bytes: fs::read(path)?,
            mime_type: mime_type.unwrap_or_default().to_string(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
    }
}

/// Where an upload landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedImage {
    /// Path relative to the public root, stored verbatim on the entry.
    pub public_path: String,
    /// Absolute location on disk.
    pub file_path: PathBuf,
}

/// Writes uploads into `uploads_dir`, addressed publicly as `public_prefix`.
#[derive(Debug, Clone)]
pub struct ImagePersister {
    uploads_dir: PathBuf,
    public_prefix: String,
}

impl ImagePersister {
    /// `public_prefix` is the URL prefix of `uploads_dir`, e.g. `/uploads`.
    pub fn new(uploads_dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let prefix: String = public_prefix.into();
        Self {
            uploads_dir: uploads_dir.into(),
            public_prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Store `upload` under a name derived from `display_name` and the
    /// current time.
    pub fn persist(
        &self,
        upload: &ImageUpload,
        display_name: &str,
    ) -> Result<PersistedImage, PersistError> {
        self.persist_at(upload, display_name, unix_millis())
    }

    /// [`persist`](Self::persist) with an explicit timestamp.
    pub fn persist_at(
        &self,
        upload: &ImageUpload,
        display_name: &str,
        millis: u128,
    ) -> Result<PersistedImage, PersistError> {
        let extension = naming::resolve_extension(&upload.mime_type, &upload.file_name)
            .map_err(PersistError::UnsupportedImageType)?;
        let slug = naming::slugify(display_name);

        fs::create_dir_all(&self.uploads_dir).map_err(|source| PersistError::CreateDir {
            path: self.uploads_dir.clone(),
            source,
        })?;

        let mut file_name = naming::upload_file_name(&slug, millis, &extension);
        let mut attempt = 0;
        loop {
            let file_path = self.uploads_dir.join(&file_name);
            match write_new(&file_path, &upload.bytes) {
                Ok(()) => {
                    tracing::debug!(
                        path = %file_path.display(),
                        bytes = upload.bytes.len(),
                        "upload stored"
                    );
                    return Ok(PersistedImage {
                        public_path: format!("{}/{}", self.public_prefix, file_name),
                        file_path,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                    tracing::debug!(name = %file_name, "upload name taken, disambiguating");
                    file_name = naming::disambiguated_file_name(
                        &slug,
                        millis,
                        &extension,
                        &upload.bytes,
                        attempt,
                    );
                    attempt += 1;
                }
                Err(source) => {
                    return Err(PersistError::Write {
                        path: file_path,
                        source,
                    });
                }
            }
        }
    }
}

/// Create `path` exclusively and write `bytes` in one call.
fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = file.write_all(bytes) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(e);
    }
    Ok(())
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
