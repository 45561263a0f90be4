//! Raw image persistence on the local filesystem.
//!
//! # Responsibility
//! - Write uploaded image bytes to a caller-assembled path.
//! - Read stored image bytes back for serving.
//!
//! # Invariants
//! - Paths are used as given; sanitizing names is the caller's job.
//! - No transactional link with item writes: an image stored before a failed
//!   insert stays on disk.

use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type ImageResult<T> = Result<T, ImageError>;

#[derive(Debug)]
pub enum ImageError {
    /// No image exists at the requested path.
    NotFound(PathBuf),
    Io(std::io::Error),
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "image not found: {}", path.display()),
            Self::Io(err) => write!(f, "image io failed: {err}"),
        }
    }
}

impl Error for ImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Writes `bytes` to `path`, creating or truncating the file.
pub fn store_image(path: impl AsRef<Path>, bytes: &[u8]) -> ImageResult<()> {
    let path = path.as_ref();
    match std::fs::write(path, bytes) {
        Ok(()) => {
            debug!(
                "event=image_store module=image status=ok bytes={}",
                bytes.len()
            );
            Ok(())
        }
        Err(err) => {
            error!("event=image_store module=image status=error error={err}");
            Err(err.into())
        }
    }
}

/// Reads the image at `path`.
///
/// A missing file is reported as `ImageError::NotFound`, other failures as
/// `ImageError::Io`.
pub fn load_image(path: impl AsRef<Path>) -> ImageResult<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ImageError::NotFound(path.to_path_buf()),
        _ => ImageError::Io(err),
    })
}
