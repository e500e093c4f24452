use std::fmt;
use std::io;
use std::path::PathBuf;

use image::ImageError;

#[derive(Debug)]
pub enum IconError {
    /// Source image missing or unreadable.
    FileAccess { path: PathBuf, source: io::Error },
    /// Source file could not be decoded as an image.
    ImageFormat { path: PathBuf, source: ImageError },
    /// Output directory or file could not be created or written.
    Filesystem { path: PathBuf, source: io::Error },
    Encode { path: PathBuf, source: ImageError },
    MaskMismatch { image: (u32, u32), mask: (u32, u32) },
    InvalidConfig(String),
}

impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconError::FileAccess { path, .. } => {
                write!(f, "cannot read source image {}", path.display())
            }
            IconError::ImageFormat { path, .. } => {
                write!(f, "{} is not a decodable image", path.display())
            }
            IconError::Filesystem { path, .. } => {
                write!(f, "cannot write {}", path.display())
            }
            IconError::Encode { path, .. } => {
                write!(f, "failed to encode {}", path.display())
            }
            IconError::MaskMismatch { image, mask } => write!(
                f,
                "mask is {}x{} but image is {}x{}",
                mask.0, mask.1, image.0, image.1
            ),
            IconError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for IconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IconError::FileAccess { source, .. } | IconError::Filesystem { source, .. } => {
                Some(source)
            }
            IconError::ImageFormat { source, .. } | IconError::Encode { source, .. } => {
                Some(source)
            }
            IconError::MaskMismatch { .. } | IconError::InvalidConfig(_) => None,
        }
    }
}
