use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the gallery core.
///
/// None of these are fatal to the host: gallery construction turns them into
/// inline notices, and the lightbox refuses to open instead of panicking.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("cannot open a lightbox on an empty catalog")]
    EmptyCatalog,

    #[error("start index {index} is out of range for a catalog of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to reveal {path:?} in the file manager: {source}")]
    Reveal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no file manager launcher is available on this platform")]
    NoFileManager,
}

pub type Result<T> = std::result::Result<T, GalleryError>;
