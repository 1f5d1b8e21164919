use std::path::{Path, PathBuf};

/// Image extensions shown by the gallery (matched case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"];
/// Video extensions shown by the gallery (matched case-insensitively).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogv", "mov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// A single file shown in a gallery and in the lightbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    /// Path relative to the vault root, with `/` separators.
    pub path: PathBuf,
    /// File name as displayed in the lightbox link.
    pub name: String,
    pub kind: MediaKind,
    /// Modification time in milliseconds since the Unix epoch.
    pub mtime_ms: i64,
}

impl MediaEntry {
    /// Builds an entry from a vault-relative path, or `None` if the extension
    /// is not on the media allow-list.
    pub fn from_path(path: impl Into<PathBuf>, mtime_ms: i64) -> Option<Self> {
        let path = path.into();
        let kind = MediaKind::from_path(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Some(Self {
            path,
            name,
            kind,
            mtime_ms,
        })
    }

    pub fn is_image(&self) -> bool {
        self.kind == MediaKind::Image
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}
