use std::fmt;
use std::path::PathBuf;

use rand::RngCore;
use tracing::{debug, info, warn};

use super::options::{GalleryOptions, PathSelection, ROOT_PATH};
use super::sort::sort_entries;
use crate::error::Result;
use crate::models::{MediaCatalog, MediaEntry};
use crate::vault::{FolderLookup, ScanDepth, Vault};

/// Inline message rendered in place of (or above) a gallery grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryNotice {
    FolderNotFound(String),
    FolderUnreadable(String),
    Empty,
}

impl GalleryNotice {
    /// CSS class of the placeholder element.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Empty => "gallery-empty",
            Self::FolderNotFound(_) | Self::FolderUnreadable(_) => "gallery-error",
        }
    }
}

impl fmt::Display for GalleryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FolderNotFound(path) => write!(f, "Folder not found: {path}"),
            Self::FolderUnreadable(path) => write!(f, "Could not read folder: {path}"),
            Self::Empty => f.write_str("No media files found"),
        }
    }
}

/// What one gallery block renders: notices, then a grid of `entries`.
#[derive(Debug, Clone, Default)]
pub struct GalleryContent {
    pub notices: Vec<GalleryNotice>,
    pub entries: Vec<MediaEntry>,
}

impl GalleryContent {
    /// The lightbox catalog for this gallery, `None` when it is empty.
    pub fn catalog(&self) -> Option<MediaCatalog> {
        MediaCatalog::new(self.entries.clone()).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects, filters and sorts the media for one gallery block.
///
/// Folder problems become notices; nothing here fails.
pub fn build_gallery(
    vault: &dyn Vault,
    options: &GalleryOptions,
    rng: &mut dyn RngCore,
) -> GalleryContent {
    let mut content = GalleryContent::default();

    match &options.paths {
        PathSelection::EntireVault => {
            collect(vault, PathBuf::new(), ROOT_PATH, ScanDepth::Recursive, &mut content);
        }
        PathSelection::Folders(paths) => {
            for path in paths {
                // `./` only means the root when it is the whole list.
                if path == ROOT_PATH {
                    content
                        .notices
                        .push(GalleryNotice::FolderNotFound(path.clone()));
                    continue;
                }
                match vault.resolve_folder(path) {
                    FolderLookup::Folder(folder) => {
                        collect(vault, folder, path, ScanDepth::Shallow, &mut content)
                    }
                    FolderLookup::NotAFolder => {
                        debug!(path = %path, "gallery path is a file, skipping");
                    }
                    FolderLookup::Missing => {
                        content
                            .notices
                            .push(GalleryNotice::FolderNotFound(path.clone()));
                    }
                }
            }
        }
    }

    sort_entries(&mut content.entries, options.sort, rng);

    if content.entries.is_empty() {
        content.notices.push(GalleryNotice::Empty);
    }

    info!(
        entries = content.entries.len(),
        notices = content.notices.len(),
        sort = %options.sort,
        "gallery built"
    );
    content
}

fn collect(
    vault: &dyn Vault,
    folder: PathBuf,
    label: &str,
    depth: ScanDepth,
    content: &mut GalleryContent,
) {
    let scanned: Result<Vec<MediaEntry>> = vault.media_in(&folder, depth);
    match scanned {
        Ok(entries) => content.entries.extend(entries),
        Err(e) => {
            warn!("Failed to read gallery folder {:?}: {}", label, e);
            content
                .notices
                .push(GalleryNotice::FolderUnreadable(label.to_owned()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;

    /// Vault with folders `""`, `photos`, `photos/old` and an unreadable `locked`.
    struct MemoryVault {
        entries: Vec<MediaEntry>,
    }

    impl MemoryVault {
        fn new(files: &[(&str, i64)]) -> Self {
            Self {
                entries: files
                    .iter()
                    .filter_map(|(p, t)| MediaEntry::from_path(*p, *t))
                    .collect(),
            }
        }
    }

    impl Vault for MemoryVault {
        fn root(&self) -> &Path {
            Path::new("/vault")
        }

        fn resolve_folder(&self, path: &str) -> FolderLookup {
            match path.trim_end_matches('/') {
                "." | "" => FolderLookup::Folder(PathBuf::new()),
                "photos" | "photos/old" | "locked" => FolderLookup::Folder(PathBuf::from(path)),
                "readme.md" => FolderLookup::NotAFolder,
                _ => FolderLookup::Missing,
            }
        }

        fn media_in(&self, folder: &Path, depth: ScanDepth) -> Result<Vec<MediaEntry>> {
            if folder == Path::new("locked") {
                return Err(GalleryError::Io {
                    path: folder.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            Ok(self
                .entries
                .iter()
                .filter(|e| {
                    let parent = e.path.parent().unwrap_or(Path::new(""));
                    match depth {
                        ScanDepth::Shallow => parent == folder,
                        ScanDepth::Recursive => parent.starts_with(folder),
                    }
                })
                .cloned()
                .collect())
        }

        fn display_source(&self, entry: &MediaEntry) -> PathBuf {
            self.root().join(&entry.path)
        }

        fn reveal_in_file_manager(&self, _entry: &MediaEntry) -> Result<()> {
            Ok(())
        }
    }

    fn vault() -> MemoryVault {
        MemoryVault::new(&[
            ("cover.png", 50),
            ("photos/b.jpg", 30),
            ("photos/A.jpg", 10),
            ("photos/clip.webm", 20),
            ("photos/notes.txt", 99),
            ("photos/old/z.gif", 40),
        ])
    }

    fn names(content: &GalleryContent) -> Vec<&str> {
        content.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn whole_vault_is_recursive_and_date_desc() {
        let mut rng = StdRng::seed_from_u64(0);
        let content = build_gallery(&vault(), &GalleryOptions::default(), &mut rng);
        assert!(content.notices.is_empty());
        assert_eq!(
            names(&content),
            ["cover.png", "z.gif", "b.jpg", "clip.webm", "A.jpg"]
        );
        assert_eq!(content.catalog().map(|c| c.len()), Some(5));
    }

    #[test]
    fn listed_folders_are_shallow() {
        let mut rng = StdRng::seed_from_u64(0);
        let options = GalleryOptions::parse("paths: photos\nsort: name-asc");
        let content = build_gallery(&vault(), &options, &mut rng);
        assert_eq!(names(&content), ["A.jpg", "b.jpg", "clip.webm"]);
    }

    #[test]
    fn root_in_a_list_is_not_found() {
        let mut rng = StdRng::seed_from_u64(0);
        let options = GalleryOptions::parse("paths: ./, photos/old\nsort: date-asc");
        let content = build_gallery(&vault(), &options, &mut rng);
        assert_eq!(
            content.notices,
            vec![GalleryNotice::FolderNotFound("./".into())]
        );
        assert_eq!(content.notices[0].to_string(), "Folder not found: ./");
        assert_eq!(names(&content), ["z.gif"]);
    }

    #[test]
    fn lone_root_still_scans_everything() {
        let mut rng = StdRng::seed_from_u64(0);
        let content = build_gallery(&vault(), &GalleryOptions::parse("paths: ./"), &mut rng);
        assert!(content.notices.is_empty());
        assert_eq!(content.entries.len(), 5);
    }

    #[test]
    fn missing_folder_gets_a_notice_and_the_rest_still_renders() {
        let mut rng = StdRng::seed_from_u64(0);
        let options = GalleryOptions::parse("paths: nowhere, photos/old, readme.md");
        let content = build_gallery(&vault(), &options, &mut rng);
        assert_eq!(
            content.notices,
            vec![GalleryNotice::FolderNotFound("nowhere".into())]
        );
        assert_eq!(content.notices[0].to_string(), "Folder not found: nowhere");
        assert_eq!(content.notices[0].css_class(), "gallery-error");
        assert_eq!(names(&content), ["z.gif"]);
    }

    #[test]
    fn unreadable_folder_gets_a_notice() {
        let mut rng = StdRng::seed_from_u64(0);
        let options = GalleryOptions::parse("paths: locked");
        let content = build_gallery(&vault(), &options, &mut rng);
        assert_eq!(
            content.notices,
            vec![
                GalleryNotice::FolderUnreadable("locked".into()),
                GalleryNotice::Empty
            ]
        );
    }

    #[test]
    fn empty_result_has_placeholder_and_no_catalog() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty = MemoryVault::new(&[("notes.md", 1)]);
        let content = build_gallery(&empty, &GalleryOptions::parse("./"), &mut rng);
        assert!(content.is_empty());
        assert_eq!(content.notices, vec![GalleryNotice::Empty]);
        assert_eq!(content.notices[0].to_string(), "No media files found");
        assert!(content.catalog().is_none());
    }
}
