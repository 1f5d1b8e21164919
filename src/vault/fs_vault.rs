//! Directory-backed vault.
//!
//! Walks the vault with `walkdir`, skipping hidden (dot-prefixed) files and
//! folders, and keeps every returned path relative to the vault root.

use std::path::{Component, Path, PathBuf};
use std::process::Command;
use std::time::UNIX_EPOCH;

use tracing::{debug, info, trace, warn};
use walkdir::{DirEntry, WalkDir};

use super::{FolderLookup, ScanDepth, Vault};
use crate::error::{GalleryError, Result};
use crate::models::MediaEntry;

#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
    follow_symlinks: bool,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
        }
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    fn absolute(&self, folder: &Path) -> PathBuf {
        if folder.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(folder)
        }
    }

    fn entry_from_walk(&self, entry: &DirEntry) -> Option<MediaEntry> {
        let relative = entry.path().strip_prefix(&self.root).ok()?;

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("Failed to read metadata for {:?}: {}", entry.path(), e);
                return None;
            }
        };

        let mtime_ms = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        MediaEntry::from_path(relative, mtime_ms)
    }
}

/// Normalizes a user-supplied folder path to a vault-relative one.
///
/// `.`, `./` and `/` all name the root. Returns `None` when `..` would climb
/// out of the vault.
pub fn normalize_folder(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim().trim_start_matches('/');
    let mut parts: Vec<&str> = Vec::new();

    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(parts.iter().collect())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

impl Vault for FsVault {
    fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_folder(&self, path: &str) -> FolderLookup {
        let Some(relative) = normalize_folder(path) else {
            debug!(path, "folder path escapes the vault");
            return FolderLookup::Missing;
        };

        match std::fs::metadata(self.absolute(&relative)) {
            Ok(meta) if meta.is_dir() => FolderLookup::Folder(relative),
            Ok(_) => FolderLookup::NotAFolder,
            Err(_) => FolderLookup::Missing,
        }
    }

    fn media_in(&self, folder: &Path, depth: ScanDepth) -> Result<Vec<MediaEntry>> {
        let dir = self.absolute(folder);
        debug!("Scanning {:?} ({:?})", dir, depth);

        let mut walker = WalkDir::new(&dir)
            .min_depth(1)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();
        if depth == ScanDepth::Shallow {
            walker = walker.max_depth(1);
        }

        let mut entries = Vec::new();

        for item in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(GalleryError::Walk {
                        path: dir.clone(),
                        source: e,
                    })
                }
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", dir, e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            match self.entry_from_walk(&entry) {
                Some(media) => entries.push(media),
                None => trace!("Not media: {:?}", entry.path()),
            }
        }

        info!("Found {} media files in {:?}", entries.len(), dir);
        Ok(entries)
    }

    fn display_source(&self, entry: &MediaEntry) -> PathBuf {
        self.root.join(&entry.path)
    }

    fn reveal_in_file_manager(&self, entry: &MediaEntry) -> Result<()> {
        let path = self.display_source(entry);
        let mut command = reveal_command(&path)?;
        debug!("Revealing {:?} with {:?}", path, command);
        command
            .spawn()
            .map(|_| ())
            .map_err(|source| GalleryError::Reveal { path, source })
    }
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Result<Command> {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    Ok(command)
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Result<Command> {
    let mut command = Command::new("explorer");
    command.arg(format!("/select,{}", path.display()));
    Ok(command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn reveal_command(path: &Path) -> Result<Command> {
    // xdg-open cannot select a file, so open its folder instead.
    let folder = path.parent().unwrap_or(path);
    let mut command = Command::new("xdg-open");
    command.arg(folder);
    Ok(command)
}

#[cfg(not(any(unix, target_os = "windows")))]
fn reveal_command(_path: &Path) -> Result<Command> {
    Err(GalleryError::NoFileManager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_image(path: &Path) {
        // Minimal 1x1 PNG
        let png_data: [u8; 67] = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00,
            0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08,
            0xD7, 0x63, 0xF8, 0x0F, 0x00, 0x00, 0x01, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0xB4, 0x00,
            0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
        ];

        let mut file = File::create(path).unwrap();
        file.write_all(&png_data).unwrap();
    }

    fn names(entries: &[MediaEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_normalize_folder() {
        assert_eq!(normalize_folder("./"), Some(PathBuf::new()));
        assert_eq!(normalize_folder("."), Some(PathBuf::new()));
        assert_eq!(normalize_folder("/"), Some(PathBuf::new()));
        assert_eq!(normalize_folder(" trips/2024/ "), Some(PathBuf::from("trips/2024")));
        assert_eq!(normalize_folder("a/../b"), Some(PathBuf::from("b")));
        assert_eq!(normalize_folder("../outside"), None);
    }

    #[test]
    fn test_resolve_folder() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        create_test_image(&dir.path().join("cover.png"));

        let vault = FsVault::new(dir.path());
        assert_eq!(
            vault.resolve_folder("photos"),
            FolderLookup::Folder(PathBuf::from("photos"))
        );
        assert_eq!(vault.resolve_folder("./"), FolderLookup::Folder(PathBuf::new()));
        assert_eq!(vault.resolve_folder("cover.png"), FolderLookup::NotAFolder);
        assert_eq!(vault.resolve_folder("nope"), FolderLookup::Missing);
        assert_eq!(vault.resolve_folder("../.."), FolderLookup::Missing);
    }

    #[test]
    fn test_media_in_shallow_and_recursive() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        create_test_image(&dir.path().join("root.png"));
        create_test_image(&sub.join("nested.png"));
        File::create(dir.path().join("clip.MP4")).unwrap();
        File::create(dir.path().join("notes.md")).unwrap();

        let vault = FsVault::new(dir.path());

        let shallow = vault.media_in(Path::new(""), ScanDepth::Shallow).unwrap();
        assert_eq!(names(&shallow), vec!["clip.MP4", "root.png"]);
        assert!(shallow[0].is_video());

        let recursive = vault.media_in(Path::new(""), ScanDepth::Recursive).unwrap();
        assert_eq!(names(&recursive), vec!["clip.MP4", "root.png", "sub/nested.png"]);

        let only_sub = vault.media_in(Path::new("sub"), ScanDepth::Shallow).unwrap();
        assert_eq!(names(&only_sub), vec!["sub/nested.png"]);
        assert_eq!(only_sub[0].name, "nested.png");
        assert!(only_sub[0].mtime_ms > 0);
    }

    #[test]
    fn test_hidden_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let hidden_dir = dir.path().join(".trash");
        fs::create_dir(&hidden_dir).unwrap();
        create_test_image(&hidden_dir.join("deleted.png"));
        create_test_image(&dir.path().join(".hidden.png"));
        create_test_image(&dir.path().join("visible.png"));

        let vault = FsVault::new(dir.path());
        let entries = vault.media_in(Path::new(""), ScanDepth::Recursive).unwrap();
        assert_eq!(names(&entries), vec!["visible.png"]);
    }

    #[test]
    fn test_missing_folder_is_walk_error() {
        let dir = tempdir().unwrap();
        let vault = FsVault::new(dir.path());
        let result = vault.media_in(Path::new("gone"), ScanDepth::Recursive);
        assert!(matches!(result, Err(GalleryError::Walk { .. })));
    }

    #[test]
    fn test_display_source_is_absolute() {
        let dir = tempdir().unwrap();
        let vault = FsVault::new(dir.path());
        let entry = MediaEntry::from_path("a/b.png", 0).unwrap();
        assert_eq!(vault.display_source(&entry), dir.path().join("a/b.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_folders_only_when_enabled() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        create_test_image(&outside.path().join("linked.png"));
        std::os::unix::fs::symlink(outside.path(), dir.path().join("shared")).unwrap();
        create_test_image(&dir.path().join("own.png"));

        let plain = FsVault::new(dir.path());
        let entries = plain.media_in(Path::new(""), ScanDepth::Recursive).unwrap();
        assert_eq!(names(&entries), vec!["own.png"]);

        let following = FsVault::new(dir.path()).with_follow_symlinks(true);
        let entries = following
            .media_in(Path::new(""), ScanDepth::Recursive)
            .unwrap();
        assert_eq!(names(&entries), vec!["own.png", "shared/linked.png"]);
    }
}
