//! The host's file-listing surface.
//!
//! Gallery construction and the lightbox only ever talk to a [`Vault`]; the
//! on-disk implementation lives in [`fs_vault`].

pub mod fs_vault;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::MediaEntry;

pub use fs_vault::FsVault;

/// Outcome of resolving a user-supplied folder path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderLookup {
    /// Vault-relative folder path (empty for the root).
    Folder(PathBuf),
    /// The path exists but is a file.
    NotAFolder,
    Missing,
}

/// How far below a folder to look for media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDepth {
    /// Direct children only.
    Shallow,
    /// The whole subtree.
    Recursive,
}

pub trait Vault {
    /// Absolute root of the vault on disk.
    fn root(&self) -> &Path;

    fn resolve_folder(&self, path: &str) -> FolderLookup;

    /// Media files under `folder` (as returned by [`Vault::resolve_folder`]),
    /// in traversal order.
    fn media_in(&self, folder: &Path, depth: ScanDepth) -> Result<Vec<MediaEntry>>;

    /// A path the front-end can load the entry from.
    fn display_source(&self, entry: &MediaEntry) -> PathBuf;

    /// Shows the entry in the platform file manager.
    fn reveal_in_file_manager(&self, entry: &MediaEntry) -> Result<()>;
}
