use std::ops::Index;
use std::sync::Arc;

use crate::error::{GalleryError, Result};
use crate::models::MediaEntry;

/// The ordered, non-empty collection backing one lightbox session.
///
/// Cloning is cheap; the entries are shared between the gallery grid and any
/// lightbox opened from it.
#[derive(Debug, Clone)]
pub struct MediaCatalog {
    entries: Arc<[MediaEntry]>,
}

impl MediaCatalog {
    pub fn new(entries: Vec<MediaEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(GalleryError::EmptyCatalog);
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MediaEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaEntry> {
        self.entries.iter()
    }

    /// Validates an index coming from outside the lightbox (grid clicks).
    pub fn check_index(&self, index: usize) -> Result<usize> {
        if index < self.len() {
            Ok(index)
        } else {
            Err(GalleryError::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

impl Index<usize> for MediaCatalog {
    type Output = MediaEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}
