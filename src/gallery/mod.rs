//! Gallery blocks: option parsing, media collection and ordering.

pub mod blocks;
pub mod build;
pub mod options;
pub mod sort;

use anyhow::Context;
use rand::RngCore;
use tokio::task;

pub use blocks::{find_gallery_blocks, GalleryBlock, GALLERY_BLOCK_LANGUAGE};
pub use build::{build_gallery, GalleryContent, GalleryNotice};
pub use options::{GalleryOptions, PathSelection, SortOrder};
pub use sort::{compare_names, sort_entries};

use crate::vault::{FsVault, Vault};

/// Builds one gallery per block in `markdown`. A note without gallery blocks
/// renders a single default (whole vault) gallery.
pub fn build_note(
    vault: &dyn Vault,
    markdown: Option<&str>,
    rng: &mut dyn RngCore,
) -> Vec<GalleryContent> {
    let blocks = markdown.map(find_gallery_blocks).unwrap_or_default();
    if blocks.is_empty() {
        return vec![build_gallery(vault, &GalleryOptions::default(), rng)];
    }

    blocks
        .iter()
        .map(|block| build_gallery(vault, &GalleryOptions::parse(&block.body), rng))
        .collect()
}

/// [`build_note`] on the blocking pool.
pub async fn build_note_async(
    vault: FsVault,
    markdown: Option<String>,
) -> anyhow::Result<Vec<GalleryContent>> {
    task::spawn_blocking(move || build_note(&vault, markdown.as_deref(), &mut rand::rng()))
        .await
        .context("Gallery build task panicked")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn names(content: &GalleryContent) -> Vec<&str> {
        content.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn note_without_blocks_renders_whole_vault() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.png");
        touch(dir.path(), "trips/b.jpg");
        touch(dir.path(), ".trash/c.png");

        let vault = FsVault::new(dir.path());
        let mut rng = StdRng::seed_from_u64(3);
        let galleries = build_note(&vault, Some("# Just text\n"), &mut rng);
        assert_eq!(galleries.len(), 1);
        assert_eq!(galleries[0].entries.len(), 2);
        assert!(galleries[0].notices.is_empty());

        let galleries = build_note(&vault, None, &mut rng);
        assert_eq!(galleries.len(), 1);
    }

    #[test]
    fn one_gallery_per_block() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "trips/b.jpg");
        touch(dir.path(), "trips/A.jpg");
        touch(dir.path(), "trips/deep/c.jpg");
        touch(dir.path(), "clips/d.mp4");

        let note = "\
```gallery-pro
paths: trips/
sort: name-asc
```

text

```gallery-pro
paths: clips, nowhere
```
";
        let vault = FsVault::new(dir.path());
        let galleries = build_note(&vault, Some(note), &mut StdRng::seed_from_u64(3));
        assert_eq!(galleries.len(), 2);
        assert_eq!(names(&galleries[0]), vec!["A.jpg", "b.jpg"]);
        assert_eq!(names(&galleries[1]), vec!["d.mp4"]);
        assert_eq!(
            galleries[1].notices,
            vec![GalleryNotice::FolderNotFound("nowhere".into())]
        );
    }

    #[tokio::test]
    async fn test_build_note_async() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "x.webp");

        let galleries = build_note_async(FsVault::new(dir.path()), None)
            .await
            .unwrap();
        assert_eq!(galleries.len(), 1);
        assert_eq!(names(&galleries[0]), vec!["x.webp"]);

        let empty = tempdir().unwrap();
        let galleries = build_note_async(FsVault::new(empty.path()), None)
            .await
            .unwrap();
        assert_eq!(galleries[0].notices, vec![GalleryNotice::Empty]);
        assert!(galleries[0].catalog().is_none());
    }
}
