//! Runtime knobs, read from `VAULT_GALLERY_*` environment variables.

use std::path::PathBuf;

use crate::layout::GridLayout;

const ENV_VAULT_ROOT: &str = "VAULT_GALLERY_ROOT";
const ENV_SLIDESHOW_INTERVAL: &str = "VAULT_GALLERY_SLIDESHOW_INTERVAL";
const ENV_TEXTURE_CACHE: &str = "VAULT_GALLERY_TEXTURE_CACHE";
const ENV_TILE_MIN: &str = "VAULT_GALLERY_TILE_MIN";
const ENV_FOLLOW_SYMLINKS: &str = "VAULT_GALLERY_FOLLOW_SYMLINKS";

const DEFAULT_INTERVAL_TEXT: &str = "3";
const DEFAULT_TEXTURE_CACHE: usize = 64;

#[derive(Debug, Clone)]
pub struct Settings {
    pub vault_root: PathBuf,
    /// Initial contents of the slideshow interval box.
    pub slideshow_interval: String,
    /// Decoded textures kept in memory.
    pub texture_cache_entries: usize,
    pub grid: GridLayout,
    /// Descend into symlinked folders while scanning.
    pub follow_symlinks: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let vault_root = var(ENV_VAULT_ROOT)
            .map(PathBuf::from)
            .unwrap_or_else(default_vault_root);

        let slideshow_interval = var(ENV_SLIDESHOW_INTERVAL)
            .filter(|v| v.parse::<f64>().map(|s| s.is_finite() && s > 0.0).unwrap_or(false))
            .unwrap_or_else(|| DEFAULT_INTERVAL_TEXT.to_owned());

        let texture_cache_entries = var(ENV_TEXTURE_CACHE)
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TEXTURE_CACHE);

        let mut grid = GridLayout::default();
        if let Some(min) = var(ENV_TILE_MIN)
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| v.is_finite() && *v >= 32.0)
        {
            grid.min_tile = min;
        }

        let follow_symlinks = var(ENV_FOLLOW_SYMLINKS)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self {
            vault_root,
            slideshow_interval,
            texture_cache_entries,
            grid,
            follow_symlinks,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Pictures folder, then home, then the working directory.
fn default_vault_root() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| {
            dirs.picture_dir()
                .map(|p| p.to_path_buf())
                .or_else(|| Some(dirs.home_dir().to_path_buf()))
        })
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.slideshow_interval, "3");
        assert_eq!(s.texture_cache_entries, 64);
        assert_eq!(s.grid.min_tile, 200.0);
        assert!(!s.follow_symlinks);
        assert!(!s.vault_root.as_os_str().is_empty());
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("VAULT_GALLERY_ROOT", "/srv/vault"),
            ("VAULT_GALLERY_SLIDESHOW_INTERVAL", "1.5"),
            ("VAULT_GALLERY_TEXTURE_CACHE", "10"),
            ("VAULT_GALLERY_TILE_MIN", "150"),
            ("VAULT_GALLERY_FOLLOW_SYMLINKS", "True"),
        ]);
        assert_eq!(s.vault_root, PathBuf::from("/srv/vault"));
        assert_eq!(s.slideshow_interval, "1.5");
        assert_eq!(s.texture_cache_entries, 10);
        assert_eq!(s.grid.min_tile, 150.0);
        assert!(s.follow_symlinks);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let s = settings(&[
            ("VAULT_GALLERY_ROOT", "  "),
            ("VAULT_GALLERY_SLIDESHOW_INTERVAL", "-4"),
            ("VAULT_GALLERY_TEXTURE_CACHE", "0"),
            ("VAULT_GALLERY_TILE_MIN", "2"),
            ("VAULT_GALLERY_FOLLOW_SYMLINKS", "maybe"),
        ]);
        assert_ne!(s.vault_root, PathBuf::from("  "));
        assert_eq!(s.slideshow_interval, "3");
        assert_eq!(s.texture_cache_entries, 64);
        assert_eq!(s.grid.min_tile, 200.0);
        assert!(!s.follow_symlinks);
    }
}
