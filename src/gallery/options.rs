//! Parsing of a gallery block body.
//!
//! ```text
//! paths: trips/2024, trips/2023
//! sort: name-asc
//! ```

use std::fmt;
use std::str::FromStr;

/// Folder path meaning "the vault root".
pub const ROOT_PATH: &str = "./";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    DateAsc,
    #[default]
    DateDesc,
    Random,
    NameAsc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
            Self::Random => "random",
            Self::NameAsc => "name-asc",
        }
    }

    /// Lenient parse: anything unrecognized sorts by name.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(Self::NameAsc)
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "date-asc" => Ok(Self::DateAsc),
            "date-desc" => Ok(Self::DateDesc),
            "random" => Ok(Self::Random),
            "name-asc" => Ok(Self::NameAsc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which folders a gallery draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSelection {
    /// Every media file in the vault, recursively.
    EntireVault,
    /// Direct children of each listed folder, in list order.
    Folders(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryOptions {
    pub paths: PathSelection,
    pub sort: SortOrder,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            paths: PathSelection::EntireVault,
            sort: SortOrder::default(),
        }
    }
}

impl GalleryOptions {
    /// Parses a block body. Never fails; unknown keys are ignored.
    pub fn parse(source: &str) -> Self {
        let mut paths: Vec<String> = Vec::new();
        let mut sort = SortOrder::default();

        for line in source.lines().map(str::trim) {
            if let Some(value) = line.strip_prefix("paths:") {
                paths = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_owned)
                    .collect();
            } else if let Some(value) = line.strip_prefix("sort:") {
                sort = SortOrder::parse_lenient(value);
            } else if !line.is_empty() && !line.contains(':') {
                // Legacy form: a bare line is the one folder to show.
                paths = vec![line.to_owned()];
            }
        }

        let paths = match paths.as_slice() {
            [] => PathSelection::EntireVault,
            [only] if only == ROOT_PATH => PathSelection::EntireVault,
            _ => PathSelection::Folders(paths),
        };

        Self { paths, sort }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_uses_defaults() {
        assert_eq!(GalleryOptions::parse(""), GalleryOptions::default());
        assert_eq!(GalleryOptions::parse("\n   \n").sort, SortOrder::DateDesc);
    }

    #[test]
    fn paths_and_sort() {
        let options = GalleryOptions::parse("paths: a/b, c ,, d\nsort: date-asc\n");
        assert_eq!(
            options.paths,
            PathSelection::Folders(vec!["a/b".into(), "c".into(), "d".into()])
        );
        assert_eq!(options.sort, SortOrder::DateAsc);
    }

    #[test]
    fn single_root_path_means_whole_vault() {
        let options = GalleryOptions::parse("paths: ./");
        assert_eq!(options.paths, PathSelection::EntireVault);

        let options = GalleryOptions::parse("paths: ./, photos");
        assert_eq!(
            options.paths,
            PathSelection::Folders(vec!["./".into(), "photos".into()])
        );
    }

    #[test]
    fn unknown_sort_falls_back_to_name() {
        assert_eq!(GalleryOptions::parse("sort: size").sort, SortOrder::NameAsc);
        assert_eq!(GalleryOptions::parse("sort:").sort, SortOrder::NameAsc);
        assert_eq!(GalleryOptions::parse("sort: random").sort, SortOrder::Random);
    }

    #[test]
    fn legacy_bare_line_replaces_paths() {
        let options = GalleryOptions::parse("paths: a, b\nAttachments/Photos");
        assert_eq!(
            options.paths,
            PathSelection::Folders(vec!["Attachments/Photos".into()])
        );
    }

    #[test]
    fn later_paths_line_wins() {
        let options = GalleryOptions::parse("legacy\npaths: x");
        assert_eq!(options.paths, PathSelection::Folders(vec!["x".into()]));
    }

    #[test]
    fn sort_order_round_trips_through_display() {
        for order in [
            SortOrder::DateAsc,
            SortOrder::DateDesc,
            SortOrder::Random,
            SortOrder::NameAsc,
        ] {
            assert_eq!(order.to_string().parse::<SortOrder>(), Ok(order));
        }
    }
}
