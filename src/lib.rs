//! Media gallery with a full-screen lightbox.
//!
//! The gallery, vault and lightbox modules are toolkit-agnostic. The GTK4
//! front-end lives in [`ui`] behind the `gtk` feature.

pub mod error;
pub mod gallery;
pub mod image_loader;
pub mod layout;
pub mod lightbox;
pub mod models;
pub mod settings;
pub mod vault;

#[cfg(feature = "gtk")]
pub mod app;
#[cfg(feature = "gtk")]
pub mod ui;

pub use error::{GalleryError, Result};
pub use settings::Settings;
