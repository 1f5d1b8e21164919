// Stylesheet for the gallery grid and the lightbox overlay
// Installed once per process, removed again on application shutdown

use gdk4::Display;
use gtk4::CssProvider;
use once_cell::unsync::OnceCell;

const GALLERY_CSS: &str = r#"
.media-gallery-container {
    padding: 10px;
}

.gallery-item {
    border-radius: 8px;
    background-color: alpha(currentColor, 0.06);
}

.gallery-item:hover {
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.3);
}

.gallery-error,
.gallery-empty {
    padding: 20px;
    color: alpha(currentColor, 0.6);
}

.media-lightbox-overlay {
    background-color: @window_bg_color;
}

.lightbox-topbar {
    padding: 15px 20px;
    background-color: @headerbar_bg_color;
    border-bottom: 1px solid alpha(currentColor, 0.15);
}

.lightbox-interval-input {
    min-width: 60px;
    font-size: 14px;
}

.lightbox-interval-input:disabled {
    opacity: 0.5;
}

.lightbox-random-btn,
.lightbox-slideshow-btn,
.lightbox-file-link {
    padding: 8px 16px;
    border-radius: 6px;
    font-size: 14px;
}

.lightbox-random-btn.active,
.lightbox-slideshow-btn.active {
    background-color: @accent_bg_color;
    color: @accent_fg_color;
}

.lightbox-file-link:hover label {
    text-decoration: underline;
}

.lightbox-close-box {
    padding: 0 0 0 14px;
}

.lightbox-close-btn {
    font-size: 20px;
    min-width: 40px;
    min-height: 40px;
    padding: 0;
}

.lightbox-main {
    background-color: @window_bg_color;
}

.lightbox-nav {
    background-color: rgba(0, 0, 0, 0.5);
    color: white;
    font-size: 48px;
    min-width: 60px;
    min-height: 60px;
    border-radius: 9999px;
    margin: 0 20px;
    padding: 0;
}

.lightbox-nav:hover {
    background-color: rgba(0, 0, 0, 0.8);
}

.lightbox-thumbnails {
    padding: 15px;
    background-color: @headerbar_bg_color;
    border-top: 1px solid alpha(currentColor, 0.15);
}

.lightbox-thumb {
    border-radius: 4px;
    border: 2px solid transparent;
    padding: 0;
}

.lightbox-thumb.active {
    border-color: @accent_bg_color;
}
"#;

/// Owns the process-wide stylesheet.
#[derive(Default)]
pub struct StyleRegistry {
    provider: OnceCell<CssProvider>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.provider.get().is_some()
    }

    /// Installs the stylesheet on first call; later calls are no-ops.
    pub fn ensure_installed(&self) {
        self.provider.get_or_init(|| {
            let provider = CssProvider::new();
            provider.load_from_string(GALLERY_CSS);
            if let Some(display) = Display::default() {
                gtk4::style_context_add_provider_for_display(
                    &display,
                    &provider,
                    gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
                );
            }
            tracing::debug!("gallery stylesheet installed");
            provider
        });
    }

    pub fn uninstall(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Some(display) = Display::default() {
                gtk4::style_context_remove_provider_for_display(&display, &provider);
            }
            tracing::debug!("gallery stylesheet removed");
        }
    }
}
