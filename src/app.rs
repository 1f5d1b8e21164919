use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{gio, Application};

use crate::settings::Settings;
use crate::ui::{GalleryWindow, StyleRegistry};

const APP_ID: &str = "com.vaultgallery.Gallery";

pub struct GalleryApp {
    app: Application,
}

impl GalleryApp {
    pub fn new() -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        let style = Rc::new(RefCell::new(StyleRegistry::new()));

        let activate_style = style.clone();
        app.connect_activate(move |app| Self::on_activate(app, &activate_style));
        let open_style = style.clone();
        app.connect_open(move |app, files, _hint| Self::on_open(app, files, &open_style));
        app.connect_shutdown(move |_| style.borrow_mut().uninstall());

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn on_activate(app: &Application, style: &Rc<RefCell<StyleRegistry>>) {
        Self::show(app, style, None);
    }

    /// The opened file is a markdown note whose gallery blocks are rendered.
    fn on_open(app: &Application, files: &[gio::File], style: &Rc<RefCell<StyleRegistry>>) {
        let note = files.first().and_then(|f| f.path()).and_then(|path| {
            std::fs::read_to_string(&path)
                .map_err(|e| tracing::warn!("Failed to read note {:?}: {}", path, e))
                .ok()
        });
        Self::show(app, style, note);
    }

    fn show(app: &Application, style: &Rc<RefCell<StyleRegistry>>, note: Option<String>) {
        let settings = Settings::from_env();
        tracing::info!(root = ?settings.vault_root, "opening vault");
        let window = GalleryWindow::new(app, settings, style.clone());
        window.load_note(note);
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("main-window", window);
        }
    }
}

impl Default for GalleryApp {
    fn default() -> Self {
        Self::new()
    }
}
