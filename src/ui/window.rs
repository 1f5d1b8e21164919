// Main window for the vault gallery
// Features:
// - One square-tile grid per gallery block, stacked in a scrolled column
// - Grids are rebuilt in the background and relaid out whenever the width changes
// - Clicking a tile opens the lightbox over the window

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tokio::runtime::Builder as TokioRuntimeBuilder;

use gtk4::prelude::*;
use gtk4::{
    glib, Align, Application, ApplicationWindow, Box as GtkBox, ContentFit, Fixed, GestureClick,
    Label, MediaFile, Orientation, Overlay, Picture, PolicyType, ScrolledWindow, Widget,
};

use super::style::StyleRegistry;
use super::textures::{TextureLoader, TILE_DECODE_EDGE};
use super::ticker::{GlibTicker, SharedSession};
use super::viewer::GtkLightboxView;
use crate::gallery::{build_note_async, GalleryContent};
use crate::layout::GridLayout;
use crate::lightbox::LightboxSession;
use crate::models::{MediaCatalog, MediaKind};
use crate::settings::Settings;
use crate::vault::{FsVault, Vault};

/// Tiles of one rendered gallery, placed on a `Fixed`.
struct GalleryGrid {
    fixed: Fixed,
    tiles: Vec<GtkBox>,
}

impl GalleryGrid {
    fn relayout(&self, layout: &GridLayout, width: f32) {
        let metrics = layout.metrics(self.tiles.len(), width);
        for placement in layout.compute(self.tiles.len(), width) {
            let tile = &self.tiles[placement.index];
            let size = placement.size.round() as i32;
            tile.set_size_request(size, size);
            self.fixed
                .move_(tile, placement.x as f64, placement.y as f64);
        }
        self.fixed
            .set_size_request(-1, metrics.total_height.ceil() as i32);
    }
}

pub struct GalleryWindow {
    self_weak: RefCell<Weak<GalleryWindow>>,
    window: ApplicationWindow,
    host: Overlay,
    scroller: ScrolledWindow,
    galleries: GtkBox,
    settings: Settings,
    vault: FsVault,
    textures: Rc<TextureLoader>,
    session: SharedSession,
    style: Rc<RefCell<StyleRegistry>>,
    grids: RefCell<Vec<GalleryGrid>>,
    last_layout_width: Cell<i32>,
    load_generation: Cell<u64>,
}

impl GalleryWindow {
    pub fn new(
        app: &Application,
        settings: Settings,
        style: Rc<RefCell<StyleRegistry>>,
    ) -> Rc<Self> {
        let window = ApplicationWindow::builder()
            .application(app)
            .title("Vault Gallery")
            .default_width(1200)
            .default_height(800)
            .build();

        let galleries = GtkBox::new(Orientation::Vertical, 20);
        galleries.set_valign(Align::Start);

        let scroller = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .child(&galleries)
            .build();
        scroller.set_hexpand(true);
        scroller.set_vexpand(true);

        // The lightbox is added as an overlay on top of the scroller.
        let host = Overlay::new();
        host.set_child(Some(&scroller));
        window.set_child(Some(&host));

        let vault = FsVault::new(settings.vault_root.clone())
            .with_follow_symlinks(settings.follow_symlinks);
        let shared_vault: Rc<dyn Vault> = Rc::new(vault.clone());
        let session: SharedSession = Rc::new_cyclic(|weak| {
            RefCell::new(LightboxSession::new(
                shared_vault,
                Rc::new(GlibTicker::new(weak.clone())),
            ))
        });
        let textures = TextureLoader::new(settings.texture_cache_entries);

        let gallery_window = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            window,
            host,
            scroller,
            galleries,
            settings,
            vault,
            textures,
            session,
            style,
            grids: RefCell::new(Vec::new()),
            last_layout_width: Cell::new(0),
            load_generation: Cell::new(0),
        });
        *gallery_window.self_weak.borrow_mut() = Rc::downgrade(&gallery_window);

        gallery_window.setup_layout_resize_observer();
        gallery_window.setup_close_handler();
        gallery_window
    }

    pub fn present(&self) {
        self.window.present();
    }

    fn setup_layout_resize_observer(self: &Rc<Self>) {
        let weak_self = Rc::downgrade(self);
        self.scroller.add_tick_callback(move |_widget, _clock| {
            let Some(window) = weak_self.upgrade() else {
                return glib::ControlFlow::Break;
            };
            let width = window.scroller.width();
            if width > 0 && width != window.last_layout_width.get() {
                window.last_layout_width.set(width);
                window.relayout_grids();
            }
            glib::ControlFlow::Continue
        });
    }

    fn setup_close_handler(&self) {
        let session = Rc::downgrade(&self.session);
        self.window.connect_close_request(move |_| {
            // Stop any slideshow timer before the widgets go away.
            if let Some(session) = session.upgrade() {
                if let Ok(mut session) = session.try_borrow_mut() {
                    session.close();
                }
            }
            glib::Propagation::Proceed
        });
    }

    fn relayout_grids(&self) {
        let width = self.last_layout_width.get() as f32;
        if width <= 0.0 {
            return;
        }
        for grid in self.grids.borrow().iter() {
            grid.relayout(&self.settings.grid, width);
        }
    }

    /// Builds the galleries for `markdown` (or the whole vault when `None`)
    /// off the main thread, then renders them.
    pub fn load_note(&self, markdown: Option<String>) {
        let generation = self.load_generation.get().wrapping_add(1);
        self.load_generation.set(generation);
        tracing::info!(root = ?self.vault.root(), generation, "building galleries");

        let (tx, rx) = async_channel::bounded::<Vec<GalleryContent>>(1);
        let vault = self.vault.clone();
        std::thread::spawn(move || {
            let built = (|| -> anyhow::Result<Vec<GalleryContent>> {
                let runtime = TokioRuntimeBuilder::new_current_thread()
                    .enable_all()
                    .build()?;
                runtime.block_on(build_note_async(vault, markdown))
            })();
            match built {
                Ok(contents) => {
                    let _ = tx.send_blocking(contents);
                }
                Err(err) => tracing::warn!(error = ?err, "Failed to build galleries"),
            }
        });

        let weak_self = self.self_weak.borrow().clone();
        glib::spawn_future_local(async move {
            let Ok(contents) = rx.recv().await else {
                tracing::warn!("gallery build thread ended without a result");
                return;
            };
            if let Some(window) = weak_self.upgrade() {
                if window.load_generation.get() == generation {
                    window.show_galleries(contents);
                }
            }
        });
    }

    fn show_galleries(&self, contents: Vec<GalleryContent>) {
        self.style.borrow().ensure_installed();

        while let Some(child) = self.galleries.first_child() {
            self.galleries.remove(&child);
        }
        self.grids.borrow_mut().clear();

        for (gallery_index, content) in contents.into_iter().enumerate() {
            let container = GtkBox::new(Orientation::Vertical, 0);
            container.add_css_class("media-gallery-container");

            for notice in &content.notices {
                let label = Label::new(Some(&notice.to_string()));
                label.add_css_class(notice.css_class());
                label.set_halign(Align::Center);
                container.append(&label);
            }

            if let Some(catalog) = content.catalog() {
                tracing::debug!(gallery_index, entries = catalog.len(), "rendering gallery");
                let grid = self.build_grid(catalog);
                container.append(&grid.fixed);
                self.grids.borrow_mut().push(grid);
            }

            self.galleries.append(&container);
        }

        self.relayout_grids();
    }

    fn build_grid(&self, catalog: MediaCatalog) -> GalleryGrid {
        let fixed = Fixed::new();
        fixed.set_hexpand(true);

        let tiles = catalog
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let tile = GtkBox::new(Orientation::Vertical, 0);
                tile.add_css_class("gallery-item");
                tile.set_overflow(gtk4::Overflow::Hidden);
                tile.set_tooltip_text(Some(&entry.name));
                tile.set_cursor_from_name(Some("pointer"));

                let picture = Picture::new();
                picture.set_content_fit(ContentFit::Cover);
                picture.set_can_shrink(true);
                picture.set_hexpand(true);
                picture.set_vexpand(true);
                picture.set_alternative_text(Some(&entry.name));

                let source = self.vault.display_source(entry);
                match entry.kind {
                    MediaKind::Image => {
                        let picture = picture.downgrade();
                        self.textures.load(&source, TILE_DECODE_EDGE, move |texture| {
                            if let Some(picture) = picture.upgrade() {
                                picture.set_paintable(texture.as_ref());
                            }
                        });
                    }
                    MediaKind::Video => {
                        let media = MediaFile::for_filename(&source);
                        media.set_muted(true);
                        media.set_loop(true);
                        media.play();
                        picture.set_paintable(Some(&media));
                    }
                }
                tile.append(&picture);

                let click = GestureClick::new();
                let weak_self = self.self_weak.borrow().clone();
                let tile_catalog = catalog.clone();
                click.connect_released(move |_, _, _, _| {
                    if let Some(window) = weak_self.upgrade() {
                        window.open_lightbox(tile_catalog.clone(), index);
                    }
                });
                tile.add_controller(click);

                fixed.put(&tile, 0.0, 0.0);
                tile
            })
            .collect();

        GalleryGrid { fixed, tiles }
    }

    fn open_lightbox(&self, catalog: MediaCatalog, index: usize) {
        let Ok(mut session) = self.session.try_borrow_mut() else {
            tracing::debug!(index, "lightbox busy, ignoring tile click");
            return;
        };
        let view = GtkLightboxView::new(
            &self.host,
            self.window.upcast_ref::<Widget>(),
            Rc::downgrade(&self.session),
            Rc::new(self.vault.clone()),
            self.textures.clone(),
            &self.settings.slideshow_interval,
        );
        if let Err(e) = session.open(catalog, index, view) {
            tracing::warn!("Failed to open lightbox at {}: {}", index, e);
        }
    }
}
