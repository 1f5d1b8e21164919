// Lightbox overlay for the vault gallery
// Features:
// - Top bar: random mode, slideshow with interval box, file link, close box
// - Main stage with prev/next buttons; images zoom and pan, videos autoplay and loop
// - Thumbnail strip that keeps the active entry scrolled into view
// - Image decodes arrive asynchronously and are dropped if the entry changed meanwhile

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::{Rc, Weak};

use gtk4::prelude::*;
use gtk4::{
    glib, pango, Align, Box as GtkBox, Button, ContentFit, Entry, EventControllerMotion,
    EventControllerScroll, EventControllerScrollFlags, Fixed, GestureClick, InputPurpose, Label,
    MediaFile, Orientation, Overlay, Picture, PolicyType, ScrolledWindow, Video, Widget,
};

use super::keybindings::attach_key_handler;
use super::textures::{TextureLoader, THUMB_DECODE_EDGE, VIEW_DECODE_EDGE};
use crate::lightbox::{
    CallbackSubscription, LightboxCommand, LightboxSession, LightboxView, Point, Rect, Size,
    Subscription, WheelEvent, ZoomTransform,
};
use crate::models::{MediaCatalog, MediaEntry, MediaKind};
use crate::vault::Vault;

/// Space kept free around the media element.
const STAGE_PADDING: f64 = 20.0;
const THUMB_SIZE: i32 = 80;

const RANDOM_LABEL: &str = "🎲 Random";
const RANDOM_ON_LABEL: &str = "🎲 Random (ON)";
const SLIDESHOW_LABEL: &str = "▶ Slideshow";
const SLIDESHOW_STOP_LABEL: &str = "⏸ Stop";

type SessionRef = Weak<RefCell<LightboxSession<GtkLightboxView>>>;

/// Sends a command from a widget callback. Dropped if the session is already
/// handling one (a signal emitted while the controller drives the view).
fn send(session: &SessionRef, command: LightboxCommand) {
    let Some(session) = session.upgrade() else {
        return;
    };
    let Ok(mut session) = session.try_borrow_mut() else {
        tracing::debug!(?command, "lightbox busy, dropping command");
        return;
    };
    session.dispatch(command);
}

/// The main display area and the media element inside it.
struct Stage {
    area: Overlay,
    fixed: Fixed,
    picture: RefCell<Option<Picture>>,
    video: RefCell<Option<Video>>,
    natural: Cell<Option<Size>>,
    transform: Cell<ZoomTransform>,
    pointer: Cell<Point>,
    generation: Cell<u64>,
    last_size: Cell<(i32, i32)>,
}

impl Stage {
    fn new() -> Rc<Self> {
        let area = Overlay::new();
        area.add_css_class("lightbox-main");
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.set_overflow(gtk4::Overflow::Hidden);

        let backdrop = GtkBox::new(Orientation::Vertical, 0);
        backdrop.set_hexpand(true);
        backdrop.set_vexpand(true);
        area.set_child(Some(&backdrop));

        let fixed = Fixed::new();
        area.add_overlay(&fixed);

        let stage = Rc::new(Self {
            area,
            fixed,
            picture: RefCell::new(None),
            video: RefCell::new(None),
            natural: Cell::new(None),
            transform: Cell::new(ZoomTransform::identity()),
            pointer: Cell::new(Point::default()),
            generation: Cell::new(0),
            last_size: Cell::new((0, 0)),
        });

        let stage_weak = Rc::downgrade(&stage);
        stage.area.add_tick_callback(move |_widget, _clock| {
            let Some(stage) = stage_weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            let size = (stage.area.width(), stage.area.height());
            if size != stage.last_size.get() {
                stage.last_size.set(size);
                stage.relayout();
            }
            glib::ControlFlow::Continue
        });

        stage
    }

    fn viewport(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.area.width() as f64,
            self.area.height() as f64,
        )
    }

    fn media_bounds(&self) -> Size {
        let viewport = self.viewport();
        Size::new(
            (viewport.width - 2.0 * STAGE_PADDING).max(0.0),
            (viewport.height - 2.0 * STAGE_PADDING).max(0.0),
        )
    }

    /// Unzoomed size of the image element.
    fn displayed(&self) -> Size {
        self.natural
            .get()
            .map(|natural| natural.fit_within(self.media_bounds()))
            .unwrap_or_default()
    }

    /// Bounding box of the image element as rendered right now.
    fn image_bounds(&self) -> Option<Rect> {
        let picture = self.picture.borrow();
        let bounds = picture.as_ref()?.compute_bounds(&self.area)?;
        Some(Rect::new(
            bounds.x() as f64,
            bounds.y() as f64,
            bounds.width() as f64,
            bounds.height() as f64,
        ))
    }

    fn clear(&self) {
        if let Some(picture) = self.picture.borrow_mut().take() {
            self.fixed.remove(&picture);
        }
        if let Some(video) = self.video.borrow_mut().take() {
            if let Some(stream) = video.media_stream() {
                stream.pause();
            }
            self.fixed.remove(&video);
        }
        self.natural.set(None);
        self.transform.set(ZoomTransform::identity());
    }

    fn relayout(&self) {
        if let Some(video) = self.video.borrow().as_ref() {
            let bounds = self.media_bounds();
            video.set_size_request(bounds.width.round() as i32, bounds.height.round() as i32);
            self.fixed.move_(video, STAGE_PADDING, STAGE_PADDING);
            return;
        }

        let picture = self.picture.borrow();
        let Some(picture) = picture.as_ref() else {
            return;
        };
        let displayed = self.displayed();
        if displayed.width <= 0.0 || displayed.height <= 0.0 {
            return;
        }

        // scale(s) translate(t) around the centre moves the box by s * t.
        let t = self.transform.get();
        let width = displayed.width * t.scale;
        let height = displayed.height * t.scale;
        let viewport = self.viewport();
        let x = (viewport.width - width) / 2.0 + t.translate_x * t.scale;
        let y = (viewport.height - height) / 2.0 + t.translate_y * t.scale;

        picture.set_size_request(width.round() as i32, height.round() as i32);
        self.fixed.move_(picture, x, y);
        picture.set_cursor_from_name(Some(t.cursor.css_name()));
    }
}

struct Chrome {
    root: GtkBox,
    random_button: Button,
    slideshow_button: Button,
    interval_entry: Entry,
    file_label: Label,
    thumb_scroller: ScrolledWindow,
    thumbs: Vec<Button>,
    active_thumb: Cell<Option<usize>>,
}

/// GTK rendering of the lightbox, added on top of the gallery window.
pub struct GtkLightboxView {
    host: Overlay,
    window: Widget,
    session: SessionRef,
    vault: Rc<dyn Vault>,
    textures: Rc<TextureLoader>,
    interval_text: String,
    stage: Rc<Stage>,
    chrome: Option<Chrome>,
}

impl GtkLightboxView {
    pub fn new(
        host: &Overlay,
        window: &impl IsA<Widget>,
        session: SessionRef,
        vault: Rc<dyn Vault>,
        textures: Rc<TextureLoader>,
        interval_text: &str,
    ) -> Self {
        Self {
            host: host.clone(),
            window: window.clone().upcast(),
            session,
            vault,
            textures,
            interval_text: interval_text.to_owned(),
            stage: Stage::new(),
            chrome: None,
        }
    }

    fn command_button(&self, label: &str, css: &[&str], command: LightboxCommand) -> Button {
        let button = Button::with_label(label);
        for class in css {
            button.add_css_class(class);
        }
        let session = self.session.clone();
        button.connect_clicked(move |_| send(&session, command.clone()));
        button
    }

    fn build_top_bar(&self) -> (GtkBox, Button, Button, Entry, Label) {
        let top_bar = GtkBox::new(Orientation::Horizontal, 15);
        top_bar.add_css_class("lightbox-topbar");

        let left = GtkBox::new(Orientation::Horizontal, 10);
        left.set_hexpand(true);
        let random_button = self.command_button(
            RANDOM_LABEL,
            &["lightbox-random-btn"],
            LightboxCommand::ToggleRandom,
        );

        let interval_entry = Entry::new();
        interval_entry.add_css_class("lightbox-interval-input");
        interval_entry.set_text(&self.interval_text);
        interval_entry.set_placeholder_text(Some("sec"));
        interval_entry.set_input_purpose(InputPurpose::Number);
        interval_entry.set_max_width_chars(4);
        interval_entry.set_width_chars(4);

        let slideshow_button = Button::with_label(SLIDESHOW_LABEL);
        slideshow_button.add_css_class("lightbox-slideshow-btn");
        let session = self.session.clone();
        let entry = interval_entry.clone();
        slideshow_button.connect_clicked(move |_| {
            send(
                &session,
                LightboxCommand::ToggleSlideshow {
                    interval_input: entry.text().to_string(),
                },
            )
        });

        let slideshow_box = GtkBox::new(Orientation::Horizontal, 5);
        slideshow_box.append(&interval_entry);
        slideshow_box.append(&slideshow_button);
        left.append(&random_button);
        left.append(&slideshow_box);

        let right = GtkBox::new(Orientation::Horizontal, 10);
        let file_label = Label::new(None);
        file_label.set_ellipsize(pango::EllipsizeMode::End);
        file_label.set_max_width_chars(32);
        let file_link = Button::new();
        file_link.set_child(Some(&file_label));
        file_link.add_css_class("lightbox-file-link");
        file_link.set_tooltip_text(Some("Open file location"));
        let session = self.session.clone();
        file_link.connect_clicked(move |_| send(&session, LightboxCommand::RevealCurrent));

        let close_box = GtkBox::new(Orientation::Horizontal, 0);
        close_box.add_css_class("lightbox-close-box");
        let close_button =
            self.command_button("✕", &["lightbox-close-btn"], LightboxCommand::Close);
        close_box.append(&close_button);
        let close_click = GestureClick::new();
        let session = self.session.clone();
        close_click.connect_released(move |_, _, _, _| send(&session, LightboxCommand::Close));
        close_box.add_controller(close_click);

        right.append(&file_link);
        right.append(&close_box);

        top_bar.append(&left);
        top_bar.append(&right);
        (
            top_bar,
            random_button,
            slideshow_button,
            interval_entry,
            file_label,
        )
    }

    fn build_main_area(&self) {
        let area = &self.stage.area;

        let prev = self.command_button(
            "‹",
            &["lightbox-nav", "lightbox-prev"],
            LightboxCommand::Previous,
        );
        prev.set_halign(Align::Start);
        prev.set_valign(Align::Center);
        area.add_overlay(&prev);

        let next = self.command_button(
            "›",
            &["lightbox-nav", "lightbox-next"],
            LightboxCommand::Next,
        );
        next.set_halign(Align::End);
        next.set_valign(Align::Center);
        area.add_overlay(&next);

        // Pointer tracking for wheel hit-testing, and panning while zoomed.
        let motion = EventControllerMotion::new();
        let stage_weak = Rc::downgrade(&self.stage);
        let session = self.session.clone();
        motion.connect_motion(move |_, x, y| {
            let Some(stage) = stage_weak.upgrade() else {
                return;
            };
            let pointer = Point::new(x, y);
            stage.pointer.set(pointer);
            let over_image = stage
                .image_bounds()
                .map(|b| b.contains(pointer))
                .unwrap_or(false);
            if over_image && stage.transform.get().scale > 1.0 {
                send(
                    &session,
                    LightboxCommand::Pan {
                        pointer,
                        viewport: stage.viewport(),
                        displayed: stage.displayed(),
                    },
                );
            }
        });
        area.add_controller(motion);
    }

    fn build_thumbnails(&self, catalog: &MediaCatalog) -> (ScrolledWindow, Vec<Button>) {
        let strip = GtkBox::new(Orientation::Horizontal, 10);
        let scroller = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Automatic)
            .vscrollbar_policy(PolicyType::Never)
            .child(&strip)
            .build();
        scroller.add_css_class("lightbox-thumbnails");

        let thumbs = catalog
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let picture = Picture::new();
                picture.set_content_fit(ContentFit::Cover);
                picture.set_can_shrink(true);
                picture.set_size_request(THUMB_SIZE, THUMB_SIZE);
                picture.set_alternative_text(Some(&entry.name));
                self.load_thumbnail(&picture, entry);

                let thumb = self.command_button("", &["lightbox-thumb"], LightboxCommand::JumpTo(index));
                thumb.set_child(Some(&picture));
                thumb.set_tooltip_text(Some(&entry.name));
                strip.append(&thumb);
                thumb
            })
            .collect();

        (scroller, thumbs)
    }

    fn load_thumbnail(&self, picture: &Picture, entry: &MediaEntry) {
        let source = self.vault.display_source(entry);
        match entry.kind {
            MediaKind::Image => {
                let picture = picture.downgrade();
                self.textures.load(&source, THUMB_DECODE_EDGE, move |texture| {
                    if let Some(picture) = picture.upgrade() {
                        picture.set_paintable(texture.as_ref());
                    }
                });
            }
            MediaKind::Video => {
                // Not played: the stream shows its first frame.
                let media = MediaFile::for_filename(&source);
                media.set_muted(true);
                media.set_loop(true);
                picture.set_paintable(Some(&media));
            }
        }
    }

    fn show_image(&self, source: &Path, name: &str) {
        let picture = Picture::new();
        picture.set_content_fit(ContentFit::Fill);
        picture.set_can_shrink(true);
        picture.set_alternative_text(Some(name));
        picture.set_cursor_from_name(Some(ZoomTransform::identity().cursor.css_name()));

        let click = GestureClick::new();
        click.set_button(0);
        let session = self.session.clone();
        click.connect_pressed(move |gesture, _n, _x, _y| match gesture.current_button() {
            1 => send(&session, LightboxCommand::ZoomIn),
            3 => send(&session, LightboxCommand::ZoomOut),
            _ => {}
        });
        picture.add_controller(click);

        self.stage.fixed.put(&picture, 0.0, 0.0);
        *self.stage.picture.borrow_mut() = Some(picture);

        let generation = self.stage.generation.get();
        let stage_weak = Rc::downgrade(&self.stage);
        self.textures.load(source, VIEW_DECODE_EDGE, move |texture| {
            let Some(stage) = stage_weak.upgrade() else {
                return;
            };
            if stage.generation.get() != generation {
                tracing::trace!(generation, "dropping stale decode");
                return;
            }
            let Some(texture) = texture else {
                return;
            };
            stage.natural.set(Some(Size::new(
                texture.width() as f64,
                texture.height() as f64,
            )));
            if let Some(picture) = stage.picture.borrow().as_ref() {
                picture.set_paintable(Some(&texture));
            }
            stage.relayout();
        });
    }

    fn show_video(&self, source: &Path) {
        let video = Video::for_filename(Some(source));
        video.set_autoplay(true);
        video.set_loop(true);
        self.stage.fixed.put(&video, STAGE_PADDING, STAGE_PADDING);
        *self.stage.video.borrow_mut() = Some(video);
        self.stage.relayout();
    }

    fn scroll_thumbnail_into_view(scroller: &ScrolledWindow, thumb: &Button) {
        let Some(strip) = scroller.child() else {
            return;
        };
        let Some(bounds) = thumb.compute_bounds(&strip) else {
            return;
        };
        let adjustment = scroller.hadjustment();
        let page = adjustment.page_size();
        let centre = bounds.x() as f64 + bounds.width() as f64 / 2.0;
        let upper = (adjustment.upper() - page).max(adjustment.lower());
        adjustment.set_value((centre - page / 2.0).clamp(adjustment.lower(), upper));
    }
}

impl LightboxView for GtkLightboxView {
    fn build(&mut self, catalog: &MediaCatalog) {
        let root = GtkBox::new(Orientation::Vertical, 0);
        root.add_css_class("media-lightbox-overlay");
        root.set_hexpand(true);
        root.set_vexpand(true);

        let (top_bar, random_button, slideshow_button, interval_entry, file_label) =
            self.build_top_bar();
        self.build_main_area();
        let (thumb_scroller, thumbs) = self.build_thumbnails(catalog);

        root.append(&top_bar);
        root.append(&self.stage.area);
        root.append(&thumb_scroller);
        self.host.add_overlay(&root);

        self.chrome = Some(Chrome {
            root,
            random_button,
            slideshow_button,
            interval_entry,
            file_label,
            thumb_scroller,
            thumbs,
            active_thumb: Cell::new(None),
        });
    }

    fn attach_input(&mut self) -> Vec<Box<dyn Subscription>> {
        let session = self.session.clone();
        let keyboard = attach_key_handler(&self.window, move |key| {
            send(&session, LightboxCommand::Key(key))
        });

        let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
        let stage_weak = Rc::downgrade(&self.stage);
        let session = self.session.clone();
        scroll.connect_scroll(move |_, _dx, dy| {
            if let Some(stage) = stage_weak.upgrade() {
                let event = WheelEvent {
                    pointer: stage.pointer.get(),
                    delta_y: dy,
                    image_bounds: stage.image_bounds(),
                };
                send(&session, LightboxCommand::Wheel(event));
            }
            glib::Propagation::Stop
        });
        self.stage.area.add_controller(scroll.clone());
        let area = self.stage.area.clone();
        let wheel = Box::new(CallbackSubscription::new("wheel", move || {
            area.remove_controller(&scroll);
        }));

        vec![keyboard, wheel]
    }

    fn show_entry(&mut self, index: usize, entry: &MediaEntry, source: &Path) {
        let generation = self.stage.generation.get().wrapping_add(1);
        self.stage.generation.set(generation);
        self.stage.clear();
        tracing::debug!(index, generation, path = ?source, "showing entry");

        if let Some(chrome) = &self.chrome {
            chrome.file_label.set_text(&entry.name);
        }

        match entry.kind {
            MediaKind::Image => self.show_image(source, &entry.name),
            MediaKind::Video => self.show_video(source),
        }
    }

    fn apply_transform(&mut self, transform: ZoomTransform) {
        self.stage.transform.set(transform);
        self.stage.relayout();
    }

    fn highlight_thumbnail(&mut self, index: usize) {
        let Some(chrome) = &self.chrome else {
            return;
        };
        if let Some(previous) = chrome.active_thumb.replace(Some(index)) {
            if let Some(thumb) = chrome.thumbs.get(previous) {
                thumb.remove_css_class("active");
            }
        }
        let Some(thumb) = chrome.thumbs.get(index) else {
            return;
        };
        thumb.add_css_class("active");

        if thumb.width() > 0 {
            Self::scroll_thumbnail_into_view(&chrome.thumb_scroller, thumb);
        } else {
            // Not allocated yet (first display): retry once laid out.
            let scroller = chrome.thumb_scroller.downgrade();
            let thumb = thumb.downgrade();
            glib::idle_add_local_once(move || {
                if let (Some(scroller), Some(thumb)) = (scroller.upgrade(), thumb.upgrade()) {
                    Self::scroll_thumbnail_into_view(&scroller, &thumb);
                }
            });
        }
    }

    fn set_random_mode(&mut self, enabled: bool) {
        let Some(chrome) = &self.chrome else {
            return;
        };
        if enabled {
            chrome.random_button.set_label(RANDOM_ON_LABEL);
            chrome.random_button.add_css_class("active");
        } else {
            chrome.random_button.set_label(RANDOM_LABEL);
            chrome.random_button.remove_css_class("active");
        }
    }

    fn set_slideshow_active(&mut self, active: bool) {
        let Some(chrome) = &self.chrome else {
            return;
        };
        if active {
            chrome.slideshow_button.set_label(SLIDESHOW_STOP_LABEL);
            chrome.slideshow_button.add_css_class("active");
        } else {
            chrome.slideshow_button.set_label(SLIDESHOW_LABEL);
            chrome.slideshow_button.remove_css_class("active");
        }
        chrome.interval_entry.set_sensitive(!active);
    }

    fn teardown(&mut self) {
        self.stage
            .generation
            .set(self.stage.generation.get().wrapping_add(1));
        self.stage.clear();
        if let Some(chrome) = self.chrome.take() {
            self.host.remove_overlay(&chrome.root);
        }
    }
}
