//! The lightbox state machine.
//!
//! A [`LightboxController`] exists only while the lightbox is open: building
//! one is the `Closed -> Open` transition and [`LightboxController::close`]
//! is the way back. Rendering is delegated to a [`LightboxView`], so the same
//! controller drives the GTK overlay and the recording view used in tests.

use std::path::Path;
use std::rc::Rc;

use rand::RngCore;
use tracing::{debug, info, warn};

use super::input::{LightboxKey, Subscription, WheelEvent, WheelRoute};
use super::navigator::{self, Direction};
use super::slideshow::{SlideshowToggle, Ticker};
use super::state::ViewerState;
use super::zoom::{Point, Rect, Size, ZoomPan, ZoomTransform};
use crate::error::Result;
use crate::models::{MediaCatalog, MediaEntry};
use crate::vault::Vault;

/// Rendering surface driven by the controller.
pub trait LightboxView {
    /// Builds the overlay chrome: top bar, main area and thumbnail strip.
    fn build(&mut self, catalog: &MediaCatalog);

    /// Attaches keyboard and wheel listeners. The controller owns the result.
    fn attach_input(&mut self) -> Vec<Box<dyn Subscription>>;

    /// Replaces the main media element and the file-name link.
    fn show_entry(&mut self, index: usize, entry: &MediaEntry, source: &Path);

    fn apply_transform(&mut self, transform: ZoomTransform);

    /// Highlights a thumbnail and scrolls it into view.
    fn highlight_thumbnail(&mut self, index: usize);

    fn set_random_mode(&mut self, enabled: bool);

    /// Mirrors the slideshow state; the interval input is disabled while active.
    fn set_slideshow_active(&mut self, active: bool);

    /// Removes the overlay. Called once, after input has been detached.
    fn teardown(&mut self);
}

/// Everything the user can do inside an open lightbox.
#[derive(Debug, Clone, PartialEq)]
pub enum LightboxCommand {
    Next,
    Previous,
    /// Thumbnail click.
    JumpTo(usize),
    ToggleRandom,
    ToggleSlideshow { interval_input: String },
    /// Primary click on the image.
    ZoomIn,
    /// Secondary click on the image.
    ZoomOut,
    /// Pointer motion over the image. `viewport` is the main display area.
    Pan {
        pointer: Point,
        viewport: Rect,
        displayed: Size,
    },
    Wheel(WheelEvent),
    Key(LightboxKey),
    RevealCurrent,
    Close,
}

/// Whether the lightbox is still open after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Closed,
}

pub struct LightboxController<V: LightboxView> {
    catalog: MediaCatalog,
    state: ViewerState,
    view: V,
    vault: Rc<dyn Vault>,
    ticker: Rc<dyn Ticker>,
    rng: Box<dyn RngCore>,
    closed: bool,
}

impl<V: LightboxView> LightboxController<V> {
    /// Opens with the thread-local RNG driving random mode.
    pub fn open(
        catalog: MediaCatalog,
        start_index: usize,
        view: V,
        vault: Rc<dyn Vault>,
        ticker: Rc<dyn Ticker>,
    ) -> Result<Self> {
        Self::open_with_rng(
            catalog,
            start_index,
            view,
            vault,
            ticker,
            Box::new(rand::rng()),
        )
    }

    pub fn open_with_rng(
        catalog: MediaCatalog,
        start_index: usize,
        mut view: V,
        vault: Rc<dyn Vault>,
        ticker: Rc<dyn Ticker>,
        rng: Box<dyn RngCore>,
    ) -> Result<Self> {
        let start_index = catalog.check_index(start_index)?;

        view.build(&catalog);
        let mut state = ViewerState::new(start_index);
        state.adopt_subscriptions(view.attach_input());

        info!(
            entries = catalog.len(),
            start_index,
            listeners = state.listener_count(),
            "lightbox opened"
        );

        let mut controller = Self {
            catalog,
            state,
            view,
            vault,
            ticker,
            rng,
            closed: false,
        };
        controller.display_current();
        Ok(controller)
    }

    pub fn catalog(&self) -> &MediaCatalog {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_entry(&self) -> &MediaEntry {
        &self.catalog[self.state.current_index]
    }

    pub fn random_mode(&self) -> bool {
        self.state.random_mode
    }

    pub fn slideshow_active(&self) -> bool {
        self.state.slideshow_active()
    }

    pub fn zoom(&self) -> &ZoomPan {
        &self.state.zoom
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn dispatch(&mut self, command: LightboxCommand) -> Flow {
        if self.closed {
            return Flow::Closed;
        }

        match command {
            LightboxCommand::Next => self.navigate(Direction::Next),
            LightboxCommand::Previous => self.navigate(Direction::Previous),
            LightboxCommand::JumpTo(index) => self.jump_to(index),
            LightboxCommand::ToggleRandom => self.toggle_random(),
            LightboxCommand::ToggleSlideshow { interval_input } => {
                self.toggle_slideshow(&interval_input)
            }
            LightboxCommand::ZoomIn => self.zoom_in(),
            LightboxCommand::ZoomOut => self.zoom_out(),
            LightboxCommand::Pan {
                pointer,
                viewport,
                displayed,
            } => self.pan(pointer, viewport, displayed),
            LightboxCommand::Wheel(event) => self.wheel(event),
            LightboxCommand::Key(key) => return self.key(key),
            LightboxCommand::RevealCurrent => self.reveal_current(),
            LightboxCommand::Close => {
                self.close();
                return Flow::Closed;
            }
        }
        Flow::Continue
    }

    /// Advances one step for a timer firing. Stale generations are ignored.
    pub fn slideshow_tick(&mut self, generation: u64) -> bool {
        if self.closed || !self.state.slideshow.accepts(generation) {
            debug!(generation, "ignoring stale slideshow tick");
            return false;
        }
        self.navigate(Direction::Next);
        true
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.state.current_index = navigator::step(
            self.state.current_index,
            self.catalog.len(),
            direction,
            self.state.random_mode,
            self.rng.as_mut(),
        );
        self.display_current();
    }

    /// Thumbnail jump. Leaves random mode, since the user picked a position.
    pub fn jump_to(&mut self, index: usize) {
        let Ok(index) = self.catalog.check_index(index) else {
            warn!(index, len = self.catalog.len(), "thumbnail index out of range");
            return;
        };
        self.state.current_index = index;
        if self.state.random_mode {
            self.state.random_mode = false;
            self.view.set_random_mode(false);
        }
        self.display_current();
    }

    pub fn toggle_random(&mut self) {
        self.state.random_mode = !self.state.random_mode;
        debug!(random_mode = self.state.random_mode, "random mode toggled");
        self.view.set_random_mode(self.state.random_mode);
    }

    pub fn toggle_slideshow(&mut self, interval_input: &str) {
        match self
            .state
            .slideshow
            .toggle(interval_input, self.ticker.as_ref())
        {
            SlideshowToggle::Started {
                interval,
                generation,
            } => {
                info!(?interval, generation, "slideshow started");
                self.view.set_slideshow_active(true);
            }
            SlideshowToggle::Stopped => {
                info!("slideshow stopped");
                self.view.set_slideshow_active(false);
            }
        }
    }

    fn zoomable(&self) -> bool {
        self.current_entry().is_image()
    }

    pub fn zoom_in(&mut self) {
        if !self.zoomable() {
            return;
        }
        self.state.zoom.zoom_in();
        self.view.apply_transform(self.state.zoom.transform());
    }

    pub fn zoom_out(&mut self) {
        if !self.zoomable() {
            return;
        }
        self.state.zoom.zoom_out();
        self.view.apply_transform(self.state.zoom.transform());
    }

    pub fn pan(&mut self, pointer: Point, viewport: Rect, displayed: Size) {
        if !self.zoomable() || !self.state.zoom.is_zoomed() {
            return;
        }
        self.state.zoom.update_pan(pointer, viewport, displayed);
        self.view.apply_transform(self.state.zoom.transform());
    }

    pub fn wheel(&mut self, event: WheelEvent) {
        match event.route() {
            WheelRoute::ZoomIn => self.zoom_in(),
            WheelRoute::ZoomOut => self.zoom_out(),
            WheelRoute::NavigateNext => self.navigate(Direction::Next),
            WheelRoute::NavigatePrevious => self.navigate(Direction::Previous),
            WheelRoute::Ignore => {}
        }
    }

    fn key(&mut self, key: LightboxKey) -> Flow {
        match key {
            LightboxKey::ArrowLeft => self.navigate(Direction::Previous),
            LightboxKey::ArrowRight => self.navigate(Direction::Next),
            LightboxKey::Escape => {
                self.close();
                return Flow::Closed;
            }
            LightboxKey::Other => {}
        }
        Flow::Continue
    }

    pub fn reveal_current(&mut self) {
        let entry = self.current_entry();
        if let Err(e) = self.vault.reveal_in_file_manager(entry) {
            warn!("Failed to reveal {:?}: {}", entry.path, e);
        }
    }

    fn display_current(&mut self) {
        let index = self.state.current_index;
        self.state.zoom.reset();

        let entry = &self.catalog[index];
        let source = self.vault.display_source(entry);
        debug!(index, name = %entry.name, "displaying entry");

        self.view.show_entry(index, entry, &source);
        self.view.apply_transform(ZoomTransform::identity());
        self.view.highlight_thumbnail(index);
    }

    /// `Open -> Closed`: stops the slideshow, detaches input, then removes
    /// the overlay. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.state.teardown();
        self.view.teardown();
        info!("lightbox closed");
    }
}

impl<V: LightboxView> Drop for LightboxController<V> {
    fn drop(&mut self) {
        self.close();
    }
}
