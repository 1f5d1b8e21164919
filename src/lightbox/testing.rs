//! Test doubles shared by the controller and session tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::controller::LightboxView;
use super::input::{CallbackSubscription, Subscription};
use super::slideshow::Ticker;
use super::zoom::ZoomTransform;
use crate::error::{GalleryError, Result};
use crate::models::{MediaCatalog, MediaEntry};
use crate::vault::{FolderLookup, ScanDepth, Vault};

/// Everything the controller asked the view to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Build(usize),
    Show(usize, PathBuf),
    Transform(ZoomTransform),
    Highlight(usize),
    Random(bool),
    Slideshow(bool),
    Teardown,
}

/// Log shared between a view and the test that handed it out.
pub type EventLog = Rc<RefCell<Vec<ViewEvent>>>;

#[derive(Default)]
pub struct RecordingView {
    pub events: EventLog,
    /// Flipped by the input subscriptions when they are released.
    pub listeners_released: Rc<RefCell<usize>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Show(i, _) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn last_transform(&self) -> Option<ZoomTransform> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            ViewEvent::Transform(t) => Some(*t),
            _ => None,
        })
    }

    pub fn count(&self, event: &ViewEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }
}

impl LightboxView for RecordingView {
    fn build(&mut self, catalog: &MediaCatalog) {
        self.events.borrow_mut().push(ViewEvent::Build(catalog.len()));
    }

    fn attach_input(&mut self) -> Vec<Box<dyn Subscription>> {
        ["keyboard", "wheel"]
            .into_iter()
            .map(|label| {
                let released = self.listeners_released.clone();
                Box::new(CallbackSubscription::new(label, move || {
                    *released.borrow_mut() += 1;
                })) as Box<dyn Subscription>
            })
            .collect()
    }

    fn show_entry(&mut self, index: usize, _entry: &MediaEntry, source: &Path) {
        self.events
            .borrow_mut()
            .push(ViewEvent::Show(index, source.to_path_buf()));
    }

    fn apply_transform(&mut self, transform: ZoomTransform) {
        self.events.borrow_mut().push(ViewEvent::Transform(transform));
    }

    fn highlight_thumbnail(&mut self, index: usize) {
        self.events.borrow_mut().push(ViewEvent::Highlight(index));
    }

    fn set_random_mode(&mut self, enabled: bool) {
        self.events.borrow_mut().push(ViewEvent::Random(enabled));
    }

    fn set_slideshow_active(&mut self, active: bool) {
        self.events.borrow_mut().push(ViewEvent::Slideshow(active));
    }

    fn teardown(&mut self) {
        self.events.borrow_mut().push(ViewEvent::Teardown);
    }
}

/// Vault that never touches the disk. Reveals are recorded.
#[derive(Default)]
pub struct StubVault {
    pub revealed: RefCell<Vec<PathBuf>>,
    pub fail_reveal: bool,
}

impl Vault for StubVault {
    fn root(&self) -> &Path {
        Path::new("/vault")
    }

    fn resolve_folder(&self, _path: &str) -> FolderLookup {
        FolderLookup::Missing
    }

    fn media_in(&self, _folder: &Path, _depth: ScanDepth) -> Result<Vec<MediaEntry>> {
        Ok(Vec::new())
    }

    fn display_source(&self, entry: &MediaEntry) -> PathBuf {
        self.root().join(&entry.path)
    }

    fn reveal_in_file_manager(&self, entry: &MediaEntry) -> Result<()> {
        if self.fail_reveal {
            return Err(GalleryError::NoFileManager);
        }
        self.revealed.borrow_mut().push(entry.path.clone());
        Ok(())
    }
}

/// Ticker whose timers only fire when the test says so.
#[derive(Default)]
pub struct ManualTicker {
    pub started: RefCell<Vec<(Duration, u64)>>,
    pub live: Rc<RefCell<Vec<u64>>>,
}

impl ManualTicker {
    pub fn live_generations(&self) -> Vec<u64> {
        self.live.borrow().clone()
    }
}

impl Ticker for ManualTicker {
    fn start(&self, interval: Duration, generation: u64) -> Box<dyn Subscription> {
        self.started.borrow_mut().push((interval, generation));
        self.live.borrow_mut().push(generation);
        let live = self.live.clone();
        Box::new(CallbackSubscription::new("timer", move || {
            live.borrow_mut().retain(|g| *g != generation)
        }))
    }
}

/// Catalog of `names`, all dated 0.
pub fn catalog(names: &[&str]) -> MediaCatalog {
    let entries = names
        .iter()
        .filter_map(|name| MediaEntry::from_path(*name, 0))
        .collect::<Vec<_>>();
    match MediaCatalog::new(entries) {
        Ok(catalog) => catalog,
        Err(e) => panic!("test catalog: {e}"),
    }
}
