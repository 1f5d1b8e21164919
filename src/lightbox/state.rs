use super::input::{Subscription, Subscriptions};
use super::slideshow::SlideshowScheduler;
use super::zoom::ZoomPan;

/// Mutable state of one open lightbox.
///
/// Owns every resource the session acquired (timer and input listeners) so
/// that [`ViewerState::teardown`] can release them without any global
/// bookkeeping.
pub struct ViewerState {
    pub current_index: usize,
    pub random_mode: bool,
    pub zoom: ZoomPan,
    pub slideshow: SlideshowScheduler,
    subscriptions: Subscriptions,
}

impl ViewerState {
    pub fn new(start_index: usize) -> Self {
        Self {
            current_index: start_index,
            random_mode: false,
            zoom: ZoomPan::new(),
            slideshow: SlideshowScheduler::new(),
            subscriptions: Subscriptions::new(),
        }
    }

    pub fn slideshow_active(&self) -> bool {
        self.slideshow.is_active()
    }

    pub fn adopt_subscriptions(&mut self, subs: impl IntoIterator<Item = Box<dyn Subscription>>) {
        self.subscriptions.extend(subs);
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Cancels the timer, then detaches listeners.
    pub fn teardown(&mut self) {
        self.slideshow.stop();
        self.subscriptions.release_all();
        self.zoom.reset();
    }
}
