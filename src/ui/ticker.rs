// Slideshow timer on the glib main loop

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use gtk4::glib;

use super::viewer::GtkLightboxView;
use crate::lightbox::{LightboxSession, Subscription, Ticker};

pub type SharedSession = Rc<RefCell<LightboxSession<GtkLightboxView>>>;

/// Fires `slideshow_tick` on the session from a glib timeout source.
pub struct GlibTicker {
    session: Weak<RefCell<LightboxSession<GtkLightboxView>>>,
}

impl GlibTicker {
    pub fn new(session: Weak<RefCell<LightboxSession<GtkLightboxView>>>) -> Self {
        Self { session }
    }
}

/// Shared slot so whichever side ends the source first (release or the
/// callback itself) takes the id and the other side does nothing.
struct TimeoutSubscription {
    source: Rc<Cell<Option<glib::SourceId>>>,
}

impl Subscription for TimeoutSubscription {
    fn release(&mut self) {
        if let Some(source) = self.source.take() {
            source.remove();
        }
    }
}

impl Ticker for GlibTicker {
    fn start(&self, interval: Duration, generation: u64) -> Box<dyn Subscription> {
        let slot: Rc<Cell<Option<glib::SourceId>>> = Rc::new(Cell::new(None));
        let session_weak = self.session.clone();
        let callback_slot = slot.clone();

        let source = glib::timeout_add_local(interval, move || {
            let Some(session) = session_weak.upgrade() else {
                callback_slot.take();
                return glib::ControlFlow::Break;
            };
            match session.try_borrow_mut() {
                Ok(mut session) => {
                    session.slideshow_tick(generation);
                }
                Err(_) => tracing::debug!(generation, "session busy, skipping slideshow tick"),
            }
            glib::ControlFlow::Continue
        });
        slot.set(Some(source));

        Box::new(TimeoutSubscription { source: slot })
    }
}
