//! Input plumbing shared by every lightbox front-end.
//!
//! Listeners are attached by the view and handed back as [`Subscription`]s.
//! The viewer state owns them and releases them directly when the lightbox
//! closes, so no handler outlives its session.

use std::fmt;

use super::zoom::{Point, Rect};

/// A live listener or timer registration.
pub trait Subscription {
    /// Detaches the listener. Must be idempotent.
    fn release(&mut self);
}

/// Subscription backed by a one-shot release closure.
pub struct CallbackSubscription {
    label: &'static str,
    release: Option<Box<dyn FnOnce()>>,
}

impl CallbackSubscription {
    pub fn new<F>(label: &'static str, release: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            label,
            release: Some(Box::new(release)),
        }
    }

    pub fn is_released(&self) -> bool {
        self.release.is_none()
    }
}

impl fmt::Debug for CallbackSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSubscription")
            .field("label", &self.label)
            .field("released", &self.is_released())
            .finish()
    }
}

impl Subscription for CallbackSubscription {
    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::trace!(label = self.label, "releasing subscription");
            release();
        }
    }
}

/// The set of listeners owned by one viewer session.
#[derive(Default)]
pub struct Subscriptions {
    items: Vec<Box<dyn Subscription>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Box<dyn Subscription>) {
        self.items.push(subscription);
    }

    pub fn extend(&mut self, subscriptions: impl IntoIterator<Item = Box<dyn Subscription>>) {
        self.items.extend(subscriptions);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Releases every subscription, newest first.
    pub fn release_all(&mut self) {
        while let Some(mut subscription) = self.items.pop() {
            subscription.release();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Keys the lightbox reacts to. Everything else maps to `Other` and is left
/// to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

/// A wheel event over the main display area.
///
/// `image_bounds` is the bounding box of the zoomable image element captured
/// when the event was delivered, in the same coordinate space as `pointer`.
/// It is `None` when no image is displayed (e.g. a video entry).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub pointer: Point,
    pub delta_y: f64,
    pub image_bounds: Option<Rect>,
}

/// Where a wheel event should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelRoute {
    ZoomIn,
    ZoomOut,
    NavigateNext,
    NavigatePrevious,
    Ignore,
}

impl WheelEvent {
    /// Over the image the wheel zooms (up = in); elsewhere it navigates
    /// (down = next). A zero delta is ignored in both regions.
    pub fn route(&self) -> WheelRoute {
        let over_image = self
            .image_bounds
            .map(|bounds| bounds.contains(self.pointer))
            .unwrap_or(false);

        if self.delta_y == 0.0 || self.delta_y.is_nan() {
            return WheelRoute::Ignore;
        }

        match (over_image, self.delta_y < 0.0) {
            (true, true) => WheelRoute::ZoomIn,
            (true, false) => WheelRoute::ZoomOut,
            (false, true) => WheelRoute::NavigatePrevious,
            (false, false) => WheelRoute::NavigateNext,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn callback_subscription_releases_once() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let mut sub = CallbackSubscription::new("key", move || counter.set(counter.get() + 1));
        sub.release();
        sub.release();
        assert_eq!(count.get(), 1);
        assert!(sub.is_released());
    }

    #[test]
    fn subscriptions_release_on_drop() {
        let count = Rc::new(Cell::new(0));
        {
            let mut subs = Subscriptions::new();
            for label in ["key", "wheel"] {
                let counter = count.clone();
                subs.push(Box::new(CallbackSubscription::new(label, move || {
                    counter.set(counter.get() + 1)
                })));
            }
            assert_eq!(subs.len(), 2);
        }
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn wheel_over_image_zooms() {
        let bounds = Some(Rect::new(100.0, 100.0, 200.0, 200.0));
        let up = WheelEvent {
            pointer: Point::new(150.0, 150.0),
            delta_y: -1.0,
            image_bounds: bounds,
        };
        assert_eq!(up.route(), WheelRoute::ZoomIn);
        let down = WheelEvent { delta_y: 1.0, ..up };
        assert_eq!(down.route(), WheelRoute::ZoomOut);
    }

    #[test]
    fn wheel_elsewhere_navigates() {
        let bounds = Some(Rect::new(100.0, 100.0, 200.0, 200.0));
        let down = WheelEvent {
            pointer: Point::new(20.0, 20.0),
            delta_y: 3.0,
            image_bounds: bounds,
        };
        assert_eq!(down.route(), WheelRoute::NavigateNext);
        let up = WheelEvent {
            delta_y: -3.0,
            ..down
        };
        assert_eq!(up.route(), WheelRoute::NavigatePrevious);

        let no_image = WheelEvent {
            pointer: Point::new(150.0, 150.0),
            delta_y: 1.0,
            image_bounds: None,
        };
        assert_eq!(no_image.route(), WheelRoute::NavigateNext);
    }

    #[test]
    fn zero_delta_is_ignored() {
        let event = WheelEvent {
            pointer: Point::new(0.0, 0.0),
            delta_y: 0.0,
            image_bounds: None,
        };
        assert_eq!(event.route(), WheelRoute::Ignore);
    }
}
