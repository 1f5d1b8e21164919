//! Full-screen viewer: navigation, zoom/pan, shuffle and slideshow.
//!
//! Everything here is toolkit-agnostic. Front-ends implement
//! [`LightboxView`] and a [`Ticker`], and feed user input to a
//! [`LightboxSession`] as [`LightboxCommand`]s.

pub mod controller;
pub mod input;
pub mod navigator;
pub mod session;
pub mod slideshow;
pub mod state;
#[cfg(test)]
pub(crate) mod testing;
pub mod zoom;

pub use controller::{Flow, LightboxCommand, LightboxController, LightboxView};
pub use input::{
    CallbackSubscription, LightboxKey, Subscription, Subscriptions, WheelEvent, WheelRoute,
};
pub use navigator::Direction;
pub use session::LightboxSession;
pub use slideshow::{
    parse_interval, SlideshowScheduler, SlideshowToggle, Ticker, DEFAULT_INTERVAL, MIN_INTERVAL,
};
pub use state::ViewerState;
pub use zoom::{CursorHint, Point, Rect, Size, ZoomPan, ZoomTransform};
