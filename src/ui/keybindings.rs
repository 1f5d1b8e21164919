// Keybindings for the lightbox overlay
//
// Keybindings:
// - Left: Previous entry
// - Right: Next entry
// - Escape: Close the lightbox

use gdk4::Key;
use gtk4::prelude::*;
use gtk4::{glib, EventControllerKey, PropagationPhase, Widget};

use crate::lightbox::{CallbackSubscription, LightboxKey, Subscription};

pub fn lightbox_key(key: Key) -> LightboxKey {
    match key {
        Key::Left | Key::KP_Left => LightboxKey::ArrowLeft,
        Key::Right | Key::KP_Right => LightboxKey::ArrowRight,
        Key::Escape => LightboxKey::Escape,
        _ => LightboxKey::Other,
    }
}

/// Listens for lightbox keys on `target` (the toplevel window) in the
/// capture phase, so they work whichever widget has focus. Unmapped keys
/// propagate to the host.
pub fn attach_key_handler<F>(target: &impl IsA<Widget>, on_key: F) -> Box<dyn Subscription>
where
    F: Fn(LightboxKey) + 'static,
{
    let controller = EventControllerKey::new();
    controller.set_propagation_phase(PropagationPhase::Capture);
    controller.connect_key_pressed(move |_, key, _code, _state| match lightbox_key(key) {
        LightboxKey::Other => glib::Propagation::Proceed,
        mapped => {
            on_key(mapped);
            glib::Propagation::Stop
        }
    });
    target.add_controller(controller.clone());

    let target = target.clone().upcast::<Widget>();
    Box::new(CallbackSubscription::new("keyboard", move || {
        target.remove_controller(&controller);
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lightbox_key_mapping() {
        assert_eq!(lightbox_key(Key::Left), LightboxKey::ArrowLeft);
        assert_eq!(lightbox_key(Key::KP_Right), LightboxKey::ArrowRight);
        assert_eq!(lightbox_key(Key::Escape), LightboxKey::Escape);
        assert_eq!(lightbox_key(Key::space), LightboxKey::Other);
        assert_eq!(lightbox_key(Key::h), LightboxKey::Other);
    }
}
