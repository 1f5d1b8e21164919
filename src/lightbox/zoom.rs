//! Zoom and pan for the image currently shown in the lightbox.
//!
//! Zoom is a discrete integer level (1 = fit). While zoomed, the pan offset
//! follows the pointer: moving towards an edge of the viewport reveals that
//! edge of the image. The offset is recomputed from scratch on every pointer
//! update, so a pan computed at one level never leaks into another.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scales down (never up) to fit inside `bounds`, keeping the aspect
    /// ratio. This is the unzoomed displayed size of an image.
    pub fn fit_within(self, bounds: Size) -> Size {
        if self.width <= 0.0 || self.height <= 0.0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Size::default();
        }
        let scale = (bounds.width / self.width)
            .min(bounds.height / self.height)
            .min(1.0);
        Size::new(self.width * scale, self.height * scale)
    }
}

/// Axis-aligned rectangle in widget coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive hit test; degenerate rectangles contain nothing.
    pub fn contains(&self, point: Point) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    ZoomIn,
    Move,
}

impl CursorHint {
    /// CSS cursor name, also understood by `gdk::Cursor::from_name`.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom-in",
            Self::Move => "move",
        }
    }
}

/// Transform applied to the image element: `scale(level) translate(pan)`,
/// around the image centre. The translation is in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub cursor: CursorHint,
}

impl ZoomTransform {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            cursor: CursorHint::ZoomIn,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.translate_x == 0.0 && self.translate_y == 0.0
    }
}

impl fmt::Display for ZoomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scale({}) translate({}px, {}px)",
            self.scale, self.translate_x, self.translate_y
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomPan {
    level: u32,
    pan_x: f64,
    pan_y: f64,
}

impl Default for ZoomPan {
    fn default() -> Self {
        Self {
            level: 1,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ZoomPan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn is_zoomed(&self) -> bool {
        self.level > 1
    }

    /// Back to level 1, centred. Used whenever the displayed entry changes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Unbounded above.
    pub fn zoom_in(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    pub fn zoom_out(&mut self) {
        self.level = self.level.saturating_sub(1).max(1);
        if self.level == 1 {
            self.pan_x = 0.0;
            self.pan_y = 0.0;
        }
    }

    /// Largest pan offset per axis: half of the overflow of the scaled image
    /// beyond its displayed size, never negative.
    pub fn max_pan(&self, displayed: Size) -> (f64, f64) {
        let level = self.level as f64;
        let max_x = ((displayed.width * level - displayed.width) / 2.0).max(0.0);
        let max_y = ((displayed.height * level - displayed.height) / 2.0).max(0.0);
        (sanitize(max_x), sanitize(max_y))
    }

    /// Recomputes the pan from the pointer position.
    ///
    /// The pointer offset from the viewport centre is normalized to `[-1, 1]`
    /// on each axis, inverted, scaled by the axis range and damped by
    /// `1 / level`. Has no effect at level 1.
    pub fn update_pan(&mut self, pointer: Point, viewport: Rect, displayed: Size) {
        if !self.is_zoomed() {
            return;
        }

        let (max_x, max_y) = self.max_pan(displayed);
        let normalized_x = normalized_offset(pointer.x - viewport.x, viewport.width);
        let normalized_y = normalized_offset(pointer.y - viewport.y, viewport.height);
        let damping = 1.0 / self.level as f64;

        self.pan_x = sanitize(-normalized_x * max_x * damping);
        self.pan_y = sanitize(-normalized_y * max_y * damping);
    }

    pub fn transform(&self) -> ZoomTransform {
        ZoomTransform {
            scale: self.level as f64,
            translate_x: self.pan_x,
            translate_y: self.pan_y,
            cursor: if self.is_zoomed() {
                CursorHint::Move
            } else {
                CursorHint::ZoomIn
            },
        }
    }
}

/// Offset of `position` (relative to the viewport origin) from the centre of
/// an axis of length `extent`, in `[-1, 1]`.
fn normalized_offset(position: f64, extent: f64) -> f64 {
    if !(extent.is_finite() && extent > 0.0) || !position.is_finite() {
        return 0.0;
    }
    let center = extent / 2.0;
    ((position - center) / center).clamp(-1.0, 1.0)
}

// Collapses NaN and negative zero so a centred pointer reports exactly (0, 0).
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value != 0.0 {
        value
    } else {
        0.0
    }
}
