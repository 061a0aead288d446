//! Screen and image coordinate types.
//!
//! Pointer events arrive in screen space; annotations live in image-pixel space.
//! [`map_pointer`] converts between the two using the overlay container's
//! bounding box, which must be supplied fresh with every event because the
//! container may move or resize between events.

use serde::{Deserialize, Serialize};

/// A pointer position in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position snapped to whole pixels.
    pub fn rounded(&self) -> (i32, i32) {
        (round_half_up(self.x), round_half_up(self.y))
    }
}

/// Screen-space bounding rectangle of the overlay container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayBounds {
    /// Left edge of the container
    pub left: f64,
    /// Top edge of the container
    pub top: f64,
    /// Width of the container
    pub width: f64,
    /// Height of the container
    pub height: f64,
}

impl OverlayBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A position in image-pixel space (origin at the image's top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

impl ImagePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Convert a screen position into image-local pixel coordinates.
pub fn map_pointer(position: ScreenPoint, bounds: &OverlayBounds) -> ImagePoint {
    ImagePoint {
        x: round_half_up(position.x - bounds.left),
        y: round_half_up(position.y - bounds.top),
    }
}

// Halves round towards positive infinity, so -0.5 maps to 0 rather than -1.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// An axis-aligned rectangle in image-pixel space.
///
/// `(x, y)` is the top-left corner once normalized. While a resize gesture is in
/// progress the width or height may transiently be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A zero-sized rectangle anchored at a point.
    pub fn at(point: ImagePoint) -> Self {
        Self::new(point.x, point.y, 0, 0)
    }

    /// Create a normalized rectangle spanning two corner points, in any drag direction.
    pub fn from_corners(a: ImagePoint, b: ImagePoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Check that both dimensions reach `min`.
    pub fn meets_minimum(&self, min: i32) -> bool {
        self.width >= min && self.height >= min
    }

    /// Flip negative extents so `(x, y)` is the top-left corner again.
    pub fn normalized(&self) -> Self {
        let mut rect = *self;
        if rect.width < 0 {
            rect.x += rect.width;
            rect.width = -rect.width;
        }
        if rect.height < 0 {
            rect.y += rect.height;
            rect.height = -rect.height;
        }
        rect
    }

    /// Check if a point lies inside the rectangle (edges included).
    pub fn contains(&self, point: ImagePoint) -> bool {
        let r = self.normalized();
        point.x >= r.x && point.x <= r.x + r.width && point.y >= r.y && point.y <= r.y + r.height
    }

    /// Position of one of the four corners, as drawn (not normalized).
    pub fn corner(&self, handle: Handle) -> ImagePoint {
        match handle {
            Handle::TopLeft => ImagePoint::new(self.x, self.y),
            Handle::TopRight => ImagePoint::new(self.x + self.width, self.y),
            Handle::BottomLeft => ImagePoint::new(self.x, self.y + self.height),
            Handle::BottomRight => ImagePoint::new(self.x + self.width, self.y + self.height),
        }
    }
}

/// One of the four corner handles of a selected annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    /// All handles in hit-test order.
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    /// Get the display name for this handle.
    pub fn name(&self) -> &'static str {
        match self {
            Handle::TopLeft => "top-left",
            Handle::TopRight => "top-right",
            Handle::BottomLeft => "bottom-left",
            Handle::BottomRight => "bottom-right",
        }
    }

    /// Apply one incremental pointer delta to a rectangle dragged by this handle.
    ///
    /// The opposite corner stays fixed. No clamping happens here, so dragging a
    /// handle past the opposite edge produces a negative width or height.
    pub fn apply(self, rect: Rect, dx: i32, dy: i32) -> Rect {
        let Rect {
            mut x,
            mut y,
            mut width,
            mut height,
        } = rect;
        match self {
            Handle::BottomRight => {
                width += dx;
                height += dy;
            }
            Handle::BottomLeft => {
                x += dx;
                width -= dx;
                height += dy;
            }
            Handle::TopRight => {
                y += dy;
                width += dx;
                height -= dy;
            }
            Handle::TopLeft => {
                x += dx;
                y += dy;
                width -= dx;
                height -= dy;
            }
        }
        Rect::new(x, y, width, height)
    }

    /// Check whether `point` falls on this handle's square of edge `size`.
    pub fn hit(&self, rect: &Rect, point: ImagePoint, size: i32) -> bool {
        let corner = rect.corner(*self);
        let half = size / 2;
        (point.x - corner.x).abs() <= half && (point.y - corner.y).abs() <= half
    }
}
