//! Default values shared by the overlay and its hosts.

/// Label assigned to every freshly drawn rectangle.
pub const DEFAULT_LABEL: &str = "nodule";

/// Drawn rectangles narrower or shorter than this (in image pixels) are discarded.
pub const MIN_RECT_SIZE: i32 = 10;

/// Edge length of the square resize handle drawn on each corner of the selection.
pub const HANDLE_SIZE: i32 = 8;

/// Subject name shown when the image metadata carries none.
pub const UNKNOWN_SUBJECT: &str = "Unknown";
