#![cfg_attr(not(test), no_std)]

//! Line-oriented text and icon rendering for small bitmap displays.
//!
//! The crate interprets compact line-format strings into draw calls
//! against a caller-supplied [`Surface`], applies selectable line styles
//! (invert, colorbar, gradient), and animates lines wider than their
//! rectangle through a fixed-capacity marquee [`scroll::ScrollEngine`].
//! Everything is allocation-free and safe to drive from a timer callback.

pub mod line;
pub mod scroll;
pub mod style;
pub mod surface;
pub mod viewport;

pub use line::{draw_line, LineArg, LineDescriptor, TextScroller};
pub use scroll::{
    ScrollConfig, ScrollContext, ScrollEngine, SlotInfo, SlotPainter, Tick, SCROLL_LINE_BYTES,
};
pub use style::{apply_style, draw_styled_text, gradient_fill, gradient_fill_part, Style, StyleMode};
pub use surface::{DrawMode, FontId, Icon, Rect, Rgb, Surface};
pub use viewport::{Alignment, Viewport};
