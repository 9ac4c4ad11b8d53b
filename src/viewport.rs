//! Caller-owned drawing regions and their rendering attributes.

use log::error;

use crate::surface::{DrawMode, FontId, Rgb, Surface};

/// Horizontal placement of text inside the viewport.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Right,
    Center,
}

/// A rectangular drawing region plus its active rendering state.
///
/// The engine borrows a viewport for the duration of one render or
/// scroll-update call and never owns display geometry. `fg`, `bg`, and
/// `draw_mode` double as the active color registers: the style renderer
/// mutates them in place and callers treat them as scratch state until
/// the documented post-call foreground reset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Viewport {
    /// Caller-assigned identity; part of every scroll position key.
    pub id: u16,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub font: FontId,
    pub fg: Rgb,
    pub bg: Rgb,
    /// Selection bar / gradient start color.
    pub sel_start: Rgb,
    /// Gradient end color.
    pub sel_end: Rgb,
    /// Text color drawn on top of selection styles.
    pub sel_text: Rgb,
    /// Row height override; 0 derives the height from the font.
    pub line_height: i32,
    pub align: Alignment,
    pub draw_mode: DrawMode,
    /// Hint that the ambient language is right-to-left.
    pub rtl: bool,
}

impl Viewport {
    pub const fn new(id: u16, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id,
            x,
            y,
            w,
            h,
            font: FontId(0),
            fg: Rgb::BLACK,
            bg: Rgb::WHITE,
            sel_start: Rgb::new(0, 80, 160),
            sel_end: Rgb::new(0, 40, 80),
            sel_text: Rgb::WHITE,
            line_height: 0,
            align: Alignment::None,
            draw_mode: DrawMode::SOLID,
            rtl: false,
        }
    }

    /// Check the rectangle against physical display bounds.
    ///
    /// Out-of-bounds geometry is a configuration error: it is reported in
    /// debug builds and rendering proceeds best-effort, clipped by the
    /// surface. It is never corrected silently.
    pub fn validate<S: Surface>(&self, surface: &S) -> bool {
        let ok = self.x >= 0
            && self.y >= 0
            && self.w >= 0
            && self.h >= 0
            && self.x + self.w <= surface.width()
            && self.y + self.h <= surface.height();
        if !ok && cfg!(debug_assertions) {
            error!(
                "viewport {} out of bounds: x={} y={} w={} h={}",
                self.id, self.x, self.y, self.w, self.h
            );
        }
        ok
    }
}
