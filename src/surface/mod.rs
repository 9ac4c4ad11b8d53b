//! Collaborator-facing display abstraction and shared primitive types.

pub mod trace;

use crate::viewport::Viewport;

/// Handle to a font known to the display surface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FontId(pub u16);

/// Handle to a themable icon known to the display surface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Icon(pub u16);

/// 8-bit-per-channel color. Surfaces pack it to their native depth.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack to RGB565, the depth used by 16-bit panels.
    pub const fn rgb565(self) -> u16 {
        ((self.r as u16 & 0xf8) << 8) | ((self.g as u16 & 0xfc) << 3) | (self.b as u16 >> 3)
    }
}

/// Pixel draw mode register. Bit 0 draws background pixels, bit 1 draws
/// foreground pixels, bit 2 swaps the two colors. All bits clear means
/// complement (XOR) drawing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DrawMode(u8);

impl DrawMode {
    pub const COMPLEMENT: DrawMode = DrawMode(0);
    pub const BG: DrawMode = DrawMode(1);
    pub const FG: DrawMode = DrawMode(2);
    pub const SOLID: DrawMode = DrawMode(3);

    const INVERSE_BIT: u8 = 4;

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with_inverse(self) -> DrawMode {
        DrawMode(self.0 | Self::INVERSE_BIT)
    }

    pub const fn toggled_inverse(self) -> DrawMode {
        DrawMode(self.0 ^ Self::INVERSE_BIT)
    }

    pub const fn has_inverse(self) -> bool {
        self.0 & Self::INVERSE_BIT != 0
    }

    pub const fn draws_fg(self) -> bool {
        self.0 & Self::FG.0 != 0
    }

    pub const fn draws_bg(self) -> bool {
        self.0 & Self::BG.0 != 0
    }
}

/// Pixel rectangle, viewport-relative unless stated otherwise.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn intersects(self, other: Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Drawing and measuring capabilities the engine consumes.
///
/// Coordinates passed to drawing calls are viewport-relative; the surface
/// translates them and clips against both the viewport rectangle and the
/// physical bounds. Color, draw-mode, and alignment state travel inside
/// the [`Viewport`] so the engine never owns display registers.
///
/// `draw_text` covers the text-shaping collaborator: glyph lookup,
/// bidirectional reordering, and diacritic handling happen behind it.
/// `skip_px` asks the surface to clip that many leading pixel columns of
/// the rendered string, which is how scrolled lines resume mid-way.
pub trait Surface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Bits per pixel. Anything below 16 has no use for color styling.
    fn color_depth(&self) -> u8;

    fn fill_rect(&mut self, vp: &Viewport, rect: Rect);

    /// Draw one pixel row from `x1` up to but not including `x2`.
    fn hline(&mut self, vp: &Viewport, x1: i32, x2: i32, y: i32);

    fn draw_text(&mut self, vp: &Viewport, x: i32, y: i32, skip_px: i32, text: &str);

    fn draw_icon(&mut self, vp: &Viewport, icon: Icon, x: i32, y: i32);

    /// Rendered pixel width of `text` in `font`.
    fn text_width(&self, font: FontId, text: &str) -> i32;

    /// Average character advance; also the column width for cell-based
    /// cursor positioning.
    fn char_width(&self, font: FontId) -> i32;

    fn char_height(&self, font: FontId) -> i32;

    fn icon_width(&self) -> i32;

    fn icon_height(&self) -> i32;
}
