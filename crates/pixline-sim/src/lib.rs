#![cfg_attr(not(test), no_std)]

//! In-memory RGB565 display surface for exercising `pixline` on a host.
//!
//! [`FrameSurface`] implements [`pixline::Surface`] over a plain pixel
//! array with a built-in fixed-cell font, so rendering and scrolling can
//! be asserted pixel by pixel without display hardware.

pub mod font;

use font::{CELL_H, CELL_W, GLYPH_COLS, GLYPH_ROWS};
use pixline::{Alignment, DrawMode, FontId, Icon, Rect, Rgb, Surface, Viewport};

/// `W` x `H` RGB565 framebuffer.
pub struct FrameSurface<const W: usize, const H: usize> {
    pixels: [[u16; W]; H],
}

impl<const W: usize, const H: usize> FrameSurface<W, H> {
    pub fn new() -> Self {
        Self {
            pixels: [[Rgb::WHITE.rgb565(); W]; H],
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels = [[color.rgb565(); W]; H];
    }

    /// Packed pixel at absolute coordinates, `None` when off-screen.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u16> {
        if (0..W as i32).contains(&x) && (0..H as i32).contains(&y) {
            Some(self.pixels[y as usize][x as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[[u16; W]; H] {
        &self.pixels
    }

    /// Effective colors under the viewport's draw mode; the inverse bit
    /// swaps the roles of foreground and background.
    fn effective(vp: &Viewport) -> (u16, u16) {
        if vp.draw_mode.has_inverse() {
            (vp.bg.rgb565(), vp.fg.rgb565())
        } else {
            (vp.fg.rgb565(), vp.bg.rgb565())
        }
    }

    /// Paint one viewport-relative pixel of a shape. `on` is true for the
    /// shape's foreground pixels, false for the gaps around them.
    fn plot(&mut self, vp: &Viewport, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x >= vp.w || y >= vp.h {
            return;
        }
        let ax = vp.x + x;
        let ay = vp.y + y;
        if !(0..W as i32).contains(&ax) || !(0..H as i32).contains(&ay) {
            return;
        }
        let px = &mut self.pixels[ay as usize][ax as usize];

        let mode = vp.draw_mode;
        if mode == DrawMode::COMPLEMENT {
            if on {
                *px = !*px;
            }
            return;
        }
        let (fg, bg) = Self::effective(vp);
        if on && mode.draws_fg() {
            *px = fg;
        } else if !on && mode.draws_bg() {
            *px = bg;
        }
    }
}

impl<const W: usize, const H: usize> Default for FrameSurface<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Surface for FrameSurface<W, H> {
    fn width(&self) -> i32 {
        W as i32
    }

    fn height(&self) -> i32 {
        H as i32
    }

    fn color_depth(&self) -> u8 {
        16
    }

    fn fill_rect(&mut self, vp: &Viewport, rect: Rect) {
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                self.plot(vp, x, y, true);
            }
        }
    }

    fn hline(&mut self, vp: &Viewport, x1: i32, x2: i32, y: i32) {
        for x in x1..x2 {
            self.plot(vp, x, y, true);
        }
    }

    fn draw_text(&mut self, vp: &Viewport, x: i32, y: i32, skip_px: i32, text: &str) {
        let skip = skip_px.max(0);
        let visible = self.text_width(vp.font, text) - skip;
        let x = match vp.align {
            Alignment::None | Alignment::Left => x,
            Alignment::Center => x + ((vp.w - x - visible) / 2).max(0),
            Alignment::Right => (vp.w - visible).max(x),
        };

        for (index, ch) in text.chars().enumerate() {
            let glyph = font::glyph(ch);
            for col in 0..CELL_W {
                // column index across the whole rendered string
                let strip = index as i32 * CELL_W + col;
                if strip < skip {
                    continue;
                }
                let bits = if (col as usize) < GLYPH_COLS {
                    glyph[col as usize]
                } else {
                    0
                };
                for row in 0..CELL_H {
                    let on = (row as usize) < GLYPH_ROWS && bits & (1 << row) != 0;
                    self.plot(vp, x + strip - skip, y + row, on);
                }
            }
        }
    }

    fn draw_icon(&mut self, vp: &Viewport, _icon: Icon, x: i32, y: i32) {
        for dy in 0..self.icon_height() {
            for dx in 0..self.icon_width() {
                self.plot(vp, x + dx, y + dy, true);
            }
        }
    }

    fn text_width(&self, _font: FontId, text: &str) -> i32 {
        CELL_W * text.chars().count() as i32
    }

    fn char_width(&self, _font: FontId) -> i32 {
        CELL_W
    }

    fn char_height(&self, _font: FontId) -> i32 {
        CELL_H
    }

    fn icon_width(&self) -> i32 {
        7
    }

    fn icon_height(&self) -> i32 {
        8
    }
}
