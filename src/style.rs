//! Line background styling and the colors text inherits from it.

use crate::line::LineDescriptor;
use crate::surface::{DrawMode, Rect, Rgb, Surface};
use crate::viewport::Viewport;

/// Line style word. Mode bits layer: when several are set the heaviest
/// style wins (gradient over colorbar over invert).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Style(u16);

impl Style {
    pub const NONE: Style = Style(0);
    pub const INVERT: Style = Style(1 << 0);
    pub const COLORBAR: Style = Style(1 << 1);
    pub const GRADIENT: Style = Style(1 << 2);
    /// Use the descriptor's custom color for the text.
    pub const COLORED: Style = Style(1 << 3);
    /// Interpret x/y as pixels instead of character cells and rows.
    pub const XY_PIXELS: Style = Style(1 << 4);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Style) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Style) -> Style {
        Style(self.0 | other.0)
    }

    /// Resolve the mutually exclusive background mode.
    pub const fn mode(self) -> StyleMode {
        if self.contains(Style::GRADIENT) {
            StyleMode::Gradient
        } else if self.contains(Style::COLORBAR) {
            StyleMode::Colorbar
        } else if self.contains(Style::INVERT) {
            StyleMode::Invert
        } else {
            StyleMode::None
        }
    }
}

impl core::ops::BitOr for Style {
    type Output = Style;

    fn bitor(self, rhs: Style) -> Style {
        self.union(rhs)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StyleMode {
    None,
    Invert,
    Colorbar,
    Gradient,
}

/// Fill the line background for `rect` and leave the viewport's color and
/// draw-mode registers set up for the text that follows.
///
/// Surfaces without 16-bit color downgrade gradient and colorbar to plain
/// invert so the caller still gets a visible line delimiter.
pub fn apply_style<S: Surface>(surface: &mut S, vp: &mut Viewport, rect: Rect, desc: &LineDescriptor) {
    if desc.style.contains(Style::COLORED) {
        if desc.style.contains(Style::INVERT) {
            vp.bg = desc.custom_color;
        } else {
            vp.fg = desc.custom_color;
        }
    }

    let mut mode = desc.style.mode();
    if surface.color_depth() < 16
        && matches!(mode, StyleMode::Colorbar | StyleMode::Gradient)
    {
        mode = StyleMode::Invert;
    }

    match mode {
        StyleMode::Gradient => {
            vp.draw_mode = DrawMode::FG;
            let (start, end) = gradient_span(vp, rect.h, desc.nlines, desc.line);
            gradient_fill(surface, vp, rect, start, end);
            vp.fg = vp.sel_text;
        }
        StyleMode::Colorbar => {
            vp.draw_mode = DrawMode::FG;
            vp.fg = vp.sel_start;
            surface.fill_rect(vp, rect);
            vp.fg = vp.sel_text;
        }
        StyleMode::Invert => {
            vp.draw_mode = DrawMode::SOLID;
            surface.fill_rect(vp, rect);
            vp.draw_mode = DrawMode::SOLID.with_inverse();
        }
        StyleMode::None => {
            vp.draw_mode = DrawMode::SOLID.with_inverse();
            surface.fill_rect(vp, rect);
            vp.draw_mode = DrawMode::SOLID;
        }
    }
}

/// Style the rectangle and draw `text` on it, skipping `skip_px` leading
/// pixel columns. Restores the viewport registers afterwards; this is the
/// repaint primitive scrolled lines are rebuilt with.
pub fn draw_styled_text<S: Surface>(
    surface: &mut S,
    vp: &mut Viewport,
    rect: Rect,
    desc: &LineDescriptor,
    text: &str,
    skip_px: i32,
) {
    let saved = (vp.fg, vp.bg, vp.draw_mode);
    apply_style(surface, vp, rect, desc);
    if !text.is_empty() {
        let text_y = rect.y + rect.h / 2 - surface.char_height(vp.font) / 2;
        surface.draw_text(vp, rect.x, text_y, skip_px, text);
    }
    vp.fg = saved.0;
    vp.bg = saved.1;
    vp.draw_mode = saved.2;
}

/// Start and end colors of the band a single line occupies inside a
/// gradient spanning `nlines` lines of height `h`.
fn gradient_span(vp: &Viewport, h: i32, nlines: i16, line: i16) -> (Rgb, Rgb) {
    let total_rows = i32::from(nlines.max(1)) * h;
    if total_rows <= 0 {
        return (vp.sel_start, vp.sel_end);
    }
    let skip_rows = i32::from(line.max(0)) * h;

    let mut ramp = Ramp::new(vp.sel_start, vp.sel_end, total_rows);
    ramp.skip(skip_rows);
    let start = ramp.color();
    ramp.skip(h);
    let end = ramp.color();
    (start, end)
}

/// Fill `rect` with a vertical ramp from `start` to `end`.
pub fn gradient_fill<S: Surface>(surface: &mut S, vp: &mut Viewport, rect: Rect, start: Rgb, end: Rgb) {
    gradient_fill_part(surface, vp, rect, start, end, rect.h, 0);
}

/// Partial-gradient fill: the ramp is computed as if it were `src_height`
/// rows tall and the first `row_skip` rows are not drawn, so one band of
/// a taller gradient can be repainted exactly.
pub fn gradient_fill_part<S: Surface>(
    surface: &mut S,
    vp: &mut Viewport,
    rect: Rect,
    start: Rgb,
    end: Rgb,
    src_height: i32,
    row_skip: i32,
) {
    if rect.is_empty() || src_height <= 0 {
        return;
    }

    let old_fg = vp.fg;
    let mut ramp = Ramp::new(start, end, src_height);
    ramp.skip(row_skip.max(0));

    for row in 0..rect.h {
        vp.fg = ramp.color();
        surface.hline(vp, rect.x, rect.x + rect.w, rect.y + row);
        ramp.skip(1);
    }

    vp.fg = old_fg;
}

/// 16.16 fixed-point color ramp, one step per pixel row. The half-step
/// bias keeps per-row rounding stable without a division per row.
struct Ramp {
    r: i32,
    g: i32,
    b: i32,
    r_step: i32,
    g_step: i32,
    b_step: i32,
}

impl Ramp {
    fn new(start: Rgb, end: Rgb, rows: i32) -> Self {
        let step_mul = (1 << 16) / rows;
        Self {
            r: (i32::from(start.r) << 16) + (1 << 15),
            g: (i32::from(start.g) << 16) + (1 << 15),
            b: (i32::from(start.b) << 16) + (1 << 15),
            r_step: (i32::from(start.r) - i32::from(end.r)) * step_mul,
            g_step: (i32::from(start.g) - i32::from(end.g)) * step_mul,
            b_step: (i32::from(start.b) - i32::from(end.b)) * step_mul,
        }
    }

    fn skip(&mut self, rows: i32) {
        self.r -= self.r_step * rows;
        self.g -= self.g_step * rows;
        self.b -= self.b_step * rows;
    }

    fn color(&self) -> Rgb {
        Rgb::new(
            (self.r >> 16).clamp(0, 255) as u8,
            (self.g >> 16).clamp(0, 255) as u8,
            (self.b >> 16).clamp(0, 255) as u8,
        )
    }
}
