//! Marquee scrolling for lines wider than their rectangle.
//!
//! One engine instance drives one physical display. The slot table is
//! shared between application submissions and the tick driver, which may
//! run from a timer context, so every table read-modify-write happens
//! inside a critical section. Nothing here blocks, allocates, or performs
//! I/O; every call is bounded-time.

#[cfg(test)]
mod tests;

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{String, Vec};
use log::{debug, warn};

use crate::line::{self, LineArg, LineDescriptor, TextScroller};
use crate::style::{draw_styled_text, Style};
use crate::surface::{Rect, Surface};
use crate::viewport::Viewport;

/// Monotonic tick count supplied by the host; the engine never reads a
/// clock itself.
pub type Tick = u64;

/// Capacity of one slot's text copy. Longer submissions are truncated on
/// a character boundary, never overflowed.
pub const SCROLL_LINE_BYTES: usize = 256;

/// Fixed animation parameters, supplied at construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScrollConfig {
    /// Pixels moved per tick.
    pub step_px: i32,
    /// Ticks between registration (or a bounce) and motion.
    pub delay_ticks: Tick,
    /// A line is bounced instead of wrapped when its rendered width is
    /// below `rect_width * (100 + bidir_limit_pct) / 100`. 0 disables
    /// bidirectional scrolling entirely.
    pub bidir_limit_pct: u8,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step_px: 6,
            delay_ticks: 100,
            bidir_limit_pct: 50,
        }
    }
}

/// Everything a custom painter may read about the slot it repaints.
pub struct ScrollContext<'a> {
    pub viewport: &'a Viewport,
    pub descriptor: &'a LineDescriptor,
    pub rect: Rect,
    pub text: &'a str,
    pub offset: i32,
    /// The handle registered with [`SlotPainter::Custom`].
    pub token: u32,
}

/// How a slot's rectangle is repainted each tick.
///
/// Painters run while the engine holds the slot table; they must not call
/// back into the engine.
pub enum SlotPainter<S: Surface> {
    /// Style renderer plus offset text, rebuilt at the current offset.
    Builtin,
    /// Caller-supplied painter with an explicitly-owned handle.
    Custom {
        paint: fn(&mut S, &ScrollContext<'_>),
        token: u32,
    },
}

impl<S: Surface> Clone for SlotPainter<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Surface> Copy for SlotPainter<S> {}

/// Animation state of one slot, for hosts and tests.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlotInfo {
    pub offset: i32,
    pub backward: bool,
    pub bidir: bool,
    pub start_tick: Tick,
}

struct ScrollSlot<S: Surface> {
    x: i32,
    y: i32,
    vp_id: u16,
    rect: Rect,
    text: String<SCROLL_LINE_BYTES>,
    text_width: i32,
    offset: i32,
    backward: bool,
    bidir: bool,
    start_tick: Tick,
    descriptor: LineDescriptor,
    viewport: Viewport,
    painter: SlotPainter<S>,
}

impl<S: Surface> ScrollSlot<S> {
    fn set_text(&mut self, surface: &S, text: &str) {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                warn!(
                    "scroll line at ({}, {}) truncated to {} bytes",
                    self.x, self.y, SCROLL_LINE_BYTES
                );
                break;
            }
        }
        self.text_width = surface.text_width(self.viewport.font, &self.text);
    }

    fn repaint(&self, surface: &mut S) {
        match self.painter {
            SlotPainter::Builtin => {
                let mut vp = self.viewport;
                draw_styled_text(
                    surface,
                    &mut vp,
                    self.rect,
                    &self.descriptor,
                    &self.text,
                    self.offset,
                );
            }
            SlotPainter::Custom { paint, token } => {
                let ctx = ScrollContext {
                    viewport: &self.viewport,
                    descriptor: &self.descriptor,
                    rect: self.rect,
                    text: &self.text,
                    offset: self.offset,
                    token,
                };
                paint(surface, &ctx);
            }
        }
    }
}

/// Fixed-capacity table of scrolling lines for one display.
///
/// `LINES` is the slot capacity. When the table is full, a submission for
/// a new position key is rejected and the line stays static; the table
/// never grows.
pub struct ScrollEngine<S: Surface, const LINES: usize> {
    config: ScrollConfig,
    table: Mutex<RefCell<Vec<ScrollSlot<S>, LINES>>>,
}

impl<S: Surface, const LINES: usize> ScrollEngine<S, LINES> {
    pub const fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            table: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub const fn config(&self) -> ScrollConfig {
        self.config
    }

    /// Style and compose one line, handing overflowing `$t` text to this
    /// engine. Returns the final cursor position in pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn put_line(
        &self,
        surface: &mut S,
        vp: &mut Viewport,
        x: i32,
        y: i32,
        desc: &LineDescriptor,
        fmt: &str,
        args: &[LineArg<'_>],
        now: Tick,
    ) -> i32 {
        line::put_line_impl(
            surface,
            vp,
            x,
            y,
            desc,
            fmt,
            args,
            Some((self as &dyn TextScroller<S>, now)),
        )
    }

    /// Scroll-aware rendering of plain text at pixel position `(x, y)`.
    ///
    /// Text that fits its rectangle is rendered immediately and any slot
    /// at this position key is retired. Overflowing text is rendered once
    /// and registered for animation; re-submitting at the same key only
    /// refreshes content and style, preserving the animation phase.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &self,
        surface: &mut S,
        vp: &Viewport,
        x: i32,
        y: i32,
        desc: &LineDescriptor,
        text: &str,
        x_offset: i32,
        now: Tick,
    ) {
        self.submit_with(surface, vp, x, y, desc, text, x_offset, SlotPainter::Builtin, now);
    }

    /// [`submit`](Self::submit) with a caller-supplied painter.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_custom(
        &self,
        surface: &mut S,
        vp: &Viewport,
        x: i32,
        y: i32,
        desc: &LineDescriptor,
        text: &str,
        x_offset: i32,
        painter: SlotPainter<S>,
        now: Tick,
    ) {
        self.submit_with(surface, vp, x, y, desc, text, x_offset, painter, now);
    }

    #[allow(clippy::too_many_arguments)]
    fn submit_with(
        &self,
        surface: &mut S,
        vp: &Viewport,
        x: i32,
        y: i32,
        desc: &LineDescriptor,
        text: &str,
        x_offset: i32,
        painter: SlotPainter<S>,
        now: Tick,
    ) {
        let h = line::resolve_height(surface, vp, desc);
        if y >= vp.h {
            return;
        }
        let rect = Rect::new(x, y, vp.w - x, h);
        if rect.is_empty() {
            return;
        }
        let width = surface.text_width(vp.font, text);

        critical_section::with(|cs| {
            let mut table = self.table.borrow_ref_mut(cs);
            let existing = table
                .iter()
                .position(|s| s.x == x && s.y == y && s.vp_id == vp.id);

            if width <= rect.w {
                if let Some(i) = existing {
                    table.swap_remove(i);
                    debug!("scroll slot at ({x}, {y}) retired, content fits");
                }
                paint_static(surface, vp, rect, desc, text, x_offset);
                return;
            }

            match existing {
                Some(i) => {
                    let slot = &mut table[i];
                    slot.rect = rect;
                    slot.descriptor = *desc;
                    slot.viewport = *vp;
                    slot.painter = painter;
                    slot.set_text(surface, text);
                    slot.bidir = self.bidir_eligible(slot.text_width, rect.w);
                }
                None => {
                    // A new line replaces whatever scrolled here before,
                    // and its first frame goes up even when the table has
                    // no room to animate it.
                    remove_intersecting(&mut table, vp.id, rect);
                    paint_static(surface, vp, rect, desc, text, x_offset);

                    if table.is_full() {
                        debug!("scroll table full, line at ({x}, {y}) stays static");
                        return;
                    }

                    let mut slot = ScrollSlot {
                        x,
                        y,
                        vp_id: vp.id,
                        rect,
                        text: String::new(),
                        text_width: 0,
                        offset: x_offset,
                        backward: false,
                        bidir: false,
                        start_tick: now + self.config.delay_ticks,
                        descriptor: *desc,
                        viewport: *vp,
                        painter,
                    };
                    slot.set_text(surface, text);
                    slot.bidir = self.bidir_eligible(slot.text_width, rect.w);
                    let _ = table.push(slot);
                }
            }
        });
    }

    /// Advance every due slot by one animation step and repaint exactly
    /// its rectangle. Invoked once per tick by the host's tick driver.
    pub fn advance(&self, surface: &mut S, now: Tick) {
        critical_section::with(|cs| {
            let mut table = self.table.borrow_ref_mut(cs);
            let mut i = 0;
            while i < table.len() {
                if table[i].start_tick > now {
                    i += 1;
                    continue;
                }
                if table[i].text_width <= table[i].rect.w {
                    // Content shrank to fit since registration.
                    table.swap_remove(i);
                    continue;
                }

                let delay = self.config.delay_ticks;
                let step = self.config.step_px.max(1);
                let slot = &mut table[i];
                let max_offset = slot.text_width - slot.rect.w;

                if slot.bidir {
                    if slot.backward {
                        slot.offset -= step;
                    } else {
                        slot.offset += step;
                    }
                    if slot.offset >= max_offset {
                        slot.offset = max_offset;
                        slot.backward = true;
                        slot.start_tick = now + delay;
                    } else if slot.offset <= 0 {
                        slot.offset = 0;
                        slot.backward = false;
                        slot.start_tick = now + delay;
                    }
                } else {
                    slot.offset += step;
                    if slot.offset > max_offset {
                        slot.offset = 0;
                    }
                }

                table[i].repaint(surface);
                i += 1;
            }
        });
    }

    /// Stop every scrolling line intersecting `rect` of the viewport.
    /// Removal is synchronous: once this returns, no queued animation
    /// frame can touch the region.
    pub fn stop_rect(&self, vp_id: u16, rect: Rect) {
        critical_section::with(|cs| {
            let mut table = self.table.borrow_ref_mut(cs);
            remove_intersecting(&mut table, vp_id, rect);
        });
    }

    /// Stop every scrolling line of the viewport.
    pub fn stop_viewport(&self, vp_id: u16) {
        critical_section::with(|cs| {
            let mut table = self.table.borrow_ref_mut(cs);
            let mut i = 0;
            while i < table.len() {
                if table[i].vp_id == vp_id {
                    table.swap_remove(i);
                } else {
                    i += 1;
                }
            }
        });
    }

    pub fn stop_all(&self) {
        critical_section::with(|cs| self.table.borrow_ref_mut(cs).clear());
    }

    pub fn active_lines(&self) -> usize {
        critical_section::with(|cs| self.table.borrow_ref(cs).len())
    }

    /// Animation state of the slot at a position key, if one is live.
    pub fn slot_info(&self, vp_id: u16, x: i32, y: i32) -> Option<SlotInfo> {
        critical_section::with(|cs| {
            let table = self.table.borrow_ref(cs);
            table
                .iter()
                .find(|s| s.x == x && s.y == y && s.vp_id == vp_id)
                .map(|s| SlotInfo {
                    offset: s.offset,
                    backward: s.backward,
                    bidir: s.bidir,
                    start_tick: s.start_tick,
                })
        })
    }

    fn bidir_eligible(&self, text_width: i32, rect_width: i32) -> bool {
        let pct = i32::from(self.config.bidir_limit_pct);
        pct > 0 && text_width < rect_width * (100 + pct) / 100
    }
}

impl<S: Surface, const LINES: usize> TextScroller<S> for ScrollEngine<S, LINES> {
    fn scroll_text(
        &self,
        surface: &mut S,
        vp: &Viewport,
        x: i32,
        y: i32,
        desc: &LineDescriptor,
        text: &str,
        skip_px: i32,
        now: Tick,
    ) {
        // Composition hands y over as the line's top edge in pixels, so
        // force pixel interpretation regardless of the descriptor.
        let mut pixel_desc = *desc;
        pixel_desc.style = pixel_desc.style | Style::XY_PIXELS;
        self.submit(surface, vp, x, y, &pixel_desc, text, skip_px, now);
    }
}

fn paint_static<S: Surface>(
    surface: &mut S,
    vp: &Viewport,
    rect: Rect,
    desc: &LineDescriptor,
    text: &str,
    x_offset: i32,
) {
    let mut vp = *vp;
    draw_styled_text(surface, &mut vp, rect, desc, text, x_offset);
}

fn remove_intersecting<S: Surface, const LINES: usize>(
    table: &mut Vec<ScrollSlot<S>, LINES>,
    vp_id: u16,
    rect: Rect,
) {
    let mut i = 0;
    while i < table.len() {
        if table[i].vp_id == vp_id && table[i].rect.intersects(rect) {
            table.swap_remove(i);
        } else {
            i += 1;
        }
    }
}
