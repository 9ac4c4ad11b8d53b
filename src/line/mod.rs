//! Format-driven line composition.
//!
//! A line is described by a compact format string interpreted left to
//! right against a moving pixel cursor:
//!
//! * literal text up to the next unescaped `$` is drawn as-is (`$$` is a
//!   literal dollar sign),
//! * `$s` / `$S` advance the cursor by raw pixels / character cells,
//! * `$i` / `$I` draw the next icon argument (`$I` with padding),
//! * `$t` draws the next text argument, optionally resuming `n` pixels in,
//! * a numeric prefix (`$12s`) or `$*` (count pulled from the arguments)
//!   sets the directive's count.
//!
//! Arguments are consumed positionally in the order the directives demand
//! them. Any unrecognized directive renders a visible `<E:c>` marker and
//! stops the composition of that call; the error never propagates.


use heapless::String;
use log::debug;

use crate::style::{apply_style, Style};
use crate::surface::{Icon, Rect, Rgb, Surface};
use crate::viewport::Viewport;

const LITERAL_RUN_BYTES: usize = 128;

/// Caller-supplied style record for one line of output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LineDescriptor {
    pub style: Style,
    /// Text color when [`Style::COLORED`] is set.
    pub custom_color: Rgb,
    /// Line height in pixels; -1 derives it from the font.
    pub height: i32,
    /// Index of this line within a multi-line gradient.
    pub line: i16,
    /// Total lines spanned by the gradient.
    pub nlines: i16,
    /// Hand overflowing text to the scroll engine.
    pub scroll: bool,
}

impl Default for LineDescriptor {
    fn default() -> Self {
        Self {
            style: Style::NONE,
            custom_color: Rgb::BLACK,
            height: -1,
            line: 0,
            nlines: 1,
            scroll: false,
        }
    }
}

/// One positional argument consumed by a format directive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineArg<'a> {
    /// Icon for `$i`/`$I`; `None` reserves the width without drawing.
    Icon(Option<Icon>),
    /// Text for `$t`.
    Text(&'a str),
    /// Count for `$*`.
    Count(i32),
}

struct ArgCursor<'a> {
    args: &'a [LineArg<'a>],
    index: usize,
}

impl<'a> ArgCursor<'a> {
    fn new(args: &'a [LineArg<'a>]) -> Self {
        Self { args, index: 0 }
    }

    fn next_icon(&mut self) -> Option<Option<Icon>> {
        match self.args.get(self.index) {
            Some(LineArg::Icon(icon)) => {
                self.index += 1;
                Some(*icon)
            }
            _ => None,
        }
    }

    fn next_text(&mut self) -> Option<&'a str> {
        match self.args.get(self.index) {
            Some(LineArg::Text(text)) => {
                self.index += 1;
                Some(text)
            }
            _ => None,
        }
    }

    fn next_count(&mut self) -> Option<i32> {
        match self.args.get(self.index) {
            Some(LineArg::Count(n)) => {
                self.index += 1;
                Some(*n)
            }
            _ => None,
        }
    }
}

/// Receiver for text runs that may need marquee animation. Implemented by
/// the scroll engine; kept as a trait so composition itself stays free of
/// the slot table.
pub trait TextScroller<S: Surface> {
    #[allow(clippy::too_many_arguments)]
    fn scroll_text(
        &self,
        surface: &mut S,
        vp: &Viewport,
        x: i32,
        y: i32,
        desc: &LineDescriptor,
        text: &str,
        skip_px: i32,
        now: u64,
    );
}

/// Style and compose one line without scroll handling; overflowing `$t`
/// text is simply clipped by the surface. Returns the final cursor
/// position in pixels.
pub fn draw_line<S: Surface>(
    surface: &mut S,
    vp: &mut Viewport,
    x: i32,
    y: i32,
    desc: &LineDescriptor,
    fmt: &str,
    args: &[LineArg<'_>],
) -> i32 {
    put_line_impl(surface, vp, x, y, desc, fmt, args, None)
}

pub(crate) fn resolve_height<S: Surface>(surface: &S, vp: &Viewport, desc: &LineDescriptor) -> i32 {
    if desc.height != -1 {
        desc.height
    } else if vp.line_height != 0 {
        vp.line_height
    } else {
        surface.char_height(vp.font)
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn put_line_impl<S: Surface>(
    surface: &mut S,
    vp: &mut Viewport,
    x: i32,
    y: i32,
    desc: &LineDescriptor,
    fmt: &str,
    args: &[LineArg<'_>],
    scroller: Option<(&dyn TextScroller<S>, u64)>,
) -> i32 {
    vp.validate(surface);

    let h = resolve_height(surface, vp, desc);
    let (xpos, ypos) = if desc.style.contains(Style::XY_PIXELS) {
        (x, y)
    } else {
        (x * surface.char_width(vp.font), y * h)
    };

    let ambient_fg = vp.fg;
    apply_style(
        surface,
        vp,
        Rect::new(xpos, ypos, vp.w - xpos, h),
        desc,
    );
    let end = compose(surface, vp, xpos, ypos, h, desc, fmt, args, scroller);

    // Text color is scratch state; give the caller back the ambient
    // foreground, matching the documented post-call reset.
    if surface.color_depth() > 1 {
        vp.fg = ambient_fg;
    }
    end
}

/// Single linear pass over the format string. No backtracking, no
/// recursion; bounded work per input byte.
#[allow(clippy::too_many_arguments)]
fn compose<S: Surface>(
    surface: &mut S,
    vp: &mut Viewport,
    x: i32,
    y: i32,
    h: i32,
    desc: &LineDescriptor,
    fmt: &str,
    args: &[LineArg<'_>],
    scroller: Option<(&dyn TextScroller<S>, u64)>,
) -> i32 {
    let font = vp.font;
    let char_w = surface.char_width(font);
    let char_h = surface.char_height(font);
    let icon_w = surface.icon_width();
    let icon_h = surface.icon_height();

    // h/2 - c/2 rounds toward the larger bottom gap when h - c is odd.
    let text_y = y + h / 2 - char_h / 2;
    let icon_y = y + h / 2 - icon_h / 2;

    let mut cursor = x;
    let mut args = ArgCursor::new(args);
    let mut run: String<LITERAL_RUN_BYTES> = String::new();
    let mut chars = fmt.chars().peekable();

    loop {
        let ch = match chars.next() {
            Some(ch) => ch,
            None => {
                flush_run(surface, vp, &mut run, &mut cursor, text_y);
                return cursor;
            }
        };

        if ch != '$' {
            push_literal(surface, vp, &mut run, &mut cursor, text_y, ch);
            continue;
        }
        if chars.peek() == Some(&'$') {
            chars.next();
            push_literal(surface, vp, &mut run, &mut cursor, text_y, '$');
            continue;
        }

        flush_run(surface, vp, &mut run, &mut cursor, text_y);

        // Numeric prefix. An explicit 0 is a valid count, distinct from
        // no count at all.
        let mut count = 0i32;
        let mut have_count = false;
        let directive = loop {
            match chars.next() {
                Some(d) if d.is_ascii_digit() => {
                    count = count
                        .saturating_mul(10)
                        .saturating_add((d as u8 - b'0') as i32);
                    have_count = true;
                }
                Some('*') => match args.next_count() {
                    Some(n) => {
                        count = n;
                        have_count = true;
                    }
                    None => {
                        debug!("line format pulled a count argument that is not there");
                        draw_error_marker(surface, vp, cursor, text_y, Some('*'));
                        return cursor;
                    }
                },
                Some(d) => break d,
                None => {
                    // Format string ran out mid-directive; treated exactly
                    // like an unrecognized directive byte.
                    draw_error_marker(surface, vp, cursor, text_y, None);
                    return cursor;
                }
            }
        };

        match directive {
            's' => {
                cursor += if have_count { count.max(0) } else { 1 };
            }
            'S' => {
                cursor += char_w * if have_count { count.max(0) } else { 1 };
            }
            'i' | 'I' => {
                let pad = if directive == 'I' {
                    if have_count { count.max(0) } else { 1 }
                } else {
                    0
                };
                match args.next_icon() {
                    Some(icon) => {
                        if let Some(icon) = icon {
                            surface.draw_icon(vp, icon, cursor + pad, icon_y);
                        }
                        cursor += icon_w + 2 * pad;
                    }
                    None => {
                        debug!("line format expected an icon argument");
                        draw_error_marker(surface, vp, cursor, text_y, Some(directive));
                        return cursor;
                    }
                }
            }
            't' => {
                // A count on $t is a pixel offset into the string, used to
                // resume a scrolled line mid-way; it defaults to 0.
                let skip = if have_count { count.max(0) } else { 0 };
                match args.next_text() {
                    Some(text) => {
                        match scroller {
                            Some((engine, now)) if desc.scroll => {
                                engine.scroll_text(surface, vp, cursor, y, desc, text, skip, now);
                            }
                            _ => surface.draw_text(vp, cursor, text_y, skip, text),
                        }
                        cursor += surface.text_width(font, text);
                    }
                    None => {
                        debug!("line format expected a text argument");
                        draw_error_marker(surface, vp, cursor, text_y, Some(directive));
                        return cursor;
                    }
                }
            }
            other => {
                draw_error_marker(surface, vp, cursor, text_y, Some(other));
                return cursor;
            }
        }
    }
}

fn push_literal<S: Surface>(
    surface: &mut S,
    vp: &Viewport,
    run: &mut String<LITERAL_RUN_BYTES>,
    cursor: &mut i32,
    text_y: i32,
    ch: char,
) {
    if run.push(ch).is_err() {
        flush_run(surface, vp, run, cursor, text_y);
        let _ = run.push(ch);
    }
}

fn flush_run<S: Surface>(
    surface: &mut S,
    vp: &Viewport,
    run: &mut String<LITERAL_RUN_BYTES>,
    cursor: &mut i32,
    text_y: i32,
) {
    if run.is_empty() {
        return;
    }
    surface.draw_text(vp, *cursor, text_y, 0, run);
    *cursor += surface.text_width(vp.font, run);
    run.clear();
}

/// Visible fail-fast marker for a malformed format string. The erroneous
/// line stays on the display so the developer sees it; composition of the
/// rest of the string is abandoned.
fn draw_error_marker<S: Surface>(
    surface: &mut S,
    vp: &Viewport,
    cursor: i32,
    text_y: i32,
    ch: Option<char>,
) {
    let mut marker: String<8> = String::new();
    let _ = marker.push_str("<E:");
    if let Some(ch) = ch {
        let _ = marker.push(ch);
    }
    let _ = marker.push('>');
    surface.draw_text(vp, cursor, text_y, 0, &marker);
}
