//! Recording surface with fixed metrics, for exercising the engine
//! without a framebuffer.

use heapless::{String, Vec};

use crate::surface::{DrawMode, FontId, Icon, Rect, Rgb, Surface};
use crate::viewport::Viewport;

pub const CHAR_W: i32 = 6;
pub const CHAR_H: i32 = 8;
pub const ICON_W: i32 = 7;
pub const ICON_H: i32 = 8;

const MAX_OPS: usize = 64;
const OP_TEXT_BYTES: usize = 64;

/// One recorded drawing call, coordinates as the engine issued them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TraceOp {
    FillRect {
        rect: Rect,
        mode: DrawMode,
        fg: Rgb,
        bg: Rgb,
    },
    HLine {
        x1: i32,
        x2: i32,
        y: i32,
        fg: Rgb,
    },
    Text {
        x: i32,
        y: i32,
        skip_px: i32,
        text: String<OP_TEXT_BYTES>,
    },
    Icon {
        icon: Icon,
        x: i32,
        y: i32,
    },
}

pub struct TraceSurface {
    width: i32,
    height: i32,
    depth: u8,
    pub ops: Vec<TraceOp, MAX_OPS>,
}

impl TraceSurface {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_depth(width, height, 16)
    }

    pub fn with_depth(width: i32, height: i32, depth: u8) -> Self {
        Self {
            width,
            height,
            depth,
            ops: Vec::new(),
        }
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Recorded text ops in issue order.
    pub fn texts(&self) -> impl Iterator<Item = &TraceOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, TraceOp::Text { .. }))
    }

    fn record(&mut self, op: TraceOp) {
        let _ = self.ops.push(op);
    }
}

impl Surface for TraceSurface {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn color_depth(&self) -> u8 {
        self.depth
    }

    fn fill_rect(&mut self, vp: &Viewport, rect: Rect) {
        self.record(TraceOp::FillRect {
            rect,
            mode: vp.draw_mode,
            fg: vp.fg,
            bg: vp.bg,
        });
    }

    fn hline(&mut self, vp: &Viewport, x1: i32, x2: i32, y: i32) {
        self.record(TraceOp::HLine {
            x1,
            x2,
            y,
            fg: vp.fg,
        });
    }

    fn draw_text(&mut self, _vp: &Viewport, x: i32, y: i32, skip_px: i32, text: &str) {
        let mut copy: String<OP_TEXT_BYTES> = String::new();
        for ch in text.chars() {
            if copy.push(ch).is_err() {
                break;
            }
        }
        self.record(TraceOp::Text {
            x,
            y,
            skip_px,
            text: copy,
        });
    }

    fn draw_icon(&mut self, _vp: &Viewport, icon: Icon, x: i32, y: i32) {
        self.record(TraceOp::Icon { icon, x, y });
    }

    fn text_width(&self, _font: FontId, text: &str) -> i32 {
        CHAR_W * text.chars().count() as i32
    }

    fn char_width(&self, _font: FontId) -> i32 {
        CHAR_W
    }

    fn char_height(&self, _font: FontId) -> i32 {
        CHAR_H
    }

    fn icon_width(&self) -> i32 {
        ICON_W
    }

    fn icon_height(&self) -> i32 {
        ICON_H
    }
}
