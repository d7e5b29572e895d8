//! Canvas - Retained display list
//!
//! Widgets paint into a [`Canvas`] during `draw`. The canvas records drawing
//! ops rather than pixels; the op list is retained after the paint and handed
//! to the surface backend for presentation. Backends rasterize however they
//! like (terminal cells, test assertions, a real raster target).

use crate::types::{Rect, Rgba, TextAlign, TextStyle};

// =============================================================================
// DRAW OPS
// =============================================================================

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Filled rectangle, optionally with rounded corners.
    FillRect { rect: Rect, color: Rgba, radius: f32 },
    /// Rectangle outline of `width` thickness.
    StrokeRect { rect: Rect, color: Rgba, width: f32, radius: f32 },
    /// Single text run. `x`/`y` anchor the top-left of the run for `Left`
    /// alignment; `Center`/`Right` anchor against `x` accordingly.
    Text {
        x: f32,
        y: f32,
        content: String,
        color: Rgba,
        font_size: f32,
        font_family: String,
        align: TextAlign,
        style: TextStyle,
    },
}

// =============================================================================
// CANVAS
// =============================================================================

/// Retained-mode drawing surface for one component.
#[derive(Debug, Default)]
pub struct Canvas {
    width: f32,
    height: f32,
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, ops: Vec::new() }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Resize the drawable region. Retained ops are dropped; the next paint
    /// rebuilds them at the new size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.ops.clear();
    }

    /// Start a fresh frame, discarding the retained ops.
    pub fn begin(&mut self) {
        self.ops.clear();
    }

    /// Rectangle covering the whole canvas.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba, radius: f32) {
        self.ops.push(DrawOp::FillRect { rect, color, radius });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f32, radius: f32) {
        if width <= 0.0 {
            return;
        }
        self.ops.push(DrawOp::StrokeRect { rect, color, width, radius });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        x: f32,
        y: f32,
        content: impl Into<String>,
        color: Rgba,
        font_size: f32,
        font_family: impl Into<String>,
        align: TextAlign,
        style: TextStyle,
    ) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            content: content.into(),
            color,
            font_size,
            font_family: font_family.into(),
            align,
            style,
        });
    }

    /// Retained ops of the last frame, in paint order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
}

// =============================================================================
// TESTS
// =============================================================================
