//! Surface - Host rendering region for one component
//!
//! Each component exclusively owns a [`Surface`]: a retained [`Canvas`] plus
//! a [`SurfaceBackend`] provided by the host. The backend is the only
//! host-facing capability set the core assumes - position/resize, show/hide,
//! present a painted frame, and teardown. No specific graphics API leaks in.
//!
//! Redraw requests coalesce through a shared [`RedrawHandle`]: any number of
//! requests between paints produce exactly one repaint.

use std::cell::Cell;
use std::rc::Rc;

use crate::canvas::Canvas;
use crate::types::Rect;

// =============================================================================
// BACKEND CONTRACT
// =============================================================================

/// Host capability set backing a component's surface.
pub trait SurfaceBackend {
    /// Move/resize the drawable region.
    fn set_bounds(&mut self, bounds: Rect);
    /// Show or hide the region without destroying it.
    fn set_visible(&mut self, visible: bool);
    /// Present a freshly painted frame.
    fn present(&mut self, canvas: &Canvas);
    /// Detach the region permanently.
    fn remove(&mut self);
}

/// Backend that discards everything. Headless default.
#[derive(Debug, Default)]
pub struct NullBackend;

impl SurfaceBackend for NullBackend {
    fn set_bounds(&mut self, _bounds: Rect) {}
    fn set_visible(&mut self, _visible: bool) {}
    fn present(&mut self, _canvas: &Canvas) {}
    fn remove(&mut self) {}
}

/// Backend that counts calls. For tests and headless hosts that only need
/// to observe surface activity.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub presents: Rc<Cell<usize>>,
    pub removed: Rc<Cell<bool>>,
    pub visible: Rc<Cell<bool>>,
    pub bounds: Rc<Cell<Rect>>,
}

impl SurfaceBackend for RecordingBackend {
    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds.set(bounds);
    }
    fn set_visible(&mut self, visible: bool) {
        self.visible.set(visible);
    }
    fn present(&mut self, _canvas: &Canvas) {
        self.presents.set(self.presents.get() + 1);
    }
    fn remove(&mut self) {
        self.removed.set(true);
    }
}

// =============================================================================
// REDRAW HANDLE
// =============================================================================

/// Shared repaint-request flag.
///
/// Clones point at the same flag, so a blink timer can request a repaint
/// without holding a reference to the widget.
#[derive(Clone, Default)]
pub struct RedrawHandle(Rc<Cell<bool>>);

impl RedrawHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a repaint. Requests coalesce until the next paint.
    pub fn request(&self) {
        self.0.set(true);
    }

    /// Whether a repaint is pending.
    pub fn is_pending(&self) -> bool {
        self.0.get()
    }

    /// Clear and return the pending flag.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

// =============================================================================
// PAINT MODE
// =============================================================================

/// How paints are driven.
///
/// Surfaces start `Continuous` (paint every frame); a widget's `setup` hook
/// switches to `OnDemand` so the system is redraw-driven, not frame-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    Continuous,
    OnDemand,
}

// =============================================================================
// SURFACE
// =============================================================================

/// A component's rendering surface: canvas + backend + paint scheduling.
pub struct Surface {
    canvas: Canvas,
    backend: Box<dyn SurfaceBackend>,
    bounds: Rect,
    visible: bool,
    paint_mode: PaintMode,
    redraw: RedrawHandle,
}

impl Surface {
    pub fn new(backend: Box<dyn SurfaceBackend>, bounds: Rect) -> Self {
        let mut backend = backend;
        backend.set_bounds(bounds);
        Self {
            canvas: Canvas::new(bounds.width, bounds.height),
            backend,
            bounds,
            visible: true,
            paint_mode: PaintMode::Continuous,
            redraw: RedrawHandle::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Reposition without resizing. Does not touch the canvas or request a
    /// repaint - the retained frame is still valid at the new position.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.bounds.x = x;
        self.bounds.y = y;
        self.backend.set_bounds(self.bounds);
    }

    /// Resize the drawable region. The canvas is rebuilt at the new size on
    /// the next paint.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.bounds.width = width;
        self.bounds.height = height;
        self.canvas.resize(width, height);
        self.backend.set_bounds(self.bounds);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.backend.set_visible(visible);
    }

    pub fn paint_mode(&self) -> PaintMode {
        self.paint_mode
    }

    pub fn set_paint_mode(&mut self, mode: PaintMode) {
        self.paint_mode = mode;
    }

    /// Shared handle for requesting repaints.
    pub fn redraw_handle(&self) -> RedrawHandle {
        self.redraw.clone()
    }

    /// Request a repaint (coalesced).
    pub fn request_redraw(&self) {
        self.redraw.request();
    }

    /// Whether the next `paint` call should actually repaint.
    pub fn needs_paint(&self) -> bool {
        self.visible
            && (self.paint_mode == PaintMode::Continuous || self.redraw.is_pending())
    }

    /// Take the canvas out for painting. Pair with [`Surface::finish_paint`].
    ///
    /// Consumes the pending-redraw flag.
    pub(crate) fn take_canvas(&mut self) -> Canvas {
        self.redraw.take();
        std::mem::take(&mut self.canvas)
    }

    /// Put the painted canvas back and present it.
    pub(crate) fn finish_paint(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        self.backend.present(&self.canvas);
    }

    /// Retained frame of the last paint.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Detach from the host.
    pub fn remove(&mut self) {
        self.backend.remove();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> (Surface, RecordingBackend) {
        let backend = RecordingBackend::default();
        let shadow = RecordingBackend {
            presents: backend.presents.clone(),
            removed: backend.removed.clone(),
            visible: backend.visible.clone(),
            bounds: backend.bounds.clone(),
        };
        let surface = Surface::new(Box::new(backend), Rect::new(0.0, 0.0, 100.0, 30.0));
        (surface, shadow)
    }

    #[test]
    fn test_redraw_requests_coalesce() {
        let (mut surface, _backend) = surface();
        surface.set_paint_mode(PaintMode::OnDemand);

        surface.request_redraw();
        surface.request_redraw();
        surface.request_redraw();
        assert!(surface.needs_paint());

        let canvas = surface.take_canvas();
        surface.finish_paint(canvas);
        assert!(!surface.needs_paint());
    }

    #[test]
    fn test_continuous_mode_always_paints() {
        let (surface, _backend) = surface();
        assert_eq!(surface.paint_mode(), PaintMode::Continuous);
        assert!(surface.needs_paint());
    }

    #[test]
    fn test_hidden_surface_never_needs_paint() {
        let (mut surface, backend) = surface();
        surface.request_redraw();
        surface.set_visible(false);
        assert!(!surface.needs_paint());
        assert!(!backend.visible.get());
    }

    #[test]
    fn test_set_position_keeps_canvas() {
        let (mut surface, backend) = surface();
        surface.set_position(42.0, 7.0);
        assert_eq!(backend.bounds.get(), Rect::new(42.0, 7.0, 100.0, 30.0));
        // Position change alone leaves no repaint pending
        assert_eq!(surface.canvas().width(), 100.0);
    }

    #[test]
    fn test_set_size_resizes_canvas() {
        let (mut surface, backend) = surface();
        surface.set_size(200.0, 60.0);
        assert_eq!(surface.canvas().width(), 200.0);
        assert_eq!(surface.canvas().height(), 60.0);
        assert_eq!(backend.bounds.get(), Rect::new(0.0, 0.0, 200.0, 60.0));
    }

    #[test]
    fn test_present_reaches_backend() {
        let (mut surface, backend) = surface();
        let canvas = surface.take_canvas();
        surface.finish_paint(canvas);
        assert_eq!(backend.presents.get(), 1);

        surface.remove();
        assert!(backend.removed.get());
    }

    #[test]
    fn test_redraw_handle_shared() {
        let (surface, _backend) = surface();
        let handle = surface.redraw_handle();
        handle.request();
        assert!(surface.redraw_handle().is_pending());
        assert!(handle.take());
        assert!(!handle.is_pending());
    }
}
