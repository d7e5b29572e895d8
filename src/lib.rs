//! # canvas-widgets
//!
//! VB6-style widget toolkit over a retained-mode canvas.
//!
//! Widgets own a classic property set (position, size, colors, enabled and
//! visible flags) and paint themselves into a retained display list whenever
//! a property change or interaction requests a redraw. The host environment
//! supplies one rendering surface per widget and feeds it raw pointer and
//! keyboard signals; widgets turn those into state transitions and semantic
//! events.
//!
//! ## Architecture
//!
//! ```text
//! host signals → state machine → semantic events → listeners
//!                      ↓
//!               redraw request → draw() → Canvas ops → SurfaceBackend
//! ```
//!
//! Everything is single-threaded and cooperative: property sets, event
//! emission and input handling run to completion on the calling thread. The
//! only periodic work is the text input's cursor blink, driven by a
//! cooperative [`schedule::Scheduler`] the host pumps from its frame loop.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, TextAlign, WidgetKind, Rect)
//! - [`events`] - Semantic events and the per-component emitter
//! - [`component`] - Base property contract, state machine, Widget trait
//! - [`widgets`] - Button, Label, TextInput
//! - [`canvas`] / [`surface`] - Retained display list and surface contract
//! - [`backend`] - Terminal presenter (crossterm)

pub mod backend;
pub mod canvas;
pub mod component;
pub mod error;
pub mod events;
pub mod metrics;
pub mod schedule;
pub mod surface;
pub mod types;
pub mod widgets;

// Re-export commonly used items
pub use types::{Rect, Rgba, TextAlign, TextStyle, WidgetKind};

pub use canvas::{Canvas, DrawOp};

pub use component::{ComponentBase, ComponentOptions, ComponentState, NameSource, Widget};

pub use error::Error;

pub use events::{Event, EventEmitter, KeyEvent, Listener, ListenerId, Modifiers};

pub use metrics::{FontMetrics, MetricsHandle, Monospace};

pub use schedule::{Scheduler, TimerId};

pub use surface::{NullBackend, PaintMode, RedrawHandle, Surface, SurfaceBackend};

pub use widgets::{Button, Label, LabelOptions, TextInput, TextInputOptions};
