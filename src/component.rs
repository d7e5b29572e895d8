//! Component - Base widget contract and interaction state machine
//!
//! Every widget owns a [`ComponentBase`]: the VB6-style property set, the
//! event emitter, the rendering surface, and the pointer-interaction state
//! machine. Concrete widgets implement [`Widget`] on top, filling in the
//! `setup`/`draw`/key-handler extension points.
//!
//! # State machine
//!
//! `state` is derived, never set by the host:
//!
//! - `Disabled` exactly while `enabled == false`; every pointer/keyboard
//!   signal is a no-op in that state except re-enabling
//! - pointer-down inside moves `Normal`/`Hover` to `Active`
//! - release while still inside synthesizes `click` (after which `Hover`);
//!   release after dragging out emits only `mouseUp` (then `Normal`)
//! - `focus()`/`blur()` move any enabled state to/from `Focused`
//!
//! `mouse_inside` and `mouse_pressed` are tracked as two independent
//! booleans, not derived from `state`; a press that drags outside keeps
//! `mouse_pressed` while dropping `mouse_inside`.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::canvas::Canvas;
use crate::events::{Event, EventEmitter, KeyEvent, Listener, ListenerId};
use crate::metrics::{MetricsHandle, Monospace};
use crate::surface::{PaintMode, Surface, SurfaceBackend};
use crate::types::{Rect, Rgba, WidgetKind};

// =============================================================================
// STATE
// =============================================================================

/// Visual interaction state. Read-only for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Normal,
    Hover,
    Active,
    Disabled,
    Focused,
}

// =============================================================================
// NAMING
// =============================================================================

/// Injectable counter-backed name generator.
///
/// Clones share the counter, so one source handed to several constructors
/// yields `button-1`, `textinput-2`, ... deterministically.
#[derive(Clone, Default)]
pub struct NameSource {
    counter: Rc<Cell<u64>>,
}

impl NameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, kind: WidgetKind) -> String {
        let n = self.counter.get() + 1;
        self.counter.set(n);
        format!("{}-{}", kind.as_str(), n)
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Construction options shared by every widget kind.
///
/// All fields have defaults; hosts set only what they need.
#[derive(Clone)]
pub struct ComponentOptions {
    pub name: Option<String>,
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub back_color: Rgba,
    pub fore_color: Rgba,
    pub border_color: Rgba,
    pub font_size: f32,
    pub font_family: String,
    pub border_width: f32,
    pub enabled: bool,
    pub visible: bool,
    pub tab_index: i32,
    /// Name generator used when `name` is unset.
    pub names: NameSource,
    /// Glyph metrics used for text layout and caret math.
    pub metrics: MetricsHandle,
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            name: None,
            text: String::new(),
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 30.0,
            back_color: Rgba::WHITE,
            fore_color: Rgba::BLACK,
            border_color: Rgba::GRAY,
            font_size: 12.0,
            font_family: "sans-serif".to_string(),
            border_width: 1.0,
            enabled: true,
            visible: true,
            tab_index: 0,
            names: NameSource::new(),
            metrics: Rc::new(Monospace),
        }
    }
}

// =============================================================================
// COMPONENT BASE
// =============================================================================

/// Property set, emitter, surface and state machine shared by all widgets.
pub struct ComponentBase {
    name: String,
    text: String,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    back_color: Rgba,
    fore_color: Rgba,
    border_color: Rgba,
    font_size: f32,
    font_family: String,
    border_width: f32,
    enabled: bool,
    visible: bool,
    tab_index: i32,
    state: ComponentState,
    mouse_inside: bool,
    mouse_pressed: bool,
    destroyed: bool,
    emitter: EventEmitter,
    surface: Surface,
    metrics: MetricsHandle,
}

impl ComponentBase {
    pub fn new(kind: WidgetKind, backend: Box<dyn SurfaceBackend>, opts: ComponentOptions) -> Self {
        let bounds = Rect::new(opts.left, opts.top, opts.width, opts.height);
        let mut surface = Surface::new(backend, bounds);
        if !opts.visible {
            surface.set_visible(false);
        }
        Self {
            name: opts.name.unwrap_or_else(|| opts.names.next(kind)),
            text: opts.text,
            left: opts.left,
            top: opts.top,
            width: opts.width,
            height: opts.height,
            back_color: opts.back_color,
            fore_color: opts.fore_color,
            border_color: opts.border_color,
            font_size: opts.font_size,
            font_family: opts.font_family,
            border_width: opts.border_width,
            enabled: opts.enabled,
            visible: opts.visible,
            tab_index: opts.tab_index,
            state: if opts.enabled { ComponentState::Normal } else { ComponentState::Disabled },
            mouse_inside: false,
            mouse_pressed: false,
            destroyed: false,
            emitter: EventEmitter::new(),
            surface,
            metrics: opts.metrics,
        }
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn left(&self) -> f32 {
        self.left
    }
    pub fn top(&self) -> f32 {
        self.top
    }
    pub fn width(&self) -> f32 {
        self.width
    }
    pub fn height(&self) -> f32 {
        self.height
    }
    pub fn back_color(&self) -> Rgba {
        self.back_color
    }
    pub fn fore_color(&self) -> Rgba {
        self.fore_color
    }
    pub fn border_color(&self) -> Rgba {
        self.border_color
    }
    pub fn font_size(&self) -> f32 {
        self.font_size
    }
    pub fn font_family(&self) -> &str {
        &self.font_family
    }
    pub fn border_width(&self) -> f32 {
        self.border_width
    }
    pub fn enabled(&self) -> bool {
        self.enabled
    }
    pub fn visible(&self) -> bool {
        self.visible
    }
    pub fn tab_index(&self) -> i32 {
        self.tab_index
    }
    pub fn state(&self) -> ComponentState {
        self.state
    }
    pub fn mouse_inside(&self) -> bool {
        self.mouse_inside
    }
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    // -------------------------------------------------------------------------
    // Setters (property contract: each with exactly its declared side effects)
    // -------------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Emits `textChanged`, then requests a redraw.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.emitter.emit("textChanged", &Event::TextChanged(self.text.clone()));
        self.surface.request_redraw();
    }

    /// Repositions the surface without repainting.
    pub fn set_left(&mut self, left: f32) {
        self.left = left;
        self.surface.set_position(self.left, self.top);
    }

    /// Repositions the surface without repainting.
    pub fn set_top(&mut self, top: f32) {
        self.top = top;
        self.surface.set_position(self.left, self.top);
    }

    /// Resizes the surface and requests a redraw.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.surface.set_size(self.width, self.height);
        self.surface.request_redraw();
    }

    /// Resizes the surface and requests a redraw.
    pub fn set_height(&mut self, height: f32) {
        self.height = height;
        self.surface.set_size(self.width, self.height);
        self.surface.request_redraw();
    }

    pub fn set_back_color(&mut self, color: Rgba) {
        self.back_color = color;
        self.surface.request_redraw();
    }

    pub fn set_fore_color(&mut self, color: Rgba) {
        self.fore_color = color;
        self.surface.request_redraw();
    }

    pub fn set_border_color(&mut self, color: Rgba) {
        self.border_color = color;
        self.surface.request_redraw();
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
        self.surface.request_redraw();
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
        self.surface.request_redraw();
    }

    pub fn set_border_width(&mut self, width: f32) {
        self.border_width = width;
        self.surface.request_redraw();
    }

    /// Toggles surface display and emits `visibleChanged`. Never touches
    /// `enabled` or `state`.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.surface.set_visible(visible);
        self.emitter.emit("visibleChanged", &Event::VisibleChanged(visible));
    }

    pub fn set_tab_index(&mut self, tab_index: i32) {
        self.tab_index = tab_index;
    }

    /// Returns true when the change dropped keyboard focus (caller hooks run
    /// their focus-loss teardown).
    pub(crate) fn set_enabled_internal(&mut self, enabled: bool) -> bool {
        if enabled == self.enabled {
            return false;
        }
        self.enabled = enabled;
        let focus_lost = if enabled {
            self.transition(ComponentState::Normal);
            false
        } else {
            let was_focused = self.state == ComponentState::Focused;
            self.transition(ComponentState::Disabled);
            was_focused
        };
        self.emitter.emit("enabledChanged", &Event::EnabledChanged(enabled));
        self.surface.request_redraw();
        focus_lost
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    pub fn on(&self, event: &str, callback: Listener) -> ListenerId {
        self.emitter.on(event, callback)
    }

    pub fn once(&self, event: &str, callback: Listener) -> ListenerId {
        self.emitter.once(event, callback)
    }

    pub fn off(&self, event: &str, callback: &Listener) {
        self.emitter.off(event, callback)
    }

    pub fn off_id(&self, id: ListenerId) {
        self.emitter.off_id(id)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.emitter.listener_count(event)
    }

    pub fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    pub fn request_redraw(&self) {
        self.surface.request_redraw();
    }

    // -------------------------------------------------------------------------
    // Pointer state machine
    // -------------------------------------------------------------------------

    fn transition(&mut self, next: ComponentState) {
        if self.state != next {
            log::trace!("{}: {:?} -> {:?}", self.name, self.state, next);
            self.state = next;
        }
    }

    /// Pointer pressed inside the component (component-local coordinates).
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !self.enabled || self.destroyed {
            return;
        }
        // A press lands inside by definition, even if the host never
        // delivered a pointer-enter.
        self.mouse_inside = true;
        self.mouse_pressed = true;
        if matches!(self.state, ComponentState::Normal | ComponentState::Hover) {
            self.transition(ComponentState::Active);
        }
        self.emitter.emit("mouseDown", &Event::MouseDown { x, y });
        self.surface.request_redraw();
    }

    /// Pointer released. `click` is synthesized here, never on press, and
    /// only while the pointer is still inside.
    pub fn pointer_up(&mut self, x: f32, y: f32) {
        if !self.enabled || self.destroyed || !self.mouse_pressed {
            return;
        }
        self.mouse_pressed = false;
        if self.mouse_inside {
            self.emitter.emit("click", &Event::Click { x, y });
        }
        self.emitter.emit("mouseUp", &Event::MouseUp { x, y });
        if self.state == ComponentState::Active {
            self.transition(if self.mouse_inside {
                ComponentState::Hover
            } else {
                ComponentState::Normal
            });
        }
        self.surface.request_redraw();
    }

    pub fn pointer_enter(&mut self) {
        if !self.enabled || self.destroyed {
            return;
        }
        self.mouse_inside = true;
        if self.state == ComponentState::Normal && !self.mouse_pressed {
            self.transition(ComponentState::Hover);
        }
        self.emitter.emit("mouseEnter", &Event::MouseEnter);
        self.surface.request_redraw();
    }

    /// A pressed component stays `Active` when the pointer drags out; only
    /// `mouse_inside` drops.
    pub fn pointer_leave(&mut self) {
        if !self.enabled || self.destroyed {
            return;
        }
        self.mouse_inside = false;
        self.emitter.emit("mouseLeave", &Event::MouseLeave);
        if !self.mouse_pressed
            && matches!(self.state, ComponentState::Hover | ComponentState::Active)
        {
            self.transition(ComponentState::Normal);
        }
        self.surface.request_redraw();
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Returns true when focus was gained (hooks run blink startup there).
    pub(crate) fn focus_internal(&mut self) -> bool {
        if !self.enabled || self.destroyed || self.state == ComponentState::Focused {
            return false;
        }
        self.transition(ComponentState::Focused);
        self.emitter.emit("focus", &Event::Focus);
        self.surface.request_redraw();
        true
    }

    /// Returns true when focus was dropped.
    pub(crate) fn blur_internal(&mut self) -> bool {
        if self.state != ComponentState::Focused {
            return false;
        }
        self.transition(ComponentState::Normal);
        self.emitter.emit("blur", &Event::Blur);
        self.surface.request_redraw();
        true
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    pub(crate) fn destroy_internal(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.emitter.emit("destroy", &Event::Destroy);
        self.emitter.remove_all_listeners(None);
        self.surface.remove();
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    pub(crate) fn json_map(&self, kind: WidgetKind) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(kind.as_str()));
        map.insert("name".into(), Value::from(self.name.clone()));
        map.insert("text".into(), Value::from(self.text.clone()));
        map.insert("left".into(), Value::from(self.left));
        map.insert("top".into(), Value::from(self.top));
        map.insert("width".into(), Value::from(self.width));
        map.insert("height".into(), Value::from(self.height));
        map.insert("enabled".into(), Value::from(self.enabled));
        map.insert("visible".into(), Value::from(self.visible));
        map.insert("backColor".into(), Value::from(self.back_color.to_hex()));
        map.insert("foreColor".into(), Value::from(self.fore_color.to_hex()));
        map.insert("fontSize".into(), Value::from(self.font_size));
        map.insert("fontFamily".into(), Value::from(self.font_family.clone()));
        map.insert("borderColor".into(), Value::from(self.border_color.to_hex()));
        map.insert("borderWidth".into(), Value::from(self.border_width));
        map.insert("tabIndex".into(), Value::from(self.tab_index));
        map
    }

    /// Route one dump key through its setter. Returns false for unknown keys.
    /// Known keys carrying a wrong-typed value are consumed without effect.
    pub(crate) fn apply_json_key(&mut self, key: &str, value: &Value) -> bool {
        match key {
            "name" => {
                if let Some(s) = value.as_str() {
                    self.set_name(s);
                }
            }
            "text" => {
                if let Some(s) = value.as_str() {
                    self.set_text(s);
                }
            }
            "left" => {
                if let Some(v) = value.as_f64() {
                    self.set_left(v as f32);
                }
            }
            "top" => {
                if let Some(v) = value.as_f64() {
                    self.set_top(v as f32);
                }
            }
            "width" => {
                if let Some(v) = value.as_f64() {
                    self.set_width(v as f32);
                }
            }
            "height" => {
                if let Some(v) = value.as_f64() {
                    self.set_height(v as f32);
                }
            }
            "enabled" => {
                if let Some(v) = value.as_bool() {
                    self.set_enabled_internal(v);
                }
            }
            "visible" => {
                if let Some(v) = value.as_bool() {
                    self.set_visible(v);
                }
            }
            "backColor" => {
                if let Some(c) = value.as_str().and_then(|s| s.parse().ok()) {
                    self.set_back_color(c);
                }
            }
            "foreColor" => {
                if let Some(c) = value.as_str().and_then(|s| s.parse().ok()) {
                    self.set_fore_color(c);
                }
            }
            "fontSize" => {
                if let Some(v) = value.as_f64() {
                    self.set_font_size(v as f32);
                }
            }
            "fontFamily" => {
                if let Some(s) = value.as_str() {
                    self.set_font_family(s);
                }
            }
            "borderColor" => {
                if let Some(c) = value.as_str().and_then(|s| s.parse().ok()) {
                    self.set_border_color(c);
                }
            }
            "borderWidth" => {
                if let Some(v) = value.as_f64() {
                    self.set_border_width(v as f32);
                }
            }
            "tabIndex" => {
                if let Some(v) = value.as_i64() {
                    self.set_tab_index(v as i32);
                }
            }
            _ => return false,
        }
        true
    }
}

// =============================================================================
// WIDGET TRAIT
// =============================================================================

/// Contract every concrete widget fills in.
///
/// `setup` runs once after construction and switches the surface to
/// on-demand painting; `draw` runs once per requested repaint and must read
/// current property values. Key handlers return true to consume the key and
/// suppress the host's default handling.
pub trait Widget {
    fn base(&self) -> &ComponentBase;
    fn base_mut(&mut self) -> &mut ComponentBase;
    fn kind(&self) -> WidgetKind;

    // -------------------------------------------------------------------------
    // Extension points
    // -------------------------------------------------------------------------

    /// One-time surface initialization. The default turns off continuous
    /// repainting so paints happen only on request.
    fn setup(&mut self) {
        self.base_mut().surface_mut().set_paint_mode(PaintMode::OnDemand);
    }

    /// Paint the widget from its current property values.
    fn draw(&self, canvas: &mut Canvas);

    /// Non-printable key while focused. Return true to consume.
    fn handle_key_pressed(&mut self, _event: &KeyEvent) -> bool {
        false
    }

    /// Printable character while focused. Return true to consume.
    fn handle_key_typed(&mut self, _ch: char) -> bool {
        false
    }

    /// Widget-owned teardown, run before the base is destroyed.
    fn teardown(&mut self) {}

    /// Focus-gain hook (blink startup and similar).
    fn on_focus_gained(&mut self) {}

    /// Focus-loss hook. Runs on `blur`, on disable while focused, and
    /// never twice for one gain.
    fn on_focus_lost(&mut self) {}

    /// Widget-specific dump fields.
    fn extend_json(&self, _map: &mut Map<String, Value>) {}

    /// Widget-specific dump key. Return true when consumed.
    fn apply_json_key(&mut self, _key: &str, _value: &Value) -> bool {
        false
    }

    // -------------------------------------------------------------------------
    // Provided behavior
    // -------------------------------------------------------------------------

    fn focus(&mut self) {
        if self.base_mut().focus_internal() {
            self.on_focus_gained();
        }
    }

    fn blur(&mut self) {
        if self.base_mut().blur_internal() {
            self.on_focus_lost();
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.base_mut().set_enabled_internal(enabled) {
            self.on_focus_lost();
        }
    }

    fn dispatch_pointer_down(&mut self, x: f32, y: f32) {
        self.base_mut().pointer_down(x, y);
    }

    fn dispatch_pointer_up(&mut self, x: f32, y: f32) {
        self.base_mut().pointer_up(x, y);
    }

    fn dispatch_pointer_enter(&mut self) {
        self.base_mut().pointer_enter();
    }

    fn dispatch_pointer_leave(&mut self) {
        self.base_mut().pointer_leave();
    }

    /// Keys reach a widget only while it is focused.
    fn dispatch_key_pressed(&mut self, event: &KeyEvent) -> bool {
        if self.base().state() != ComponentState::Focused {
            return false;
        }
        self.handle_key_pressed(event)
    }

    fn dispatch_key_typed(&mut self, ch: char) -> bool {
        if self.base().state() != ComponentState::Focused {
            return false;
        }
        self.handle_key_typed(ch)
    }

    /// Repaint if a redraw is pending (or the surface is frame-driven).
    fn paint(&mut self) {
        if self.base().is_destroyed() || !self.base().surface().needs_paint() {
            return;
        }
        let mut canvas = self.base_mut().surface_mut().take_canvas();
        canvas.begin();
        self.draw(&mut canvas);
        self.base_mut().surface_mut().finish_paint(canvas);
    }

    /// Emit `destroy`, release every listener and the surface. Safe to call
    /// twice; the second call is a no-op.
    fn destroy(&mut self) {
        if self.base().is_destroyed() {
            return;
        }
        self.teardown();
        self.base_mut().destroy_internal();
    }

    /// Flat dump of every declared property, tagged with the widget kind.
    /// Excludes `state` and the transient interaction flags.
    fn to_json(&self) -> Value {
        let mut map = self.base().json_map(self.kind());
        self.extend_json(&mut map);
        Value::Object(map)
    }

    /// Serialized form of [`Widget::to_json`].
    fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Parse and apply a serialized property dump. Fails only on malformed
    /// JSON; content problems follow the `from_json` ignore rules.
    fn from_json_str(&mut self, s: &str) -> Result<(), crate::error::Error> {
        let record: Value = serde_json::from_str(s)?;
        self.from_json(&record);
        Ok(())
    }

    /// Apply every known key through its property setter (side effects
    /// fire). Unknown keys, the `type` tag, and wrong-typed values are
    /// silently ignored.
    fn from_json(&mut self, record: &Value) {
        let Some(object) = record.as_object() else {
            return;
        };
        for (key, value) in object {
            if key == "type" {
                continue;
            }
            if self.apply_json_key(key, value) {
                continue;
            }
            self.base_mut().apply_json_key(key, value);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
