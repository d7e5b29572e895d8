//! Text Input Widget - Single-line text entry.
//!
//! A text entry component with full editing capabilities.
//!
//! # Features
//!
//! - Cursor navigation (arrows, home, end)
//! - Text editing (backspace, delete) with max-length and read-only guards
//! - Click-to-cursor placement (left-aligned text)
//! - Password mode with configurable mask
//! - Placeholder text
//! - Cursor blink while focused
//!
//! # Example
//!
//! ```ignore
//! use canvas_widgets::widgets::{TextInput, TextInputOptions};
//! use canvas_widgets::surface::NullBackend;
//!
//! let mut input = TextInput::new(Box::new(NullBackend), TextInputOptions::default());
//! input.focus();
//! input.dispatch_key_typed('h');
//! input.dispatch_key_typed('i');
//! assert_eq!(input.value(), "hi");
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::canvas::Canvas;
use crate::component::{ComponentBase, ComponentOptions, ComponentState, Widget};
use crate::events::{Event, KeyEvent};
use crate::metrics::{text_width, truncate_front};
use crate::schedule::{Scheduler, TimerId};
use crate::surface::SurfaceBackend;
use crate::types::{Rect, Rgba, TextAlign, TextStyle, WidgetKind};

/// Interior padding between the border and the text run.
const TEXT_PADDING: f32 = 4.0;

/// Caret toggle interval while focused.
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

// JS-style key codes carried on keyPress events for control keys.
const KEY_CODE_BACKSPACE: u32 = 8;
const KEY_CODE_DELETE: u32 = 46;

// =============================================================================
// OPTIONS
// =============================================================================

/// Construction options for [`TextInput`].
#[derive(Clone)]
pub struct TextInputOptions {
    pub base: ComponentOptions,
    /// Maximum value length in characters; 0 = unlimited. Enforced at
    /// insertion time, never retroactively.
    pub max_length: usize,
    pub read_only: bool,
    /// Mask every rendered character with this one when set.
    pub password_char: Option<char>,
    pub multiline: bool,
    pub text_align: TextAlign,
    /// Shown (dimmed) while the value is empty; never part of the value.
    pub placeholder: Option<String>,
    /// Timer source for the cursor blink.
    pub scheduler: Scheduler,
}

impl Default for TextInputOptions {
    fn default() -> Self {
        Self {
            base: ComponentOptions::default(),
            max_length: 0,
            read_only: false,
            password_char: None,
            multiline: false,
            text_align: TextAlign::Left,
            placeholder: None,
            scheduler: Scheduler::new(),
        }
    }
}

// =============================================================================
// TEXT INPUT
// =============================================================================

/// Single-line text input with cursor, selection and keyboard editing.
///
/// The value aliases the base `text` property. `cursor_position` always
/// satisfies `0 <= cursor_position <= value.chars().count()`; every edit
/// clamps it back into range.
pub struct TextInput {
    base: ComponentBase,
    cursor_position: usize,
    // -1 = no selection, mirroring the serialized shape. Selection is
    // visual-only and may disagree with the cursor.
    selection_start: i32,
    selection_end: i32,
    max_length: usize,
    read_only: bool,
    password_char: Option<char>,
    multiline: bool,
    text_align: TextAlign,
    placeholder: Option<String>,
    scheduler: Scheduler,
    cursor_phase: Rc<Cell<bool>>,
    blink_timer: Option<TimerId>,
}

impl TextInput {
    pub fn new(backend: Box<dyn SurfaceBackend>, opts: TextInputOptions) -> Self {
        let mut input = Self {
            base: ComponentBase::new(WidgetKind::TextInput, backend, opts.base),
            cursor_position: 0,
            selection_start: -1,
            selection_end: -1,
            max_length: opts.max_length,
            read_only: opts.read_only,
            password_char: opts.password_char,
            multiline: opts.multiline,
            text_align: opts.text_align,
            placeholder: opts.placeholder,
            scheduler: opts.scheduler,
            cursor_phase: Rc::new(Cell::new(true)),
            blink_timer: None,
        };
        input.setup();
        input.base.request_redraw();
        input
    }

    // -------------------------------------------------------------------------
    // Value / cursor
    // -------------------------------------------------------------------------

    pub fn value(&self) -> &str {
        self.base.text()
    }

    fn char_count(&self) -> usize {
        self.value().chars().count()
    }

    /// Replace the value. Emits `textChanged`; the cursor is clamped back
    /// into range.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.base.set_text(value.into());
        self.cursor_position = self.cursor_position.min(self.char_count());
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn set_cursor_position(&mut self, pos: usize) {
        self.cursor_position = pos.min(self.char_count());
        self.base.request_redraw();
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Never truncates an already-overlong value.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length;
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn password_char(&self) -> Option<char> {
        self.password_char
    }

    pub fn set_password_char(&mut self, mask: Option<char>) {
        self.password_char = mask;
        self.base.request_redraw();
    }

    pub fn multiline(&self) -> bool {
        self.multiline
    }

    pub fn set_multiline(&mut self, multiline: bool) {
        self.multiline = multiline;
    }

    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
        self.base.request_redraw();
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
        self.base.request_redraw();
    }

    // -------------------------------------------------------------------------
    // Selection (visual-only; no invariant ties it to the cursor)
    // -------------------------------------------------------------------------

    pub fn selection(&self) -> Option<(usize, usize)> {
        if self.selection_start < 0 || self.selection_end < 0 {
            return None;
        }
        Some((self.selection_start as usize, self.selection_end as usize))
    }

    pub fn select_all(&mut self) {
        self.selection_start = 0;
        self.selection_end = self.char_count() as i32;
        self.base.request_redraw();
    }

    pub fn clear_selection(&mut self) {
        self.selection_start = -1;
        self.selection_end = -1;
        self.base.request_redraw();
    }

    /// Normalized `(min, max)` selection substring of the value.
    pub fn selected_text(&self) -> String {
        let Some((a, b)) = self.selection() else {
            return String::new();
        };
        let (start, end) = (a.min(b), a.max(b));
        let len = self.char_count();
        self.value()
            .chars()
            .skip(start.min(len))
            .take(end.min(len).saturating_sub(start.min(len)))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Display transform
    // -------------------------------------------------------------------------

    fn interior_left(&self) -> f32 {
        self.base.border_width() + TEXT_PADDING
    }

    fn interior_width(&self) -> f32 {
        (self.base.width() - 2.0 * self.interior_left()).max(0.0)
    }

    /// The rendered string: masked when in password mode, then front-
    /// truncated so the tail (cursor end) stays visible.
    pub fn display_text(&self) -> String {
        let masked: String = match self.password_char {
            Some(mask) => self.value().chars().map(|_| mask).collect(),
            None => self.value().to_string(),
        };
        truncate_front(
            self.base.metrics().as_ref(),
            &masked,
            self.base.font_size(),
            self.interior_width(),
        )
    }

    /// Caret x in component coordinates, measured against the *displayed*
    /// string. Under front truncation this can desync from the logical edit
    /// position; that is the accepted behavior, not a bug to fix here.
    pub fn cursor_x(&self) -> f32 {
        let display = self.display_text();
        let prefix: String = display.chars().take(self.cursor_position).collect();
        self.interior_left()
            + text_width(self.base.metrics().as_ref(), &prefix, self.base.font_size())
    }

    /// Map a click offset (relative to the text's left padding) to a cursor
    /// index by rounding to the nearest glyph boundary: the first index whose
    /// accumulated width plus half the next glyph exceeds the offset wins.
    fn cursor_index_at(&self, rel_x: f32) -> usize {
        let display = self.display_text();
        let metrics = self.base.metrics();
        let size = self.base.font_size();
        let mut acc = 0.0;
        for (i, ch) in display.chars().enumerate() {
            let w = metrics.char_width(ch, size);
            if acc + w / 2.0 > rel_x {
                return i;
            }
            acc += w;
        }
        display.chars().count()
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    fn splice_value(&mut self, new_chars: Vec<char>, new_cursor: usize) {
        let new_value: String = new_chars.into_iter().collect();
        self.base.set_text(new_value.clone());
        self.cursor_position = new_cursor.min(self.char_count());
        self.base.emitter().emit("change", &Event::Change(new_value));
    }

    fn emit_key_press(&self, key: impl Into<String>, key_code: u32) {
        self.base
            .emitter()
            .emit("keyPress", &Event::KeyPress { key: key.into(), key_code });
    }

    // -------------------------------------------------------------------------
    // Cursor blink
    // -------------------------------------------------------------------------

    fn stop_blink(&mut self) {
        if let Some(id) = self.blink_timer.take() {
            self.scheduler.cancel(id);
        }
        self.cursor_phase.set(true);
    }
}

impl Widget for TextInput {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::TextInput
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    fn handle_key_typed(&mut self, ch: char) -> bool {
        if self.read_only {
            return true;
        }
        let count = self.char_count();
        if self.max_length > 0 && count >= self.max_length {
            return true;
        }

        let mut chars: Vec<char> = self.value().chars().collect();
        let pos = self.cursor_position.min(chars.len());
        chars.insert(pos, ch);
        self.splice_value(chars, pos + 1);
        self.emit_key_press(ch.to_string(), ch as u32);
        true
    }

    fn handle_key_pressed(&mut self, event: &KeyEvent) -> bool {
        let count = self.char_count();
        let pos = self.cursor_position.min(count);

        match event.key.as_str() {
            "Backspace" => {
                if self.read_only || count == 0 || pos == 0 {
                    return true;
                }
                let mut chars: Vec<char> = self.value().chars().collect();
                chars.remove(pos - 1);
                self.splice_value(chars, pos - 1);
                self.emit_key_press("Backspace", KEY_CODE_BACKSPACE);
                true
            }
            "Delete" => {
                if self.read_only || pos == count {
                    return true;
                }
                let mut chars: Vec<char> = self.value().chars().collect();
                chars.remove(pos);
                self.splice_value(chars, pos);
                self.emit_key_press("Delete", KEY_CODE_DELETE);
                true
            }
            "ArrowLeft" => {
                self.cursor_position = pos.saturating_sub(1);
                self.base.request_redraw();
                true
            }
            "ArrowRight" => {
                self.cursor_position = (pos + 1).min(count);
                self.base.request_redraw();
                true
            }
            "Home" => {
                self.cursor_position = 0;
                self.base.request_redraw();
                true
            }
            "End" => {
                self.cursor_position = count;
                self.base.request_redraw();
                true
            }
            "Enter" => {
                if self.multiline {
                    // Newline insertion is a concrete-widget concern, not
                    // handled at this layer.
                    return false;
                }
                let value = self.value().to_string();
                self.base.emitter().emit("submit", &Event::Submit(value));
                self.blur();
                true
            }
            "Escape" => {
                self.clear_selection();
                true
            }
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Pointer
    // -------------------------------------------------------------------------

    /// Base machine first, then focus and caret placement. Left-aligned text
    /// gets pointer-accurate placement; center/right alignment keeps the
    /// cursor where it was.
    fn dispatch_pointer_down(&mut self, x: f32, y: f32) {
        self.base.pointer_down(x, y);
        if !self.base.enabled() || self.read_only {
            return;
        }
        self.focus();
        if self.text_align == TextAlign::Left {
            self.cursor_position = self.cursor_index_at(x - self.interior_left());
            self.base.request_redraw();
        }
    }

    // -------------------------------------------------------------------------
    // Focus / teardown
    // -------------------------------------------------------------------------

    fn on_focus_gained(&mut self) {
        self.cursor_phase.set(true);
        let phase = self.cursor_phase.clone();
        let redraw = self.base.surface().redraw_handle();
        let id = self.scheduler.set_interval(
            BLINK_INTERVAL,
            Rc::new(move || {
                phase.set(!phase.get());
                redraw.request();
            }),
        );
        self.blink_timer = Some(id);
    }

    fn on_focus_lost(&mut self) {
        self.stop_blink();
    }

    fn teardown(&mut self) {
        self.stop_blink();
    }

    // -------------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------------

    fn draw(&self, canvas: &mut Canvas) {
        let bounds = canvas.bounds();
        let state = self.base.state();
        let focused = state == ComponentState::Focused;
        let disabled = state == ComponentState::Disabled;

        let back = if disabled {
            self.base.back_color().lighten(0.3)
        } else {
            self.base.back_color()
        };
        canvas.fill_rect(bounds, back, 2.0);

        let border = if focused {
            self.base.border_color().darken(0.3)
        } else {
            self.base.border_color()
        };
        canvas.stroke_rect(bounds, border, self.base.border_width(), 2.0);

        let metrics = self.base.metrics();
        let size = self.base.font_size();
        let line_height = metrics.line_height(size);
        let text_y = (self.base.height() - line_height) / 2.0;
        let display = self.display_text();

        // Selection highlight, clamped to the displayed window.
        if let Some((a, b)) = self.selection() {
            let (start, end) = (a.min(b), a.max(b));
            let shown = display.chars().count();
            let start = start.min(shown);
            let end = end.min(shown);
            if start < end {
                let prefix: String = display.chars().take(start).collect();
                let selected: String = display.chars().skip(start).take(end - start).collect();
                let x = self.interior_left() + text_width(metrics.as_ref(), &prefix, size);
                let w = text_width(metrics.as_ref(), &selected, size);
                canvas.fill_rect(
                    Rect::new(x, text_y, w, line_height),
                    Rgba::new(51, 102, 204, 80),
                    0.0,
                );
            }
        }

        let (content, color) = if display.is_empty() {
            match &self.placeholder {
                Some(placeholder) => (placeholder.clone(), Rgba::GRAY),
                None => (String::new(), self.base.fore_color()),
            }
        } else if disabled {
            (display, Rgba::GRAY)
        } else {
            (display, self.base.fore_color())
        };

        let text_x = match self.text_align {
            TextAlign::Left => self.interior_left(),
            TextAlign::Center => self.base.width() / 2.0,
            TextAlign::Right => self.base.width() - self.interior_left(),
        };
        if !content.is_empty() {
            canvas.text(
                text_x,
                text_y,
                content,
                color,
                size,
                self.base.font_family(),
                self.text_align,
                TextStyle::empty(),
            );
        }

        if focused && self.cursor_phase.get() {
            canvas.fill_rect(
                Rect::new(self.cursor_x(), text_y, 1.0, line_height),
                self.base.fore_color(),
                0.0,
            );
        }
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    fn extend_json(&self, map: &mut Map<String, Value>) {
        map.insert("value".into(), Value::from(self.value()));
        map.insert("cursorPosition".into(), Value::from(self.cursor_position as u64));
        map.insert("selectionStart".into(), Value::from(self.selection_start));
        map.insert("selectionEnd".into(), Value::from(self.selection_end));
        map.insert("maxLength".into(), Value::from(self.max_length as u64));
        map.insert("readOnly".into(), Value::from(self.read_only));
        map.insert(
            "passwordChar".into(),
            match self.password_char {
                Some(mask) => Value::from(mask.to_string()),
                None => Value::Null,
            },
        );
        map.insert("multiline".into(), Value::from(self.multiline));
        if let Ok(align) = serde_json::to_value(self.text_align) {
            map.insert("textAlign".into(), align);
        }
        map.insert(
            "placeholder".into(),
            match &self.placeholder {
                Some(placeholder) => Value::from(placeholder.clone()),
                None => Value::Null,
            },
        );
    }

    fn apply_json_key(&mut self, key: &str, value: &Value) -> bool {
        match key {
            // Routed here instead of the base setter so a dump that disables
            // a focused input still runs the focus-loss teardown (blink).
            "enabled" => {
                if let Some(v) = value.as_bool() {
                    self.set_enabled(v);
                }
            }
            "value" => {
                if let Some(s) = value.as_str() {
                    self.set_value(s);
                }
            }
            "cursorPosition" => {
                if let Some(v) = value.as_u64() {
                    self.set_cursor_position(v as usize);
                }
            }
            "selectionStart" => {
                if let Some(v) = value.as_i64() {
                    self.selection_start = v as i32;
                }
            }
            "selectionEnd" => {
                if let Some(v) = value.as_i64() {
                    self.selection_end = v as i32;
                }
            }
            "maxLength" => {
                if let Some(v) = value.as_u64() {
                    self.set_max_length(v as usize);
                }
            }
            "readOnly" => {
                if let Some(v) = value.as_bool() {
                    self.set_read_only(v);
                }
            }
            "passwordChar" => {
                if value.is_null() {
                    self.set_password_char(None);
                } else if let Some(mask) = value.as_str().and_then(|s| s.chars().next()) {
                    self.set_password_char(Some(mask));
                }
            }
            "multiline" => {
                if let Some(v) = value.as_bool() {
                    self.set_multiline(v);
                }
            }
            "textAlign" => {
                if let Ok(align) = serde_json::from_value(value.clone()) {
                    self.set_text_align(align);
                }
            }
            "placeholder" => {
                if value.is_null() {
                    self.set_placeholder(None);
                } else if let Some(s) = value.as_str() {
                    self.set_placeholder(Some(s.to_string()));
                }
            }
            _ => return false,
        }
        true
    }

    /// Apply the value before cursor/selection keys so their clamps see the
    /// incoming text, then route the rest as usual.
    fn from_json(&mut self, record: &Value) {
        let Some(object) = record.as_object() else {
            return;
        };
        for key in ["text", "value"] {
            if let Some(value) = object.get(key) {
                if !Widget::apply_json_key(self, key, value) {
                    self.base.apply_json_key(key, value);
                }
            }
        }
        for (key, value) in object {
            if key == "type" || key == "text" || key == "value" {
                continue;
            }
            if Widget::apply_json_key(self, key, value) {
                continue;
            }
            self.base.apply_json_key(key, value);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullBackend;
    use std::cell::RefCell;

    fn input() -> TextInput {
        TextInput::new(Box::new(NullBackend), TextInputOptions::default())
    }

    fn input_with(opts: TextInputOptions) -> TextInput {
        TextInput::new(Box::new(NullBackend), opts)
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for ch in s.chars() {
            input.dispatch_key_typed(ch);
        }
    }

    fn change_log(input: &TextInput) -> Rc<RefCell<Vec<String>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes_clone = changes.clone();
        input.base().on(
            "change",
            Rc::new(move |event| {
                if let Event::Change(value) = event {
                    changes_clone.borrow_mut().push(value.clone());
                }
            }),
        );
        changes
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    #[test]
    fn test_typing_inserts_at_cursor() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "ac");
        input.set_cursor_position(1);
        input.dispatch_key_typed('b');

        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor_position(), 2);
    }

    #[test]
    fn test_max_length_enforced_at_insertion() {
        let mut input = input_with(TextInputOptions { max_length: 3, ..Default::default() });
        input.focus();
        let changes = change_log(&input);

        type_str(&mut input, "abc");
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor_position(), 3);

        input.dispatch_key_typed('d');
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor_position(), 3);
        assert_eq!(changes.borrow().len(), 3);
    }

    #[test]
    fn test_max_length_never_retroactive() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "hello");
        input.set_max_length(3);
        // Existing value survives; further insertion is rejected
        assert_eq!(input.value(), "hello");
        input.dispatch_key_typed('x');
        assert_eq!(input.value(), "hello");
    }

    #[test]
    fn test_backspace_removes_before_cursor() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "abc");
        input.set_cursor_position(2);
        input.dispatch_key_pressed(&KeyEvent::new("Backspace"));

        assert_eq!(input.value(), "ac");
        assert_eq!(input.cursor_position(), 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "x");
        input.set_cursor_position(0);
        let changes = change_log(&input);

        input.dispatch_key_pressed(&KeyEvent::new("Backspace"));
        assert_eq!(input.value(), "x");
        assert_eq!(input.cursor_position(), 0);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_delete_removes_at_cursor() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "abc");
        input.set_cursor_position(1);
        input.dispatch_key_pressed(&KeyEvent::new("Delete"));

        assert_eq!(input.value(), "ac");
        assert_eq!(input.cursor_position(), 1);
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "ab");
        let changes = change_log(&input);

        input.dispatch_key_pressed(&KeyEvent::new("Delete"));
        assert_eq!(input.value(), "ab");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_read_only_blocks_edits_but_consumes_keys() {
        let mut input = input_with(TextInputOptions { read_only: true, ..Default::default() });
        input.base_mut().set_text("locked");
        // Read-only inputs cannot be focused by pointer, but a host can
        // still focus programmatically; edits stay blocked.
        input.focus();
        let changes = change_log(&input);

        assert!(input.dispatch_key_typed('x'));
        assert!(input.dispatch_key_pressed(&KeyEvent::new("Backspace")));
        assert!(input.dispatch_key_pressed(&KeyEvent::new("Delete")));

        assert_eq!(input.value(), "locked");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_change_then_keypress_order() {
        let mut input = input();
        input.focus();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["change", "keyPress"] {
            let order = order.clone();
            input.base().on(name, Rc::new(move |_| order.borrow_mut().push(name)));
        }

        input.dispatch_key_typed('a');
        assert_eq!(*order.borrow(), vec!["change", "keyPress"]);
    }

    #[test]
    fn test_cursor_invariant_over_edit_sequences() {
        let mut input = input();
        input.focus();
        let keys = ["Backspace", "Delete", "ArrowLeft", "Home", "ArrowRight", "End"];
        for (i, ch) in "hello world".chars().enumerate() {
            input.dispatch_key_typed(ch);
            input.dispatch_key_pressed(&KeyEvent::new(keys[i % keys.len()]));
            let len = input.value().chars().count();
            assert!(input.cursor_position() <= len);
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    #[test]
    fn test_arrows_clamp_and_never_emit_change() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "ab");
        let changes = change_log(&input);

        assert!(input.dispatch_key_pressed(&KeyEvent::new("ArrowLeft")));
        assert_eq!(input.cursor_position(), 1);
        input.dispatch_key_pressed(&KeyEvent::new("ArrowLeft"));
        input.dispatch_key_pressed(&KeyEvent::new("ArrowLeft"));
        assert_eq!(input.cursor_position(), 0); // floor

        input.dispatch_key_pressed(&KeyEvent::new("ArrowRight"));
        input.dispatch_key_pressed(&KeyEvent::new("ArrowRight"));
        input.dispatch_key_pressed(&KeyEvent::new("ArrowRight"));
        assert_eq!(input.cursor_position(), 2); // ceiling

        assert!(changes.borrow().is_empty());
        assert_eq!(input.value(), "ab");
    }

    #[test]
    fn test_home_end() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "abcd");

        assert!(input.dispatch_key_pressed(&KeyEvent::new("Home")));
        assert_eq!(input.cursor_position(), 0);
        assert!(input.dispatch_key_pressed(&KeyEvent::new("End")));
        assert_eq!(input.cursor_position(), 4);
    }

    // -------------------------------------------------------------------------
    // Enter / submit
    // -------------------------------------------------------------------------

    #[test]
    fn test_enter_submits_once_and_blurs() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "hi");

        let submits = Rc::new(RefCell::new(Vec::new()));
        let submits_clone = submits.clone();
        input.base().on(
            "submit",
            Rc::new(move |event| {
                if let Event::Submit(value) = event {
                    submits_clone.borrow_mut().push(value.clone());
                }
            }),
        );

        assert!(input.dispatch_key_pressed(&KeyEvent::new("Enter")));
        assert_eq!(*submits.borrow(), vec!["hi".to_string()]);
        assert_ne!(input.base().state(), ComponentState::Focused);

        // No longer focused, so a second Enter never reaches the handler
        assert!(!input.dispatch_key_pressed(&KeyEvent::new("Enter")));
        assert_eq!(submits.borrow().len(), 1);
    }

    #[test]
    fn test_enter_is_noop_when_multiline() {
        let mut input = input_with(TextInputOptions { multiline: true, ..Default::default() });
        input.focus();
        type_str(&mut input, "hi");

        let submits = Rc::new(Cell::new(0));
        let submits_clone = submits.clone();
        input.base().on("submit", Rc::new(move |_| submits_clone.set(submits_clone.get() + 1)));

        assert!(!input.dispatch_key_pressed(&KeyEvent::new("Enter")));
        assert_eq!(submits.get(), 0);
        assert_eq!(input.base().state(), ComponentState::Focused);
    }

    // -------------------------------------------------------------------------
    // Click-to-cursor
    // -------------------------------------------------------------------------

    // Monospace at font size 10 renders 6 px glyphs; interior starts at
    // border (1) + padding (4) = 5 px.

    fn sized_input(value: &str) -> TextInput {
        let mut input = input_with(TextInputOptions {
            base: ComponentOptions { font_size: 10.0, width: 200.0, ..Default::default() },
            ..Default::default()
        });
        input.base_mut().set_text(value);
        input
    }

    #[test]
    fn test_click_maps_to_nearest_boundary() {
        let mut input = sized_input("abc");

        // 2.9 px into the first glyph: left of its midpoint, cursor at 0
        input.dispatch_pointer_down(5.0 + 2.9, 5.0);
        assert_eq!(input.cursor_position(), 0);
        assert_eq!(input.base().state(), ComponentState::Focused);

        // Past the midpoint of the first glyph rounds to boundary 1
        input.dispatch_pointer_down(5.0 + 3.1, 5.0);
        assert_eq!(input.cursor_position(), 1);

        // Exactly on a glyph edge lands on that boundary
        input.dispatch_pointer_down(5.0 + 6.0, 5.0);
        assert_eq!(input.cursor_position(), 1);
    }

    #[test]
    fn test_click_past_text_goes_to_end() {
        let mut input = sized_input("abc");
        input.dispatch_pointer_down(150.0, 5.0);
        assert_eq!(input.cursor_position(), 3);
    }

    #[test]
    fn test_click_in_padding_goes_to_start() {
        let mut input = sized_input("abc");
        input.dispatch_pointer_down(1.0, 5.0);
        assert_eq!(input.cursor_position(), 0);
    }

    #[test]
    fn test_click_skips_placement_for_centered_text() {
        let mut input = input_with(TextInputOptions {
            text_align: TextAlign::Center,
            ..Default::default()
        });
        input.base_mut().set_text("abc");
        input.set_cursor_position(2);

        input.dispatch_pointer_down(10.0, 5.0);
        // Focus still happens; pointer-accurate placement does not
        assert_eq!(input.base().state(), ComponentState::Focused);
        assert_eq!(input.cursor_position(), 2);
    }

    #[test]
    fn test_click_while_read_only_does_not_focus() {
        let mut input = input_with(TextInputOptions { read_only: true, ..Default::default() });
        input.dispatch_pointer_down(10.0, 5.0);
        assert_ne!(input.base().state(), ComponentState::Focused);
        // The base machine still ran
        assert_eq!(input.base().state(), ComponentState::Active);
    }

    // -------------------------------------------------------------------------
    // Display transform
    // -------------------------------------------------------------------------

    #[test]
    fn test_password_masking() {
        let mut input = input_with(TextInputOptions {
            password_char: Some('•'),
            base: ComponentOptions { font_size: 10.0, width: 200.0, ..Default::default() },
            ..Default::default()
        });
        input.base_mut().set_text("secret");
        assert_eq!(input.display_text(), "••••••");
        assert_eq!(input.value(), "secret");
    }

    #[test]
    fn test_front_truncation_shows_tail() {
        // width 40 => interior 30 px => 5 glyphs at 6 px
        let mut input = input_with(TextInputOptions {
            base: ComponentOptions { font_size: 10.0, width: 40.0, ..Default::default() },
            ..Default::default()
        });
        input.base_mut().set_text("abcdefgh");
        assert_eq!(input.display_text(), "defgh");
    }

    #[test]
    fn test_cursor_x_measures_displayed_string() {
        let mut input = input_with(TextInputOptions {
            base: ComponentOptions { font_size: 10.0, width: 40.0, ..Default::default() },
            ..Default::default()
        });
        input.base_mut().set_text("abcdefgh");
        input.set_cursor_position(8);

        // Display shows "defgh" (5 glyphs); the prefix of length 8 is the
        // whole displayed window, so the caret sits after the 5 shown glyphs
        // rather than after 8 - the documented desync under truncation.
        assert_eq!(input.cursor_x(), 5.0 + 5.0 * 6.0);

        // A cursor inside the window indexes displayed glyphs directly
        input.set_cursor_position(2);
        assert_eq!(input.cursor_x(), 5.0 + 2.0 * 6.0);
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    #[test]
    fn test_select_all_and_selected_text() {
        let mut input = input();
        input.base_mut().set_text("hello");
        assert_eq!(input.selection(), None);
        assert_eq!(input.selected_text(), "");

        input.select_all();
        assert_eq!(input.selection(), Some((0, 5)));
        assert_eq!(input.selected_text(), "hello");

        input.clear_selection();
        assert_eq!(input.selected_text(), "");
    }

    #[test]
    fn test_selection_may_diverge_from_cursor() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "hello");
        input.select_all();
        input.dispatch_key_pressed(&KeyEvent::new("Home"));

        // Navigation moved the cursor; selection is untouched by design
        assert_eq!(input.cursor_position(), 0);
        assert_eq!(input.selection(), Some((0, 5)));
    }

    #[test]
    fn test_escape_clears_selection() {
        let mut input = input();
        input.focus();
        type_str(&mut input, "abc");
        input.select_all();

        assert!(input.dispatch_key_pressed(&KeyEvent::new("Escape")));
        assert_eq!(input.selection(), None);
    }

    // -------------------------------------------------------------------------
    // Cursor blink
    // -------------------------------------------------------------------------

    #[test]
    fn test_blink_lifecycle() {
        let scheduler = Scheduler::new();
        let mut input = input_with(TextInputOptions {
            scheduler: scheduler.clone(),
            ..Default::default()
        });

        assert_eq!(scheduler.timer_count(), 0);
        input.focus();
        assert_eq!(scheduler.timer_count(), 1);
        // Repeated focus never stacks a second timer
        input.focus();
        assert_eq!(scheduler.timer_count(), 1);

        let redraw = input.base().surface().redraw_handle();
        redraw.take();
        scheduler.advance(Duration::from_millis(500));
        assert!(redraw.is_pending());

        input.blur();
        assert_eq!(scheduler.timer_count(), 0);

        // Mock-clock check: time marches on after blur, no repaint requested
        redraw.take();
        scheduler.advance(Duration::from_secs(5));
        assert!(!redraw.is_pending());
    }

    #[test]
    fn test_blink_toggles_phase() {
        let scheduler = Scheduler::new();
        let mut input = input_with(TextInputOptions {
            scheduler: scheduler.clone(),
            ..Default::default()
        });
        input.focus();

        assert!(input.cursor_phase.get());
        scheduler.advance(Duration::from_millis(500));
        assert!(!input.cursor_phase.get());
        scheduler.advance(Duration::from_millis(500));
        assert!(input.cursor_phase.get());
    }

    #[test]
    fn test_destroy_stops_blink() {
        let scheduler = Scheduler::new();
        let mut input = input_with(TextInputOptions {
            scheduler: scheduler.clone(),
            ..Default::default()
        });
        input.focus();
        assert_eq!(scheduler.timer_count(), 1);

        input.destroy();
        assert_eq!(scheduler.timer_count(), 0);
        assert_eq!(input.base().listener_count("change"), 0);
    }

    #[test]
    fn test_json_disable_while_focused_stops_blink() {
        let scheduler = Scheduler::new();
        let mut input = input_with(TextInputOptions {
            scheduler: scheduler.clone(),
            ..Default::default()
        });
        input.focus();
        assert_eq!(scheduler.timer_count(), 1);

        input.from_json(&serde_json::json!({ "enabled": false }));
        assert_eq!(input.base().state(), ComponentState::Disabled);
        assert_eq!(scheduler.timer_count(), 0);
    }

    #[test]
    fn test_disable_while_focused_stops_blink() {
        let scheduler = Scheduler::new();
        let mut input = input_with(TextInputOptions {
            scheduler: scheduler.clone(),
            ..Default::default()
        });
        input.focus();
        assert_eq!(scheduler.timer_count(), 1);

        input.set_enabled(false);
        assert_eq!(input.base().state(), ComponentState::Disabled);
        assert_eq!(scheduler.timer_count(), 0);
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    #[test]
    fn test_json_round_trip() {
        let mut input = input_with(TextInputOptions {
            max_length: 10,
            password_char: Some('*'),
            placeholder: Some("type here".into()),
            ..Default::default()
        });
        input.base_mut().set_text("secret");
        input.set_cursor_position(3);
        input.select_all();

        let dump = input.to_json();
        assert_eq!(dump["type"], "textinput");
        assert_eq!(dump["value"], "secret");
        assert_eq!(dump["cursorPosition"], 3);
        assert_eq!(dump["passwordChar"], "*");
        assert_eq!(dump["textAlign"], "left");

        input.from_json(&dump);
        assert_eq!(input.to_json(), dump);
    }

    #[test]
    fn test_json_load_into_fresh_widget() {
        let mut source = input();
        source.base_mut().set_text("hello");
        source.set_cursor_position(4);
        let dump = source.to_json();

        let mut restored = input();
        restored.from_json(&dump);
        assert_eq!(restored.value(), "hello");
        // Value applies before the cursor key, so the clamp keeps 4
        assert_eq!(restored.cursor_position(), 4);
    }

    #[test]
    fn test_draw_has_caret_only_when_focused() {
        use crate::canvas::DrawOp;

        let mut input = sized_input("abc");
        input.paint();
        let caret_rects = |input: &TextInput| {
            input
                .base()
                .surface()
                .canvas()
                .ops()
                .iter()
                .filter(|op| matches!(op, DrawOp::FillRect { rect, .. } if rect.width == 1.0))
                .count()
        };
        assert_eq!(caret_rects(&input), 0);

        input.focus();
        input.paint();
        assert_eq!(caret_rects(&input), 1);
    }
}
