//! Label Widget - Static text display.
//!
//! Non-interactive text with alignment and optional word wrap. Labels run
//! the same base machine as every widget (they still hover and emit pointer
//! events); they just draw nothing but their text.

use serde_json::{Map, Value};

use crate::canvas::Canvas;
use crate::component::{ComponentBase, ComponentOptions, Widget};
use crate::metrics::wrap_text;
use crate::surface::SurfaceBackend;
use crate::types::{Rgba, TextAlign, TextStyle, WidgetKind};

/// Construction options for [`Label`].
#[derive(Clone)]
pub struct LabelOptions {
    pub base: ComponentOptions,
    pub text_align: TextAlign,
    pub word_wrap: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            base: ComponentOptions {
                back_color: Rgba::TRANSPARENT,
                border_width: 0.0,
                ..Default::default()
            },
            text_align: TextAlign::Left,
            word_wrap: false,
        }
    }
}

/// Static text label.
pub struct Label {
    base: ComponentBase,
    text_align: TextAlign,
    word_wrap: bool,
}

impl Label {
    pub fn new(backend: Box<dyn SurfaceBackend>, opts: LabelOptions) -> Self {
        let mut label = Self {
            base: ComponentBase::new(WidgetKind::Label, backend, opts.base),
            text_align: opts.text_align,
            word_wrap: opts.word_wrap,
        };
        label.setup();
        label.base.request_redraw();
        label
    }

    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
        self.base.request_redraw();
    }

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    pub fn set_word_wrap(&mut self, word_wrap: bool) {
        self.word_wrap = word_wrap;
        self.base.request_redraw();
    }
}

impl Widget for Label {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    fn draw(&self, canvas: &mut Canvas) {
        let bounds = canvas.bounds();
        if !self.base.back_color().is_transparent() {
            canvas.fill_rect(bounds, self.base.back_color(), 0.0);
        }
        canvas.stroke_rect(bounds, self.base.border_color(), self.base.border_width(), 0.0);

        let text = self.base.text();
        if text.is_empty() {
            return;
        }

        let metrics = self.base.metrics();
        let size = self.base.font_size();
        let line_height = metrics.line_height(size);
        let x = match self.text_align {
            TextAlign::Left => 0.0,
            TextAlign::Center => self.base.width() / 2.0,
            TextAlign::Right => self.base.width(),
        };

        let lines = if self.word_wrap {
            wrap_text(metrics.as_ref(), text, size, self.base.width())
        } else {
            vec![text.to_string()]
        };

        for (i, line) in lines.iter().enumerate() {
            let y = i as f32 * line_height;
            if y + line_height > self.base.height() + f32::EPSILON && i > 0 {
                break;
            }
            canvas.text(
                x,
                y,
                line.clone(),
                self.base.fore_color(),
                size,
                self.base.font_family(),
                self.text_align,
                TextStyle::empty(),
            );
        }
    }

    fn extend_json(&self, map: &mut Map<String, Value>) {
        if let Ok(align) = serde_json::to_value(self.text_align) {
            map.insert("textAlign".into(), align);
        }
        map.insert("wordWrap".into(), Value::from(self.word_wrap));
    }

    fn apply_json_key(&mut self, key: &str, value: &Value) -> bool {
        match key {
            "textAlign" => {
                if let Ok(align) = serde_json::from_value(value.clone()) {
                    self.set_text_align(align);
                }
            }
            "wordWrap" => {
                if let Some(v) = value.as_bool() {
                    self.set_word_wrap(v);
                }
            }
            _ => return false,
        }
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
