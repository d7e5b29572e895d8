//! Button Widget - Push button with state-dependent styling.
//!
//! All interaction behavior lives in the base state machine; the button adds
//! draw-time branching on state (hover/active shades, focus ring, disabled
//! wash) and a centered caption. The caption is the base `text` property.

use crate::canvas::Canvas;
use crate::component::{ComponentBase, ComponentOptions, ComponentState, Widget};
use crate::surface::SurfaceBackend;
use crate::types::{Rgba, TextAlign, TextStyle, WidgetKind};

/// Push button.
pub struct Button {
    base: ComponentBase,
}

impl Button {
    pub fn new(backend: Box<dyn SurfaceBackend>, opts: ComponentOptions) -> Self {
        let mut button = Self {
            base: ComponentBase::new(WidgetKind::Button, backend, opts),
        };
        button.setup();
        button.base.request_redraw();
        button
    }

    pub fn caption(&self) -> &str {
        self.base.text()
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.base.set_text(caption);
    }
}

impl Widget for Button {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn draw(&self, canvas: &mut Canvas) {
        let bounds = canvas.bounds();
        let state = self.base.state();

        let fill = match state {
            ComponentState::Hover => self.base.back_color().lighten(0.08),
            ComponentState::Active => self.base.back_color().darken(0.12),
            ComponentState::Disabled => self.base.back_color().lighten(0.4),
            ComponentState::Normal | ComponentState::Focused => self.base.back_color(),
        };
        canvas.fill_rect(bounds, fill, 4.0);

        let border = if state == ComponentState::Focused {
            self.base.border_color().darken(0.3)
        } else {
            self.base.border_color()
        };
        canvas.stroke_rect(bounds, border, self.base.border_width(), 4.0);

        let caption = self.base.text();
        if caption.is_empty() {
            return;
        }
        let color = if state == ComponentState::Disabled {
            Rgba::GRAY
        } else {
            self.base.fore_color()
        };
        let size = self.base.font_size();
        let text_y = (self.base.height() - self.base.metrics().line_height(size)) / 2.0;
        canvas.text(
            self.base.width() / 2.0,
            text_y,
            caption,
            color,
            size,
            self.base.font_family(),
            TextAlign::Center,
            TextStyle::empty(),
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================
