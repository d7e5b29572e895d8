//! Terminal Backend - crossterm presenter
//!
//! Rasterizes component display lists into a shared cell frame and flushes
//! only changed cells to the terminal. This is a coarse presenter for demos
//! and smoke tests, not a pixel-accurate rasterizer: widget geometry is
//! scaled by a fixed cell size and sub-cell detail (thin borders, rounded
//! corners) is dropped.
//!
//! # Pieces
//!
//! - [`Screen`] - shared cell frame with diff-based flushing
//! - [`TerminalBackend`] - per-component [`SurfaceBackend`] drawing into it
//! - [`TerminalSession`] - raw mode/alt screen guard
//! - [`convert_key_event`] / [`convert_mouse_event`] - crossterm event bridging

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::event::{
    KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};

use crate::canvas::{Canvas, DrawOp};
use crate::events::{KeyEvent, Modifiers};
use crate::surface::SurfaceBackend;
use crate::types::{Rect, Rgba, TextAlign};

/// Pixel footprint of one terminal cell when scaling widget geometry.
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

// =============================================================================
// CELL FRAME
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct TermCell {
    ch: char,
    fg: Rgba,
    bg: Rgba,
}

impl Default for TermCell {
    fn default() -> Self {
        // Transparent = terminal default color
        Self { ch: ' ', fg: Rgba::TRANSPARENT, bg: Rgba::TRANSPARENT }
    }
}

fn term_color(color: Rgba) -> Color {
    if color.is_transparent() {
        Color::Reset
    } else {
        Color::Rgb { r: color.r, g: color.g, b: color.b }
    }
}

/// Shared cell frame the components composite into.
pub struct Screen {
    width: u16,
    height: u16,
    cells: Vec<TermCell>,
    previous: Option<Vec<TermCell>>,
}

impl Screen {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![TermCell::default(); width as usize * height as usize],
            previous: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(TermCell::default());
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut TermCell> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        self.cells.get_mut(row as usize * self.width as usize + col as usize)
    }

    /// Character at a cell, for assertions.
    pub fn char_at(&self, col: u16, row: u16) -> char {
        if col >= self.width || row >= self.height {
            return ' ';
        }
        self.cells[row as usize * self.width as usize + col as usize].ch
    }

    /// Blank out the cells covered by `bounds`.
    pub fn clear_region(&mut self, bounds: Rect) {
        let (col0, row0, cols, rows) = cell_span(bounds);
        for row in row0..row0 + rows {
            for col in col0..col0 + cols {
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = TermCell::default();
                }
            }
        }
    }

    /// Composite one component's display list at its surface bounds.
    pub fn rasterize(&mut self, bounds: Rect, canvas: &Canvas) {
        self.clear_region(bounds);
        for op in canvas.ops() {
            match op {
                DrawOp::FillRect { rect, color, .. } => {
                    let absolute =
                        Rect::new(bounds.x + rect.x, bounds.y + rect.y, rect.width, rect.height);
                    let (col0, row0, cols, rows) = cell_span(absolute);
                    for row in row0..row0 + rows {
                        for col in col0..col0 + cols {
                            if let Some(cell) = self.cell_mut(col, row) {
                                cell.bg = *color;
                                cell.ch = ' ';
                            }
                        }
                    }
                }
                // Sub-cell detail: a border thinner than a cell has no
                // representation at this scale.
                DrawOp::StrokeRect { .. } => {}
                DrawOp::Text { x, y, content, color, align, .. } => {
                    let chars: Vec<char> = content.chars().collect();
                    let anchor_col = ((bounds.x + x) / CELL_WIDTH).floor() as i32;
                    let col0 = match align {
                        TextAlign::Left => anchor_col,
                        TextAlign::Center => anchor_col - chars.len() as i32 / 2,
                        TextAlign::Right => anchor_col - chars.len() as i32,
                    };
                    let row = ((bounds.y + y) / CELL_HEIGHT).floor() as i32;
                    for (i, ch) in chars.iter().enumerate() {
                        if let Some(cell) = self.cell_mut(col0 + i as i32, row) {
                            cell.ch = *ch;
                            cell.fg = *color;
                        }
                    }
                }
            }
        }
    }

    /// Write only the cells that changed since the last flush.
    pub fn flush(&mut self, out: &mut impl Write) -> io::Result<()> {
        let unchanged = |idx: usize| {
            self.previous
                .as_ref()
                .is_some_and(|prev| prev.len() == self.cells.len() && prev[idx] == self.cells[idx])
        };

        for row in 0..self.height {
            for col in 0..self.width {
                let idx = row as usize * self.width as usize + col as usize;
                if unchanged(idx) {
                    continue;
                }
                let cell = self.cells[idx];
                queue!(
                    out,
                    cursor::MoveTo(col, row),
                    SetForegroundColor(term_color(cell.fg)),
                    SetBackgroundColor(term_color(cell.bg)),
                    Print(cell.ch),
                )?;
            }
        }
        out.flush()?;
        self.previous = Some(self.cells.clone());
        Ok(())
    }
}

/// Convert a pixel rect to (col, row, cols, rows), rounding outward.
fn cell_span(rect: Rect) -> (i32, i32, i32, i32) {
    let col0 = (rect.x / CELL_WIDTH).floor() as i32;
    let row0 = (rect.y / CELL_HEIGHT).floor() as i32;
    let cols = ((rect.x + rect.width) / CELL_WIDTH).ceil() as i32 - col0;
    let rows = ((rect.y + rect.height) / CELL_HEIGHT).ceil() as i32 - row0;
    (col0, row0, cols.max(0), rows.max(0))
}

pub type SharedScreen = Rc<RefCell<Screen>>;

// =============================================================================
// BACKEND
// =============================================================================

/// Per-component backend compositing into a [`SharedScreen`].
pub struct TerminalBackend {
    screen: SharedScreen,
    bounds: Rect,
    visible: bool,
}

impl TerminalBackend {
    pub fn new(screen: SharedScreen) -> Self {
        Self { screen, bounds: Rect::default(), visible: true }
    }
}

impl SurfaceBackend for TerminalBackend {
    fn set_bounds(&mut self, bounds: Rect) {
        if self.visible {
            self.screen.borrow_mut().clear_region(self.bounds);
        }
        self.bounds = bounds;
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible && !visible {
            self.screen.borrow_mut().clear_region(self.bounds);
        }
        self.visible = visible;
    }

    fn present(&mut self, canvas: &Canvas) {
        if self.visible {
            self.screen.borrow_mut().rasterize(self.bounds, canvas);
        }
    }

    fn remove(&mut self) {
        self.screen.borrow_mut().clear_region(self.bounds);
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Raw mode + alternate screen guard. Restores the terminal on drop.
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            crossterm::event::EnableMouseCapture,
            cursor::Hide,
        )?;
        Ok(Self { active: true })
    }

    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            io::stdout(),
            cursor::Show,
            crossterm::event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// =============================================================================
// EVENT BRIDGING
// =============================================================================

/// A crossterm key event translated to the widget keyboard contract.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyInput {
    /// Goes to `dispatch_key_pressed`.
    Pressed(KeyEvent),
    /// Goes to `dispatch_key_typed`.
    Typed(char),
}

fn convert_modifiers(modifiers: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;
    Modifiers {
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        shift: modifiers.contains(KeyModifiers::SHIFT),
        meta: false, // Not exposed by crossterm
    }
}

/// Convert a crossterm key event. Returns `None` for releases and keys the
/// widget contract has no name for.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyInput> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let modifiers = convert_modifiers(event.modifiers);
    let pressed = |key: &str| Some(KeyInput::Pressed(KeyEvent::with_modifiers(key, modifiers)));
    match event.code {
        KeyCode::Char(c) if !modifiers.ctrl && !modifiers.alt => Some(KeyInput::Typed(c)),
        KeyCode::Enter => pressed("Enter"),
        KeyCode::Backspace => pressed("Backspace"),
        KeyCode::Delete => pressed("Delete"),
        KeyCode::Left => pressed("ArrowLeft"),
        KeyCode::Right => pressed("ArrowRight"),
        KeyCode::Up => pressed("ArrowUp"),
        KeyCode::Down => pressed("ArrowDown"),
        KeyCode::Home => pressed("Home"),
        KeyCode::End => pressed("End"),
        KeyCode::Esc => pressed("Escape"),
        KeyCode::Tab => pressed("Tab"),
        _ => None,
    }
}

/// A crossterm mouse event translated to pointer signals in widget pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Moved { x: f32, y: f32 },
}

/// Convert a crossterm mouse event, scaling cells back to widget pixels.
pub fn convert_mouse_event(event: MouseEvent) -> Option<PointerInput> {
    // Center of the cell, so a click on a cell maps inside the glyph drawn
    // there rather than on its left edge.
    let x = (event.column as f32 + 0.5) * CELL_WIDTH;
    let y = (event.row as f32 + 0.5) * CELL_HEIGHT;
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerInput::Down { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerInput::Up { x, y }),
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
            Some(PointerInput::Moved { x, y })
        }
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
