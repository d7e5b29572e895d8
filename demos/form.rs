//! Interactive demo: a label, a text input and a button over the terminal
//! backend.
//!
//! Type a name and press Enter (or click Greet). Ctrl+Q quits.
//!
//! ```sh
//! cargo run --example form
//! ```

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyModifiers};
use crossterm::terminal;

use canvas_widgets::backend::terminal::{
    convert_key_event, convert_mouse_event, KeyInput, PointerInput,
};
use canvas_widgets::backend::{Screen, SharedScreen, TerminalBackend, TerminalSession};
use canvas_widgets::{
    Button, ComponentOptions, Error, Event, Label, LabelOptions, NameSource, Rect, Rgba,
    Scheduler, TextInput, TextInputOptions, Widget,
};

fn bounds_of(widget: &impl Widget) -> Rect {
    let base = widget.base();
    Rect::new(base.left(), base.top(), base.width(), base.height())
}

/// Feed one pointer signal to a widget, translating to local coordinates and
/// synthesizing enter/leave from containment changes.
fn route_pointer(widget: &mut impl Widget, pointer: PointerInput) {
    let bounds = bounds_of(widget);
    match pointer {
        PointerInput::Moved { x, y } => {
            let inside = bounds.contains(x, y);
            if inside && !widget.base().mouse_inside() {
                widget.dispatch_pointer_enter();
            } else if !inside && widget.base().mouse_inside() {
                widget.dispatch_pointer_leave();
            }
        }
        PointerInput::Down { x, y } => {
            if bounds.contains(x, y) {
                widget.dispatch_pointer_down(x - bounds.x, y - bounds.y);
            }
        }
        // Release goes to the widget unconditionally; the state machine
        // ignores it unless this widget tracked the press.
        PointerInput::Up { x, y } => {
            widget.dispatch_pointer_up(x - bounds.x, y - bounds.y);
        }
    }
}

fn main() -> Result<(), Error> {
    let mut session = TerminalSession::enter()?;
    let (cols, rows) = terminal::size()?;
    let screen: SharedScreen = Rc::new(RefCell::new(Screen::new(cols, rows)));

    let scheduler = Scheduler::new();
    let names = NameSource::new();
    let backend = || Box::new(TerminalBackend::new(screen.clone()));

    let mut title = Label::new(
        backend(),
        LabelOptions {
            base: ComponentOptions {
                left: 16.0,
                top: 16.0,
                width: 400.0,
                height: 20.0,
                text: "What's your name? (Ctrl+Q quits)".into(),
                names: names.clone(),
                ..Default::default()
            },
            ..Default::default()
        },
    );

    let mut input = TextInput::new(
        backend(),
        TextInputOptions {
            base: ComponentOptions {
                left: 16.0,
                top: 48.0,
                width: 240.0,
                height: 32.0,
                names: names.clone(),
                ..Default::default()
            },
            placeholder: Some("type here".into()),
            max_length: 24,
            scheduler: scheduler.clone(),
            ..Default::default()
        },
    );

    let mut button = Button::new(
        backend(),
        ComponentOptions {
            left: 272.0,
            top: 48.0,
            width: 96.0,
            height: 32.0,
            text: "Greet".into(),
            back_color: Rgba::rgb(0xe0, 0xe0, 0xe0),
            names: names.clone(),
            ..Default::default()
        },
    );

    let mut greeting = Label::new(
        backend(),
        LabelOptions {
            base: ComponentOptions {
                left: 16.0,
                top: 96.0,
                width: 400.0,
                height: 20.0,
                names,
                ..Default::default()
            },
            ..Default::default()
        },
    );

    // Listeners cannot borrow the widgets they feed, so results land in
    // shared cells the frame loop drains.
    let submitted: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let submitted_sink = submitted.clone();
    input.base().on(
        "submit",
        Rc::new(move |event| {
            if let Event::Submit(value) = event {
                *submitted_sink.borrow_mut() = Some(value.clone());
            }
        }),
    );

    let clicked = Rc::new(Cell::new(false));
    let clicked_sink = clicked.clone();
    button.base().on("click", Rc::new(move |_| clicked_sink.set(true)));

    let mut last_tick = Instant::now();
    loop {
        if event::poll(Duration::from_millis(33))? {
            match event::read()? {
                TermEvent::Key(key) => {
                    if key.code == KeyCode::Char('q')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        break;
                    }
                    match convert_key_event(key) {
                        Some(KeyInput::Typed(ch)) => {
                            input.dispatch_key_typed(ch);
                        }
                        Some(KeyInput::Pressed(key)) => {
                            input.dispatch_key_pressed(&key);
                        }
                        None => {}
                    }
                }
                TermEvent::Mouse(mouse) => {
                    if let Some(pointer) = convert_mouse_event(mouse) {
                        if let PointerInput::Down { x, y } = pointer {
                            if !bounds_of(&input).contains(x, y) {
                                input.blur();
                            }
                        }
                        route_pointer(&mut input, pointer);
                        route_pointer(&mut button, pointer);
                    }
                }
                TermEvent::Resize(width, height) => {
                    *screen.borrow_mut() = Screen::new(width, height);
                    title.base().request_redraw();
                    input.base().request_redraw();
                    button.base().request_redraw();
                    greeting.base().request_redraw();
                }
                _ => {}
            }
        }

        scheduler.advance(last_tick.elapsed());
        last_tick = Instant::now();

        let name = submitted.borrow_mut().take();
        if let Some(name) = name {
            greeting.base_mut().set_text(format!("Hello, {name}!"));
        }
        if clicked.take() {
            let name = input.value().to_string();
            greeting.base_mut().set_text(format!("Hello, {name}!"));
        }

        title.paint();
        input.paint();
        button.paint();
        greeting.paint();
        screen.borrow_mut().flush(&mut io::stdout())?;
    }

    session.leave()?;
    Ok(())
}
