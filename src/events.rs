//! Event Module - Semantic events and the per-component emitter
//!
//! Synchronous, single-threaded publish/subscribe registry keyed by event
//! name. Each component owns one emitter; listeners registered by host code
//! are referenced, not owned, and are released on destroy.
//!
//! # API
//!
//! - `on(event, callback)` - Subscribe, returns a `ListenerId` token
//! - `once(event, callback)` - Subscribe for a single delivery
//! - `off(event, &callback)` - Unsubscribe by callback identity
//! - `off_id(id)` - Unsubscribe by token
//! - `emit(event, payload)` - Deliver to listeners in registration order
//! - `remove_all_listeners(event)` - Drop one event's listeners, or all
//! - `listener_count(event)` - Number of registered listeners
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use canvas_widgets::events::{Event, EventEmitter};
//!
//! let emitter = EventEmitter::new();
//! let id = emitter.on("click", Rc::new(|event| {
//!     if let Event::Click { x, y } = event {
//!         println!("Clicked at ({}, {})", x, y);
//!     }
//! }));
//! emitter.emit("click", &Event::Click { x: 5.0, y: 5.0 });
//! emitter.off_id(id);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

// =============================================================================
// TYPES
// =============================================================================

/// Payload delivered with a semantic event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MouseDown { x: f32, y: f32 },
    MouseUp { x: f32, y: f32 },
    Click { x: f32, y: f32 },
    MouseEnter,
    MouseLeave,
    Focus,
    Blur,
    EnabledChanged(bool),
    VisibleChanged(bool),
    TextChanged(String),
    /// Text input value changed through an edit.
    Change(String),
    KeyPress { key: String, key_code: u32 },
    Submit(String),
    Destroy,
}

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Non-printable key event delivered to a focused widget.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    /// The key that was pressed (e.g., "Enter", "ArrowLeft", "Backspace")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), modifiers: Modifiers::default() }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self { key: key.into(), modifiers }
    }
}

/// Listener callback. `Rc<dyn Fn>` so the same callback can be registered
/// for several events and compared by pointer identity in `off`.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Unsubscribe token returned by `on`/`once`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

// =============================================================================
// EMITTER
// =============================================================================

struct Entry {
    id: u64,
    callback: Listener,
    once: bool,
}

struct Registry {
    listeners: HashMap<String, Vec<Entry>>,
    next_id: u64,
}

/// Per-component event emitter.
///
/// Delivery is synchronous and runs on the calling thread; listeners fire in
/// registration order. A panicking listener is caught at the emit site,
/// reported through `log`, and does not stop delivery to later listeners.
pub struct EventEmitter {
    registry: RefCell<Registry>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            registry: RefCell::new(Registry { listeners: HashMap::new(), next_id: 0 }),
        }
    }

    /// Register a listener. Returns a token usable with `off_id`.
    pub fn on(&self, event: &str, callback: Listener) -> ListenerId {
        self.register(event, callback, false)
    }

    /// Register a listener that is removed after its first delivery.
    pub fn once(&self, event: &str, callback: Listener) -> ListenerId {
        self.register(event, callback, true)
    }

    fn register(&self, event: &str, callback: Listener, once: bool) -> ListenerId {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.listeners
            .entry(event.to_string())
            .or_default()
            .push(Entry { id, callback, once });
        ListenerId(id)
    }

    /// Remove every registration of `callback` under `event` (pointer identity).
    pub fn off(&self, event: &str, callback: &Listener) {
        let mut reg = self.registry.borrow_mut();
        if let Some(list) = reg.listeners.get_mut(event) {
            list.retain(|entry| !Rc::ptr_eq(&entry.callback, callback));
        }
    }

    /// Remove a single registration by token.
    pub fn off_id(&self, id: ListenerId) {
        let mut reg = self.registry.borrow_mut();
        for list in reg.listeners.values_mut() {
            list.retain(|entry| entry.id != id.0);
        }
    }

    /// Deliver `payload` to every listener registered for `event`.
    ///
    /// Once-listeners are unregistered before their delivery, so a listener
    /// that re-emits the same event cannot fire them twice.
    pub fn emit(&self, event: &str, payload: &Event) {
        let to_call: Vec<Listener> = {
            let mut reg = self.registry.borrow_mut();
            match reg.listeners.get_mut(event) {
                Some(list) => {
                    let callbacks = list.iter().map(|e| Rc::clone(&e.callback)).collect();
                    list.retain(|e| !e.once);
                    callbacks
                }
                None => return,
            }
        };

        for callback in to_call {
            if let Err(cause) = panic::catch_unwind(AssertUnwindSafe(|| callback(payload))) {
                let message = cause
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| cause.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("listener for {event:?} panicked: {message}");
            }
        }
    }

    /// Drop listeners for one event, or every event when `event` is `None`.
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        let mut reg = self.registry.borrow_mut();
        match event {
            Some(name) => {
                reg.listeners.remove(name);
            }
            None => reg.listeners.clear(),
        }
    }

    /// Number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.borrow().listeners.get(event).map_or(0, Vec::len)
    }
}

// =============================================================================
// TESTS
// =============================================================================
