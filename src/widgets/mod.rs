//! Concrete widgets: button, label, text input.

pub mod button;
pub mod label;
pub mod text_input;

pub use button::Button;
pub use label::{Label, LabelOptions};
pub use text_input::{TextInput, TextInputOptions};
