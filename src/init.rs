use gpui::App;

use crate::components::{date_picker, masked_input, time_picker};

/// Registers the key bindings of every component.
pub fn init(cx: &mut App) {
    masked_input::init(cx);
    date_picker::init(cx);
    time_picker::init(cx);
}
