pub mod date_picker;

pub mod masked_input;

pub mod time_picker;
