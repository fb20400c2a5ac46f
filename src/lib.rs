//! GPUI elements for masked text input, date and date range pickers, and a
//! column time picker. The interaction logic lives in
//! [`asterui_interaction`], re-exported here as [`interaction`].

pub mod components;

mod utils;
pub use utils::{ElementIdExt, Palette, rgb_a};

mod init;
pub use init::*;

pub use asterui_interaction as interaction;
