mod colors;
pub use colors::*;

mod element_id;
pub use element_id::*;

mod test_selector;
pub(crate) use test_selector::*;
