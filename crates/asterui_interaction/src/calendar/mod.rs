use chrono::NaiveDate;
use thiserror::Error;

mod grid;
pub use grid::*;

mod navigation;
pub use navigation::*;

mod selection;
pub use selection::*;

mod picker;
pub use picker::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("{year}-{month:02} is not a valid calendar month.")]
    InvalidMonth { year: i32, month: u32 },
    #[error("{0} is disabled and can't be selected.")]
    DateDisabled(NaiveDate),
    #[error("The picker is disabled.")]
    PickerDisabled,
}
