use chrono::{Datelike, NaiveDate};
use gpui::{ElementId, SharedString};

pub trait ElementIdExt {
    fn with_suffix(&self, suffix: impl Into<SharedString>) -> ElementId;

    /// Child id for the cell of a calendar day.
    fn with_date(&self, date: NaiveDate) -> ElementId;
}

impl ElementIdExt for ElementId {
    fn with_suffix(&self, suffix: impl Into<SharedString>) -> ElementId {
        ElementId::NamedChild(Box::new(self.clone()), suffix.into())
    }

    fn with_date(&self, date: NaiveDate) -> ElementId {
        self.with_suffix(format!(
            "day:{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        ))
    }
}
