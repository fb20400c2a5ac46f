use std::fmt::Debug;

use chrono::NaiveDate;

/// Result of committing a date to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// More picks are needed; the grid stays open.
    Partial,
    /// The selection is complete; the grid closes.
    Complete,
}

/// How committed dates accumulate into a value.
pub trait SelectionMode: Default + 'static {
    /// The value reported to the host.
    type Value: Clone + PartialEq + Debug + 'static;

    fn commit(&mut self, date: NaiveDate) -> Commit;

    fn value(&self) -> Self::Value;

    /// Overwrites the selection wholesale.
    fn set_value(&mut self, value: Self::Value);

    /// Date the focus cursor is seeded from when the grid opens.
    fn anchor(&self) -> Option<NaiveDate>;

    /// Whether `date` is an endpoint of the selection.
    fn is_selected(&self, date: NaiveDate) -> bool;

    /// Whether `date` lies within the selection (inclusive).
    fn contains(&self, date: NaiveDate) -> bool {
        self.is_selected(date)
    }
}

/// A single optional date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleDate(pub Option<NaiveDate>);

impl SelectionMode for SingleDate {
    type Value = Option<NaiveDate>;

    fn commit(&mut self, date: NaiveDate) -> Commit {
        self.0 = Some(date);
        Commit::Complete
    }

    fn value(&self) -> Self::Value {
        self.0
    }

    fn set_value(&mut self, value: Self::Value) {
        self.0 = value;
    }

    fn anchor(&self) -> Option<NaiveDate> {
        self.0
    }

    fn is_selected(&self, date: NaiveDate) -> bool {
        self.0 == Some(date)
    }
}

/// An ordered date range whose end stays empty until the second pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a range, ordering the endpoints and moving a lone `end` into
    /// `start`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) if end < start => Self {
                start: Some(end),
                end: Some(start),
            },
            (None, Some(end)) => Self {
                start: Some(end),
                end: None,
            },
            (start, end) => Self { start, end },
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }
}

impl SelectionMode for DateRange {
    type Value = DateRange;

    fn commit(&mut self, date: NaiveDate) -> Commit {
        match (self.start, self.end) {
            (Some(start), None) => {
                *self = Self::new(Some(start), Some(date));
                Commit::Complete
            }
            _ => {
                self.start = Some(date);
                self.end = None;
                Commit::Partial
            }
        }
    }

    fn value(&self) -> Self::Value {
        *self
    }

    fn set_value(&mut self, value: Self::Value) {
        *self = Self::new(value.start, value.end);
    }

    fn anchor(&self) -> Option<NaiveDate> {
        self.start.or(self.end)
    }

    fn is_selected(&self, date: NaiveDate) -> bool {
        self.start == Some(date) || self.end == Some(date)
    }

    fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            (Some(start), None) => start == date,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_single_commit_completes() {
        let mut selection = SingleDate::default();

        assert_eq!(selection.commit(date(3)), Commit::Complete);
        assert_eq!(selection.value(), Some(date(3)));
        assert_eq!(selection.commit(date(9)), Commit::Complete);
        assert_eq!(selection.value(), Some(date(9)));
    }

    #[test]
    fn test_range_two_picks() {
        let mut range = DateRange::default();

        assert_eq!(range.commit(date(4)), Commit::Partial);
        assert_eq!(range.value(), DateRange::new(Some(date(4)), None));
        assert_eq!(range.commit(date(10)), Commit::Complete);
        assert_eq!(range.start(), Some(date(4)));
        assert_eq!(range.end(), Some(date(10)));
    }

    #[test]
    fn test_range_commit_is_order_independent() {
        let mut forward = DateRange::default();
        forward.commit(date(4));
        forward.commit(date(10));

        let mut backward = DateRange::default();
        backward.commit(date(10));
        backward.commit(date(4));

        assert_eq!(forward, backward);
        assert_eq!(backward.start(), Some(date(4)));
        assert_eq!(backward.end(), Some(date(10)));
    }

    #[test]
    fn test_range_third_pick_restarts() {
        let mut range = DateRange::default();
        range.commit(date(4));
        range.commit(date(10));

        assert_eq!(range.commit(date(20)), Commit::Partial);
        assert_eq!(range.start(), Some(date(20)));
        assert_eq!(range.end(), None);
    }

    #[test]
    fn test_range_same_day() {
        let mut range = DateRange::default();
        range.commit(date(7));

        assert_eq!(range.commit(date(7)), Commit::Complete);
        assert_eq!(range.start(), range.end());
    }

    #[test]
    fn test_range_normalization() {
        let reversed = DateRange::new(Some(date(12)), Some(date(2)));
        assert_eq!(reversed.start(), Some(date(2)));
        assert_eq!(reversed.end(), Some(date(12)));

        let end_only = DateRange::new(None, Some(date(8)));
        assert_eq!(end_only.start(), Some(date(8)));
        assert_eq!(end_only.end(), None);
    }

    #[test]
    fn test_range_contains() {
        let range = DateRange::new(Some(date(4)), Some(date(10)));

        assert!(range.contains(date(4)));
        assert!(range.contains(date(7)));
        assert!(range.contains(date(10)));
        assert!(!range.contains(date(11)));
        assert!(range.is_selected(date(10)));
        assert!(!range.is_selected(date(7)));
    }
}
