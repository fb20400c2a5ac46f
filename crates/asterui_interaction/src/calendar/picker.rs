use std::{fmt, rc::Rc};

use chrono::NaiveDate;
use smallvec::SmallVec;

use super::{
    CalendarError, CalendarGrid, Commit, DateRange, DisabledDateFn, GridKey, MonthView,
    SelectionMode, SingleDate, navigate, settle,
};
use crate::{config::PickerConfig, dismiss::DismissScope};

/// Why an open grid closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The selection was completed.
    Completed,
    Escape,
    OutsidePointer,
    Cancelled,
}

/// Something the host should react to, produced by a picker operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent<V> {
    /// The grid opened with the cursor on the given date.
    Opened(NaiveDate),
    FocusMoved(NaiveDate),
    /// A date was committed; carries the whole new value.
    Changed(V),
    Closed(CloseReason),
}

/// Events produced by one operation, in the order they happened.
pub type PickerEvents<V> = SmallVec<[PickerEvent<V>; 2]>;

/// Visibility of the grid. The cursor and view only exist while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Open { cursor: NaiveDate, view: MonthView },
}

/// Keyboard-navigable calendar popup over a [`SelectionMode`].
pub struct CalendarPicker<S: SelectionMode> {
    selection: S,
    phase: Phase,
    disabled_date: Option<DisabledDateFn>,
    disabled: bool,
    config: PickerConfig,
    dismiss: DismissScope,
}

/// Picker for a single date.
pub type DatePickerModel = CalendarPicker<SingleDate>;

/// Picker for a date range.
pub type DateRangePickerModel = CalendarPicker<DateRange>;

impl<S: SelectionMode> Default for CalendarPicker<S> {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}

impl<S: SelectionMode> CalendarPicker<S> {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            selection: S::default(),
            phase: Phase::Closed,
            disabled_date: None,
            disabled: false,
            config,
            dismiss: DismissScope::new(),
        }
    }

    pub fn with_disabled_date(mut self, disabled_date: impl Fn(NaiveDate) -> bool + 'static) -> Self {
        self.disabled_date = Some(Rc::new(disabled_date));
        self
    }

    pub fn with_dismiss_scope(mut self, dismiss: DismissScope) -> Self {
        self.dismiss = dismiss;
        self
    }

    pub fn with_value(mut self, value: S::Value) -> Self {
        self.selection.set_value(value);
        self
    }

    pub fn set_disabled_date(&mut self, disabled_date: Option<DisabledDateFn>) {
        self.disabled_date = disabled_date;
    }

    pub fn set_dismiss_scope(&mut self, dismiss: DismissScope) {
        let was_open = self.is_open();
        self.dismiss = dismiss;

        if was_open {
            self.dismiss.activate();
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PickerConfig) {
        self.config = config;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disables the whole picker, closing it if it's open.
    pub fn set_disabled(&mut self, disabled: bool) -> PickerEvents<S::Value> {
        self.disabled = disabled;

        if disabled {
            self.close(CloseReason::Cancelled)
        } else {
            PickerEvents::new()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Open { .. })
    }

    pub fn cursor(&self) -> Option<NaiveDate> {
        match self.phase {
            Phase::Open { cursor, .. } => Some(cursor),
            Phase::Closed => None,
        }
    }

    pub fn view(&self) -> Option<MonthView> {
        match self.phase {
            Phase::Open { view, .. } => Some(view),
            Phase::Closed => None,
        }
    }

    /// Layout of the displayed month, derived fresh on every call.
    pub fn grid(&self) -> Option<CalendarGrid> {
        self.view()
            .map(|view| CalendarGrid::new(view, self.config.first_day_of_week))
    }

    pub fn selection(&self) -> &S {
        &self.selection
    }

    pub fn value(&self) -> S::Value {
        self.selection.value()
    }

    /// Overwrites the selection with an externally controlled value.
    pub fn set_value(&mut self, value: S::Value) {
        self.selection.set_value(value);
    }

    pub fn is_date_disabled(&self, date: NaiveDate) -> bool {
        self.disabled
            || self
                .disabled_date
                .as_ref()
                .is_some_and(|disabled_date| disabled_date(date))
    }

    pub fn is_listening_for_outside_pointer(&self) -> bool {
        self.dismiss.is_active()
    }

    /// Opens the grid with the cursor on the selection, or on `today` when
    /// nothing is selected.
    pub fn open(&mut self, today: NaiveDate) -> PickerEvents<S::Value> {
        if self.disabled || self.is_open() {
            return PickerEvents::new();
        }

        let seed = self.selection.anchor().unwrap_or(today);
        let cursor = settle(seed, self.config.max_skip, &|date| self.is_date_disabled(date));

        self.phase = Phase::Open {
            cursor,
            view: MonthView::of(cursor),
        };
        self.dismiss.activate();

        log::debug!("calendar opened on {cursor}");
        smallvec::smallvec![PickerEvent::Opened(cursor)]
    }

    pub fn close(&mut self, reason: CloseReason) -> PickerEvents<S::Value> {
        if !self.is_open() {
            return PickerEvents::new();
        }

        self.phase = Phase::Closed;
        self.dismiss.release();

        log::debug!("calendar closed ({reason:?})");
        smallvec::smallvec![PickerEvent::Closed(reason)]
    }

    pub fn toggle(&mut self, today: NaiveDate) -> PickerEvents<S::Value> {
        if self.is_open() {
            self.close(CloseReason::Cancelled)
        } else {
            self.open(today)
        }
    }

    pub fn cancel(&mut self) -> PickerEvents<S::Value> {
        self.close(CloseReason::Cancelled)
    }

    /// A pointer went down somewhere; `inside` tells whether it hit the picker.
    pub fn pointer_down(&mut self, inside: bool) -> PickerEvents<S::Value> {
        if inside {
            return PickerEvents::new();
        }

        self.close(CloseReason::OutsidePointer)
    }

    pub fn handle_key(&mut self, key: GridKey) -> PickerEvents<S::Value> {
        let Phase::Open { cursor, .. } = self.phase else {
            return PickerEvents::new();
        };

        match key {
            GridKey::Escape => self.close(CloseReason::Escape),
            GridKey::Commit => self.select_date(cursor).unwrap_or_default(),
            _ => {
                let target = navigate(cursor, key, self.config.max_skip, &|date| {
                    self.is_date_disabled(date)
                });

                match target {
                    Some(target) if target != cursor => self.focus(target),
                    _ => PickerEvents::new(),
                }
            }
        }
    }

    pub fn show_previous_month(&mut self) -> PickerEvents<S::Value> {
        self.handle_key(GridKey::PageUp)
    }

    pub fn show_next_month(&mut self) -> PickerEvents<S::Value> {
        self.handle_key(GridKey::PageDown)
    }

    /// A day cell was clicked. Disabled dates are ignored.
    pub fn click_date(&mut self, date: NaiveDate) -> PickerEvents<S::Value> {
        self.select_date(date).unwrap_or_default()
    }

    /// Commits today's date, as the "Today" shortcut does.
    pub fn select_today(&mut self, today: NaiveDate) -> PickerEvents<S::Value> {
        self.click_date(today)
    }

    /// Commits `date` to the selection, closing the grid once the selection is
    /// complete.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<PickerEvents<S::Value>, CalendarError> {
        if self.disabled {
            return Err(CalendarError::PickerDisabled);
        }
        if self.is_date_disabled(date) {
            return Err(CalendarError::DateDisabled(date));
        }

        let commit = self.selection.commit(date);
        log::debug!("calendar committed {date} ({commit:?})");

        let mut events = PickerEvents::new();
        events.push(PickerEvent::Changed(self.selection.value()));

        match commit {
            Commit::Complete => events.extend(self.close(CloseReason::Completed)),
            Commit::Partial => {
                if self.cursor().is_some_and(|cursor| cursor != date) {
                    events.extend(self.focus(date));
                }
            }
        }

        Ok(events)
    }

    fn focus(&mut self, cursor: NaiveDate) -> PickerEvents<S::Value> {
        self.phase = Phase::Open {
            cursor,
            view: MonthView::of(cursor),
        };

        smallvec::smallvec![PickerEvent::FocusMoved(cursor)]
    }
}

impl<S: SelectionMode + fmt::Debug> fmt::Debug for CalendarPicker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarPicker")
            .field("selection", &self.selection)
            .field("phase", &self.phase)
            .field("disabled", &self.disabled)
            .field("config", &self.config)
            .field("dismiss", &self.dismiss)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Weekday};

    use super::*;
    use crate::dismiss::tests::ListenerCounter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    #[test]
    fn test_open_seeds_cursor_from_today() {
        let mut picker = DatePickerModel::default();
        let today = date(2024, 3, 15);

        let events = picker.open(today);
        assert_eq!(events.as_slice(), &[PickerEvent::Opened(today)]);
        assert_eq!(picker.cursor(), Some(today));
        assert_eq!(picker.view(), Some(MonthView::new(2024, 3).unwrap()));
    }

    #[test]
    fn test_open_seeds_cursor_from_selection() {
        let mut picker = DatePickerModel::default().with_value(Some(date(2023, 11, 2)));

        picker.open(date(2024, 3, 15));
        assert_eq!(picker.cursor(), Some(date(2023, 11, 2)));
        assert_eq!(picker.grid().unwrap().view(), MonthView::new(2023, 11).unwrap());
    }

    #[test]
    fn test_open_moves_off_disabled_seed() {
        let mut picker = DatePickerModel::default().with_disabled_date(weekend);

        picker.open(date(2024, 3, 16));
        assert_eq!(picker.cursor(), Some(date(2024, 3, 18)));
    }

    #[test]
    fn test_single_commit_closes() {
        let mut picker = DatePickerModel::default();
        picker.open(date(2024, 3, 15));
        picker.handle_key(GridKey::Right);

        let events = picker.handle_key(GridKey::Commit);
        assert_eq!(
            events.as_slice(),
            &[
                PickerEvent::Changed(Some(date(2024, 3, 16))),
                PickerEvent::Closed(CloseReason::Completed)
            ]
        );
        assert!(!picker.is_open());
        assert_eq!(picker.value(), Some(date(2024, 3, 16)));
    }

    #[test]
    fn test_escape_keeps_selection() {
        let mut picker = DatePickerModel::default().with_value(Some(date(2024, 3, 1)));
        picker.open(date(2024, 3, 15));
        picker.handle_key(GridKey::Down);

        let events = picker.handle_key(GridKey::Escape);
        assert_eq!(events.as_slice(), &[PickerEvent::Closed(CloseReason::Escape)]);
        assert!(!picker.is_open());
        assert_eq!(picker.value(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut picker = DatePickerModel::default();

        assert!(picker.handle_key(GridKey::Right).is_empty());
        assert!(picker.handle_key(GridKey::Commit).is_empty());
        assert_eq!(picker.value(), None);
    }

    #[test]
    fn test_navigation_updates_view_across_months() {
        let mut picker = DatePickerModel::default();
        picker.open(date(2024, 3, 30));

        picker.handle_key(GridKey::Down);
        assert_eq!(picker.cursor(), Some(date(2024, 4, 6)));
        assert_eq!(picker.view(), Some(MonthView::new(2024, 4).unwrap()));
        assert_eq!(picker.grid().unwrap().leading_blanks(), 1);
    }

    #[test]
    fn test_weekend_skip_through_picker() {
        let mut picker = DateRangePickerModel::default().with_disabled_date(weekend);
        picker.open(date(2024, 3, 15));

        let events = picker.handle_key(GridKey::Right);
        assert_eq!(events.as_slice(), &[PickerEvent::FocusMoved(date(2024, 3, 18))]);
    }

    #[test]
    fn test_blocked_navigation_produces_no_events() {
        let cursor = date(2024, 3, 15);
        let mut picker = DatePickerModel::default().with_disabled_date(move |d| d > cursor);
        picker.open(cursor);

        assert!(picker.handle_key(GridKey::Right).is_empty());
        assert_eq!(picker.cursor(), Some(cursor));
    }

    #[test]
    fn test_range_flow() {
        let mut picker = DateRangePickerModel::default();
        picker.open(date(2024, 5, 10));

        let events = picker.click_date(date(2024, 5, 20));
        assert_eq!(
            events.as_slice(),
            &[
                PickerEvent::Changed(DateRange::new(Some(date(2024, 5, 20)), None)),
                PickerEvent::FocusMoved(date(2024, 5, 20)),
            ]
        );
        assert!(picker.is_open(), "First pick leaves the grid open");
        assert_eq!(picker.cursor(), Some(date(2024, 5, 20)));

        let events = picker.click_date(date(2024, 5, 12));
        assert_eq!(
            events.as_slice(),
            &[
                PickerEvent::Changed(DateRange::new(Some(date(2024, 5, 12)), Some(date(2024, 5, 20)))),
                PickerEvent::Closed(CloseReason::Completed),
            ]
        );
        assert!(!picker.is_open());
    }

    #[test]
    fn test_range_keyboard_flow() {
        let mut picker = DateRangePickerModel::default();
        picker.open(date(2024, 5, 10));

        picker.handle_key(GridKey::Commit);
        picker.handle_key(GridKey::Right);
        picker.handle_key(GridKey::Right);
        picker.handle_key(GridKey::Commit);

        assert_eq!(
            picker.value(),
            DateRange::new(Some(date(2024, 5, 10)), Some(date(2024, 5, 12)))
        );
        assert!(!picker.is_open());
    }

    #[test]
    fn test_disabled_date_cannot_be_selected() {
        let mut picker = DatePickerModel::default().with_disabled_date(weekend);
        picker.open(date(2024, 3, 15));

        assert!(picker.click_date(date(2024, 3, 16)).is_empty());
        assert_eq!(
            picker.select_date(date(2024, 3, 16)),
            Err(CalendarError::DateDisabled(date(2024, 3, 16)))
        );
        assert!(picker.is_open());
        assert_eq!(picker.value(), None);
    }

    #[test]
    fn test_disabled_picker() {
        let mut picker = DatePickerModel::default();
        picker.open(date(2024, 3, 15));

        let events = picker.set_disabled(true);
        assert_eq!(events.as_slice(), &[PickerEvent::Closed(CloseReason::Cancelled)]);
        assert!(picker.open(date(2024, 3, 15)).is_empty());
        assert_eq!(
            picker.select_date(date(2024, 3, 15)),
            Err(CalendarError::PickerDisabled)
        );
    }

    #[test]
    fn test_outside_pointer_closes() {
        let mut picker = DatePickerModel::default();
        picker.open(date(2024, 3, 15));

        assert!(picker.pointer_down(true).is_empty());
        assert!(picker.is_open());

        let events = picker.pointer_down(false);
        assert_eq!(events.as_slice(), &[PickerEvent::Closed(CloseReason::OutsidePointer)]);
        assert!(picker.pointer_down(false).is_empty());
    }

    #[test]
    fn test_listener_lifecycle() {
        let counter = ListenerCounter::default();
        let mut picker = DatePickerModel::default().with_dismiss_scope(counter.scope());

        assert_eq!(counter.live.get(), 0);

        picker.open(date(2024, 3, 15));
        assert_eq!(counter.live.get(), 1);
        assert!(picker.is_listening_for_outside_pointer());

        picker.open(date(2024, 3, 15));
        assert_eq!(counter.acquired.get(), 1, "Opening twice doesn't acquire twice");

        picker.handle_key(GridKey::Escape);
        assert_eq!(counter.live.get(), 0);

        picker.open(date(2024, 3, 15));
        picker.handle_key(GridKey::Commit);
        assert_eq!(counter.live.get(), 0, "Completing a selection releases the listener");

        picker.open(date(2024, 3, 15));
        drop(picker);
        assert_eq!(counter.live.get(), 0, "Dropping an open picker releases the listener");
        assert_eq!(counter.acquired.get(), 3);
    }

    #[test]
    fn test_month_buttons() {
        let mut picker = DatePickerModel::default();
        picker.open(date(2024, 3, 31));

        picker.show_previous_month();
        assert_eq!(picker.cursor(), Some(date(2024, 2, 29)));

        picker.show_next_month();
        picker.show_next_month();
        assert_eq!(picker.cursor(), Some(date(2024, 4, 29)));
    }

    #[test]
    fn test_select_today() {
        let today = date(2024, 3, 16);
        let mut picker = DatePickerModel::default();
        picker.open(date(2024, 1, 1));

        picker.select_today(today);
        assert_eq!(picker.value(), Some(today));

        let mut picker = DatePickerModel::default().with_disabled_date(weekend);
        picker.open(date(2024, 1, 1));
        assert!(picker.select_today(today).is_empty());
    }

    #[test]
    fn test_controlled_value_overwrites() {
        let mut picker = DateRangePickerModel::default();
        picker.open(date(2024, 5, 10));
        picker.click_date(date(2024, 5, 11));

        picker.set_value(DateRange::new(Some(date(2024, 6, 9)), Some(date(2024, 6, 1))));
        assert_eq!(
            picker.value(),
            DateRange::new(Some(date(2024, 6, 1)), Some(date(2024, 6, 9)))
        );

        picker.click_date(date(2024, 6, 20));
        assert_eq!(picker.value(), DateRange::new(Some(date(2024, 6, 20)), None));
    }

    #[test]
    fn test_toggle() {
        let mut picker = DatePickerModel::default();

        picker.toggle(date(2024, 3, 15));
        assert!(picker.is_open());
        let events = picker.toggle(date(2024, 3, 15));
        assert_eq!(events.as_slice(), &[PickerEvent::Closed(CloseReason::Cancelled)]);
    }
}
