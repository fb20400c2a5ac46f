//! Column-based time picker.
//!
//! The popup shows one column per time component. Arrow keys move within and
//! between columns and every change is committed straight away, so there is no
//! separate confirm step for the value itself.

use chrono::{NaiveTime, Timelike};
use enum_assoc::Assoc;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{calendar::CloseReason, config::TimePickerConfig, dismiss::DismissScope};

/// Hour cycle of the picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24", alias = "h24")]
    H24,
    #[serde(rename = "12", alias = "h12")]
    H12,
}

#[derive(Assoc, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[func(pub fn label(&self) -> &'static str)]
pub enum TimeColumn {
    #[assoc(label = "Hour")]
    Hour,
    #[assoc(label = "Minute")]
    Minute,
    #[assoc(label = "Second")]
    Second,
    #[assoc(label = "Period")]
    Period,
}

#[derive(Assoc, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[func(pub fn label(&self) -> &'static str)]
#[func(pub fn hour_offset(&self) -> u32)]
pub enum Period {
    #[assoc(label = "AM", hour_offset = 0)]
    Am,
    #[assoc(label = "PM", hour_offset = 12)]
    Pm,
}

impl Period {
    pub fn of(time: NaiveTime) -> Self {
        if time.hour() >= 12 { Self::Pm } else { Self::Am }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Am => Self::Pm,
            Self::Pm => Self::Am,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeKey {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimePickerEvent {
    Opened,
    /// The committed value changed. `None` after clearing.
    Changed(Option<NaiveTime>),
    Closed(CloseReason),
}

pub type TimePickerEvents = SmallVec<[TimePickerEvent; 2]>;

/// State of a time picker popup.
#[derive(Debug)]
pub struct TimeColumnPicker {
    value: Option<NaiveTime>,
    draft: NaiveTime,
    focused: TimeColumn,
    open: bool,
    disabled: bool,
    config: TimePickerConfig,
    dismiss: DismissScope,
}

impl Default for TimeColumnPicker {
    fn default() -> Self {
        Self::new(TimePickerConfig::default())
    }
}

impl TimeColumnPicker {
    pub fn new(config: TimePickerConfig) -> Self {
        Self {
            value: None,
            draft: NaiveTime::MIN,
            focused: TimeColumn::Hour,
            open: false,
            disabled: false,
            config,
            dismiss: DismissScope::new(),
        }
    }

    pub fn with_value(mut self, value: Option<NaiveTime>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_dismiss_scope(mut self, dismiss: DismissScope) -> Self {
        self.dismiss = dismiss;
        self
    }

    pub fn config(&self) -> &TimePickerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TimePickerConfig) {
        self.config = config;

        if !self.columns().contains(&self.focused) {
            self.focused = TimeColumn::Hour;
        }
    }

    pub fn value(&self) -> Option<NaiveTime> {
        self.value
    }

    /// The time shown by the columns, midnight when nothing is selected.
    pub fn draft(&self) -> NaiveTime {
        self.draft
    }

    /// Overwrites the value with an externally controlled one.
    pub fn set_value(&mut self, value: Option<NaiveTime>) {
        self.value = value;
        self.draft = value.unwrap_or(NaiveTime::MIN);
    }

    pub fn focused_column(&self) -> TimeColumn {
        self.focused
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) -> TimePickerEvents {
        self.disabled = disabled;

        if disabled {
            self.close(CloseReason::Cancelled)
        } else {
            TimePickerEvents::new()
        }
    }

    pub fn is_listening_for_outside_pointer(&self) -> bool {
        self.dismiss.is_active()
    }

    /// Visible columns in display order.
    pub fn columns(&self) -> SmallVec<[TimeColumn; 4]> {
        let mut columns = SmallVec::new();
        columns.push(TimeColumn::Hour);
        columns.push(TimeColumn::Minute);

        if self.config.show_seconds {
            columns.push(TimeColumn::Second);
        }
        if self.config.format == TimeFormat::H12 {
            columns.push(TimeColumn::Period);
        }

        columns
    }

    /// Values listed in `column`. Period entries are hour offsets (0 or 12).
    pub fn column_items(&self, column: TimeColumn) -> Vec<u32> {
        let (min, max) = self.bounds(column);

        match column {
            TimeColumn::Period => vec![Period::Am.hour_offset(), Period::Pm.hour_offset()],
            _ => (min..=max).step_by(self.step(column) as usize).collect(),
        }
    }

    /// The value `column` currently shows.
    pub fn column_value(&self, column: TimeColumn) -> u32 {
        match column {
            TimeColumn::Hour => match self.config.format {
                TimeFormat::H24 => self.draft.hour(),
                TimeFormat::H12 => self.draft.hour12().1,
            },
            TimeColumn::Minute => self.draft.minute(),
            TimeColumn::Second => self.draft.second(),
            TimeColumn::Period => Period::of(self.draft).hour_offset(),
        }
    }

    pub fn open(&mut self) -> TimePickerEvents {
        if self.disabled || self.open {
            return TimePickerEvents::new();
        }

        self.open = true;
        self.focused = TimeColumn::Hour;
        self.dismiss.activate();

        log::debug!("time picker opened");
        smallvec::smallvec![TimePickerEvent::Opened]
    }

    pub fn close(&mut self, reason: CloseReason) -> TimePickerEvents {
        if !self.open {
            return TimePickerEvents::new();
        }

        self.open = false;
        self.dismiss.release();

        log::debug!("time picker closed ({reason:?})");
        smallvec::smallvec![TimePickerEvent::Closed(reason)]
    }

    pub fn toggle(&mut self) -> TimePickerEvents {
        if self.open {
            self.close(CloseReason::Cancelled)
        } else {
            self.open()
        }
    }

    pub fn pointer_down(&mut self, inside: bool) -> TimePickerEvents {
        if inside {
            return TimePickerEvents::new();
        }

        self.close(CloseReason::OutsidePointer)
    }

    pub fn handle_key(&mut self, key: TimeKey) -> TimePickerEvents {
        if !self.open {
            return TimePickerEvents::new();
        }

        match key {
            TimeKey::Up => self.adjust(self.focused, -1),
            TimeKey::Down => self.adjust(self.focused, 1),
            TimeKey::Left => {
                self.cycle_column(-1);
                TimePickerEvents::new()
            }
            TimeKey::Right => {
                self.cycle_column(1);
                TimePickerEvents::new()
            }
            TimeKey::Confirm => self.close(CloseReason::Completed),
            TimeKey::Escape => self.close(CloseReason::Escape),
        }
    }

    pub fn focus_column(&mut self, column: TimeColumn) {
        if self.columns().contains(&column) {
            self.focused = column;
        }
    }

    /// Moves `column` by `direction` steps, wrapping to the opposite bound.
    pub fn adjust(&mut self, column: TimeColumn, direction: i32) -> TimePickerEvents {
        if self.disabled || !self.columns().contains(&column) {
            return TimePickerEvents::new();
        }

        if column == TimeColumn::Period {
            return self.select_period(Period::of(self.draft).toggled());
        }

        let (min, max) = self.bounds(column);
        let next = self.column_value(column) as i64 + (direction * self.step(column) as i32) as i64;

        let next = if next > max as i64 {
            min
        } else if next < min as i64 {
            max
        } else {
            next as u32
        };

        self.select(column, next)
    }

    /// Sets `column` to `value`, as clicking an item does. Values outside the
    /// column's range are ignored.
    pub fn select(&mut self, column: TimeColumn, value: u32) -> TimePickerEvents {
        if self.disabled || !self.columns().contains(&column) {
            return TimePickerEvents::new();
        }

        let (min, max) = self.bounds(column);
        if !(min..=max).contains(&value) {
            log::trace!("ignoring {value} for the {} column", column.label());
            return TimePickerEvents::new();
        }

        let (hour, minute, second) = (self.draft.hour(), self.draft.minute(), self.draft.second());

        let time = match column {
            TimeColumn::Hour => match self.config.format {
                TimeFormat::H24 => NaiveTime::from_hms_opt(value, minute, second),
                TimeFormat::H12 => NaiveTime::from_hms_opt(
                    value % 12 + Period::of(self.draft).hour_offset(),
                    minute,
                    second,
                ),
            },
            TimeColumn::Minute => NaiveTime::from_hms_opt(hour, value, second),
            TimeColumn::Second => NaiveTime::from_hms_opt(hour, minute, value),
            TimeColumn::Period => {
                let period = if value < 12 { Period::Am } else { Period::Pm };
                return self.select_period(period);
            }
        };

        match time {
            Some(time) => self.commit(time),
            None => TimePickerEvents::new(),
        }
    }

    pub fn select_period(&mut self, period: Period) -> TimePickerEvents {
        if self.disabled {
            return TimePickerEvents::new();
        }

        let hour = self.draft.hour() % 12 + period.hour_offset();

        match NaiveTime::from_hms_opt(hour, self.draft.minute(), self.draft.second()) {
            Some(time) => self.commit(time),
            None => TimePickerEvents::new(),
        }
    }

    /// Resets the value. Emits nothing when there was no value.
    pub fn clear(&mut self) -> TimePickerEvents {
        if self.disabled || self.value.is_none() {
            return TimePickerEvents::new();
        }

        self.set_value(None);

        log::debug!("time picker cleared");
        smallvec::smallvec![TimePickerEvent::Changed(None)]
    }

    fn commit(&mut self, time: NaiveTime) -> TimePickerEvents {
        self.draft = time;
        self.value = Some(time);

        smallvec::smallvec![TimePickerEvent::Changed(Some(time))]
    }

    fn cycle_column(&mut self, direction: isize) {
        let columns = self.columns();
        let current = columns
            .iter()
            .position(|column| *column == self.focused)
            .unwrap_or(0) as isize;

        let next = (current + direction).rem_euclid(columns.len() as isize) as usize;
        self.focused = columns[next];
    }

    fn step(&self, column: TimeColumn) -> u32 {
        let step = match column {
            TimeColumn::Hour => self.config.hour_step,
            TimeColumn::Minute => self.config.minute_step,
            TimeColumn::Second => self.config.second_step,
            TimeColumn::Period => 1,
        };

        step.max(1)
    }

    fn bounds(&self, column: TimeColumn) -> (u32, u32) {
        match column {
            TimeColumn::Hour => match self.config.format {
                TimeFormat::H24 => (0, 23),
                TimeFormat::H12 => (1, 12),
            },
            TimeColumn::Minute | TimeColumn::Second => (0, 59),
            TimeColumn::Period => (0, 23),
        }
    }
}
