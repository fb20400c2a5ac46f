use std::rc::Rc;

use asterui_interaction::{
    calendar::{
        CalendarPicker, CloseReason, DateRange, GridKey, PickerEvent, PickerEvents, SelectionMode,
        SingleDate,
    },
    config::PickerConfig,
};
use chrono::NaiveDate;
use gpui::{
    App, Bounds, ClickEvent, Context, EventEmitter, FocusHandle, Focusable, KeyBinding,
    MouseDownEvent, Pixels, Window, actions,
};

actions!(
    date_picker,
    [
        MoveLeft,
        MoveRight,
        MoveUp,
        MoveDown,
        MoveToMonthStart,
        MoveToMonthEnd,
        PreviousMonth,
        NextMonth,
        Commit,
        Dismiss,
    ]
);

/// Source of "today", so tests can pin the date.
pub type TodayFn = Rc<dyn Fn() -> NaiveDate>;

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Entity backing a [`super::DatePicker`] or [`super::DateRangePicker`].
pub struct CalendarPickerState<S: SelectionMode> {
    pub focus_handle: FocusHandle,
    picker: CalendarPicker<S>,
    today: TodayFn,
    /// Where the month grid was last laid out. Pointer-downs outside the
    /// element are checked against it, since the popup overflows the trigger.
    pub(crate) popup_bounds: Option<Bounds<Pixels>>,
}

pub type DatePickerState = CalendarPickerState<SingleDate>;

pub type DateRangePickerState = CalendarPickerState<DateRange>;

impl<S: SelectionMode> CalendarPickerState<S> {
    pub fn new(cx: &mut App) -> Self {
        Self::with_config(PickerConfig::default(), cx)
    }

    pub fn with_config(config: PickerConfig, cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle().tab_stop(true),
            picker: CalendarPicker::new(config),
            today: Rc::new(local_today),
            popup_bounds: None,
        }
    }

    /// Marks dates that can't be focused or selected.
    pub fn disabled_date(mut self, disabled_date: impl Fn(NaiveDate) -> bool + 'static) -> Self {
        self.picker.set_disabled_date(Some(Rc::new(disabled_date)));
        self
    }

    pub fn today_fn(mut self, today: impl Fn() -> NaiveDate + 'static) -> Self {
        self.today = Rc::new(today);
        self
    }

    pub fn initial_value(mut self, value: S::Value) -> Self {
        self.picker.set_value(value);
        self
    }

    pub fn picker(&self) -> &CalendarPicker<S> {
        &self.picker
    }

    pub fn value(&self) -> S::Value {
        self.picker.value()
    }

    pub fn is_open(&self) -> bool {
        self.picker.is_open()
    }

    pub fn is_disabled(&self) -> bool {
        self.picker.is_disabled()
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    /// Replaces the selection from outside. No event is emitted.
    pub fn set_value(&mut self, value: S::Value, cx: &mut Context<Self>) {
        self.picker.set_value(value);
        cx.notify();
    }

    pub fn set_disabled(&mut self, disabled: bool, cx: &mut Context<Self>) {
        if self.picker.is_disabled() == disabled {
            return;
        }

        let events = self.picker.set_disabled(disabled);
        self.emit_all(events, cx);
        cx.notify();
    }

    pub fn open(&mut self, cx: &mut Context<Self>) {
        let events = self.picker.open(self.today());
        self.emit_all(events, cx);
    }

    pub fn close(&mut self, reason: CloseReason, cx: &mut Context<Self>) {
        let events = self.picker.close(reason);
        self.emit_all(events, cx);
    }

    pub fn toggle(&mut self, cx: &mut Context<Self>) {
        let events = self.picker.toggle(self.today());
        self.emit_all(events, cx);
    }

    pub fn handle_key(&mut self, key: GridKey, cx: &mut Context<Self>) {
        let events = self.picker.handle_key(key);
        self.emit_all(events, cx);
    }

    pub fn click_date(&mut self, date: NaiveDate, cx: &mut Context<Self>) {
        let events = self.picker.click_date(date);
        self.emit_all(events, cx);
    }

    pub fn select_today(&mut self, cx: &mut Context<Self>) {
        let events = self.picker.select_today(self.today());
        self.emit_all(events, cx);
    }

    pub fn show_previous_month(&mut self, cx: &mut Context<Self>) {
        let events = self.picker.show_previous_month();
        self.emit_all(events, cx);
    }

    pub fn show_next_month(&mut self, cx: &mut Context<Self>) {
        let events = self.picker.show_next_month();
        self.emit_all(events, cx);
    }

    pub fn move_left(&mut self, _: &MoveLeft, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(GridKey::Left, cx);
    }

    pub fn move_right(&mut self, _: &MoveRight, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(GridKey::Right, cx);
    }

    pub fn move_up(&mut self, _: &MoveUp, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(GridKey::Up, cx);
    }

    pub fn move_down(&mut self, _: &MoveDown, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(GridKey::Down, cx);
    }

    pub fn move_to_month_start(
        &mut self,
        _: &MoveToMonthStart,
        _: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.handle_key(GridKey::Home, cx);
    }

    pub fn move_to_month_end(&mut self, _: &MoveToMonthEnd, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(GridKey::End, cx);
    }

    pub fn previous_month(&mut self, _: &PreviousMonth, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(GridKey::PageUp, cx);
    }

    pub fn next_month(&mut self, _: &NextMonth, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(GridKey::PageDown, cx);
    }

    /// Enter or space: opens a closed picker, commits the cursor otherwise.
    pub fn commit(&mut self, _: &Commit, _: &mut Window, cx: &mut Context<Self>) {
        if self.is_open() {
            self.handle_key(GridKey::Commit, cx);
        } else {
            self.open(cx);
        }
    }

    pub fn dismiss(&mut self, _: &Dismiss, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(GridKey::Escape, cx);
    }

    pub fn dismiss_outside(
        &mut self,
        event: &MouseDownEvent,
        _: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let inside = self
            .popup_bounds
            .is_some_and(|bounds| bounds.contains(&event.position));

        let events = self.picker.pointer_down(inside);
        self.emit_all(events, cx);
    }

    pub fn trigger_clicked(&mut self, _: &ClickEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.focus_handle.focus(window, cx);
        self.toggle(cx);
    }

    fn emit_all(&mut self, events: PickerEvents<S::Value>, cx: &mut Context<Self>) {
        if events.is_empty() {
            return;
        }

        for event in events {
            cx.emit(event);
        }
        cx.notify();
    }
}

impl<S: SelectionMode> EventEmitter<PickerEvent<S::Value>> for CalendarPickerState<S> {}

impl<S: SelectionMode> Focusable for CalendarPickerState<S> {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

pub fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("left", MoveLeft, Some("DatePicker")),
        KeyBinding::new("right", MoveRight, Some("DatePicker")),
        KeyBinding::new("up", MoveUp, Some("DatePicker")),
        KeyBinding::new("down", MoveDown, Some("DatePicker")),
        KeyBinding::new("home", MoveToMonthStart, Some("DatePicker")),
        KeyBinding::new("end", MoveToMonthEnd, Some("DatePicker")),
        KeyBinding::new("pageup", PreviousMonth, Some("DatePicker")),
        KeyBinding::new("pagedown", NextMonth, Some("DatePicker")),
        KeyBinding::new("enter", Commit, Some("DatePicker")),
        KeyBinding::new("space", Commit, Some("DatePicker")),
        KeyBinding::new("escape", Dismiss, Some("DatePicker")),
    ]);
}
