use asterui_interaction::{
    calendar::CloseReason,
    config::TimePickerConfig,
    time::{TimeColumn, TimeColumnPicker, TimeKey, TimePickerEvent, TimePickerEvents},
};
use chrono::NaiveTime;
use gpui::{
    App, Bounds, ClickEvent, Context, EventEmitter, FocusHandle, Focusable, KeyBinding,
    MouseDownEvent, Pixels, Window, actions,
};

actions!(
    time_picker,
    [
        PreviousValue,
        NextValue,
        PreviousColumn,
        NextColumn,
        Confirm,
        Dismiss,
    ]
);

pub struct TimePickerState {
    pub focus_handle: FocusHandle,
    picker: TimeColumnPicker,
    /// Where the columns were last laid out, for the outside-pointer check.
    pub(crate) popup_bounds: Option<Bounds<Pixels>>,
}

impl TimePickerState {
    pub fn new(cx: &mut App) -> Self {
        Self::with_config(TimePickerConfig::default(), cx)
    }

    pub fn with_config(config: TimePickerConfig, cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle().tab_stop(true),
            picker: TimeColumnPicker::new(config),
            popup_bounds: None,
        }
    }

    pub fn initial_value(mut self, value: Option<NaiveTime>) -> Self {
        self.picker.set_value(value);
        self
    }

    pub fn picker(&self) -> &TimeColumnPicker {
        &self.picker
    }

    pub fn value(&self) -> Option<NaiveTime> {
        self.picker.value()
    }

    pub fn is_open(&self) -> bool {
        self.picker.is_open()
    }

    pub fn is_disabled(&self) -> bool {
        self.picker.is_disabled()
    }

    /// Replaces the value from outside. No event is emitted.
    pub fn set_value(&mut self, value: Option<NaiveTime>, cx: &mut Context<Self>) {
        self.picker.set_value(value);
        cx.notify();
    }

    pub fn set_config(&mut self, config: TimePickerConfig, cx: &mut Context<Self>) {
        self.picker.set_config(config);
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
        let events = self.picker.open();
        self.emit_all(events, cx);
    }

    pub fn close(&mut self, reason: CloseReason, cx: &mut Context<Self>) {
        let events = self.picker.close(reason);
        self.emit_all(events, cx);
    }

    pub fn toggle(&mut self, cx: &mut Context<Self>) {
        let events = self.picker.toggle();
        self.emit_all(events, cx);
    }

    pub fn handle_key(&mut self, key: TimeKey, cx: &mut Context<Self>) {
        let events = self.picker.handle_key(key);
        self.emit_all(events, cx);
        cx.notify();
    }

    /// An item was clicked: focuses its column and commits the value.
    pub fn select(&mut self, column: TimeColumn, value: u32, cx: &mut Context<Self>) {
        self.picker.focus_column(column);
        let events = self.picker.select(column, value);
        self.emit_all(events, cx);
        cx.notify();
    }

    pub fn clear(&mut self, cx: &mut Context<Self>) {
        let events = self.picker.clear();
        self.emit_all(events, cx);
    }

    pub fn previous_value(&mut self, _: &PreviousValue, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(TimeKey::Up, cx);
    }

    pub fn next_value(&mut self, _: &NextValue, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(TimeKey::Down, cx);
    }

    pub fn previous_column(&mut self, _: &PreviousColumn, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(TimeKey::Left, cx);
    }

    pub fn next_column(&mut self, _: &NextColumn, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(TimeKey::Right, cx);
    }

    /// Enter or space: opens a closed picker, closes an open one.
    pub fn confirm(&mut self, _: &Confirm, _: &mut Window, cx: &mut Context<Self>) {
        if self.is_open() {
            self.handle_key(TimeKey::Confirm, cx);
        } else {
            self.open(cx);
        }
    }

    pub fn dismiss(&mut self, _: &Dismiss, _: &mut Window, cx: &mut Context<Self>) {
        self.handle_key(TimeKey::Escape, cx);
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

    pub fn clear_clicked(&mut self, _: &ClickEvent, _: &mut Window, cx: &mut Context<Self>) {
        self.clear(cx);
    }

    fn emit_all(&mut self, events: TimePickerEvents, cx: &mut Context<Self>) {
        if events.is_empty() {
            return;
        }

        for event in events {
            cx.emit(event);
        }
        cx.notify();
    }
}

impl EventEmitter<TimePickerEvent> for TimePickerState {}

impl Focusable for TimePickerState {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

pub fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("up", PreviousValue, Some("TimePicker")),
        KeyBinding::new("down", NextValue, Some("TimePicker")),
        KeyBinding::new("left", PreviousColumn, Some("TimePicker")),
        KeyBinding::new("right", NextColumn, Some("TimePicker")),
        KeyBinding::new("enter", Confirm, Some("TimePicker")),
        KeyBinding::new("space", Confirm, Some("TimePicker")),
        KeyBinding::new("escape", Dismiss, Some("TimePicker")),
    ]);
}
