use asterui_interaction::{
    calendar::{DateRange, SelectionMode, SingleDate},
    format::{format_date, format_range},
};
use chrono::{Month, NaiveDate};
use gpui::{
    AnyElement, App, CursorStyle, ElementId, Entity, FocusHandle, Focusable, FontWeight,
    InteractiveElement, IntoElement, ParentElement, Refineable, RenderOnce, SharedString,
    StatefulInteractiveElement, StyleRefinement, Styled, Window, canvas, deferred, div,
    prelude::FluentBuilder,
};

use crate::utils::{ElementIdExt, Palette, TestSelectorExt};

mod state;
pub use state::*;

/// Turns a selection into the text shown on the trigger.
pub trait SelectionLabel: SelectionMode {
    /// `None` when nothing is selected, so the placeholder shows instead.
    fn label(&self, pattern: &str) -> Option<String>;
}

impl SelectionLabel for SingleDate {
    fn label(&self, pattern: &str) -> Option<String> {
        self.0.map(|date| format_date(date, pattern))
    }
}

impl SelectionLabel for DateRange {
    fn label(&self, pattern: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        Some(format_range(self, pattern))
    }
}

/// A trigger that opens a month grid for picking a date.
#[derive(IntoElement)]
pub struct DatePicker<S: SelectionLabel = SingleDate> {
    id: ElementId,
    state: Entity<CalendarPickerState<S>>,
    placeholder: SharedString,
    palette: Palette,
    style: StyleRefinement,
}

/// Same element, committing a start and an end date.
pub type DateRangePicker = DatePicker<DateRange>;

impl<S: SelectionLabel> Styled for DatePicker<S> {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl<S: SelectionLabel> DatePicker<S> {
    pub fn new(id: impl Into<ElementId>, state: Entity<CalendarPickerState<S>>) -> Self {
        Self {
            id: id.into(),
            state,
            placeholder: "Select a date".into(),
            palette: Palette::default(),
            style: StyleRefinement::default(),
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn read_value(&self, cx: &App) -> S::Value {
        self.state.read(cx).value()
    }
}

impl<S: SelectionLabel> Focusable for DatePicker<S> {
    fn focus_handle(&self, cx: &App) -> FocusHandle {
        self.state.read(cx).focus_handle.clone()
    }
}

#[derive(Clone, Copy)]
struct DayCell {
    date: NaiveDate,
    disabled: bool,
    selected: bool,
    in_range: bool,
    focused: bool,
    today: bool,
}

struct MonthSnapshot {
    title: SharedString,
    weekdays: Vec<SharedString>,
    weeks: Vec<[Option<DayCell>; 7]>,
}

fn month_title(year: i32, month: u32) -> SharedString {
    match u8::try_from(month).ok().and_then(|month| Month::try_from(month).ok()) {
        Some(month) => format!("{} {year}", month.name()).into(),
        None => year.to_string().into(),
    }
}

impl<S: SelectionLabel> RenderOnce for DatePicker<S> {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let (focus_handle, disabled, label, snapshot) = {
            let state = self.state.read(cx);
            let today = state.today();
            let picker = state.picker();
            let selection = picker.selection();
            let cursor = picker.cursor();

            let snapshot = picker.grid().map(|grid| {
                let view = grid.view();

                MonthSnapshot {
                    title: month_title(view.year(), view.month()),
                    weekdays: grid
                        .weekdays()
                        .map(|weekday| weekday.to_string().into())
                        .collect(),
                    weeks: grid
                        .weeks()
                        .into_iter()
                        .map(|week| {
                            week.map(|cell| {
                                cell.date().map(|date| DayCell {
                                    date,
                                    disabled: picker.is_date_disabled(date),
                                    selected: selection.is_selected(date),
                                    in_range: selection.contains(date),
                                    focused: cursor == Some(date),
                                    today: date == today,
                                })
                            })
                        })
                        .collect(),
                }
            });

            (
                state.focus_handle.clone(),
                state.is_disabled(),
                selection.label(&picker.config().date_format),
                snapshot,
            )
        };

        let palette = self.palette;
        let is_focused = focus_handle.is_focused(window);

        let trigger = div()
            .id(self.id.with_suffix("trigger"))
            .test_selector(|| "date-picker-trigger".into())
            .px_2()
            .py_1()
            .border_1()
            .border_color(if is_focused {
                palette.focus_border
            } else {
                palette.border
            })
            .bg(palette.background)
            .cursor(if disabled {
                CursorStyle::OperationNotAllowed
            } else {
                CursorStyle::PointingHand
            })
            .map(|this| match label {
                Some(label) => this
                    .text_color(if disabled {
                        palette.disabled_text
                    } else {
                        palette.text
                    })
                    .child(label),
                None => this
                    .text_color(palette.muted_text)
                    .child(self.placeholder.clone()),
            })
            .when(!disabled, |this| {
                this.on_click(window.listener_for(&self.state, CalendarPickerState::trigger_clicked))
            });

        div()
            .id(self.id.clone())
            .map(|mut this| {
                this.style().refine(&self.style);
                this
            })
            .relative()
            .key_context("DatePicker")
            .when(!disabled, |this| this.track_focus(&focus_handle))
            .on_action(window.listener_for(&self.state, CalendarPickerState::move_left))
            .on_action(window.listener_for(&self.state, CalendarPickerState::move_right))
            .on_action(window.listener_for(&self.state, CalendarPickerState::move_up))
            .on_action(window.listener_for(&self.state, CalendarPickerState::move_down))
            .on_action(window.listener_for(&self.state, CalendarPickerState::move_to_month_start))
            .on_action(window.listener_for(&self.state, CalendarPickerState::move_to_month_end))
            .on_action(window.listener_for(&self.state, CalendarPickerState::previous_month))
            .on_action(window.listener_for(&self.state, CalendarPickerState::next_month))
            .on_action(window.listener_for(&self.state, CalendarPickerState::commit))
            .on_action(window.listener_for(&self.state, CalendarPickerState::dismiss))
            .child(trigger)
            .when_some(snapshot, |this, snapshot| {
                this.on_mouse_down_out(
                    window.listener_for(&self.state, CalendarPickerState::dismiss_outside),
                )
                .child(
                    div().absolute().top_full().left_0().pt_1().child(
                        deferred(
                            div()
                                .occlude()
                                .child(render_month(&self.id, &self.state, snapshot, &palette))
                                .child(record_popup_bounds(self.state.clone())),
                        )
                        .priority(1),
                    ),
                )
            })
    }
}

/// Keeps the popup's bounds on the state for the outside-pointer check.
fn record_popup_bounds<S: SelectionLabel>(
    state: Entity<CalendarPickerState<S>>,
) -> impl IntoElement {
    canvas(
        move |bounds, _window, cx| {
            state.update(cx, |state, _cx| state.popup_bounds = Some(bounds));
        },
        |_, _, _, _| {},
    )
    .absolute()
    .size_full()
}

fn render_month<S: SelectionLabel>(
    id: &ElementId,
    state: &Entity<CalendarPickerState<S>>,
    snapshot: MonthSnapshot,
    palette: &Palette,
) -> impl IntoElement {
    let header = div()
        .flex()
        .items_center()
        .justify_between()
        .child(month_button(id.with_suffix("previous-month"), "‹", "previous-month", palette, {
            let state = state.clone();
            move |cx: &mut App| state.update(cx, |state, cx| state.show_previous_month(cx))
        }))
        .child(div().text_color(palette.text).child(snapshot.title))
        .child(month_button(id.with_suffix("next-month"), "›", "next-month", palette, {
            let state = state.clone();
            move |cx: &mut App| state.update(cx, |state, cx| state.show_next_month(cx))
        }));

    let weekdays = div().flex().children(snapshot.weekdays.into_iter().map(|weekday| {
        div()
            .size_8()
            .flex()
            .items_center()
            .justify_center()
            .text_xs()
            .text_color(palette.muted_text)
            .child(weekday)
    }));

    let weeks = snapshot.weeks.into_iter().map(|week| {
        div().flex().children(week.into_iter().map(|cell| match cell {
            Some(day) => render_day(id, state, day, palette),
            None => div().size_8().into_any_element(),
        }))
    });

    let today = div()
        .id(id.with_suffix("today"))
        .test_selector(|| "today".into())
        .mt_1()
        .px_2()
        .py_1()
        .cursor_pointer()
        .text_color(palette.focus_border)
        .on_click({
            let state = state.clone();
            move |_, _window, cx| state.update(cx, |state, cx| state.select_today(cx))
        })
        .child("Today");

    div()
        .flex()
        .flex_col()
        .p_2()
        .gap_1()
        .border_1()
        .border_color(palette.border)
        .bg(palette.popover)
        .child(header)
        .child(weekdays)
        .children(weeks)
        .child(today)
}

fn month_button(
    id: ElementId,
    label: &'static str,
    selector: &'static str,
    palette: &Palette,
    on_click: impl Fn(&mut App) + 'static,
) -> impl IntoElement {
    div()
        .id(id)
        .test_selector(|| selector.into())
        .size_8()
        .flex()
        .items_center()
        .justify_center()
        .cursor_pointer()
        .text_color(palette.muted_text)
        .on_click(move |_, _window, cx| on_click(cx))
        .child(label)
}

fn render_day<S: SelectionLabel>(
    id: &ElementId,
    state: &Entity<CalendarPickerState<S>>,
    day: DayCell,
    palette: &Palette,
) -> AnyElement {
    let date = day.date;

    div()
        .id(id.with_date(date))
        .test_selector(|| format!("day-{date}"))
        .size_8()
        .flex()
        .items_center()
        .justify_center()
        .text_color(if day.disabled {
            palette.disabled_text
        } else {
            palette.text
        })
        .when(day.in_range, |this| this.bg(palette.in_range))
        .when(day.selected, |this| this.bg(palette.selected))
        .when(day.focused, |this| {
            this.border_1().border_color(palette.cursor)
        })
        .when(day.today, |this| this.font_weight(FontWeight::BOLD))
        .map(|this| {
            if day.disabled {
                this.cursor(CursorStyle::OperationNotAllowed)
            } else {
                let state = state.clone();
                this.cursor_pointer().on_click(move |_, _window, cx| {
                    state.update(cx, |state, cx| state.click_date(date, cx))
                })
            }
        })
        .child(SharedString::from(date.format("%-d").to_string()))
        .into_any_element()
}

pub fn init(cx: &mut App) {
    state::init(cx);
}
