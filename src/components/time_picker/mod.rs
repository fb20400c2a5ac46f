use asterui_interaction::{
    format::format_time,
    time::{Period, TimeColumn},
};
use gpui::{
    App, CursorStyle, ElementId, Entity, FocusHandle, Focusable, InteractiveElement, IntoElement,
    ParentElement, Refineable, RenderOnce, SharedString, StatefulInteractiveElement,
    StyleRefinement, Styled, Window, canvas, deferred, div, prelude::FluentBuilder, px,
};

use crate::utils::{ElementIdExt, Palette, TestSelectorExt};

mod state;
pub use state::*;

/// A trigger showing the chosen time, with a popup of one column per
/// time component.
#[derive(IntoElement)]
pub struct TimePicker {
    id: ElementId,
    state: Entity<TimePickerState>,
    placeholder: SharedString,
    palette: Palette,
    style: StyleRefinement,
}

impl Styled for TimePicker {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl TimePicker {
    pub fn new(id: impl Into<ElementId>, state: Entity<TimePickerState>) -> Self {
        Self {
            id: id.into(),
            state,
            placeholder: "Select a time".into(),
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
}

impl Focusable for TimePicker {
    fn focus_handle(&self, cx: &App) -> FocusHandle {
        self.state.read(cx).focus_handle.clone()
    }
}

struct ColumnSnapshot {
    column: TimeColumn,
    items: Vec<u32>,
    current: u32,
    focused: bool,
}

fn item_label(column: TimeColumn, value: u32) -> SharedString {
    match column {
        TimeColumn::Period if value < Period::Pm.hour_offset() => Period::Am.label().into(),
        TimeColumn::Period => Period::Pm.label().into(),
        _ => format!("{value:02}").into(),
    }
}

impl RenderOnce for TimePicker {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let (focus_handle, disabled, label, columns) = {
            let state = self.state.read(cx);
            let picker = state.picker();
            let config = picker.config();

            let label = state
                .value()
                .map(|value| format_time(value, config.format, config.show_seconds));

            let columns: Option<Vec<ColumnSnapshot>> = picker.is_open().then(|| {
                picker
                    .columns()
                    .into_iter()
                    .map(|column| ColumnSnapshot {
                        column,
                        items: picker.column_items(column),
                        current: picker.column_value(column),
                        focused: picker.focused_column() == column,
                    })
                    .collect()
            });

            (
                state.focus_handle.clone(),
                state.is_disabled(),
                label,
                columns,
            )
        };

        let palette = self.palette;
        let is_focused = focus_handle.is_focused(window);
        let has_value = label.is_some();

        let trigger = div()
            .id(self.id.with_suffix("trigger"))
            .test_selector(|| "time-picker-trigger".into())
            .flex_1()
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
                this.on_click(window.listener_for(&self.state, TimePickerState::trigger_clicked))
            });

        let field = div()
            .flex()
            .items_center()
            .gap_1()
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
            .child(trigger)
            .when(has_value && !disabled, |this| {
                this.child(
                    div()
                        .id(self.id.with_suffix("clear"))
                        .test_selector(|| "time-picker-clear".into())
                        .text_color(palette.muted_text)
                        .on_click(window.listener_for(&self.state, TimePickerState::clear_clicked))
                        .child("×"),
                )
            });

        div()
            .id(self.id.clone())
            .map(|mut this| {
                this.style().refine(&self.style);
                this
            })
            .relative()
            .key_context("TimePicker")
            .when(!disabled, |this| this.track_focus(&focus_handle))
            .on_action(window.listener_for(&self.state, TimePickerState::previous_value))
            .on_action(window.listener_for(&self.state, TimePickerState::next_value))
            .on_action(window.listener_for(&self.state, TimePickerState::previous_column))
            .on_action(window.listener_for(&self.state, TimePickerState::next_column))
            .on_action(window.listener_for(&self.state, TimePickerState::confirm))
            .on_action(window.listener_for(&self.state, TimePickerState::dismiss))
            .child(field)
            .when_some(columns, |this, columns| {
                this.on_mouse_down_out(
                    window.listener_for(&self.state, TimePickerState::dismiss_outside),
                )
                .child(
                    div().absolute().top_full().left_0().pt_1().child(
                        deferred(
                            div()
                                .occlude()
                                .flex()
                                .gap_1()
                                .p_1()
                                .border_1()
                                .border_color(palette.border)
                                .bg(palette.popover)
                                .children(columns.into_iter().map(|column| {
                                    render_column(&self.id, &self.state, column, &palette)
                                }))
                                .child(record_popup_bounds(self.state.clone())),
                        )
                        .priority(1),
                    ),
                )
            })
    }
}

fn record_popup_bounds(state: Entity<TimePickerState>) -> impl IntoElement {
    canvas(
        move |bounds, _window, cx| {
            state.update(cx, |state, _cx| state.popup_bounds = Some(bounds));
        },
        |_, _, _, _| {},
    )
    .absolute()
    .size_full()
}

fn render_column(
    id: &ElementId,
    state: &Entity<TimePickerState>,
    snapshot: ColumnSnapshot,
    palette: &Palette,
) -> impl IntoElement {
    let column = snapshot.column;

    div()
        .id(id.with_suffix(format!("column:{}", column.label())))
        .flex()
        .flex_col()
        .h(px(180.))
        .overflow_y_scroll()
        .border_1()
        .border_color(if snapshot.focused {
            palette.focus_border
        } else {
            palette.border
        })
        .children(snapshot.items.into_iter().map(|value| {
            let selected = value == snapshot.current;

            div()
                .id(id.with_suffix(format!("{}:{value}", column.label())))
                .test_selector(|| format!("{}-{value}", column.label()))
                .px_2()
                .cursor_pointer()
                .text_color(palette.text)
                .when(selected, |this| this.bg(palette.selected))
                .on_click({
                    let state = state.clone();
                    move |_, _window, cx| state.update(cx, |state, cx| state.select(column, value, cx))
                })
                .child(item_label(column, value))
        }))
}

pub fn init(cx: &mut App) {
    state::init(cx);
}
