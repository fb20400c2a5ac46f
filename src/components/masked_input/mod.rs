use gpui::{
    App, Bounds, CursorStyle, Element, ElementId, ElementInputHandler, Entity, FocusHandle,
    Focusable, GlobalElementId, Hsla, InspectorElementId, InteractiveElement, IntoElement,
    LayoutId, MouseButton, PaintQuad, ParentElement, Pixels, Refineable, RenderOnce, ShapedLine,
    SharedString, Style, StyleRefinement, Styled, TextRun, Window, div, fill, point,
    prelude::FluentBuilder, px, relative, size,
};

use crate::utils::Palette;

mod state;
pub use state::*;

/// A single-line input whose text is shaped by a mask pattern.
#[derive(IntoElement)]
pub struct MaskedInput {
    id: ElementId,
    state: Entity<MaskedInputState>,
    palette: Palette,
    style: StyleRefinement,
}

impl Styled for MaskedInput {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl MaskedInput {
    pub fn new(id: impl Into<ElementId>, state: Entity<MaskedInputState>) -> Self {
        Self {
            id: id.into(),
            state,
            palette: Palette::default(),
            style: StyleRefinement::default(),
        }
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn read_value(&self, cx: &App) -> SharedString {
        self.state.read(cx).value()
    }
}

impl Focusable for MaskedInput {
    fn focus_handle(&self, cx: &App) -> FocusHandle {
        self.state.read(cx).focus_handle.clone()
    }
}

impl RenderOnce for MaskedInput {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let text_style = &self.style.text;
        let line_height = text_style
            .line_height
            .map(|this| {
                this.to_pixels(
                    text_style
                        .font_size
                        .unwrap_or_else(|| window.text_style().font_size),
                    window.rem_size(),
                )
            })
            .unwrap_or_else(|| window.line_height());

        let (focus_handle, disabled) = {
            let state = self.state.read(cx);
            (state.focus_handle.clone(), state.is_disabled())
        };
        let is_focused = focus_handle.is_focused(window);
        let palette = self.palette;

        div()
            .id(self.id.clone())
            .map(|mut this| {
                this.style().refine(&self.style);
                this
            })
            .key_context("MaskedInput")
            .when(!disabled, |this| this.track_focus(&focus_handle))
            .cursor(if disabled {
                CursorStyle::OperationNotAllowed
            } else {
                CursorStyle::IBeam
            })
            .px_2()
            .py_1()
            .border_1()
            .border_color(if is_focused {
                palette.focus_border
            } else {
                palette.border
            })
            .bg(palette.background)
            .on_action(window.listener_for(&self.state, MaskedInputState::backspace))
            .on_action(window.listener_for(&self.state, MaskedInputState::paste))
            .when(!disabled, |this| {
                let focus_handle = focus_handle.clone();
                this.on_mouse_down(MouseButton::Left, move |_, window, cx| {
                    focus_handle.focus(window, cx)
                })
            })
            .child(MaskedTextElement {
                input: self.state,
                text_color: if disabled {
                    palette.disabled_text
                } else {
                    palette.text
                },
                placeholder_color: palette.muted_text,
                line_height,
                show_caret: is_focused && !disabled,
            })
    }
}

/// Paints the masked string and registers the platform input handler.
struct MaskedTextElement {
    input: Entity<MaskedInputState>,
    text_color: Hsla,
    placeholder_color: Hsla,
    line_height: Pixels,
    show_caret: bool,
}

struct PrepaintState {
    line: Option<ShapedLine>,
    caret: Option<PaintQuad>,
}

impl IntoElement for MaskedTextElement {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

impl Element for MaskedTextElement {
    type RequestLayoutState = ();
    type PrepaintState = PrepaintState;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let mut style = Style::default();
        style.size.width = relative(1.).into();
        style.size.height = self.line_height.into();

        (window.request_layout(style, [], cx), ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        window: &mut Window,
        cx: &mut App,
    ) -> Self::PrepaintState {
        let input = self.input.read(cx);
        let display = input.value();
        let caret = input.caret_offset();
        let style = window.text_style();

        // Everything up to the caret is typed or a literal between typed
        // characters; the rest still shows placeholders.
        let run = TextRun {
            len: caret,
            font: style.font(),
            color: self.text_color,
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let runs: Vec<TextRun> = [
            run.clone(),
            TextRun {
                len: display.len() - caret,
                color: self.placeholder_color,
                ..run
            },
        ]
        .into_iter()
        .filter(|run| run.len > 0)
        .collect();

        let font_size = style.font_size.to_pixels(window.rem_size());
        let line = window
            .text_system()
            .shape_line(display, font_size, &runs, None);

        let height = bounds.bottom() - bounds.top();
        let caret_height = height * 0.8;
        let caret = fill(
            Bounds::new(
                point(
                    bounds.left() + line.x_for_index(caret),
                    bounds.top() + (height - caret_height) / 2.,
                ),
                size(px(1.), caret_height),
            ),
            self.text_color,
        );

        PrepaintState {
            line: Some(line),
            caret: Some(caret),
        }
    }

    fn paint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        cx: &mut App,
    ) {
        let focus_handle = self.input.read(cx).focus_handle.clone();

        window.handle_input(
            &focus_handle,
            ElementInputHandler::new(bounds, self.input.clone()),
            cx,
        );

        let Some(line) = prepaint.line.take() else {
            return;
        };

        if let Err(err) = line.paint(
            bounds.origin,
            self.line_height,
            gpui::TextAlign::Left,
            None,
            window,
            cx,
        ) {
            log::warn!("failed to paint masked input text: {err}");
        }

        if self.show_caret
            && let Some(caret) = prepaint.caret.take()
        {
            window.paint_quad(caret);
        }

        self.input.update(cx, |input, _cx| {
            input.last_layout = Some(line);
            input.last_bounds = Some(bounds);
        });
    }
}

pub fn init(cx: &mut App) {
    state::init(cx);
}
