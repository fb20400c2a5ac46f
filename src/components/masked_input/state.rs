use std::ops::Range;

use asterui_interaction::{
    config::MaskConfig,
    mask::{MaskError, MaskKey, MaskSpec, MaskedText},
};
use gpui::{
    App, Bounds, Context, EntityInputHandler, EventEmitter, FocusHandle, Focusable, KeyBinding,
    Pixels, ShapedLine, SharedString, UTF16Selection, Window, point,
};

mod actions {
    use gpui::actions;

    actions!(masked_input, [Backspace, Paste]);
}
pub use actions::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskedInputEvent {
    /// The masked display string after an edit.
    Changed(SharedString),
}

/// Entity backing a [`super::MaskedInput`].
pub struct MaskedInputState {
    pub focus_handle: FocusHandle,
    text: MaskedText,
    disabled: bool,
    pub(crate) last_layout: Option<ShapedLine>,
    pub(crate) last_bounds: Option<Bounds<Pixels>>,
}

impl MaskedInputState {
    pub fn new(mask: MaskSpec, cx: &mut App) -> Self {
        Self::from_text(MaskedText::new(mask), cx)
    }

    pub fn from_config(config: &MaskConfig, cx: &mut App) -> Result<Self, MaskError> {
        Ok(Self::from_text(config.build()?, cx))
    }

    pub fn from_text(text: MaskedText, cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle().tab_stop(true),
            text,
            disabled: false,
            last_layout: None,
            last_bounds: None,
        }
    }

    pub fn initial_value(mut self, display: &str) -> Self {
        self.text.set_value(display);
        self
    }

    pub fn text(&self) -> &MaskedText {
        &self.text
    }

    /// The masked display string, placeholders included.
    pub fn value(&self) -> SharedString {
        self.text.display().into()
    }

    /// Only the characters typed into slots.
    pub fn raw_value(&self) -> SharedString {
        self.text.raw().into()
    }

    pub fn is_complete(&self) -> bool {
        self.text.is_complete()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// A disabled input drops edits and can't take focus.
    pub fn set_disabled(&mut self, disabled: bool, cx: &mut Context<Self>) {
        self.disabled = disabled;
        cx.notify();
    }

    /// Replaces the value from outside. No event is emitted.
    pub fn set_value(&mut self, display: &str, cx: &mut Context<Self>) {
        self.text.set_value(display);
        cx.notify();
    }

    /// Feeds one edit through the mask, emitting [`MaskedInputEvent::Changed`]
    /// when the value changed.
    pub fn ingest(&mut self, key: MaskKey<'_>, cx: &mut Context<Self>) -> bool {
        if self.disabled {
            return false;
        }

        let changed = self.text.ingest(key);
        if changed {
            self.emit_changed(cx);
        }

        changed
    }

    pub fn clear(&mut self, cx: &mut Context<Self>) -> bool {
        let cleared = !self.disabled && self.text.clear();
        if cleared {
            self.emit_changed(cx);
        }

        cleared
    }

    pub fn backspace(&mut self, _: &Backspace, _: &mut Window, cx: &mut Context<Self>) {
        self.ingest(MaskKey::Backspace, cx);
    }

    pub fn paste(&mut self, _: &Paste, _: &mut Window, cx: &mut Context<Self>) {
        match cx.read_from_clipboard().and_then(|item| item.text()) {
            Some(text) => {
                self.ingest(MaskKey::Text(&text), cx);
            }
            None => log::trace!("nothing to paste into masked input"),
        }
    }

    /// Byte offset of the caret within [`Self::value`].
    pub fn caret_offset(&self) -> usize {
        let display = self.text.display();

        display
            .char_indices()
            .nth(self.text.caret())
            .map_or(display.len(), |(offset, _)| offset)
    }

    fn emit_changed(&mut self, cx: &mut Context<Self>) {
        cx.emit(MaskedInputEvent::Changed(self.value()));
        cx.notify();
    }

    fn offset_from_utf16(&self, offset: usize) -> usize {
        let mut utf8_offset = 0;
        let mut utf16_count = 0;

        for ch in self.value().chars() {
            if utf16_count >= offset {
                break;
            }
            utf16_count += ch.len_utf16();
            utf8_offset += ch.len_utf8();
        }

        utf8_offset
    }

    fn offset_to_utf16(&self, offset: usize) -> usize {
        let mut utf16_offset = 0;
        let mut utf8_count = 0;

        for ch in self.value().chars() {
            if utf8_count >= offset {
                break;
            }
            utf8_count += ch.len_utf8();
            utf16_offset += ch.len_utf16();
        }

        utf16_offset
    }

    fn range_to_utf16(&self, range: &Range<usize>) -> Range<usize> {
        self.offset_to_utf16(range.start)..self.offset_to_utf16(range.end)
    }

    fn range_from_utf16(&self, range_utf16: &Range<usize>) -> Range<usize> {
        self.offset_from_utf16(range_utf16.start)..self.offset_from_utf16(range_utf16.end)
    }
}

impl EventEmitter<MaskedInputEvent> for MaskedInputState {}

impl Focusable for MaskedInputState {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

/// Typed characters and IME commits arrive here. A single character is a
/// keystroke for the slot under the caret; longer commits are treated like a
/// paste. The replacement range reported by the platform is ignored.
impl EntityInputHandler for MaskedInputState {
    fn text_for_range(
        &mut self,
        range_utf16: Range<usize>,
        actual_range: &mut Option<Range<usize>>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<String> {
        let value = self.value();
        let range = self.range_from_utf16(&range_utf16);
        let range = range.start.min(value.len())..range.end.min(value.len());

        actual_range.replace(self.range_to_utf16(&range));
        Some(value[range].to_string())
    }

    fn selected_text_range(
        &mut self,
        _ignore_disabled_input: bool,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<UTF16Selection> {
        let caret = self.offset_to_utf16(self.caret_offset());

        Some(UTF16Selection {
            range: caret..caret,
            reversed: false,
        })
    }

    fn marked_text_range(
        &self,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<Range<usize>> {
        None
    }

    fn unmark_text(&mut self, _window: &mut Window, _cx: &mut Context<Self>) {}

    fn replace_text_in_range(
        &mut self,
        _range_utf16: Option<Range<usize>>,
        new_text: &str,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let mut chars = new_text.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => MaskKey::Char(c),
            _ => MaskKey::Text(new_text),
        };

        self.ingest(key, cx);
    }

    // Compositions only reach the mask once they're committed.
    fn replace_and_mark_text_in_range(
        &mut self,
        _range_utf16: Option<Range<usize>>,
        _new_text: &str,
        _new_selected_range_utf16: Option<Range<usize>>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) {
    }

    fn bounds_for_range(
        &mut self,
        range_utf16: Range<usize>,
        bounds: Bounds<Pixels>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<Bounds<Pixels>> {
        let range = self.range_from_utf16(&range_utf16);
        let last_layout = self.last_layout.as_ref()?;

        Some(Bounds::from_corners(
            point(bounds.left() + last_layout.x_for_index(range.start), bounds.top()),
            point(bounds.left() + last_layout.x_for_index(range.end), bounds.bottom()),
        ))
    }

    fn character_index_for_point(
        &mut self,
        point: gpui::Point<Pixels>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<usize> {
        let line_point = self.last_bounds?.localize(&point)?;
        let last_layout = self.last_layout.as_ref()?;
        let utf8_index = last_layout.index_for_x(point.x - line_point.x)?;

        Some(self.offset_to_utf16(utf8_index))
    }
}

pub fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("backspace", Backspace, Some("MaskedInput")),
        KeyBinding::new("cmd-v", Paste, Some("MaskedInput")),
        KeyBinding::new("ctrl-v", Paste, Some("MaskedInput")),
    ]);
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use gpui::{AppContext, Entity, TestAppContext};

    use super::*;

    fn phone_state(cx: &mut TestAppContext) -> Entity<MaskedInputState> {
        cx.new(|cx| MaskedInputState::new(MaskSpec::parse("(###) ###-####").unwrap(), cx))
    }

    fn record_events(
        state: &Entity<MaskedInputState>,
        cx: &mut TestAppContext,
    ) -> Rc<RefCell<Vec<MaskedInputEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));

        cx.update(|cx| {
            let events = events.clone();
            cx.subscribe(state, move |_, event: &MaskedInputEvent, _| {
                events.borrow_mut().push(event.clone());
            })
            .detach();
        });

        events
    }

    #[gpui::test]
    fn test_typing_fills_mask(cx: &mut TestAppContext) {
        let state = phone_state(cx);
        let events = record_events(&state, cx);

        state.update(cx, |state, cx| {
            for c in "5551234567".chars() {
                state.ingest(MaskKey::Char(c), cx);
            }
        });

        state.read_with(cx, |state, _| {
            assert_eq!(state.value().to_string(), "(555) 123-4567");
            assert_eq!(state.raw_value().to_string(), "5551234567");
            assert!(state.is_complete());
            assert_eq!(state.caret_offset(), "(555) 123-4567".len());
        });
        assert_eq!(events.borrow().len(), 10);
        assert_eq!(
            events.borrow().last(),
            Some(&MaskedInputEvent::Changed("(555) 123-4567".into()))
        );
    }

    #[gpui::test]
    fn test_rejected_input_emits_nothing(cx: &mut TestAppContext) {
        let state = phone_state(cx);
        let events = record_events(&state, cx);

        let changed = state.update(cx, |state, cx| state.ingest(MaskKey::Char('x'), cx));

        assert!(!changed);
        assert!(events.borrow().is_empty());
        state.read_with(cx, |state, _| assert_eq!(state.value().to_string(), "(___) ___-____"));
    }

    #[gpui::test]
    fn test_backspace_on_empty(cx: &mut TestAppContext) {
        let state = phone_state(cx);
        let events = record_events(&state, cx);

        state.update(cx, |state, cx| {
            state.ingest(MaskKey::Backspace, cx);
        });

        assert!(events.borrow().is_empty());
        state.read_with(cx, |state, _| assert_eq!(state.caret_offset(), 1));
    }

    #[gpui::test]
    fn test_disabled_input_ignores_edits(cx: &mut TestAppContext) {
        let state = phone_state(cx);

        state.update(cx, |state, cx| {
            state.set_disabled(true, cx);
            assert!(!state.ingest(MaskKey::Text("555"), cx));
        });

        state.read_with(cx, |state, _| assert_eq!(state.raw_value().to_string(), ""));
    }

    #[gpui::test]
    fn test_controlled_value(cx: &mut TestAppContext) {
        let state = phone_state(cx);
        let events = record_events(&state, cx);

        state.update(cx, |state, cx| state.set_value("(555) 12_-____", cx));

        assert!(events.borrow().is_empty(), "Controlled updates don't emit");
        state.read_with(cx, |state, _| {
            assert_eq!(state.raw_value().to_string(), "55512");
            assert_eq!(state.caret_offset(), "(555) 12".len());
        });

        state.update(cx, |state, cx| {
            assert!(state.clear(cx));
            assert!(!state.clear(cx));
        });
        assert_eq!(
            events.borrow().as_slice(),
            &[MaskedInputEvent::Changed("(___) ___-____".into())]
        );
    }

    #[gpui::test]
    fn test_from_config(cx: &mut TestAppContext) {
        let config: MaskConfig =
            serde_json::from_str(r#"{ "mask": "AA-##", "placeholder": "." }"#).unwrap();
        let state = cx.new(|cx| MaskedInputState::from_config(&config, cx).unwrap());

        state.read_with(cx, |state, _| assert_eq!(state.value().to_string(), "..-.."));
    }
}
