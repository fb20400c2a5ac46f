use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

use super::{DEFAULT_PLACEHOLDER, MaskError, MaskSpec, MaskToken, apply_mask, extract_raw};

/// A single editing input fed to [`MaskedText::ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKey<'a> {
    /// A typed character.
    Char(char),
    /// Pasted or IME-committed text, ingested as if typed.
    Text(&'a str),
    Backspace,
}

/// Accepted characters plus the caret position in the rendered string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskState {
    raw: SmallVec<[char; 16]>,
    caret: usize,
}

impl MaskState {
    pub fn raw(&self) -> &[char] {
        &self.raw
    }

    /// Caret position as a char index into the rendered string.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// A mask together with the state it edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    spec: MaskSpec,
    placeholder: char,
    state: MaskState,
}

impl MaskedText {
    pub fn new(spec: MaskSpec) -> Self {
        Self::with_placeholder(spec, DEFAULT_PLACEHOLDER)
            .unwrap_or_else(|_| unreachable!("no mask class accepts the default placeholder"))
    }

    pub fn with_placeholder(spec: MaskSpec, placeholder: char) -> Result<Self, MaskError> {
        spec.validate_placeholder(placeholder)?;

        let caret = spec.caret_for(0);

        Ok(Self {
            spec,
            placeholder,
            state: MaskState {
                raw: SmallVec::new(),
                caret,
            },
        })
    }

    pub fn spec(&self) -> &MaskSpec {
        &self.spec
    }

    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    pub fn state(&self) -> &MaskState {
        &self.state
    }

    pub fn caret(&self) -> usize {
        self.state.caret
    }

    pub fn raw(&self) -> String {
        self.state.raw.iter().collect()
    }

    pub fn display(&self) -> String {
        apply_mask(&self.raw(), &self.spec, self.placeholder)
    }

    /// Whether every slot holds a character.
    pub fn is_complete(&self) -> bool {
        self.state.raw.len() == self.spec.slot_count()
    }

    /// Applies one editing input. Returns `true` when the raw buffer changed.
    ///
    /// Characters that don't fit the class of the slot being filled are
    /// dropped without touching the state.
    pub fn ingest(&mut self, key: MaskKey<'_>) -> bool {
        let changed = match key {
            MaskKey::Char(c) => self.insert_char(c),
            MaskKey::Text(text) => self.insert_text(text),
            MaskKey::Backspace => self.state.raw.pop().is_some(),
        };

        if !changed {
            log::trace!("mask ignored {key:?}");
        }

        self.state.caret = self.spec.caret_for(self.state.raw.len());
        changed
    }

    /// Replaces the whole buffer from an externally supplied display string.
    ///
    /// Characters that don't fit their slot are dropped the same way typed
    /// ones would be.
    pub fn set_value(&mut self, display: &str) {
        let extracted = extract_raw(display, &self.spec, self.placeholder);

        self.state.raw.clear();
        for c in extracted.chars() {
            if self.state.raw.len() == self.spec.slot_count() {
                break;
            }
            if self.next_slot_accepts(c) {
                self.state.raw.push(c);
            }
        }

        self.state.caret = self.spec.caret_for(self.state.raw.len());
    }

    pub fn clear(&mut self) -> bool {
        if self.state.raw.is_empty() {
            return false;
        }

        self.state.raw.clear();
        self.state.caret = self.spec.caret_for(0);
        true
    }

    fn next_slot_accepts(&self, c: char) -> bool {
        self.spec
            .slot_class(self.state.raw.len())
            .is_some_and(|class| class.accepts(c))
    }

    /// A typed character only ever targets the slot under the caret.
    fn insert_char(&mut self, c: char) -> bool {
        if self.is_complete() || !self.next_slot_accepts(c) {
            return false;
        }

        self.state.raw.push(c);
        true
    }

    fn insert_text(&mut self, text: &str) -> bool {
        let before = self.state.raw.len();

        // Walks the mask from just after the last filled slot so that literals
        // pasted at their own position are matched and skipped.
        let mut position = match before.checked_sub(1) {
            Some(last) => self.spec.slot_position(last).map_or(0, |p| p + 1),
            None => 0,
        };

        for grapheme in text.graphemes(true) {
            if self.is_complete() {
                break;
            }

            let mut chars = grapheme.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                continue;
            };

            if let Some(MaskToken::Literal(literal)) = self.spec.token(position) {
                if c == literal {
                    position += 1;
                    continue;
                }
                position = self.spec.next_slot_position(position);
            }

            if self.next_slot_accepts(c) {
                self.state.raw.push(c);
                position += 1;
            }
        }

        self.state.raw.len() != before
    }
}
