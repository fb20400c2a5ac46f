//! Keeps a raw character buffer in sync with a masked display string.

mod spec;
pub use spec::*;

mod state;
pub use state::*;

/// Placeholder shown in empty slots unless configured otherwise.
pub const DEFAULT_PLACEHOLDER: char = '_';

/// Renders `raw` through `spec`.
///
/// Slots consume raw characters in order and fall back to `placeholder` once
/// `raw` runs out; literals are always emitted verbatim. Raw characters beyond
/// the slot count are ignored.
pub fn apply_mask(raw: &str, spec: &MaskSpec, placeholder: char) -> String {
    let mut raw = raw.chars();
    let mut display = String::with_capacity(spec.len());

    for token in spec.tokens() {
        match token {
            MaskToken::Literal(c) => display.push(*c),
            MaskToken::Slot(_) => display.push(raw.next().unwrap_or(placeholder)),
        }
    }

    display
}

/// Collects the characters sitting at slot positions of `display`, skipping
/// the ones that still show `placeholder`.
pub fn extract_raw(display: &str, spec: &MaskSpec, placeholder: char) -> String {
    display
        .chars()
        .zip(spec.tokens())
        .filter_map(|(c, token)| (token.is_slot() && c != placeholder).then_some(c))
        .collect()
}
