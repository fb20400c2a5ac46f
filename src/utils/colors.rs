use gpui::{Hsla, Rgba, rgb};

/// Creates an RGBA color from a hex value and alpha component.
pub fn rgb_a(hex: u32, a: f32) -> Rgba {
    let [_, r, g, b] = hex.to_be_bytes().map(|b| (b as f32) / 255.0);
    Rgba { r, g, b, a }
}

/// Unthemed colors used by the input and picker elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Hsla,
    pub muted_text: Hsla,
    pub disabled_text: Hsla,
    pub border: Hsla,
    pub focus_border: Hsla,
    pub background: Hsla,
    pub popover: Hsla,
    /// Cell under the keyboard cursor.
    pub cursor: Hsla,
    pub selected: Hsla,
    /// Days between the endpoints of a range.
    pub in_range: Hsla,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: rgb(0xE8E4FF).into(),
            muted_text: rgb_a(0xE8E4FF, 0.45).into(),
            disabled_text: rgb_a(0xE8E4FF, 0.2).into(),
            border: rgb(0x3A3845).into(),
            focus_border: rgb(0x488BFF).into(),
            background: rgb(0x1E1D24).into(),
            popover: rgb(0x26252E).into(),
            cursor: rgb_a(0x488BFF, 0.35).into(),
            selected: rgb(0x488BFF).into(),
            in_range: rgb_a(0x488BFF, 0.15).into(),
        }
    }
}
