use std::{fmt, str::FromStr};

use enum_assoc::Assoc;
use smallvec::SmallVec;
use thiserror::Error;

/// The character class a placeholder slot accepts.
#[derive(Assoc, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[func(pub fn symbol(&self) -> char)]
pub enum CharClass {
    /// ASCII digits, written `#` in a pattern.
    #[assoc(symbol = '#')]
    Digit,
    /// ASCII letters, written `A` in a pattern.
    #[assoc(symbol = 'A')]
    Letter,
    /// ASCII letters and digits, written `*` in a pattern.
    #[assoc(symbol = '*')]
    Alphanumeric,
}

impl CharClass {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Digit),
            'A' => Some(Self::Letter),
            '*' => Some(Self::Alphanumeric),
            _ => None,
        }
    }

    pub fn accepts(self, c: char) -> bool {
        match self {
            Self::Digit => c.is_ascii_digit(),
            Self::Letter => c.is_ascii_alphabetic(),
            Self::Alphanumeric => c.is_ascii_alphanumeric(),
        }
    }
}

/// One position of a mask pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskToken {
    Literal(char),
    Slot(CharClass),
}

impl MaskToken {
    pub fn is_slot(&self) -> bool {
        matches!(self, Self::Slot(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    #[error("The mask pattern doesn't contain any placeholder tokens.")]
    NoPlaceholders,
    #[error("The placeholder '{0}' is a valid input for one of the mask's slots.")]
    PlaceholderConflict(char),
}

/// An immutable, parsed mask pattern.
///
/// Slot positions are cached at construction so that caret math never has to
/// rescan the token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSpec {
    tokens: SmallVec<[MaskToken; 16]>,
    slots: SmallVec<[usize; 16]>,
}

impl MaskSpec {
    /// Parses a pattern where `#`, `A` and `*` are placeholders and every other
    /// character is a literal.
    pub fn parse(pattern: &str) -> Result<Self, MaskError> {
        Self::from_tokens(pattern.chars().map(|c| match CharClass::from_symbol(c) {
            Some(class) => MaskToken::Slot(class),
            None => MaskToken::Literal(c),
        }))
    }

    pub fn from_tokens(tokens: impl IntoIterator<Item = MaskToken>) -> Result<Self, MaskError> {
        let tokens: SmallVec<[MaskToken; 16]> = tokens.into_iter().collect();
        let slots: SmallVec<[usize; 16]> = tokens
            .iter()
            .enumerate()
            .filter_map(|(position, token)| token.is_slot().then_some(position))
            .collect();

        if slots.is_empty() {
            return Err(MaskError::NoPlaceholders);
        }

        Ok(Self { tokens, slots })
    }

    /// Checks that `placeholder` can't be mistaken for user input.
    pub fn validate_placeholder(&self, placeholder: char) -> Result<(), MaskError> {
        let conflicts = self.tokens.iter().any(|token| match token {
            MaskToken::Slot(class) => class.accepts(placeholder),
            MaskToken::Literal(_) => false,
        });

        if conflicts {
            return Err(MaskError::PlaceholderConflict(placeholder));
        }

        Ok(())
    }

    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    pub fn token(&self, position: usize) -> Option<MaskToken> {
        self.tokens.get(position).copied()
    }

    /// Length of the rendered string, in chars.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Position in the rendered string of the slot with the given index.
    pub fn slot_position(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied()
    }

    pub fn slot_class(&self, slot: usize) -> Option<CharClass> {
        match self.token(self.slot_position(slot)?)? {
            MaskToken::Slot(class) => Some(class),
            MaskToken::Literal(_) => None,
        }
    }

    /// First slot position at or after `from`, or `len()` when there is none.
    pub fn next_slot_position(&self, from: usize) -> usize {
        self.slots
            .iter()
            .copied()
            .find(|&position| position >= from)
            .unwrap_or(self.len())
    }

    /// Caret position once `filled` slots hold a character.
    pub fn caret_for(&self, filled: usize) -> usize {
        match filled.checked_sub(1).and_then(|last| self.slot_position(last)) {
            Some(last_position) => self.next_slot_position(last_position + 1),
            None => self.next_slot_position(0),
        }
    }
}

impl FromStr for MaskSpec {
    type Err = MaskError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Self::parse(pattern)
    }
}

impl fmt::Display for MaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            let c = match token {
                MaskToken::Literal(c) => *c,
                MaskToken::Slot(class) => class.symbol(),
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
