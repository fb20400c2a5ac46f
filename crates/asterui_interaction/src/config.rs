//! Deserializable configuration for each widget.
//!
//! Every field has a default so a config file only needs to name what it
//! changes.

use chrono::Weekday;
use serde::Deserialize;

use crate::{
    calendar::DEFAULT_MAX_SKIP,
    deserializers::{de_char, de_mask, de_max_skip, de_step, de_weekday},
    format::DEFAULT_DATE_FORMAT,
    mask::{DEFAULT_PLACEHOLDER, MaskError, MaskSpec, MaskedText},
    time::TimeFormat,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaskConfig {
    #[serde(deserialize_with = "de_mask")]
    pub mask: MaskSpec,
    #[serde(default = "default_placeholder", deserialize_with = "de_char")]
    pub placeholder: char,
}

fn default_placeholder() -> char {
    DEFAULT_PLACEHOLDER
}

impl MaskConfig {
    /// Fails when the placeholder could be typed into one of the slots.
    pub fn build(&self) -> Result<MaskedText, MaskError> {
        MaskedText::with_placeholder(self.mask.clone(), self.placeholder)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    #[serde(deserialize_with = "de_weekday")]
    pub first_day_of_week: Weekday,
    /// How many candidates a skip over disabled dates inspects before giving up.
    #[serde(deserialize_with = "de_max_skip")]
    pub max_skip: u32,
    /// Pattern for the trigger label, see [`crate::format::format_date`].
    pub date_format: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            first_day_of_week: Weekday::Sun,
            max_skip: DEFAULT_MAX_SKIP,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimePickerConfig {
    pub format: TimeFormat,
    pub show_seconds: bool,
    #[serde(deserialize_with = "de_step")]
    pub hour_step: u32,
    #[serde(deserialize_with = "de_step")]
    pub minute_step: u32,
    #[serde(deserialize_with = "de_step")]
    pub second_step: u32,
}

impl Default for TimePickerConfig {
    fn default() -> Self {
        Self {
            format: TimeFormat::H24,
            show_seconds: false,
            hour_step: 1,
            minute_step: 1,
            second_step: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_config() {
        let config: MaskConfig = serde_json::from_str(r#"{ "mask": "(###) ###-####" }"#).unwrap();

        assert_eq!(config.placeholder, '_');
        assert_eq!(config.mask.slot_count(), 10);
        assert_eq!(config.build().unwrap().display(), "(___) ___-____");
    }

    #[test]
    fn test_mask_config_placeholder() {
        let config: MaskConfig =
            serde_json::from_str(r###"{ "mask": "##/##", "placeholder": "x" }"###).unwrap();
        assert_eq!(config.build().unwrap().display(), "xx/xx");

        let config: MaskConfig =
            serde_json::from_str(r###"{ "mask": "##/##", "placeholder": "0" }"###).unwrap();
        assert_eq!(config.build(), Err(MaskError::PlaceholderConflict('0')));

        assert!(
            serde_json::from_str::<MaskConfig>(r###"{ "mask": "##", "placeholder": "ab" }"###)
                .is_err()
        );
        assert!(serde_json::from_str::<MaskConfig>(r#"{ "mask": "--" }"#).is_err());
    }

    #[test]
    fn test_picker_config() {
        let config: PickerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PickerConfig::default());

        let config: PickerConfig = serde_json::from_str(
            r#"{ "first_day_of_week": "Monday", "max_skip": 62, "date_format": "YYYY-MM-DD" }"#,
        )
        .unwrap();
        assert_eq!(config.first_day_of_week, Weekday::Mon);
        assert_eq!(config.max_skip, 62);
        assert_eq!(config.date_format, "YYYY-MM-DD");

        assert!(serde_json::from_str::<PickerConfig>(r#"{ "first_day_of_week": "Caturday" }"#).is_err());
    }

    #[test]
    fn test_picker_config_rejects_zero_max_skip() {
        assert!(serde_json::from_str::<PickerConfig>(r#"{ "max_skip": 0 }"#).is_err());

        let config: PickerConfig = serde_json::from_str(r#"{ "max_skip": 1 }"#).unwrap();
        assert_eq!(config.max_skip, 1);
    }

    #[test]
    fn test_time_picker_config() {
        let config: TimePickerConfig =
            serde_json::from_str(r#"{ "format": "12", "show_seconds": true, "minute_step": 5 }"#)
                .unwrap();

        assert_eq!(config.format, TimeFormat::H12);
        assert!(config.show_seconds);
        assert_eq!(config.minute_step, 5);
        assert_eq!(config.hour_step, 1);

        assert!(serde_json::from_str::<TimePickerConfig>(r#"{ "hour_step": 0 }"#).is_err());
    }
}
