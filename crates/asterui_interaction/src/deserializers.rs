use chrono::Weekday;
use serde::{Deserialize, Deserializer, de::Error};

use crate::mask::MaskSpec;

pub fn de_mask<'de, D>(deserializer: D) -> Result<MaskSpec, D::Error>
where
    D: Deserializer<'de>,
{
    let pattern = String::deserialize(deserializer)?;

    MaskSpec::parse(&pattern).map_err(D::Error::custom)
}

pub fn de_weekday<'de, D>(deserializer: D) -> Result<Weekday, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;

    match name.trim().parse::<Weekday>() {
        Ok(weekday) => Ok(weekday),
        Err(_) => Err(D::Error::custom(format!(
            "expected a weekday name like 'sunday' or 'mon', got '{name}'"
        ))),
    }
}

pub fn de_char<'de, D>(deserializer: D) -> Result<char, D::Error>
where
    D: Deserializer<'de>,
{
    let string = String::deserialize(deserializer)?;
    let mut chars = string.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(D::Error::custom("expected a string of exactly one character")),
    }
}

pub fn de_step<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let step = u32::deserialize(deserializer)?;

    if step == 0 {
        return Err(D::Error::custom("step can't be zero."));
    }

    Ok(step)
}

pub fn de_max_skip<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let max_skip = u32::deserialize(deserializer)?;

    if max_skip == 0 {
        return Err(D::Error::custom("max_skip can't be zero."));
    }

    Ok(max_skip)
}
