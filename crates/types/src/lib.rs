//! Validated primitive values shared across LepCare crates.
//!
//! Form input arrives as free text. These wrappers do the parsing once, at the edge, so that
//! roster and ledger records can only ever hold values that already passed validation:
//! - [`NonEmptyText`] for names, phone numbers, locations and medication labels
//! - [`Age`] for a patient's age in whole years
//! - [`Percent`] for adherence figures

use std::fmt;

/// Errors raised while constructing a validated value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The input was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input could not be read as a whole number
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    /// The number was zero where a positive value is required
    #[error("value must be greater than zero")]
    NotPositive,
    /// The number was above the permitted maximum
    #[error("value {value} exceeds maximum of {max}")]
    OutOfRange { value: u32, max: u32 },
}

/// A trimmed string guaranteed to contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and wraps it, rejecting blank input with [`ValueError::Empty`].
    pub fn new(input: impl AsRef<str>) -> Result<Self, ValueError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test, used by roster search.
    pub fn contains_ignore_case(&self, needle_lower: &str) -> bool {
        self.0.to_lowercase().contains(needle_lower)
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A patient's age in whole years. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u32);

impl Age {
    pub fn new(years: u32) -> Result<Self, ValueError> {
        if years == 0 {
            return Err(ValueError::NotPositive);
        }
        Ok(Self(years))
    }

    /// Parses the text of an age field, e.g. `" 34 "`.
    pub fn parse(input: &str) -> Result<Self, ValueError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        let years = trimmed
            .parse::<u32>()
            .map_err(|_| ValueError::NotANumber(trimmed.to_owned()))?;
        Self::new(years)
    }

    pub fn years(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Age {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Age {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let years = u32::deserialize(deserializer)?;
        Age::new(years).map_err(serde::de::Error::custom)
    }
}

/// An integer percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(u8);

impl Percent {
    pub fn new(value: u32) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange { value, max: 100 });
        }
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl serde::Serialize for Percent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        Percent::new(value).map_err(serde::de::Error::custom)
    }
}
