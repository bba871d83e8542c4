//! # Domain model for the key/value store.
//!
//! [`Key`] and [`Value`] are validated newtypes; construction is the only
//! place validation happens, so every other layer can take them at face
//! value.

use std::fmt;

use crate::error::AppError;

/// Maximum key length in bytes.
const MAX_KEY_LEN: usize = 256;

/// A validated store key (at most 256 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    /// Validates and wraps a raw key string.
    ///
    /// # Example
    /// ```
    /// use kvserve::Key;
    ///
    /// assert!(Key::parse("answer").is_ok());
    /// assert!(Key::parse(&"x".repeat(300)).is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if raw.len() > MAX_KEY_LEN {
            return Err(AppError::invalid_argument(format!(
                "Key must be less than {MAX_KEY_LEN} bytes."
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored value (signed 64-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value(i64);

impl Value {
    /// Parses a value from its decimal string form.
    ///
    /// # Example
    /// ```
    /// use kvserve::Value;
    ///
    /// assert_eq!(Value::parse("42").unwrap().get(), 42);
    /// assert!(Value::parse("forty-two").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| AppError::invalid_argument("Value must be number."))
    }

    /// Returns the inner integer.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_accepts_up_to_max_len() {
        assert!(Key::parse("").is_ok());
        assert!(Key::parse(&"k".repeat(MAX_KEY_LEN)).is_ok());
    }

    #[test]
    fn test_key_rejects_over_max_len() {
        let err = Key::parse(&"k".repeat(MAX_KEY_LEN + 1)).unwrap_err();
        assert_eq!(err.as_label(), "invalid_argument");
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn test_value_parses_integers() {
        assert_eq!(Value::parse("-7").unwrap().get(), -7);
        assert_eq!(Value::parse("0").unwrap(), Value::from(0));
    }

    #[test]
    fn test_value_rejects_non_numeric() {
        let err = Value::parse("abc").unwrap_err();
        assert_eq!(err.as_label(), "invalid_argument");
        assert_eq!(err.to_string(), "Value must be number.");
    }
}
