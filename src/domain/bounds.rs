//! Range and presence checks shared by drafts and updates.
//!
//! Out-of-range values are rejected with a constraint error rather than stored.

use crate::errors::{Error, Result};

/// Inclusive bounds of every 1-5 scale (mood, anxiety, sleep quality).
pub const SCALE_FIVE: (u8, u8) = (1, 5);
/// Inclusive bounds of the pain scale.
pub const SCALE_TEN: (u8, u8) = (1, 10);

/// Rejects `value` outside `min..=max`.
pub fn check_scale(field: &str, value: u8, (min, max): (u8, u8)) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::constraint(format!(
            "{field} must be between {min} and {max}, got {value}"
        )))
    }
}

/// Like [`check_scale`], absent values pass.
pub fn check_optional_scale(field: &str, value: Option<u8>, bounds: (u8, u8)) -> Result<()> {
    value.map_or(Ok(()), |v| check_scale(field, v, bounds))
}

/// Rejects empty or whitespace-only text.
pub fn check_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::constraint(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Measurements must be finite and strictly positive when given.
pub fn check_positive(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(Error::constraint(format!(
            "{field} must be a positive number, got {v}"
        ))),
        _ => Ok(()),
    }
}

/// Widens a validated scale value into its column type.
pub fn to_column(value: u8) -> i32 {
    i32::from(value)
}

/// Narrows a stored scale value; rows written by this crate always fit.
pub fn from_column(field: &str, value: i32) -> Result<u8> {
    u8::try_from(value)
        .map_err(|_| Error::constraint(format!("stored {field} {value} is out of range")))
}

/// Narrows an optional stored score back to `u8`.
pub fn from_optional_column(field: &str, value: Option<i32>) -> Result<Option<u8>> {
    value.map(|v| from_column(field, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_five_boundaries() {
        assert!(check_scale("mood_rating", 1, SCALE_FIVE).is_ok());
        assert!(check_scale("mood_rating", 5, SCALE_FIVE).is_ok());
        assert!(matches!(
            check_scale("mood_rating", 0, SCALE_FIVE),
            Err(Error::Constraint { .. })
        ));
        assert!(matches!(
            check_scale("mood_rating", 6, SCALE_FIVE),
            Err(Error::Constraint { .. })
        ));
    }

    #[test]
    fn test_scale_ten_boundaries() {
        assert!(check_scale("pain_level", 1, SCALE_TEN).is_ok());
        assert!(check_scale("pain_level", 10, SCALE_TEN).is_ok());
        assert!(check_scale("pain_level", 0, SCALE_TEN).is_err());
        assert!(check_scale("pain_level", 11, SCALE_TEN).is_err());
    }

    #[test]
    fn test_positive_measurements() {
        assert!(check_positive("birth_weight", None).is_ok());
        assert!(check_positive("birth_weight", Some(3.4)).is_ok());
        assert!(check_positive("birth_weight", Some(0.0)).is_err());
        assert!(check_positive("birth_weight", Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_blank_names_rejected() {
        assert!(check_not_blank("name", "Ava").is_ok());
        assert!(check_not_blank("name", "   ").is_err());
    }

    #[test]
    fn test_column_narrowing() {
        assert_eq!(from_column("mood", 4).ok(), Some(4));
        assert!(from_column("mood", -1).is_err());
        assert_eq!(from_optional_column("mood", None).ok(), Some(None));
    }
}
