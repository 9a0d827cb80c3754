//! Input acceptability gate, applied before the workflow runs.

use crate::error::ValidationError;

/// Length bounds for input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Minimum trimmed length, inclusive.
    pub min_length: usize,
    /// Maximum length, inclusive.
    pub max_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 10_000,
        }
    }
}

/// Check whether the input text is acceptable for analysis.
///
/// Pure function of its inputs; calling it twice on the same input yields
/// the same verdict. Lengths are counted in characters, not bytes. The
/// minimum is checked against the trimmed length, the maximum against the
/// raw length.
pub fn validate(text: &str, limits: &ValidationLimits) -> Result<(), ValidationError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    let trimmed_chars = trimmed.chars().count();
    if trimmed_chars < limits.min_length {
        return Err(ValidationError::TooShort {
            actual: trimmed_chars,
            min: limits.min_length,
        });
    }
    let total_chars = text.chars().count();
    if total_chars > limits.max_length {
        return Err(ValidationError::TooLong {
            actual: total_chars,
            max: limits.max_length,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input_passes() {
        let limits = ValidationLimits::default();
        assert!(validate("This is a perfectly fine input text.", &limits).is_ok());
    }

    #[test]
    fn test_empty_input_rejected() {
        let limits = ValidationLimits::default();
        assert_eq!(validate("", &limits), Err(ValidationError::EmptyInput));
        // Whitespace-only trims to empty
        assert_eq!(validate("   \n\t ", &limits), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn test_nine_chars_too_short() {
        let limits = ValidationLimits::default();
        assert_eq!(
            validate("nine char", &limits),
            Err(ValidationError::TooShort { actual: 9, min: 10 })
        );
    }

    #[test]
    fn test_lengths_counted_in_chars_not_bytes() {
        let limits = ValidationLimits::default();
        // Nine two-byte characters: under the minimum despite 18 bytes.
        assert_eq!(
            validate("ééééééééé", &limits),
            Err(ValidationError::TooShort { actual: 9, min: 10 })
        );
        // Ten two-byte characters pass even though the byte length is 20.
        assert!(validate("éééééééééé", &limits).is_ok());

        let limits = ValidationLimits {
            min_length: 1,
            max_length: 20,
        };
        // Twenty two-byte characters: at the maximum, 40 bytes.
        assert!(validate(&"é".repeat(20), &limits).is_ok());
        assert_eq!(
            validate(&"é".repeat(21), &limits),
            Err(ValidationError::TooLong { actual: 21, max: 20 })
        );
    }

    #[test]
    fn test_exactly_min_length_passes() {
        let limits = ValidationLimits::default();
        assert!(validate("1234567890", &limits).is_ok());
    }

    #[test]
    fn test_too_long_rejected() {
        let limits = ValidationLimits {
            min_length: 1,
            max_length: 20,
        };
        let text = "x".repeat(21);
        assert_eq!(
            validate(&text, &limits),
            Err(ValidationError::TooLong { actual: 21, max: 20 })
        );
    }

    #[test]
    fn test_idempotent() {
        let limits = ValidationLimits::default();
        let text = "short";
        assert_eq!(validate(text, &limits), validate(text, &limits));
    }
}
