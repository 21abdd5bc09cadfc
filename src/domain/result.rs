//! Result type alias for Lodestar
//!
//! This module provides a convenient Result type alias that uses
//! `LodestarError` as the error type.

use super::errors::LodestarError;

/// Result type alias for Lodestar operations
///
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use lodestar::domain::result::Result;
/// use lodestar::domain::errors::LodestarError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LodestarError::Other("boom".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LodestarError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::LodestarError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(LodestarError::Other("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
