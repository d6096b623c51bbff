//! Category codes - the atoms being ranked

use std::fmt;

/// The eight cognitive-function codes the quiz ranks.
///
/// The ranking engine never depends on this list; it is used by the outer
/// layers to report health for every function, answered or not.
pub const FUNCTION_CODES: [&str; 8] = ["Ni", "Ne", "Ti", "Te", "Fi", "Fe", "Si", "Se"];

/// An opaque, comparable category code (e.g. `Ni`)
///
/// Codes carry no meaning inside the ranking engine beyond equality and hashing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryCode(String);

impl CategoryCode {
    /// Create a new category code
    ///
    /// # Errors
    /// Returns error if the code is empty or only whitespace
    ///
    /// Surrounding whitespace is dropped, so `"Ni "` and `"Ni"` are the same code.
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Category code cannot be empty".to_string());
        }
        if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the eight [`FUNCTION_CODES`]
    pub fn is_function_code(&self) -> bool {
        FUNCTION_CODES.contains(&self.0.as_str())
    }

    /// All eight function codes, in canonical order
    pub fn function_codes() -> Vec<CategoryCode> {
        FUNCTION_CODES
            .iter()
            .map(|code| CategoryCode(code.to_string()))
            .collect()
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CategoryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CategoryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_creation() {
        let code = CategoryCode::new("Ni").unwrap();
        assert_eq!(code.as_str(), "Ni");
        assert_eq!(code.to_string(), "Ni");
    }

    #[test]
    fn test_empty_code_rejected() {
        assert!(CategoryCode::new("").is_err());
        assert!(CategoryCode::new("   ").is_err());
    }

    #[test]
    fn test_parse_trims() {
        let code: CategoryCode = " Fe ".parse().unwrap();
        assert_eq!(code.as_str(), "Fe");
    }

    #[test]
    fn test_new_trims_surrounding_whitespace() {
        let padded = CategoryCode::new("Ni ").unwrap();
        assert_eq!(padded.as_str(), "Ni");
        assert_eq!(padded, CategoryCode::new("Ni").unwrap());
        assert_eq!(CategoryCode::new("\tTe\n").unwrap().as_str(), "Te");
    }

    #[test]
    fn test_function_codes() {
        let codes = CategoryCode::function_codes();
        assert_eq!(codes.len(), 8);
        assert!(codes.iter().all(|c| c.is_function_code()));
        assert!(!CategoryCode::new("X1").unwrap().is_function_code());
    }
}
