//! Superhero name validation

use super::ValidationError;

/// Maximum length for a hero name, in characters
const MAX_HERO_NAME_LEN: usize = 100;

/// Validated superhero display name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeroName(String);

impl HeroName {
    /// Create a hero name from user input.
    ///
    /// # Rules
    /// - Surrounding whitespace is trimmed
    /// - Must not be empty after trimming
    /// - Max 100 characters
    ///
    /// # Example
    /// ```
    /// use superheroes_server::models::HeroName;
    ///
    /// assert_eq!(HeroName::new("  Storm ").unwrap().as_str(), "Storm");
    /// assert!(HeroName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if trimmed.chars().count() > MAX_HERO_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_HERO_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for HeroName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(HeroName::new("Batman").is_ok());
        assert!(HeroName::new("Spider-Man").is_ok());
        assert!(HeroName::new("Ms. Marvel").is_ok());
        assert!(HeroName::new("X").is_ok());
    }

    #[test]
    fn trims_whitespace() {
        let name = HeroName::new("\t Wonder Woman \n").unwrap();
        assert_eq!(name.as_str(), "Wonder Woman");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            HeroName::new("").unwrap_err(),
            ValidationError::Empty { field: "name" }
        ));
        assert!(matches!(
            HeroName::new("    ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn max_length_counts_chars() {
        assert!(HeroName::new(&"a".repeat(100)).is_ok());
        // multi-byte characters count once each
        assert!(HeroName::new(&"é".repeat(100)).is_ok());

        let err = HeroName::new(&"a".repeat(101)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 100, .. }));
    }
}
