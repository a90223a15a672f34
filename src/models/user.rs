use serde::Serialize;

use super::Genre;
use crate::error::{AppError, AppResult};

/// A person asking for recommendations
///
/// Preferred genres behave as a set: adding a genre twice keeps one copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    name: String,
    age: u32,
    preferred_genres: Vec<Genre>,
}

impl User {
    /// Creates a user with no preferred genres
    ///
    /// Fails with [`AppError::InvalidArgument`] for a blank name or a negative age.
    pub fn new(name: impl Into<String>, age: i64) -> AppResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Name cannot be empty".to_string(),
            ));
        }
        if age < 0 {
            return Err(AppError::InvalidArgument(
                "Age cannot be negative".to_string(),
            ));
        }
        let age = u32::try_from(age)
            .map_err(|_| AppError::InvalidArgument(format!("Age out of range: {}", age)))?;

        Ok(Self {
            name,
            age,
            preferred_genres: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn preferred_genres(&self) -> &[Genre] {
        &self.preferred_genres
    }

    pub fn has_genre(&self, genre: Genre) -> bool {
        self.preferred_genres.contains(&genre)
    }

    /// Adds a genre, returning `false` if it was already present
    pub fn add_genre(&mut self, genre: Genre) -> bool {
        if self.has_genre(genre) {
            return false;
        }
        self.preferred_genres.push(genre);
        true
    }

    pub fn add_genres(&mut self, genres: impl IntoIterator<Item = Genre>) {
        for genre in genres {
            self.add_genre(genre);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = User::new("Alice", 28).unwrap();
        assert_eq!(user.name(), "Alice");
        assert_eq!(user.age(), 28);
        assert!(user.preferred_genres().is_empty());
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = User::new("   ", 20).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Invalid argument: Name cannot be empty");
    }

    #[test]
    fn test_negative_age_rejected() {
        let err = User::new("Bob", -1).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Invalid argument: Age cannot be negative");
    }

    #[test]
    fn test_zero_age_allowed() {
        assert!(User::new("Baby", 0).is_ok());
    }

    #[test]
    fn test_add_duplicate_genre() {
        let mut user = User::new("Alice", 28).unwrap();
        assert!(user.add_genre(Genre::Action));
        assert!(!user.add_genre(Genre::Action));
        assert_eq!(user.preferred_genres(), &[Genre::Action]);
    }

    #[test]
    fn test_add_genres_ignores_duplicates() {
        let mut user = User::new("Alice", 28).unwrap();
        user.add_genres([Genre::Drama, Genre::Action, Genre::Drama]);
        assert_eq!(user.preferred_genres().len(), 2);
        assert!(user.has_genre(Genre::Drama));
        assert!(user.has_genre(Genre::Action));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut user = User::new("Alice", 28).unwrap();
        user.add_genre(Genre::ScienceFiction);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["preferredGenres"][0], "Science Fiction");
    }
}
