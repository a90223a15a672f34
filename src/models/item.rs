use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// A recommendable title
///
/// Identity is the numeric id alone: two items with the same id are equal
/// whatever their other fields say.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    id: i64,
    title: String,
    description: String,
    genres: Vec<String>,
    rating: f64,
}

impl Item {
    /// Creates an item with an empty description, no genres and a 0.0 rating
    pub fn new(id: i64, title: impl Into<String>) -> AppResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Title cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id,
            title,
            description: String::new(),
            genres: Vec::new(),
            rating: 0.0,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Genre labels are free-form; engine output need not match [`super::Genre`]
    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn genres_as_string(&self) -> String {
        if self.genres.is_empty() {
            return "Unknown".to_string();
        }
        self.genres.join(", ")
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
