use std::{fmt::Display, str::FromStr};

use serde::Serialize;

use crate::error::AppError;

/// Film genres, matching the classification used by the engine's catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    #[serde(rename = "TV Movie")]
    TvMovie,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// Every genre, in catalog order
    pub const ALL: [Genre; 19] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Family,
        Genre::Fantasy,
        Genre::History,
        Genre::Horror,
        Genre::Music,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::TvMovie,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    /// Canonical label, as written to the engine's input file
    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Family => "Family",
            Genre::Fantasy => "Fantasy",
            Genre::History => "History",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::TvMovie => "TV Movie",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }

    /// Constant-style name, e.g. `SCIENCE_FICTION`
    fn constant_name(&self) -> String {
        self.display_name().to_uppercase().replace(' ', "_")
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Genre::ScienceFiction => &["Sci-Fi", "SciFi"],
            _ => &[],
        }
    }

    /// Case-insensitive lookup by label, constant name or alias.
    ///
    /// Returns `None` when nothing matches; there is no default genre.
    pub fn parse(text: &str) -> Option<Genre> {
        let normalized = text.trim();
        if normalized.is_empty() {
            return None;
        }

        Genre::ALL.into_iter().find(|genre| {
            genre.display_name().eq_ignore_ascii_case(normalized)
                || genre.constant_name().eq_ignore_ascii_case(normalized)
                || genre
                    .aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(normalized))
        })
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Genre {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::parse(s).ok_or_else(|| AppError::InvalidArgument(format!("Unknown genre: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_contains_nineteen_distinct_genres() {
        let mut seen = std::collections::HashSet::new();
        for genre in Genre::ALL {
            assert!(seen.insert(genre));
        }
        assert_eq!(seen.len(), 19);
    }

    #[test]
    fn test_science_fiction_spellings_resolve_to_same_value() {
        for text in ["sci-fi", "SCIFI", "Science Fiction", "SCIENCE_FICTION", " science fiction "] {
            assert_eq!(Genre::parse(text), Some(Genre::ScienceFiction), "{}", text);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Genre::parse("action"), Some(Genre::Action));
        assert_eq!(Genre::parse("tv movie"), Some(Genre::TvMovie));
        assert_eq!(Genre::parse("TV_MOVIE"), Some(Genre::TvMovie));
    }

    #[test]
    fn test_parse_unknown_is_not_found() {
        assert_eq!(Genre::parse("not-a-genre"), None);
        assert_eq!(Genre::parse(""), None);
        assert_eq!(Genre::parse("   "), None);
    }

    #[test]
    fn test_from_str_unknown_is_invalid_argument() {
        let err = "not-a-genre".parse::<Genre>().unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_serializes_as_display_name() {
        let json = serde_json::to_string(&vec![Genre::Action, Genre::ScienceFiction]).unwrap();
        assert_eq!(json, r#"["Action","Science Fiction"]"#);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for genre in Genre::ALL {
            assert_eq!(Genre::parse(&genre.to_string()), Some(genre));
        }
    }
}
