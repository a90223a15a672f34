//! File exchange schema shared with the engine
//!
//! The bridge writes an [`EngineRequest`] to `input.json` and reads an
//! [`EngineResponse`] from `output.json`. Required fields are enforced;
//! everything else is optional and defaulted, since the engine is maintained
//! separately.

use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::{
    error::AppResult,
    models::{Item, User},
};

pub const INPUT_FILE_NAME: &str = "input.json";
pub const OUTPUT_FILE_NAME: &str = "output.json";
pub const ACTION_GET_RECOMMENDATIONS: &str = "GET_RECOMMENDATIONS";

/// Contents of `input.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRequest {
    pub user: RequestUser,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestUser {
    pub name: String,
    pub age: u32,
    pub preferred_genres: Vec<String>,
}

impl EngineRequest {
    pub fn recommendations_for(user: &User) -> Self {
        Self {
            user: RequestUser {
                name: user.name().to_string(),
                age: user.age(),
                preferred_genres: user
                    .preferred_genres()
                    .iter()
                    .map(|g| g.display_name().to_string())
                    .collect(),
            },
            action: ACTION_GET_RECOMMENDATIONS.to_string(),
        }
    }
}

/// Contents of `output.json`
///
/// `status` and `message` are advisory and not interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineResponse {
    #[serde(default)]
    pub recommendations: Option<Vec<EngineItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineItem {
    #[serde(deserialize_with = "whole_number")]
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Rating field name used by the ML layer; consulted when `rating` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
}

/// Accepts integers and whole-number floats such as `603.0`
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(id) = value.as_i64() {
        return Ok(id);
    }
    match value.as_f64() {
        Some(id) if id.fract() == 0.0 && id >= i64::MIN as f64 && id < i64::MAX as f64 => {
            Ok(id as i64)
        }
        _ => Err(de::Error::custom(format!("expected a whole number id, got {}", value))),
    }
}

impl TryFrom<EngineItem> for Item {
    type Error = crate::error::AppError;

    fn try_from(item: EngineItem) -> Result<Self, Self::Error> {
        let rating = item.rating.or(item.vote_average).unwrap_or(0.0);

        Ok(Item::new(item.id, item.title)?
            .with_description(item.description.unwrap_or_default())
            .with_genres(item.genres.unwrap_or_default())
            .with_rating(rating))
    }
}

impl EngineResponse {
    /// Converts the response into items, in engine order
    pub fn into_items(self) -> AppResult<Vec<Item>> {
        self.recommendations
            .unwrap_or_default()
            .into_iter()
            .map(Item::try_from)
            .collect()
    }

    /// Placeholder response used when the engine leaves no output file
    pub fn fallback() -> Self {
        let sample = |id: i64, title: &str, description: &str| EngineItem {
            id,
            title: title.to_string(),
            description: Some(description.to_string()),
            genres: None,
            rating: None,
            vote_average: None,
        };

        Self {
            recommendations: Some(vec![
                sample(
                    1,
                    "Inception",
                    "A mind-bending thriller about dreams within dreams",
                ),
                sample(
                    2,
                    "The Matrix",
                    "A hacker discovers the reality is a simulation",
                ),
                sample(
                    3,
                    "Interstellar",
                    "A team of explorers travel through a wormhole in space",
                ),
            ]),
            status: Some("success".to_string()),
            message: Some("Sample recommendations generated".to_string()),
        }
    }
}

/// Writes `value` as pretty JSON, creating or truncating the file
///
/// The handle lives only for the duration of this call.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

pub fn read_response(path: &Path) -> AppResult<EngineResponse> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Genre;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let mut user = User::new("Alice", 28).unwrap();
        user.add_genres([Genre::Action, Genre::ScienceFiction]);

        let value = serde_json::to_value(EngineRequest::recommendations_for(&user)).unwrap();

        assert_eq!(
            value,
            json!({
                "user": {
                    "name": "Alice",
                    "age": 28,
                    "preferredGenres": ["Action", "Science Fiction"]
                },
                "action": "GET_RECOMMENDATIONS"
            })
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let response: EngineResponse = serde_json::from_value(json!({
            "recommendations": [{ "id": 42, "title": "Heat" }]
        }))
        .unwrap();

        let items = response.into_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), 42);
        assert_eq!(items[0].description(), "");
        assert!(items[0].genres().is_empty());
        assert_eq!(items[0].rating(), 0.0);
    }

    #[test]
    fn test_rating_prefers_primary_field() {
        let response: EngineResponse = serde_json::from_value(json!({
            "recommendations": [
                { "id": 1, "title": "A", "rating": 7.5, "vote_average": 6.0 },
                { "id": 2, "title": "B", "vote_average": 8.1 }
            ]
        }))
        .unwrap();

        let items = response.into_items().unwrap();
        assert_eq!(items[0].rating(), 7.5);
        assert_eq!(items[1].rating(), 8.1);
    }

    #[test]
    fn test_status_and_message_are_accepted() {
        let response: EngineResponse = serde_json::from_value(json!({
            "recommendations": [],
            "status": "error",
            "message": "model not trained"
        }))
        .unwrap();

        assert_eq!(response.status.as_deref(), Some("error"));
        assert!(response.into_items().unwrap().is_empty());
    }

    #[test]
    fn test_missing_or_null_recommendations_is_empty() {
        let response: EngineResponse = serde_json::from_value(json!({ "status": "ok" })).unwrap();
        assert!(response.into_items().unwrap().is_empty());

        let response: EngineResponse =
            serde_json::from_value(json!({ "recommendations": null })).unwrap();
        assert!(response.into_items().unwrap().is_empty());
    }

    #[test]
    fn test_whole_number_float_id_is_accepted() {
        let response: EngineResponse = serde_json::from_value(json!({
            "recommendations": [{ "id": 603.0, "title": "The Matrix" }]
        }))
        .unwrap();

        assert_eq!(response.into_items().unwrap()[0].id(), 603);
    }

    #[test]
    fn test_fractional_or_text_id_is_rejected() {
        for id in [json!(603.5), json!("603")] {
            let result: Result<EngineResponse, _> = serde_json::from_value(json!({
                "recommendations": [{ "id": id, "title": "The Matrix" }]
            }));
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result: Result<EngineResponse, _> = serde_json::from_value(json!({
            "recommendations": [{ "title": "No id" }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let response: EngineResponse = serde_json::from_value(json!({
            "recommendations": [{ "id": 1, "title": "" }]
        }))
        .unwrap();

        assert!(matches!(
            response.into_items(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_fallback_has_three_placeholders() {
        let items = EngineResponse::fallback().into_items().unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title()).collect();
        assert_eq!(titles, vec!["Inception", "The Matrix", "Interstellar"]);
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE_NAME);

        write_json(&path, &EngineResponse::fallback()).unwrap();
        // Overwrite must truncate rather than append
        write_json(&path, &EngineResponse::fallback()).unwrap();

        let items = read_response(&path).unwrap().into_items().unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_response(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
