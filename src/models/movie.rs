use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::domain::MovieId;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_LANGUAGE_LENGTH: usize = 50;

fn release_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(19|20)\d{2}$").expect("Invalid regex"))
}

/// A movie as returned to clients, with both name lists resolved.
///
/// Serialized with snake_case keys plus `release_Year`, the only key the
/// legacy frontend has no snake_case fallback for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    pub release_year: String,
    pub language: String,
    pub rating: String,
    pub description: String,
    pub image_url: String,
    pub watch_url: String,
    pub genre: Vec<String>,
    pub cast: Vec<String>,
}

impl Serialize for Movie {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Movie", 11)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("release_year", &self.release_year)?;
        state.serialize_field("release_Year", &self.release_year)?;
        state.serialize_field("language", &self.language)?;
        state.serialize_field("rating", &self.rating)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("image_url", &self.image_url)?;
        state.serialize_field("watch_url", &self.watch_url)?;
        state.serialize_field("genre", &self.genre)?;
        state.serialize_field("cast", &self.cast)?;
        state.end()
    }
}

/// Fields accepted when adding or updating a movie.
///
/// Also accepts the field spellings of the legacy frontend (`Release_Year`,
/// `release_Year`, `Image_url`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieInput {
    #[serde(alias = "Name")]
    pub name: String,

    #[serde(alias = "Release_Year", alias = "release_Year", alias = "releaseYear")]
    pub release_year: String,

    #[serde(alias = "Language")]
    pub language: String,

    #[serde(alias = "Genre", alias = "genres")]
    pub genre: Vec<String>,

    #[serde(alias = "Rating")]
    pub rating: String,

    #[serde(alias = "Description")]
    pub description: String,

    #[serde(alias = "Cast")]
    pub cast: Vec<String>,

    #[serde(alias = "Image_url", alias = "image_Url", alias = "imageUrl")]
    pub image_url: String,

    #[serde(alias = "Watch_url", alias = "watch_Url", alias = "watchUrl")]
    pub watch_url: String,
}

impl MovieInput {
    /// Trim scalar fields and normalize both name lists.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            release_year: self.release_year.trim().to_string(),
            language: self.language.trim().to_string(),
            genre: normalize_names(&self.genre),
            rating: self.rating.trim().to_string(),
            description: self.description,
            cast: normalize_names(&self.cast),
            image_url: self.image_url.trim().to_string(),
            watch_url: self.watch_url.trim().to_string(),
        }
    }

    /// Returns the first problem found, as a message fit for the client.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(format!(
                "Name must be {MAX_NAME_LENGTH} characters or less"
            ));
        }

        if !release_year_regex().is_match(&self.release_year) {
            return Err("Release year must be a four digit year between 1900 and 2099".to_string());
        }

        if self.language.trim().is_empty() {
            return Err("Language is required".to_string());
        }
        if self.language.chars().count() > MAX_LANGUAGE_LENGTH {
            return Err(format!(
                "Language must be {MAX_LANGUAGE_LENGTH} characters or less"
            ));
        }

        if self.rating.trim().is_empty() {
            return Err("Rating is required".to_string());
        }

        if !is_valid_link(&self.image_url) {
            return Err("Image URL must be an http(s) URL or an uploaded image path".to_string());
        }

        if !is_valid_link(&self.watch_url) {
            return Err("Watch URL must be an http(s) URL".to_string());
        }

        Ok(())
    }
}

/// Absolute http(s) URL, or a path under `/uploads/` handed out by the image service.
#[must_use]
pub fn is_valid_link(value: &str) -> bool {
    let value = value.trim();

    if let Some(rest) = value.strip_prefix("/uploads/") {
        return !rest.is_empty() && !rest.split('/').any(|part| part == "..");
    }

    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Normalize a list of genre or cast names.
///
/// Each entry is split on commas, the parts trimmed, empty parts dropped and
/// the rest joined with `", "`. Entries that end up empty are dropped, as are
/// repeats of an earlier entry.
#[must_use]
pub fn normalize_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();

    names
        .iter()
        .map(|entry| {
            entry
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|entry| !entry.is_empty())
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> MovieInput {
        MovieInput {
            name: "Inception".to_string(),
            release_year: "2010".to_string(),
            language: "English".to_string(),
            genre: vec!["Sci-Fi".to_string(), "Action".to_string()],
            rating: "8.8".to_string(),
            description: "A thief who steals corporate secrets.".to_string(),
            cast: vec!["Leonardo DiCaprio".to_string()],
            image_url: "https://example.com/inception.jpg".to_string(),
            watch_url: "https://example.com/watch/inception".to_string(),
        }
    }

    #[test]
    fn test_normalize_names() {
        let input = vec![
            " Action ,Drama ".to_string(),
            String::new(),
            " , ".to_string(),
            "Comedy".to_string(),
            "Action, Drama".to_string(),
        ];

        assert_eq!(
            normalize_names(&input),
            vec!["Action, Drama".to_string(), "Comedy".to_string()]
        );
    }

    #[test]
    fn test_valid_input() {
        assert!(inception().validate().is_ok());
    }

    #[test]
    fn test_release_year_validation() {
        for year in ["1899", "2100", "10", "20100", "abcd", ""] {
            let input = MovieInput {
                release_year: year.to_string(),
                ..inception()
            };
            assert!(input.validate().is_err(), "year {year} should be rejected");
        }

        for year in ["1900", "1999", "2000", "2099"] {
            let input = MovieInput {
                release_year: year.to_string(),
                ..inception()
            };
            assert!(input.validate().is_ok(), "year {year} should be accepted");
        }
    }

    #[test]
    fn test_required_fields() {
        let blank_name = MovieInput {
            name: "   ".to_string(),
            ..inception()
        };
        assert!(blank_name.validate().is_err());

        let long_language = MovieInput {
            language: "x".repeat(MAX_LANGUAGE_LENGTH + 1),
            ..inception()
        };
        assert!(long_language.validate().is_err());

        let no_rating = MovieInput {
            rating: String::new(),
            ..inception()
        };
        assert!(no_rating.validate().is_err());
    }

    #[test]
    fn test_link_validation() {
        assert!(is_valid_link("https://example.com/a.jpg"));
        assert!(is_valid_link("http://localhost:5000/x"));
        assert!(is_valid_link("/uploads/movies/abc.png"));
        assert!(!is_valid_link("/uploads/../secret"));
        assert!(!is_valid_link("/uploads/"));
        assert!(!is_valid_link("ftp://example.com/a.jpg"));
        assert!(!is_valid_link("not a url"));
        assert!(!is_valid_link(""));
    }

    #[test]
    fn test_input_accepts_legacy_field_names() {
        let json = r#"{
            "Name": "Heat",
            "release_Year": "1995",
            "Language": "English",
            "Genre": ["Crime"],
            "Rating": "8.3",
            "Description": "",
            "Cast": ["Al Pacino", "Robert De Niro"],
            "Image_url": "https://example.com/heat.jpg",
            "Watch_url": "https://example.com/watch/heat"
        }"#;

        let input: MovieInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.name, "Heat");
        assert_eq!(input.release_year, "1995");
        assert_eq!(input.cast.len(), 2);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_movie_json_carries_legacy_year_key() {
        let movie = Movie {
            id: MovieId::new(7),
            name: "Heat".to_string(),
            release_year: "1995".to_string(),
            language: "English".to_string(),
            rating: "8.3".to_string(),
            description: String::new(),
            image_url: "https://example.com/heat.jpg".to_string(),
            watch_url: "https://example.com/watch/heat".to_string(),
            genre: vec!["Crime".to_string()],
            cast: vec!["Al Pacino".to_string()],
        };

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["release_year"], "1995");
        assert_eq!(value["release_Year"], "1995");
        assert_eq!(value["image_url"], "https://example.com/heat.jpg");
        assert_eq!(value["genre"], serde_json::json!(["Crime"]));

        let back: Movie = serde_json::from_value(value).unwrap();
        assert_eq!(back, movie);
    }

    #[test]
    fn test_normalized_trims_scalars() {
        let input = MovieInput {
            name: "  Inception ".to_string(),
            genre: vec!["Sci-Fi".to_string(), "Sci-Fi ".to_string()],
            ..inception()
        }
        .normalized();

        assert_eq!(input.name, "Inception");
        assert_eq!(input.genre, vec!["Sci-Fi".to_string()]);
    }
}
