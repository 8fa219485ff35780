//! Domain primitives for the movie catalog.
//!
//! Newtype ids keep movie ids from being mixed up with genre or cast ids,
//! and [`snapshot`] owns the JSON encoding of the denormalized name lists.

pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a row in the `movies` table.
///
/// ```rust
/// use livemovies::domain::MovieId;
///
/// let id = MovieId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(i32);

impl MovieId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MovieId> for i32 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<i32> for MovieId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for MovieId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i32::deserialize(deserializer).map(Self::new)
    }
}

/// Which of the two name lists of a movie an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameList {
    Genre,
    Cast,
}

impl NameList {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::Cast => "cast",
        }
    }
}

impl fmt::Display for NameList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_serde() {
        let id = MovieId::new(12);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "12");

        let back: MovieId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_movie_id_conversions() {
        let id: MovieId = 5.into();
        let raw: i32 = id.into();
        assert_eq!(raw, 5);
        assert!(MovieId::new(1) < MovieId::new(2));
    }
}
