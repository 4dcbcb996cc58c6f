use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod mood;

pub use mood::{options_list, Action, Mood};

/// Maximum number of movies returned by any recommendation source
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Normalized movie record returned to the client
///
/// Deserializes straight from a TMDB result object; records synthesized from a
/// generative candidate carry a negative id and no genres.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub release_date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vote_average: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<i64>>,
}

/// Where a recommendation list came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Tmdb,
    Ai,
}

impl RecommendationSource {
    /// Anything other than an explicit catalog request means the generator
    pub fn from_preference(source: &str) -> Self {
        match source {
            "tmdb" => RecommendationSource::Tmdb,
            _ => RecommendationSource::Ai,
        }
    }
}

/// Body of `POST /api/movies/recommendations`
///
/// Mood and action stay as raw strings, and any non-string JSON value is
/// read as an empty one, so that unknown values are reported with the list
/// of valid options instead of a generic body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub mood: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exclude_movies: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub movies: Vec<Movie>,
    pub source: RecommendationSource,
    pub fallback: bool,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged result envelope used by `/discover/movie` and `/search/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

// ============================================================================
// Generative API Types
// ============================================================================

/// One movie as proposed by the text generator
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneratedMovie {
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub overview: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub release_date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vote_average: f64,
}

// ============================================================================
// Lenient field readers
// ============================================================================

/// Reads text from any JSON value
///
/// Numbers keep their digits (`"release_date": 1994` becomes `"1994"`);
/// `null`, booleans, arrays and objects read as an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Reads a rating given either as a number or as numeric text; `null` is 0
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("rating out of range: {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid rating: {:?}", s))),
        Value::Null => Ok(0.0),
        other => Err(de::Error::custom(format!("invalid rating: {}", other))),
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
