/// TMDB (The Movie Database) v3 catalog provider
///
/// Every request carries both the v3 `api_key` query parameter and the read
/// access token as a bearer header.
///
/// API Flow:
/// 1. Discovery: /discover/movie filtered by genre, most popular first
/// 2. Enrichment: /search/movie by free-text title
/// 3. Reachability: /configuration
use crate::{
    error::{AppError, AppResult},
    models::{Action, Mood, Movie, TmdbPage, MAX_RECOMMENDATIONS},
    services::{mood_catalog, providers::MovieCatalog},
};
use reqwest::Client as HttpClient;

const MIN_VOTE_AVERAGE: &str = "6";
const SORT_BY_POPULARITY: &str = "popularity.desc";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    access_token: Option<String>,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        api_key: Option<String>,
        access_token: Option<String>,
        api_url: String,
        language: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            access_token,
            api_url,
            language,
        }
    }

    /// Returns (api_key, access_token) when both are set and non-empty
    fn credentials(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        let token = self.access_token.as_deref().filter(|t| !t.is_empty())?;
        Some((key, token))
    }

    /// Removes excluded ids and keeps the first results in catalog order
    fn select_movies(results: Vec<Movie>, exclude_ids: &[i64]) -> Vec<Movie> {
        results
            .into_iter()
            .filter(|movie| !exclude_ids.contains(&movie.id))
            .take(MAX_RECOMMENDATIONS)
            .collect()
    }

    async fn search_top_match(&self, title: &str) -> AppResult<Option<Movie>> {
        let (api_key, token) = self.credentials().ok_or_else(|| {
            AppError::CredentialsMissing("TMDB API credentials not configured".to_string())
        })?;

        let url = format!("{}/search/movie", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("api_key", api_key),
                ("query", title),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamError(format!(
                "TMDB API Error: {}",
                response.status()
            )));
        }

        let page: TmdbPage = response.json().await?;
        Ok(page.results.into_iter().next())
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbProvider {
    async fn find_by_mood(
        &self,
        mood: Mood,
        action: Action,
        exclude_ids: &[i64],
    ) -> AppResult<Vec<Movie>> {
        let (api_key, token) = self.credentials().ok_or_else(|| {
            AppError::UpstreamUnavailable("TMDB API credentials not configured".to_string())
        })?;

        let genres = mood_catalog::genres_for(mood, action)?
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let url = format!("{}/discover/movie", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("api_key", api_key),
                ("with_genres", genres.as_str()),
                ("sort_by", SORT_BY_POPULARITY),
                ("vote_average.gte", MIN_VOTE_AVERAGE),
                ("page", "1"),
                ("language", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("TMDB request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let page: TmdbPage = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Failed to parse TMDB response: {}", e)))?;

        let movies = Self::select_movies(page.results, exclude_ids);

        tracing::info!(
            mood = %mood,
            action = %action,
            genres = %genres,
            excluded = exclude_ids.len(),
            results = movies.len(),
            provider = "tmdb",
            "Mood discovery completed"
        );

        Ok(movies)
    }

    async fn find_by_title(&self, title: &str) -> Option<Movie> {
        match self.search_top_match(title).await {
            Ok(movie) => {
                tracing::debug!(
                    title = %title,
                    matched = movie.is_some(),
                    provider = "tmdb",
                    "Title search completed"
                );
                movie
            }
            Err(e) => {
                tracing::debug!(title = %title, error = %e, "Title search degraded to no match");
                None
            }
        }
    }

    async fn check_reachable(&self) -> bool {
        let Some((api_key, token)) = self.credentials() else {
            tracing::debug!("TMDB credentials missing, reporting unreachable");
            return false;
        };

        let url = format!("{}/configuration", self.api_url);
        match self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(&[("api_key", api_key)])
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "TMDB reachability check failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
