use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{options_list, Action, Mood, Movie, RecommendationResponse, RecommendationSource},
    services::{generative::GenerativeRecommender, providers::MovieCatalog},
};

/// Chooses between catalog and generated recommendations
///
/// Catalog-first requests fall back to the generator once, either when the
/// catalog is unreachable or when the discovery call fails. Errors on the
/// generator path are never caught here.
pub struct RecommendationService {
    catalog: Arc<dyn MovieCatalog>,
    recommender: Arc<GenerativeRecommender>,
}

impl RecommendationService {
    pub fn new(catalog: Arc<dyn MovieCatalog>, recommender: Arc<GenerativeRecommender>) -> Self {
        Self {
            catalog,
            recommender,
        }
    }

    pub async fn get_recommendations(
        &self,
        mood: &str,
        action: &str,
        preferred_source: &str,
        exclude_movies: &[i64],
    ) -> AppResult<RecommendationResponse> {
        let (mood, action) = validate(mood, action)?;

        match RecommendationSource::from_preference(preferred_source) {
            RecommendationSource::Tmdb => {
                match self.from_catalog(mood, action, exclude_movies).await {
                    Ok(movies) => Ok(RecommendationResponse {
                        movies,
                        source: RecommendationSource::Tmdb,
                        fallback: false,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            catalog = self.catalog.name(),
                            "Catalog failed, falling back to generated recommendations"
                        );
                        self.from_generator(mood, action, true).await
                    }
                }
            }
            RecommendationSource::Ai => self.from_generator(mood, action, false).await,
        }
    }

    async fn from_catalog(
        &self,
        mood: Mood,
        action: Action,
        exclude_movies: &[i64],
    ) -> AppResult<Vec<Movie>> {
        if !self.catalog.check_reachable().await {
            return Err(AppError::UpstreamUnavailable(format!(
                "{} is not reachable",
                self.catalog.name()
            )));
        }

        self.catalog.find_by_mood(mood, action, exclude_movies).await
    }

    // Title exclusions are not forwarded: re-rolls only exclude catalog ids.
    async fn from_generator(
        &self,
        mood: Mood,
        action: Action,
        fallback: bool,
    ) -> AppResult<RecommendationResponse> {
        let movies = self.recommender.recommend(mood, action, &[]).await?;
        Ok(RecommendationResponse {
            movies,
            source: RecommendationSource::Ai,
            fallback,
        })
    }
}

/// Parses mood and action, reporting the accepted values on failure
pub fn validate(mood: &str, action: &str) -> AppResult<(Mood, Action)> {
    let mood: Mood = mood.parse().map_err(|_| {
        AppError::InvalidInput(format!(
            "Mood inválido. Opciones: {}",
            options_list(&Mood::ALL)
        ))
    })?;

    let action: Action = action.parse().map_err(|_| {
        AppError::InvalidInput(format!(
            "Acción inválida. Opciones: {}",
            options_list(&Action::ALL)
        ))
    })?;

    Ok((mood, action))
}
