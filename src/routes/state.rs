use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        generative::GenerativeRecommender,
        providers::{GeminiProvider, MovieCatalog, TextGenerator, TmdbProvider},
        recommendations::RecommendationService,
    },
};

/// Shared application state
///
/// Holds only immutable, shareable handles; no request writes to it.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    /// Wires the orchestrator on top of the given upstreams
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        generator: Arc<dyn TextGenerator>,
        enrichment_timeout: std::time::Duration,
    ) -> Self {
        let recommender = GenerativeRecommender::new(
            generator,
            Arc::clone(&catalog),
            enrichment_timeout,
        );
        let recommendations =
            RecommendationService::new(Arc::clone(&catalog), Arc::new(recommender));

        Self {
            catalog,
            recommendations: Arc::new(recommendations),
        }
    }

    /// Builds the TMDB and Gemini clients described by the configuration
    pub fn from_config(config: &Config) -> Self {
        let catalog = TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_access_token.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
        );
        let generator = GeminiProvider::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        );

        Self::new(
            Arc::new(catalog),
            Arc::new(generator),
            config.enrichment_timeout(),
        )
    }
}
