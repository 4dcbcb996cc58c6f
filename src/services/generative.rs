use std::{sync::Arc, time::Duration};

use crate::{
    error::{AppError, AppResult},
    models::{Action, GeneratedMovie, Mood, Movie, MAX_RECOMMENDATIONS},
    services::{
        mood_catalog,
        providers::{MovieCatalog, TextGenerator},
    },
};

/// Recommends movies by asking a text generator for titles
///
/// Every generated title is looked up in the catalog so that known movies
/// come back with real ids, posters and genres. Titles the catalog does not
/// know are kept with a negative placeholder id.
pub struct GenerativeRecommender {
    generator: Arc<dyn TextGenerator>,
    catalog: Arc<dyn MovieCatalog>,
    enrichment_timeout: Duration,
}

impl GenerativeRecommender {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        catalog: Arc<dyn MovieCatalog>,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            catalog,
            enrichment_timeout,
        }
    }

    pub async fn recommend(
        &self,
        mood: Mood,
        action: Action,
        exclude_titles: &[String],
    ) -> AppResult<Vec<Movie>> {
        let description = mood_catalog::description_for(mood, action)?;

        if !self.generator.is_configured() {
            return Err(AppError::CredentialsMissing(format!(
                "{} API key not configured",
                self.generator.name()
            )));
        }

        let prompt = build_prompt(description, exclude_titles);
        let raw = self.generator.generate(&prompt).await?;
        let candidates = parse_candidates(&raw)?;

        tracing::info!(
            mood = %mood,
            action = %action,
            candidates = candidates.len(),
            provider = self.generator.name(),
            "Generated movie candidates"
        );

        Ok(self.enrich(candidates).await)
    }

    /// Looks every candidate up in the catalog concurrently
    ///
    /// Results are reassembled in candidate order; a lookup that fails, times
    /// out or panics counts as "not in the catalog".
    async fn enrich(&self, mut candidates: Vec<GeneratedMovie>) -> Vec<Movie> {
        candidates.truncate(MAX_RECOMMENDATIONS);

        let tasks: Vec<_> = candidates
            .iter()
            .map(|candidate| {
                let catalog = Arc::clone(&self.catalog);
                let title = candidate.title.clone();
                let timeout = self.enrichment_timeout;
                tokio::spawn(async move {
                    tokio::time::timeout(timeout, catalog.find_by_title(&title)).await
                })
            })
            .collect();

        let mut movies = Vec::with_capacity(candidates.len());
        for (index, (candidate, task)) in candidates.into_iter().zip(tasks).enumerate() {
            let matched = match task.await {
                Ok(Ok(matched)) => matched,
                Ok(Err(_)) => {
                    tracing::warn!(
                        title = %candidate.title,
                        timeout_ms = self.enrichment_timeout.as_millis() as u64,
                        "Catalog enrichment timed out"
                    );
                    None
                }
                Err(e) => {
                    tracing::error!(error = %e, title = %candidate.title, "Enrichment task join error");
                    None
                }
            };
            movies.push(merge_candidate(index, candidate, matched));
        }

        let enriched = movies.iter().filter(|m| m.id > 0).count();
        tracing::debug!(
            total = movies.len(),
            enriched,
            catalog = self.catalog.name(),
            "Catalog enrichment completed"
        );

        movies
    }
}

/// Builds the instruction sent to the text generator
pub fn build_prompt(description: &str, exclude_titles: &[String]) -> String {
    let exclusions = if exclude_titles.is_empty() {
        String::new()
    } else {
        format!("No incluyas estas películas: {}.", exclude_titles.join(", "))
    };

    format!(
        r#"Eres un experto en cine. Recomienda exactamente {count} películas que sean {description}.

{exclusions}

Responde SOLO con un JSON array válido con este formato exacto, sin texto adicional ni markdown:
[
  {{
    "title": "Nombre de la película",
    "overview": "Breve descripción de la película en español",
    "release_date": "YYYY",
    "vote_average": 7.5
  }}
]

Las películas deben ser reales, populares y bien valoradas. La descripción debe ser en español y atractiva."#,
        count = MAX_RECOMMENDATIONS,
    )
}

/// Removes markdown code fences the model may wrap its JSON in
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Parses the generator's answer into candidates
pub fn parse_candidates(raw: &str) -> AppResult<Vec<GeneratedMovie>> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        tracing::error!(error = %e, response = %raw, "Failed to parse generated movies");
        AppError::MalformedResponse(format!("Could not parse generated movies: {}", e))
    })
}

/// Combines a generated candidate with its catalog match, if any
///
/// The catalog record is kept as-is except for the overview, where the
/// generated text wins unless it is empty. Unmatched candidates get id
/// `-(index + 1)`.
pub fn merge_candidate(index: usize, candidate: GeneratedMovie, matched: Option<Movie>) -> Movie {
    match matched {
        Some(movie) => Movie {
            id: movie.id,
            title: movie.title,
            overview: if candidate.overview.is_empty() {
                movie.overview
            } else {
                candidate.overview
            },
            poster_path: movie.poster_path,
            release_date: movie.release_date,
            vote_average: movie.vote_average,
            genre_ids: movie.genre_ids,
        },
        None => Movie {
            id: -(index as i64 + 1),
            title: candidate.title,
            overview: candidate.overview,
            poster_path: None,
            release_date: candidate.release_date,
            vote_average: candidate.vote_average,
            genre_ids: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{MockMovieCatalog, MockTextGenerator};

    const CANDIDATES: &str = r#"[
        {"title": "Up", "overview": "Un anciano vuela su casa con globos.", "release_date": "2009", "vote_average": 8.2},
        {"title": "Paddington", "overview": "Un oso llega a Londres.", "release_date": "2014", "vote_average": 7.3},
        {"title": "Película Inventada", "overview": "No existe.", "release_date": "2021", "vote_average": 6.0}
    ]"#;

    fn catalog_movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: "Sinopsis de TMDB".to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            release_date: "2009-05-28".to_string(),
            vote_average: 7.9,
            genre_ids: Some(vec![16, 10751]),
        }
    }

    fn candidate(title: &str, overview: &str) -> GeneratedMovie {
        GeneratedMovie {
            title: title.to_string(),
            overview: overview.to_string(),
            release_date: "2009".to_string(),
            vote_average: 8.0,
        }
    }

    fn configured_generator(answer: &'static str) -> MockTextGenerator {
        let mut generator = MockTextGenerator::new();
        generator.expect_is_configured().return_const(true);
        generator.expect_name().return_const("gemini");
        generator
            .expect_generate()
            .times(1)
            .returning(move |_| Ok(answer.to_string()));
        generator
    }

    /// Catalog whose title lookups finish in reverse order of issue
    struct SlowCatalog;

    #[async_trait::async_trait]
    impl MovieCatalog for SlowCatalog {
        async fn find_by_mood(
            &self,
            _mood: Mood,
            _action: Action,
            _exclude_ids: &[i64],
        ) -> AppResult<Vec<Movie>> {
            Ok(vec![])
        }

        async fn find_by_title(&self, title: &str) -> Option<Movie> {
            let delay = match title {
                "Up" => 120,
                "Paddington" => 60,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            match title {
                "Up" => Some(catalog_movie(14160, "Up")),
                "Paddington" => Some(catalog_movie(116149, "Paddington")),
                _ => None,
            }
        }

        async fn check_reachable(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[test]
    fn test_strip_code_fences() {
        let bare = r#"[{"title": "Up"}]"#;
        assert_eq!(strip_code_fences(bare), bare);
        assert_eq!(strip_code_fences(&format!("```json\n{}\n```", bare)), bare);
        assert_eq!(strip_code_fences(&format!("```\n{}\n```\n", bare)), bare);
        assert_eq!(strip_code_fences(&format!("  {}  ", bare)), bare);
    }

    #[test]
    fn test_fenced_and_bare_answers_parse_identically() {
        let fenced = format!("```json\n{}\n```", CANDIDATES);
        assert_eq!(
            parse_candidates(&fenced).unwrap(),
            parse_candidates(CANDIDATES).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = parse_candidates("Aquí tienes algunas películas: Up, Paddington");
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));

        let result = parse_candidates(r#"{"title": "Up"}"#);
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn test_prompt_mentions_description_and_exclusions() {
        let prompt = build_prompt("películas de terror", &[]);
        assert!(prompt.contains("exactamente 5 películas que sean películas de terror"));
        assert!(!prompt.contains("No incluyas"));

        let excluded = vec!["Alien".to_string(), "It".to_string()];
        let prompt = build_prompt("películas de terror", &excluded);
        assert!(prompt.contains("No incluyas estas películas: Alien, It."));
        assert!(prompt.contains("\"vote_average\": 7.5"));
    }

    #[test]
    fn test_merge_prefers_generated_overview() {
        let merged = merge_candidate(
            0,
            candidate("Up", "Texto generado"),
            Some(catalog_movie(14160, "Up")),
        );
        assert_eq!(merged.id, 14160);
        assert_eq!(merged.overview, "Texto generado");
        assert_eq!(merged.poster_path.as_deref(), Some("/14160.jpg"));
        assert_eq!(merged.release_date, "2009-05-28");
        assert_eq!(merged.genre_ids, Some(vec![16, 10751]));
    }

    #[test]
    fn test_merge_keeps_catalog_overview_when_generated_is_empty() {
        let merged = merge_candidate(0, candidate("Up", ""), Some(catalog_movie(14160, "Up")));
        assert_eq!(merged.overview, "Sinopsis de TMDB");
    }

    #[test]
    fn test_merge_without_match_uses_negative_position() {
        let merged = merge_candidate(3, candidate("Desconocida", "Algo"), None);
        assert_eq!(merged.id, -4);
        assert_eq!(merged.title, "Desconocida");
        assert_eq!(merged.release_date, "2009");
        assert_eq!(merged.poster_path, None);
        assert_eq!(merged.genre_ids, None);
    }

    #[tokio::test]
    async fn test_recommend_preserves_candidate_order() {
        let recommender = GenerativeRecommender::new(
            Arc::new(configured_generator(CANDIDATES)),
            Arc::new(SlowCatalog),
            Duration::from_secs(5),
        );

        let movies = recommender
            .recommend(Mood::Tristeza, Action::Contrarrestar, &[])
            .await
            .unwrap();

        let ids: Vec<i64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![14160, 116149, -3]);
        assert_eq!(movies[0].overview, "Un anciano vuela su casa con globos.");
        assert_eq!(movies[2].title, "Película Inventada");
    }

    #[tokio::test]
    async fn test_recommend_truncates_to_five() {
        const SEVEN: &str = r#"```json
        [
            {"title": "A", "overview": "a", "release_date": "2001", "vote_average": 7},
            {"title": "B", "overview": "b", "release_date": "2002", "vote_average": 7},
            {"title": "C", "overview": "c", "release_date": "2003", "vote_average": 7},
            {"title": "D", "overview": "d", "release_date": "2004", "vote_average": 7},
            {"title": "E", "overview": "e", "release_date": "2005", "vote_average": 7},
            {"title": "F", "overview": "f", "release_date": "2006", "vote_average": 7},
            {"title": "G", "overview": "g", "release_date": "2007", "vote_average": 7}
        ]
        ```"#;

        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog.expect_find_by_title().times(5).returning(|_| None);
        catalog.expect_find_by_mood().never();

        let recommender = GenerativeRecommender::new(
            Arc::new(configured_generator(SEVEN)),
            Arc::new(catalog),
            Duration::from_secs(5),
        );

        let movies = recommender
            .recommend(Mood::Alegria, Action::Potenciar, &[])
            .await
            .unwrap();

        let ids: Vec<i64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![-1, -2, -3, -4, -5]);
    }

    #[tokio::test]
    async fn test_recommend_slow_enrichment_degrades_to_placeholder() {
        let recommender = GenerativeRecommender::new(
            Arc::new(configured_generator(CANDIDATES)),
            Arc::new(SlowCatalog),
            Duration::from_millis(30),
        );

        let movies = recommender
            .recommend(Mood::Miedo, Action::Contrarrestar, &[])
            .await
            .unwrap();

        let ids: Vec<i64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![-1, -2, -3]);
    }

    #[tokio::test]
    async fn test_recommend_without_key_never_calls_generator() {
        let mut generator = MockTextGenerator::new();
        generator.expect_is_configured().return_const(false);
        generator.expect_name().return_const("gemini");
        generator.expect_generate().never();

        let recommender = GenerativeRecommender::new(
            Arc::new(generator),
            Arc::new(MockMovieCatalog::new()),
            Duration::from_secs(5),
        );

        let result = recommender.recommend(Mood::Enojo, Action::Potenciar, &[]).await;
        assert!(matches!(result, Err(AppError::CredentialsMissing(_))));
    }

    #[tokio::test]
    async fn test_recommend_malformed_answer_skips_enrichment() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_find_by_title().never();

        let recommender = GenerativeRecommender::new(
            Arc::new(configured_generator("Lo siento, no puedo ayudarte con eso.")),
            Arc::new(catalog),
            Duration::from_secs(5),
        );

        let result = recommender.recommend(Mood::Asco, Action::Potenciar, &[]).await;
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }
}
