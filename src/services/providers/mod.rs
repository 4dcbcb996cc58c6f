/// Upstream service abstractions
///
/// The recommendation logic talks to two external services: a movie catalog
/// (TMDB) and a text generator (Gemini). Each sits behind a trait so the
/// orchestrator can be exercised against fakes and the concrete clients can
/// be swapped without touching routing or fallback rules.
use crate::{
    error::AppResult,
    models::{Action, Mood, Movie},
};

pub mod gemini;
pub mod tmdb;

pub use gemini::GeminiProvider;
pub use tmdb::TmdbProvider;

/// Movie catalog queried by genre or title
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Popular, well-rated movies for the genres mapped to a mood
    ///
    /// Movies whose id is in `exclude_ids` are dropped before truncating to at
    /// most five, in the catalog's own popularity order.
    async fn find_by_mood(
        &self,
        mood: Mood,
        action: Action,
        exclude_ids: &[i64],
    ) -> AppResult<Vec<Movie>>;

    /// Best catalog match for a free-text title
    ///
    /// Best-effort: every failure degrades to `None`.
    async fn find_by_title(&self, title: &str) -> Option<Movie>;

    /// Whether the catalog answers with the configured credentials
    async fn check_reachable(&self) -> bool;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Free-form text generation from a single prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether an API key is available
    fn is_configured(&self) -> bool;

    /// Sends one prompt and returns the raw text answer
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
