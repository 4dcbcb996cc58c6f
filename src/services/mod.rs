pub mod generative;
pub mod mood_catalog;
pub mod providers;
pub mod recommendations;

pub use generative::GenerativeRecommender;
pub use recommendations::RecommendationService;
