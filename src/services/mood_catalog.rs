//! Static mood table: which TMDB genres and which tone each (mood, action)
//! pair asks for.

use crate::{
    error::{AppError, AppResult},
    models::{Action, Mood},
};

// TMDB genre ids
const ACTION: u32 = 28;
const ADVENTURE: u32 = 12;
const ANIMATION: u32 = 16;
const COMEDY: u32 = 35;
const CRIME: u32 = 80;
const DRAMA: u32 = 18;
const FAMILY: u32 = 10751;
const FANTASY: u32 = 14;
const HORROR: u32 = 27;
const MUSIC: u32 = 10402;
const ROMANCE: u32 = 10749;
const SCIENCE_FICTION: u32 = 878;
const THRILLER: u32 = 53;

/// Genres and tone for one (mood, action) pair
#[derive(Debug)]
pub struct MoodProfile {
    pub mood: Mood,
    pub action: Action,
    pub genres: &'static [u32],
    pub description: &'static str,
}

static MOOD_PROFILES: [MoodProfile; 10] = [
    MoodProfile {
        mood: Mood::Alegria,
        action: Action::Potenciar,
        genres: &[COMEDY, MUSIC, ANIMATION],
        description: "películas que aumenten la alegría, felicidad y buen humor",
    },
    MoodProfile {
        mood: Mood::Alegria,
        action: Action::Contrarrestar,
        genres: &[DRAMA, ROMANCE],
        description: "películas más serias o reflexivas para equilibrar el estado de alegría",
    },
    MoodProfile {
        mood: Mood::Tristeza,
        action: Action::Potenciar,
        genres: &[DRAMA, ROMANCE],
        description: "películas emotivas y melancólicas que acompañen el momento de tristeza",
    },
    MoodProfile {
        mood: Mood::Tristeza,
        action: Action::Contrarrestar,
        genres: &[COMEDY, MUSIC, ADVENTURE],
        description: "películas alegres, divertidas y optimistas para levantar el ánimo",
    },
    MoodProfile {
        mood: Mood::Miedo,
        action: Action::Potenciar,
        genres: &[HORROR, THRILLER],
        description: "películas de terror, suspenso o thrillers intensos",
    },
    MoodProfile {
        mood: Mood::Miedo,
        action: Action::Contrarrestar,
        genres: &[COMEDY, FAMILY, ANIMATION],
        description: "películas ligeras, familiares y reconfortantes para aliviar el miedo",
    },
    MoodProfile {
        mood: Mood::Enojo,
        action: Action::Potenciar,
        genres: &[ACTION, CRIME],
        description: "películas de acción intensa o con temáticas de justicia y confrontación",
    },
    MoodProfile {
        mood: Mood::Enojo,
        action: Action::Contrarrestar,
        genres: &[COMEDY, FAMILY, ROMANCE],
        description: "películas calmadas, comedias ligeras o historias de paz y reconciliación",
    },
    MoodProfile {
        mood: Mood::Asco,
        action: Action::Potenciar,
        genres: &[HORROR, SCIENCE_FICTION],
        description: "películas perturbadoras o con elementos grotescos",
    },
    MoodProfile {
        mood: Mood::Asco,
        action: Action::Contrarrestar,
        genres: &[FAMILY, FANTASY, ANIMATION],
        description: "películas hermosas, inspiradoras y estéticamente agradables",
    },
];

/// Looks up the profile for a pair
///
/// A miss means the table above is incomplete, which is a configuration
/// error rather than bad user input.
pub fn profile_for(mood: Mood, action: Action) -> AppResult<&'static MoodProfile> {
    MOOD_PROFILES
        .iter()
        .find(|p| p.mood == mood && p.action == action)
        .ok_or_else(|| {
            AppError::Configuration(format!("Invalid mood or action: {}/{}", mood, action))
        })
}

/// TMDB genre ids to discover for a pair
pub fn genres_for(mood: Mood, action: Action) -> AppResult<&'static [u32]> {
    profile_for(mood, action).map(|p| p.genres)
}

/// Tone description handed to the text generator
pub fn description_for(mood: Mood, action: Action) -> AppResult<&'static str> {
    profile_for(mood, action).map(|p| p.description)
}
