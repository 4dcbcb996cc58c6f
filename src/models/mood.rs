use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Emotional state declared by the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Alegria,
    Tristeza,
    Miedo,
    Enojo,
    Asco,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Alegria,
        Mood::Tristeza,
        Mood::Miedo,
        Mood::Enojo,
        Mood::Asco,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Alegria => "alegria",
            Mood::Tristeza => "tristeza",
            Mood::Miedo => "miedo",
            Mood::Enojo => "enojo",
            Mood::Asco => "asco",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL.into_iter().find(|m| m.as_str() == s).ok_or(())
    }
}

/// What the user wants the movie to do to their mood
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Amplify the mood
    Potenciar,
    /// Counteract the mood
    Contrarrestar,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Potenciar, Action::Contrarrestar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Potenciar => "potenciar",
            Action::Contrarrestar => "contrarrestar",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL.into_iter().find(|a| a.as_str() == s).ok_or(())
    }
}

/// Comma-separated list of every accepted value, as shown to callers
pub fn options_list<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_parses_every_label() {
        for mood in Mood::ALL {
            assert_eq!(mood.as_str().parse::<Mood>(), Ok(mood));
        }
        assert!("furia".parse::<Mood>().is_err());
        assert!("Alegria".parse::<Mood>().is_err());
    }

    #[test]
    fn test_action_parses_every_label() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
        assert!("ignorar".parse::<Action>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_labels() {
        assert_eq!(serde_json::to_string(&Mood::Tristeza).unwrap(), "\"tristeza\"");
        assert_eq!(
            serde_json::to_string(&Action::Contrarrestar).unwrap(),
            "\"contrarrestar\""
        );
    }

    #[test]
    fn test_options_list() {
        assert_eq!(
            options_list(&Mood::ALL),
            "alegria, tristeza, miedo, enojo, asco"
        );
        assert_eq!(options_list(&Action::ALL), "potenciar, contrarrestar");
    }
}
