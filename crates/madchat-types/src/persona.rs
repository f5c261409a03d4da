//! Persona personality modes.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Which character profile the persona plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityMode {
    #[default]
    Normal,
    Zesty,
}

impl fmt::Display for PersonalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonalityMode::Normal => write!(f, "normal"),
            PersonalityMode::Zesty => write!(f, "zesty"),
        }
    }
}

impl FromStr for PersonalityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(PersonalityMode::Normal),
            "zesty" => Ok(PersonalityMode::Zesty),
            other => Err(format!("invalid personality mode: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_roundtrip() {
        for mode in [PersonalityMode::Normal, PersonalityMode::Zesty] {
            let parsed: PersonalityMode = mode.to_string().parse().unwrap();
            assert_eq!(mode, parsed);
        }
    }

    #[test]
    fn test_mode_parse_is_case_insensitive() {
        assert_eq!("ZESTY".parse::<PersonalityMode>().unwrap(), PersonalityMode::Zesty);
        assert!("sarcastic".parse::<PersonalityMode>().is_err());
    }
}
