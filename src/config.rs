use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::QuizType;

pub const MAX_QUESTION_COUNT: usize = 50;
pub const LOCALES: [&str; 2] = ["ja", "en"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_quiz_type")]
    pub quiz_type: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Minimum mistakes for a word to count as frequently mistaken.
    #[serde(default = "default_mistake_threshold")]
    pub mistake_threshold: u32,
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
    #[serde(default)]
    pub vocabulary_url: Option<String>,
}

fn default_question_count() -> usize {
    5
}
fn default_quiz_type() -> String {
    "meaning".to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_locale() -> String {
    "ja".to_string()
}
fn default_profile() -> String {
    "default".to_string()
}
fn default_mistake_threshold() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            quiz_type: default_quiz_type(),
            theme: default_theme(),
            locale: default_locale(),
            profile: default_profile(),
            mistake_threshold: default_mistake_threshold(),
            vocabulary_path: None,
            vocabulary_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hanquiz")
            .join("config.toml")
    }

    /// Pull hand-edited or stale values back into range.
    pub fn validate(&mut self) {
        self.question_count = self.question_count.clamp(1, MAX_QUESTION_COUNT);
        self.mistake_threshold = self.mistake_threshold.max(1);
        if QuizType::from_key(&self.quiz_type).is_none() {
            self.quiz_type = default_quiz_type();
        }
        if !LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        if self.profile.trim().is_empty() {
            self.profile = default_profile();
        }
    }

    pub fn default_quiz_type(&self) -> QuizType {
        QuizType::from_key(&self.quiz_type).unwrap_or(QuizType::Meaning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.question_count, 5);
        assert_eq!(config.locale, "ja");
        assert!(config.vocabulary_path.is_none());
    }

    #[test]
    fn test_config_serde_defaults_from_partial_file() {
        let toml_str = r#"
question_count = 12
theme = "terminal-default"
vocabulary_url = "https://example.com/words.csv"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.question_count, 12);
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(
            config.vocabulary_url.as_deref(),
            Some("https://example.com/words.csv")
        );
        assert_eq!(config.quiz_type, "meaning");
        assert_eq!(config.mistake_threshold, 1);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.vocabulary_path = Some(PathBuf::from("/tmp/words.csv"));
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_validate_clamps_and_resets() {
        let mut config = Config {
            question_count: 500,
            quiz_type: "listening".to_string(),
            locale: "fr".to_string(),
            mistake_threshold: 0,
            profile: "  ".to_string(),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.question_count, MAX_QUESTION_COUNT);
        assert_eq!(config.quiz_type, "meaning");
        assert_eq!(config.locale, "ja");
        assert_eq!(config.mistake_threshold, 1);
        assert_eq!(config.profile, "default");

        config.question_count = 0;
        config.validate();
        assert_eq!(config.question_count, 1);
    }

    #[test]
    fn test_validate_keeps_known_values() {
        let mut config = Config {
            quiz_type: "pronunciation".to_string(),
            locale: "en".to_string(),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.default_quiz_type(), QuizType::Pronunciation);
        assert_eq!(config.locale, "en");
    }
}
