use quiz_core::model::catalog::{DEFAULT_VOICE, LANGUAGES, VOICES};
use quiz_core::model::{
    DEFAULT_QUESTION_COUNT, Difficulty, GameMode, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT,
    QuizSettings, difficulty_for_level,
};

/// Editable state of the start screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartFormVm {
    pub topic: String,
    pub difficulty: Difficulty,
    pub count: u32,
    pub language: String,
    pub voice: String,
    pub mode: GameMode,
}

impl Default for StartFormVm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            difficulty: Difficulty::Medium,
            count: DEFAULT_QUESTION_COUNT,
            language: LANGUAGES.first().copied().unwrap_or("English").to_string(),
            voice: DEFAULT_VOICE.to_string(),
            mode: GameMode::Classic,
        }
    }
}

impl StartFormVm {
    #[must_use]
    pub fn count_options() -> Vec<u32> {
        (MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).collect()
    }

    #[must_use]
    pub fn voice_options() -> &'static [(&'static str, &'static str)] {
        VOICES
    }

    #[must_use]
    pub fn language_options() -> &'static [&'static str] {
        LANGUAGES
    }

    /// Parses a `<select>` value; unknown values keep the current choice.
    pub fn set_difficulty(&mut self, raw: &str) {
        if let Ok(difficulty) = raw.parse() {
            self.difficulty = difficulty;
        }
    }

    pub fn set_count(&mut self, raw: &str) {
        if let Ok(count) = raw.trim().parse::<u32>() {
            self.count = count.clamp(MIN_QUESTION_COUNT, MAX_QUESTION_COUNT);
        }
    }

    pub fn set_mode(&mut self, raw: &str) {
        if let Some(mode) = GameMode::from_str_opt(raw) {
            self.mode = mode;
        }
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    /// Difficulty label for the hint line; campaign follows the level.
    #[must_use]
    pub fn difficulty_hint(&self, level: u32) -> String {
        match self.mode {
            GameMode::Classic => format!("{} · {} questions", self.difficulty, self.count),
            GameMode::Campaign => {
                format!("Level {level} · {} · 5 questions", difficulty_for_level(level))
            }
        }
    }

    #[must_use]
    pub fn to_settings(&self, level: u32) -> QuizSettings {
        let base = match self.mode {
            GameMode::Classic => {
                QuizSettings::classic(self.topic.trim(), self.difficulty, self.count)
            }
            GameMode::Campaign => QuizSettings::campaign(self.topic.trim(), level),
        };
        QuizSettings {
            language: self.language.clone(),
            voice: self.voice.clone(),
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_values_are_parsed_leniently() {
        let mut form = StartFormVm::default();
        form.set_difficulty("hard");
        form.set_count("99");
        form.set_mode("campaign");
        assert_eq!(form.difficulty, Difficulty::Hard);
        assert_eq!(form.count, MAX_QUESTION_COUNT);
        assert_eq!(form.mode, GameMode::Campaign);

        form.set_difficulty("impossible");
        form.set_mode("arcade");
        assert_eq!(form.difficulty, Difficulty::Hard);
        assert_eq!(form.mode, GameMode::Campaign);
    }

    #[test]
    fn campaign_settings_ignore_form_difficulty() {
        let form = StartFormVm {
            topic: "  Jazz ".into(),
            difficulty: Difficulty::Easy,
            mode: GameMode::Campaign,
            voice: "Puck".into(),
            ..StartFormVm::default()
        };
        let settings = form.to_settings(85);
        assert_eq!(settings.topic, "Jazz");
        assert_eq!(settings.level, Some(85));
        assert_eq!(settings.effective_difficulty(), Difficulty::Extreme);
        assert_eq!(settings.voice, "Puck");
    }

    #[test]
    fn blank_topic_cannot_start() {
        assert!(!StartFormVm::default().can_start());
    }
}
