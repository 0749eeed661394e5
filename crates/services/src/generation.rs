use async_trait::async_trait;
use quiz_core::model::{Difficulty, Question, QuestionDraft, QuizSettings};
use serde_json::json;

use crate::error::GenerationError;
use crate::gemini::{Content, GeminiClient, GenerateContentRequest};

/// Question count for background drops.
pub const AUTO_DROP_QUESTION_COUNT: u32 = 10;
pub const AUTO_DROP_LANGUAGE: &str = "English";

/// What to ask the generator for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub count: u32,
    pub language: String,
    /// Career level; adds level-specific guidance to the prompt.
    pub level: Option<u32>,
}

impl GenerationRequest {
    #[must_use]
    pub fn from_settings(settings: &QuizSettings) -> Self {
        Self {
            topic: settings.topic.trim().to_string(),
            difficulty: settings.effective_difficulty(),
            count: settings.effective_count(),
            language: settings.language.trim().to_string(),
            level: settings.level,
        }
    }

    /// Request used by the background generator.
    #[must_use]
    pub fn auto_drop(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            difficulty: Difficulty::Medium,
            count: AUTO_DROP_QUESTION_COUNT,
            language: AUTO_DROP_LANGUAGE.into(),
            level: None,
        }
    }
}

/// Source of quiz questions.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns `GenerationError` when no valid question set can be produced.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>, GenerationError>;
}

#[must_use]
pub fn system_instruction(language: &str) -> String {
    format!(
        "You are an expert quiz master. You generate accurate, educational, and fun trivia \
         quizzes in {language}. Your explanations are famous for being clear and very helpful \
         for learning."
    )
}

#[must_use]
pub fn build_prompt(request: &GenerationRequest) -> String {
    let topic = &request.topic;
    let language = &request.language;

    let difficulty_line = match request.difficulty {
        Difficulty::Extreme => format!(
            "Difficulty: Extreme (Very Hard). Focus on obscure facts, deep technical details, \
             rare knowledge, or complex relationships that only an expert in \"{topic}\" would \
             know. Do not ask common or easy questions."
        ),
        other => format!("Difficulty: {other}."),
    };

    let level_block = request
        .level
        .map(|level| {
            format!(
                "This is Level {level} of 100 in a progressive game.\n\
                 - Level 1-20: Beginner/Easy.\n\
                 - Level 21-50: Intermediate/Medium.\n\
                 - Level 51-80: Advanced/Hard.\n\
                 - Level 81-100: Expert/Extreme.\n\
                 Adjust the complexity precisely to match Level {level}.\n"
            )
        })
        .unwrap_or_default();

    format!(
        "Generate a quiz about \"{topic}\".\n\
         Language: {language}.\n\
         {difficulty_line}\n\
         {level_block}\
         Number of questions: {count}.\n\
         Ensure questions are engaging and accurate.\n\
         Provide 4 options for each question.\n\
         IMPORTANT: All questions, options, and explanations MUST be written in {language}.\n\
         \n\
         For the explanation:\n\
         - Make it detailed and educational.\n\
         - Write 2-4 sentences (approx 40-60 words).\n\
         - Explain *why* the answer is correct and provide interesting context.\n\
         - Use simple language so it is easy to understand.",
        count = request.count,
    )
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING", "description": "The question text" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "A list of exactly 4 possible answers"
                },
                "correctAnswer": {
                    "type": "STRING",
                    "description": "The correct answer string, must be exactly equal to one of the options"
                },
                "explanation": {
                    "type": "STRING",
                    "description": "A detailed, educational explanation (30-60 words) helping the user understand the answer clearly."
                }
            },
            "required": ["question", "options", "correctAnswer", "explanation"]
        }
    })
}

/// Parse and validate the JSON array returned by the model.
///
/// Extra questions beyond `limit` are dropped.
///
/// # Errors
///
/// Returns `GenerationError::Malformed` for bad JSON, `InvalidQuestion` for
/// the first question that fails validation, and `Empty` for an empty array.
pub fn parse_questions(text: &str, limit: usize) -> Result<Vec<Question>, GenerationError> {
    let body = strip_code_fence(text);
    let drafts: Vec<QuestionDraft> =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    if drafts.is_empty() {
        return Err(GenerationError::Empty);
    }

    drafts
        .into_iter()
        .take(limit.max(1))
        .enumerate()
        .map(|(index, draft)| {
            draft
                .validate()
                .map_err(|source| GenerationError::InvalidQuestion { index, source })
        })
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Generates questions with the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiQuestionGenerator {
    client: GeminiClient,
}

impl GeminiQuestionGenerator {
    #[must_use]
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.client.enabled()
    }
}

#[async_trait]
impl QuestionGenerator for GeminiQuestionGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>, GenerationError> {
        let model = self
            .client
            .config()
            .map(|config| config.model.clone())
            .ok_or(GenerationError::Disabled)?;

        tracing::info!(
            topic = %request.topic,
            difficulty = %request.difficulty,
            count = request.count,
            "generating quiz"
        );

        let body = GenerateContentRequest {
            contents: vec![Content::user_text(build_prompt(request))],
            system_instruction: Some(Content::system_text(system_instruction(&request.language))),
            generation_config: Some(json!({
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            })),
        };

        let response = self.client.generate_content(&model, &body).await?;
        let text = response.text().ok_or(GenerationError::EmptyResponse)?;
        let limit = usize::try_from(request.count).unwrap_or(usize::MAX);
        let questions = parse_questions(&text, limit)?;

        tracing::debug!(received = questions.len(), "quiz generated");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionError;

    const TWO_QUESTIONS: &str = r#"[
        {"question": "Largest planet?", "options": ["Mars", "Jupiter", "Venus", "Earth"],
         "correctAnswer": "Jupiter", "explanation": "Jupiter is the largest."},
        {"question": "Red planet?", "options": ["Mars", "Jupiter", "Venus", "Earth"],
         "correctAnswer": "Mars", "explanation": "Iron oxide."}
    ]"#;

    #[test]
    fn parses_wire_questions() {
        let questions = parse_questions(TWO_QUESTIONS, 10).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer(), "Jupiter");
        assert_eq!(questions[1].text(), "Red planet?");
    }

    #[test]
    fn extra_questions_are_dropped() {
        assert_eq!(parse_questions(TWO_QUESTIONS, 1).unwrap().len(), 1);
    }

    #[test]
    fn fenced_json_is_accepted() {
        let fenced = format!("```json\n{TWO_QUESTIONS}\n```");
        assert_eq!(parse_questions(&fenced, 10).unwrap().len(), 2);
    }

    #[test]
    fn invalid_question_reports_index() {
        let body = r#"[
            {"question": "Q1", "options": ["a","b","c","d"], "correctAnswer": "a", "explanation": ""},
            {"question": "Q2", "options": ["a","b","c","d"], "correctAnswer": "z", "explanation": ""}
        ]"#;
        let err = parse_questions(body, 10).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidQuestion {
                index: 1,
                source: QuestionError::CorrectAnswerNotAnOption(_)
            }
        ));
    }

    #[test]
    fn empty_and_garbage_are_rejected() {
        assert!(matches!(parse_questions("[]", 5), Err(GenerationError::Empty)));
        assert!(matches!(
            parse_questions("not json", 5),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn prompt_includes_level_guidance_only_for_career() {
        let mut request = GenerationRequest {
            topic: "Black Holes".into(),
            difficulty: Difficulty::Hard,
            count: 5,
            language: "Spanish".into(),
            level: Some(57),
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("Generate a quiz about \"Black Holes\"."));
        assert!(prompt.contains("Difficulty: Hard."));
        assert!(prompt.contains("This is Level 57 of 100"));
        assert!(prompt.contains("MUST be written in Spanish"));
        assert!(prompt.contains("Number of questions: 5."));

        request.level = None;
        assert!(!build_prompt(&request).contains("Level 57"));
    }

    #[test]
    fn extreme_prompt_asks_for_obscure_facts() {
        let request = GenerationRequest {
            difficulty: Difficulty::Extreme,
            ..GenerationRequest::auto_drop("Cryptography")
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("Difficulty: Extreme (Very Hard)"));
        assert!(prompt.contains("an expert in \"Cryptography\""));
    }

    #[test]
    fn settings_map_to_request() {
        let request = GenerationRequest::from_settings(&QuizSettings::campaign(" Chess ", 85));
        assert_eq!(request.topic, "Chess");
        assert_eq!(request.difficulty, Difficulty::Extreme);
        assert_eq!(request.count, 5);
        assert_eq!(request.level, Some(85));
    }

    #[tokio::test]
    async fn disabled_generator_fails_fast() {
        let generator = GeminiQuestionGenerator::new(GeminiClient::new(None));
        assert!(!generator.enabled());
        let err = generator
            .generate(&GenerationRequest::auto_drop("Cats"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Disabled));
    }
}
