//! Generation Adapter - practice questions and tutoring chat.
//!
//! Each public operation makes a single remote attempt and never fails: any
//! upstream problem is logged and answered with deterministic local content.
//! The `try_*` variants expose the underlying [`GenerationError`] for callers
//! that want to know whether the provider answered.

mod extract;
mod fallback;
mod gemini;
mod prompts;

pub use extract::*;
pub use fallback::*;
pub use gemini::*;
pub use prompts::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GenerationConfig;

/// A multiple-choice practice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Requested difficulty of generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuestionDifficulty {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl QuestionDifficulty {
    /// Map a numeric level: 1 is beginner, 3 is expert, anything else is
    /// intermediate.
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => QuestionDifficulty::Beginner,
            3 => QuestionDifficulty::Expert,
            _ => QuestionDifficulty::Intermediate,
        }
    }

    /// Wording used in prompts.
    pub fn describe(&self) -> &'static str {
        match self {
            QuestionDifficulty::Beginner => "beginner/introductory",
            QuestionDifficulty::Intermediate => "intermediate",
            QuestionDifficulty::Expert => "expert/advanced",
        }
    }
}

/// Why a remote generation attempt produced nothing usable.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// No API key is configured; the provider is never contacted.
    #[error("Generation provider not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered, but not with anything we can use.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Sampling parameters forwarded to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

/// One request to a text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// `None` leaves the provider defaults in place.
    pub sampling: Option<Sampling>,
}

/// A remote text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt. Exactly one attempt, no retries.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Question and chat generation with fallbacks.
#[derive(Clone)]
pub struct GenerationAdapter {
    generator: Option<Arc<dyn TextGenerator>>,
    sampling: Sampling,
}

impl GenerationAdapter {
    /// Create an adapter over a generator.
    pub fn new(generator: Arc<dyn TextGenerator>, sampling: Sampling) -> Self {
        Self {
            generator: Some(generator),
            sampling,
        }
    }

    /// Create an adapter that always answers locally.
    pub fn offline() -> Self {
        Self {
            generator: None,
            sampling: GenerationConfig::default().sampling(),
        }
    }

    /// Build the adapter described by a configuration.
    ///
    /// An empty API key, or a client that cannot be built, yields an offline
    /// adapter.
    pub fn from_config(config: &GenerationConfig) -> Self {
        match GeminiClient::new(config) {
            Ok(client) => Self::new(Arc::new(client), config.sampling()),
            Err(GenerationError::NotConfigured) => {
                debug!("No generation API key configured, using local content");
                Self::offline()
            }
            Err(e) => {
                warn!("Failed to build generation client, using local content: {}", e);
                Self::offline()
            }
        }
    }

    /// Whether a remote provider is configured.
    pub fn is_online(&self) -> bool {
        self.generator.is_some()
    }

    fn generator(&self) -> Result<&Arc<dyn TextGenerator>, GenerationError> {
        self.generator.as_ref().ok_or(GenerationError::NotConfigured)
    }

    /// Ask the provider for questions about a topic.
    pub async fn try_generate_questions(
        &self,
        topic: &str,
        difficulty: QuestionDifficulty,
    ) -> Result<Vec<Question>, GenerationError> {
        let generator = self.generator()?;
        let request = GenerationRequest {
            prompt: question_prompt(topic, difficulty, &variation_nonce()),
            sampling: Some(self.sampling),
        };

        let text = generator.generate(&request).await?;
        parse_questions(&text)
    }

    /// Questions about a topic, from the provider or from the local templates.
    pub async fn generate_questions(
        &self,
        topic: &str,
        difficulty: QuestionDifficulty,
    ) -> Vec<Question> {
        match self.try_generate_questions(topic, difficulty).await {
            Ok(questions) => {
                debug!(topic, count = questions.len(), "Generated questions");
                questions
            }
            Err(GenerationError::NotConfigured) => fallback_questions(topic),
            Err(e) => {
                warn!(topic, "Question generation failed, using local questions: {}", e);
                fallback_questions(topic)
            }
        }
    }

    /// Ask the provider for a tutoring reply.
    pub async fn try_chat_response(
        &self,
        message: &str,
        context_unit: Option<&str>,
    ) -> Result<String, GenerationError> {
        let generator = self.generator()?;
        let request = GenerationRequest {
            prompt: chat_prompt(message, context_unit),
            sampling: None,
        };

        let text = generator.generate(&request).await?;
        let reply = text.trim();
        if reply.is_empty() {
            return Err(GenerationError::MalformedResponse(
                "empty chat reply".to_string(),
            ));
        }
        Ok(reply.to_string())
    }

    /// A tutoring reply, or a canned local answer when the provider is absent
    /// or failing.
    pub async fn chat_response(&self, message: &str, context_unit: Option<&str>) -> String {
        match self.try_chat_response(message, context_unit).await {
            Ok(reply) => reply,
            Err(GenerationError::NotConfigured) => offline_chat_reply(message),
            Err(e) => {
                warn!("Chat generation failed: {}", e);
                chat_apology(message, context_unit)
            }
        }
    }
}

impl std::fmt::Debug for GenerationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationAdapter")
            .field("online", &self.is_online())
            .field("sampling", &self.sampling)
            .finish()
    }
}

fn variation_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed answer and remembers the prompts it was given.
    struct ScriptedGenerator {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(GenerationError::Status {
                    status: *status,
                    body: "unavailable".to_string(),
                }),
            }
        }
    }

    fn adapter(generator: Arc<ScriptedGenerator>) -> GenerationAdapter {
        GenerationAdapter::new(generator, GenerationConfig::default().sampling())
    }

    #[test]
    fn test_difficulty_levels() {
        assert_eq!(QuestionDifficulty::from_level(1), QuestionDifficulty::Beginner);
        assert_eq!(QuestionDifficulty::from_level(2), QuestionDifficulty::Intermediate);
        assert_eq!(QuestionDifficulty::from_level(3), QuestionDifficulty::Expert);
        assert_eq!(QuestionDifficulty::from_level(7), QuestionDifficulty::Intermediate);
        assert_eq!(QuestionDifficulty::default().describe(), "intermediate");
    }

    #[tokio::test]
    async fn test_questions_from_provider() {
        let generator = ScriptedGenerator::replying(
            r#"Sure! Here you go:
            [{"question": "What is 2+2?", "options": ["3", "4"], "correct_answer": "4", "explanation": "Arithmetic."}]
            Good luck!"#,
        );
        let adapter = adapter(generator.clone());

        let questions = adapter
            .generate_questions("Arithmetic", QuestionDifficulty::Beginner)
            .await;
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer, "4");

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].prompt.contains("\"Arithmetic\""));
        assert!(prompts[0].prompt.contains("beginner/introductory"));
        assert_eq!(prompts[0].sampling.unwrap().top_k, 40);
    }

    #[tokio::test]
    async fn test_questions_fall_back_on_provider_error() {
        let adapter = adapter(ScriptedGenerator::failing(503));

        let err = adapter
            .try_generate_questions("Geometry", QuestionDifficulty::Expert)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Status { status: 503, .. }));

        let questions = adapter
            .generate_questions("Geometry", QuestionDifficulty::Expert)
            .await;
        assert_eq!(questions, fallback_questions("Geometry"));
    }

    #[tokio::test]
    async fn test_questions_fall_back_on_prose() {
        let adapter = adapter(ScriptedGenerator::replying("I cannot help with that."));
        let questions = adapter
            .generate_questions("Calculus", QuestionDifficulty::Intermediate)
            .await;
        assert_eq!(questions, fallback_questions("Calculus"));
    }

    #[tokio::test]
    async fn test_offline_adapter() {
        let adapter = GenerationAdapter::offline();
        assert!(!adapter.is_online());

        let questions = adapter
            .generate_questions("Optics", QuestionDifficulty::Beginner)
            .await;
        assert_eq!(questions.len(), 3);
        assert!(questions[0].question.contains("Optics"));

        let reply = adapter.chat_response("What is light?", None).await;
        assert_eq!(reply, offline_chat_reply("What is light?"));
    }

    #[tokio::test]
    async fn test_chat_reply() {
        let generator = ScriptedGenerator::replying("  Light is an electromagnetic wave.  \n");
        let adapter = adapter(generator.clone());

        let reply = adapter
            .chat_response("What is light?", Some("Optics 101"))
            .await;
        assert_eq!(reply, "Light is an electromagnetic wave.");

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].prompt.contains("Optics 101"));
        assert!(prompts[0].sampling.is_none());
    }

    #[tokio::test]
    async fn test_chat_failure_apologizes() {
        let adapter = adapter(ScriptedGenerator::failing(500));
        let reply = adapter
            .chat_response("What is light?", Some("Optics 101"))
            .await;
        assert_eq!(reply, chat_apology("What is light?", Some("Optics 101")));
        assert!(reply.contains("Optics 101"));
    }

    #[tokio::test]
    async fn test_empty_chat_reply_is_a_failure() {
        let adapter = adapter(ScriptedGenerator::replying("   "));
        assert!(matches!(
            adapter.try_chat_response("Hi", None).await,
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_from_config_without_key_is_offline() {
        let config = GenerationConfig {
            api_key: String::new(),
            ..Default::default()
        };
        assert!(!GenerationAdapter::from_config(&config).is_online());
    }

    #[test]
    fn test_from_config_with_key_is_online() {
        let config = GenerationConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        };
        assert!(GenerationAdapter::from_config(&config).is_online());
    }
}
