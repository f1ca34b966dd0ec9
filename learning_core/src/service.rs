//! Service facade - the operations request handlers call.
//!
//! Wires the engine, the stores, the generation adapter and the interaction
//! log together. Handlers stay thin: they parse a request, call one method here
//! and serialize the result.

use learning_rules::{
    ContentUnit, LearnerId, LearnerProfile, LearnerRecord, PreferenceUpdate, RuleSet, SharedRules,
    UnitId,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::TutorConfig;
use crate::error::{Result, TutorError};
use crate::generation::{GenerationAdapter, Question, QuestionDifficulty};
use crate::personalization::PersonalizationEngine;
use crate::store::{
    CatalogStore, InMemoryCatalog, InMemoryHistory, InMemoryProfiles, Interaction,
    InteractionKind, InteractionLog, ProfileStore,
};

/// Learner counts for the instructor dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CohortSummary {
    pub total_learners: usize,
    pub by_style: BTreeMap<String, usize>,
}

/// Entry point for learner-facing and instructor-facing operations.
#[derive(Clone)]
pub struct TutorService {
    engine: PersonalizationEngine,
    catalog: Arc<dyn CatalogStore>,
    profiles: Arc<dyn ProfileStore>,
    history: Arc<dyn InteractionLog>,
    generation: GenerationAdapter,
}

impl TutorService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        profiles: Arc<dyn ProfileStore>,
        history: Arc<dyn InteractionLog>,
        rules: SharedRules,
        generation: GenerationAdapter,
    ) -> Self {
        Self {
            engine: PersonalizationEngine::new(catalog.clone(), rules),
            catalog,
            profiles,
            history,
            generation,
        }
    }

    /// Build a service with in-memory stores seeded from the configured files.
    pub fn from_config(config: &TutorConfig) -> Result<Self> {
        let rules = RuleSet::load(&config.rules_path)?.into_shared();
        let catalog = InMemoryCatalog::load(&config.catalog_path)?;
        let profiles = match &config.learners_path {
            Some(path) => InMemoryProfiles::load(path)?,
            None => InMemoryProfiles::new(),
        };

        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(profiles),
            Arc::new(InMemoryHistory::new()),
            rules,
            GenerationAdapter::from_config(&config.generation),
        ))
    }

    pub fn engine(&self) -> &PersonalizationEngine {
        &self.engine
    }

    pub fn generation(&self) -> &GenerationAdapter {
        &self.generation
    }

    async fn learner(&self, id: &LearnerId) -> Result<LearnerRecord> {
        self.profiles
            .fetch_learner(id)
            .await?
            .ok_or_else(|| TutorError::LearnerNotFound(id.clone()))
    }

    /// The learning path shown on a learner's dashboard.
    pub async fn dashboard_path(&self, learner: &LearnerId) -> Result<Vec<ContentUnit>> {
        let record = self.learner(learner).await?;
        self.engine.generate_path(&record.profile).await
    }

    /// Open a unit, counting the view.
    ///
    /// The view counter is best effort: a failed increment is logged and the
    /// unit is still returned. A missing unit is reported by the fetch alone.
    pub async fn open_unit(&self, id: &UnitId) -> Result<ContentUnit> {
        match self.catalog.record_view(id).await {
            Ok(()) | Err(TutorError::UnitNotFound(_)) => {}
            Err(e) => warn!(unit = %id, "Failed to record unit view: {}", e),
        }

        self.catalog
            .fetch_unit(id)
            .await?
            .ok_or_else(|| TutorError::UnitNotFound(id.clone()))
    }

    /// Practice questions for a learner, logged to their history.
    pub async fn generate_questions(
        &self,
        learner: &LearnerId,
        topic: &str,
        difficulty: QuestionDifficulty,
    ) -> Vec<Question> {
        let questions = self.generation.generate_questions(topic, difficulty).await;

        self.log(Interaction::new(
            learner.clone(),
            InteractionKind::GeneratedQuestions {
                topic: topic.to_string(),
                questions: questions.clone(),
            },
        ))
        .await;

        questions
    }

    /// A tutoring reply for a learner, logged to their history.
    pub async fn chat(
        &self,
        learner: &LearnerId,
        message: &str,
        context_unit: Option<&str>,
    ) -> String {
        let response = self.generation.chat_response(message, context_unit).await;

        self.log(Interaction::new(
            learner.clone(),
            InteractionKind::Chat {
                message: message.to_string(),
                response: response.clone(),
                context_unit: context_unit.map(str::to_string),
            },
        ))
        .await;

        response
    }

    async fn log(&self, interaction: Interaction) {
        let learner = interaction.learner.clone();
        if let Err(e) = self.history.record(interaction).await {
            warn!(learner = %learner, "Failed to record interaction: {}", e);
        }
    }

    /// Interactions of one learner, oldest first.
    pub async fn history(&self, learner: &LearnerId) -> Result<Vec<Interaction>> {
        self.history.history_for(learner).await
    }

    /// Change a learner's style, pacing or level.
    pub async fn update_preferences(
        &self,
        learner: &LearnerId,
        update: &PreferenceUpdate,
    ) -> Result<LearnerRecord> {
        let record = self.profiles.update_preferences(learner, update).await?;
        info!(
            learner = %learner,
            style = %record.profile.learning_style,
            pacing = %record.profile.pacing,
            level = record.profile.current_level,
            "Updated preferences"
        );
        Ok(record)
    }

    /// Create a learner with the default profile.
    pub async fn register_learner(&self, name: &str, email: &str) -> Result<LearnerRecord> {
        let record = LearnerRecord::new(name.trim(), email.trim())
            .with_profile(LearnerProfile::default());

        self.profiles.insert_learner(record.clone()).await?;
        info!(learner = %record.id, "Registered learner");
        Ok(record)
    }

    /// Total learners and how many use each learning style.
    pub async fn cohort_summary(&self) -> Result<CohortSummary> {
        let learners = self.profiles.list_learners().await?;

        let mut by_style = BTreeMap::new();
        for learner in &learners {
            *by_style
                .entry(learner.profile.learning_style.clone())
                .or_insert(0) += 1;
        }

        Ok(CohortSummary {
            total_learners: learners.len(),
            by_style,
        })
    }
}

impl std::fmt::Debug for TutorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorService")
            .field("engine", &self.engine)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{chat_apology, fallback_questions, offline_chat_reply};
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct BrokenLog;

    #[async_trait]
    impl InteractionLog for BrokenLog {
        async fn record(&self, _interaction: Interaction) -> Result<()> {
            Err(TutorError::StoreUnavailable("disk full".to_string()))
        }

        async fn history_for(&self, _learner: &LearnerId) -> Result<Vec<Interaction>> {
            Err(TutorError::StoreUnavailable("disk full".to_string()))
        }
    }

    fn rules() -> SharedRules {
        RuleSet::from_json_value(json!({
            "learning_styles": {
                "visual": { "boost_tags": ["visual"], "penalty_tags": ["text"] }
            },
            "pacing_multipliers": { "slow": 0.5, "moderate": 1, "fast": 1.5 },
            "default_path_length": 2
        }))
        .unwrap()
        .into_shared()
    }

    fn units() -> Vec<ContentUnit> {
        vec![
            ContentUnit::new("unit0", "Shapes").with_difficulty(1).with_tag("visual"),
            ContentUnit::new("unit1", "Reading").with_difficulty(2).with_tag("text"),
            ContentUnit::new("unit2", "Numbers").with_difficulty(3),
        ]
    }

    fn ada() -> LearnerRecord {
        LearnerRecord::new("Ada", "ada@example.com").with_id("u1")
    }

    fn service_with_log(history: Arc<dyn InteractionLog>) -> TutorService {
        TutorService::new(
            Arc::new(InMemoryCatalog::with_units(units())),
            Arc::new(InMemoryProfiles::with_learners([ada()])),
            history,
            rules(),
            GenerationAdapter::offline(),
        )
    }

    fn service() -> TutorService {
        service_with_log(Arc::new(InMemoryHistory::new()))
    }

    #[tokio::test]
    async fn test_dashboard_path() {
        let service = service();
        let path = service.dashboard_path(&LearnerId::from("u1")).await.unwrap();
        let ids: Vec<_> = path.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["unit0", "unit2"]);

        let err = service
            .dashboard_path(&LearnerId::from("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, TutorError::LearnerNotFound(_)));
    }

    #[tokio::test]
    async fn test_open_unit_counts_views() {
        let service = service();
        let id = UnitId::from("unit1");

        service.open_unit(&id).await.unwrap();
        let unit = service.open_unit(&id).await.unwrap();
        assert_eq!(unit.views, 2);

        let err = service.open_unit(&UnitId::from("missing")).await.unwrap_err();
        assert!(matches!(err, TutorError::UnitNotFound(_)));
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    struct ViewlessCatalog(InMemoryCatalog);

    #[async_trait]
    impl CatalogStore for ViewlessCatalog {
        async fn fetch_all_units(&self) -> Result<Vec<ContentUnit>> {
            self.0.fetch_all_units().await
        }

        async fn fetch_unit(&self, id: &UnitId) -> Result<Option<ContentUnit>> {
            self.0.fetch_unit(id).await
        }

        async fn update_unit(&self, unit: ContentUnit) -> Result<()> {
            self.0.update_unit(unit).await
        }

        async fn record_view(&self, _id: &UnitId) -> Result<()> {
            Err(TutorError::StoreUnavailable("read-only replica".to_string()))
        }
    }

    #[tokio::test]
    async fn test_open_unit_warns_only_on_store_failure() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let err = service().open_unit(&UnitId::from("missing")).await.unwrap_err();
        assert!(matches!(err, TutorError::UnitNotFound(_)));
        assert!(!logs.text().contains("Failed to record unit view"));

        let service = TutorService::new(
            Arc::new(ViewlessCatalog(InMemoryCatalog::with_units(units()))),
            Arc::new(InMemoryProfiles::new()),
            Arc::new(InMemoryHistory::new()),
            rules(),
            GenerationAdapter::offline(),
        );
        let unit = service.open_unit(&UnitId::from("unit1")).await.unwrap();
        assert_eq!(unit.views, 0);
        assert!(logs.text().contains("Failed to record unit view"));
    }

    #[tokio::test]
    async fn test_questions_are_logged() {
        let service = service();
        let learner = LearnerId::from("u1");

        let questions = service
            .generate_questions(&learner, "Fractions", QuestionDifficulty::Beginner)
            .await;
        assert_eq!(questions, fallback_questions("Fractions"));

        let history = service.history(&learner).await.unwrap();
        assert_eq!(history.len(), 1);
        match &history[0].kind {
            InteractionKind::GeneratedQuestions { topic, questions } => {
                assert_eq!(topic, "Fractions");
                assert_eq!(questions.len(), 3);
            }
            other => panic!("unexpected interaction: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chat_is_logged() {
        let service = service();
        let learner = LearnerId::from("u1");

        let reply = service.chat(&learner, "What is a prime?", Some("Numbers")).await;
        assert_eq!(reply, offline_chat_reply("What is a prime?"));
        assert_ne!(reply, chat_apology("What is a prime?", Some("Numbers")));

        let history = service.history(&learner).await.unwrap();
        assert!(matches!(
            &history[0].kind,
            InteractionKind::Chat { context_unit: Some(unit), .. } if unit == "Numbers"
        ));
    }

    #[tokio::test]
    async fn test_history_failure_is_not_fatal() {
        let service = service_with_log(Arc::new(BrokenLog));
        let learner = LearnerId::from("u1");

        let questions = service
            .generate_questions(&learner, "Fractions", QuestionDifficulty::Intermediate)
            .await;
        assert_eq!(questions.len(), 3);

        let reply = service.chat(&learner, "Hello", None).await;
        assert!(!reply.is_empty());
    }

    #[tokio::test]
    async fn test_update_preferences_changes_path() {
        let service = service();
        let learner = LearnerId::from("u1");

        let update = PreferenceUpdate {
            learning_style: None,
            pacing: Some("fast".to_string()),
            current_level: Some(1),
        };
        let record = service.update_preferences(&learner, &update).await.unwrap();
        assert_eq!(record.profile.pacing, "fast");

        let path = service.dashboard_path(&learner).await.unwrap();
        assert_eq!(path.len(), 3);
    }

    #[tokio::test]
    async fn test_register_learner() {
        let service = service();

        let record = service
            .register_learner(" Ben ", "ben@example.com")
            .await
            .unwrap();
        assert_eq!(record.name, "Ben");
        assert_eq!(record.profile, LearnerProfile::default());

        let err = service
            .register_learner("Ada Again", "ADA@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, TutorError::EmailInUse(_)));
    }

    #[tokio::test]
    async fn test_cohort_summary() {
        let service = service();
        service
            .register_learner("Ben", "ben@example.com")
            .await
            .unwrap();
        let cleo = service
            .register_learner("Cleo", "cleo@example.com")
            .await
            .unwrap();
        service
            .update_preferences(
                &cleo.id,
                &PreferenceUpdate {
                    learning_style: Some("auditory".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let summary = service.cohort_summary().await.unwrap();
        assert_eq!(summary.total_learners, 3);
        assert_eq!(summary.by_style.get("visual"), Some(&2));
        assert_eq!(summary.by_style.get("auditory"), Some(&1));
    }

    #[tokio::test]
    async fn test_from_config() {
        let mut rules_file = NamedTempFile::new().unwrap();
        write!(
            rules_file,
            "{}",
            json!({
                "learning_styles": {},
                "pacing_multipliers": { "moderate": 1 },
                "default_path_length": 5
            })
        )
        .unwrap();

        let mut units_file = NamedTempFile::new().unwrap();
        write!(
            units_file,
            r#"[{{ "id": 1, "title": "Intro", "difficulty": "2", "tags": "[\"visual\"]" }}]"#
        )
        .unwrap();

        let config = TutorConfig {
            rules_path: rules_file.path().to_path_buf(),
            catalog_path: units_file.path().to_path_buf(),
            ..Default::default()
        };

        let service = TutorService::from_config(&config).unwrap();
        assert!(!service.generation().is_online());

        let unit = service.open_unit(&UnitId::from(1u64)).await.unwrap();
        assert_eq!(unit.difficulty, 2);
        assert!(unit.has_tag("visual"));
    }

    #[test]
    fn test_from_config_missing_rules() {
        let config = TutorConfig {
            rules_path: "/nonexistent/rules.json".into(),
            ..Default::default()
        };
        let err = TutorService::from_config(&config).unwrap_err();
        assert!(matches!(err, TutorError::Rules(_)));
    }
}
