//! Interaction history - generated question sets and chat exchanges.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use learning_rules::LearnerId;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::InteractionLog;
use crate::error::Result;
use crate::generation::Question;

/// What happened in one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionKind {
    GeneratedQuestions {
        topic: String,
        questions: Vec<Question>,
    },
    Chat {
        message: String,
        response: String,
        context_unit: Option<String>,
    },
}

/// One logged interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub learner: LearnerId,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: InteractionKind,
}

impl Interaction {
    pub fn new(learner: LearnerId, kind: InteractionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            learner,
            at: Utc::now(),
            kind,
        }
    }
}

/// Interactions kept in memory in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    entries: RwLock<Vec<Interaction>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl InteractionLog for InMemoryHistory {
    async fn record(&self, interaction: Interaction) -> Result<()> {
        self.entries.write().await.push(interaction);
        Ok(())
    }

    async fn history_for(&self, learner: &LearnerId) -> Result<Vec<Interaction>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|i| &i.learner == learner)
            .cloned()
            .collect())
    }
}
