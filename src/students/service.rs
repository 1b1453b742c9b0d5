//! Service facade combining validation, the store, metrics, and summaries.

use super::{
    store::StudentStore,
    types::{Student, StudentDraft, StudentError, StudentId},
    validation::validate_draft,
};
use crate::{
    config::Config,
    metrics::{MetricsSnapshot, RegistryMetrics},
    summarization::{
        SummarizationClient, SummarizationClientError, SummarizationRequest, build_prompt,
        get_summarization_client,
    },
};
use async_trait::async_trait;

/// Operations the HTTP surface needs from the registry.
#[async_trait]
pub trait StudentApi: Send + Sync {
    /// Validate `draft` and store it under a freshly assigned identifier.
    fn create_student(&self, draft: StudentDraft) -> Result<Student, StudentError>;

    /// Return every stored student in insertion order.
    fn list_students(&self) -> Result<Vec<Student>, StudentError>;

    /// Return the student carrying `id`.
    fn get_student(&self, id: StudentId) -> Result<Student, StudentError>;

    /// Validate `draft` and replace the student carrying `id` with it.
    fn update_student(&self, id: StudentId, draft: StudentDraft) -> Result<Student, StudentError>;

    /// Remove the student carrying `id`.
    fn delete_student(&self, id: StudentId) -> Result<(), StudentError>;

    /// Ask the summarization provider to describe the student carrying `id`.
    async fn summarize_student(&self, id: StudentId) -> Result<String, StudentError>;

    /// Retrieve the current metrics snapshot.
    fn metrics_snapshot(&self) -> Result<MetricsSnapshot, StudentError>;
}

/// Registry service shared by every request handler.
///
/// Construct it once at process start and share it through an `Arc`; the store inside is the
/// single source of truth for all requests.
pub struct StudentService {
    store: StudentStore,
    summarizer: Box<dyn SummarizationClient>,
    summary_model: String,
    metrics: RegistryMetrics,
}

impl StudentService {
    /// Assemble a service from explicit parts.
    pub fn new(
        store: StudentStore,
        summarizer: Box<dyn SummarizationClient>,
        summary_model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            summarizer,
            summary_model: summary_model.into(),
            metrics: RegistryMetrics::new(),
        }
    }

    /// Build the production service: seeded store plus the configured Ollama client.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        let summarizer = get_summarization_client(config)?;
        tracing::info!(
            ollama_url = %config.ollama_url,
            model = %config.summary_model,
            "Summarization client initialized"
        );
        Ok(Self::new(
            StudentStore::seeded(),
            summarizer,
            config.summary_model.clone(),
        ))
    }
}

#[async_trait]
impl StudentApi for StudentService {
    fn create_student(&self, draft: StudentDraft) -> Result<Student, StudentError> {
        validate_draft(&draft)?;
        let student = self.store.create(draft)?;
        self.metrics.record_created();
        tracing::debug!(id = student.id, "Stored new student");
        Ok(student)
    }

    fn list_students(&self) -> Result<Vec<Student>, StudentError> {
        Ok(self.store.list()?)
    }

    fn get_student(&self, id: StudentId) -> Result<Student, StudentError> {
        Ok(self.store.get(id)?)
    }

    fn update_student(&self, id: StudentId, draft: StudentDraft) -> Result<Student, StudentError> {
        validate_draft(&draft)?;
        let student = self.store.update(id, draft)?;
        self.metrics.record_updated();
        Ok(student)
    }

    fn delete_student(&self, id: StudentId) -> Result<(), StudentError> {
        self.store.delete(id)?;
        self.metrics.record_deleted();
        Ok(())
    }

    async fn summarize_student(&self, id: StudentId) -> Result<String, StudentError> {
        // The guard is released before the provider call; the lookup is a snapshot.
        let student = self.store.get(id)?;
        let request = SummarizationRequest {
            model: self.summary_model.clone(),
            prompt: build_prompt(&student),
        };
        let outcome = self.summarizer.generate_summary(request).await;
        self.metrics.record_summary(outcome.is_ok());
        Ok(outcome?)
    }

    fn metrics_snapshot(&self) -> Result<MetricsSnapshot, StudentError> {
        Ok(self.metrics.snapshot(self.store.count()?))
    }
}
