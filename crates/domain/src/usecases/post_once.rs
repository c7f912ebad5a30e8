//! Post-once use case - one full run from history load to publish
//!
//! Single-threaded, run-to-completion: load history, compose per strategy,
//! publish, persist. Each scheduled run is a fresh process; the history file
//! has no locking by design (last write wins).

use std::sync::Arc;

use crate::derive_daily_seed;
use crate::model::{ComposedPost, Persona, StrategyKind};
use crate::ports::{
    Clock, GenerateError, HistoryStore, PublishError, PublishReceipt, Publisher, TextGenerator,
};
use crate::prompt::build_generation_prompt;
use crate::sanitize::Sanitizer;
use crate::similarity::SimilarityConfig;
use crate::templates::TemplateGenerator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use time::UtcOffset;

/// Configuration for a single run
#[derive(Debug, Clone)]
pub struct PostOnceConfig {
    /// Candidate-generation strategy
    pub strategy: StrategyKind,
    /// Compose and log, but skip publishing and history persistence
    pub dry_run: bool,
    /// History cap applied on save (FIFO eviction by truncation)
    pub history_cap: usize,
    /// Attempt bound for the template strategy
    pub max_attempts: u32,
    /// Similarity threshold/window settings
    pub similarity: SimilarityConfig,
    /// Repository identifier mixed into the daily seed
    pub repo_id: String,
}

impl Default for PostOnceConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Template,
            dry_run: true,
            history_cap: 100,
            max_attempts: 8,
            similarity: SimilarityConfig::default(),
            repo_id: "local".to_string(),
        }
    }
}

/// Outcome of a run
#[derive(Debug)]
pub struct RunReport {
    /// The composed final text and its metadata
    pub post: ComposedPost,
    /// Publish receipt; `None` in dry-run mode
    pub receipt: Option<PublishReceipt>,
}

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Generation failed: {0}")]
    Generate(#[from] GenerateError),
    #[error("Publishing failed: {0}")]
    Publish(#[from] PublishError),
}

/// Run orchestrator
pub struct PostOnce<P, H, Cl>
where
    P: Publisher + ?Sized,
    H: HistoryStore + ?Sized,
    Cl: Clock + ?Sized,
{
    publisher: Arc<P>,
    history_store: Arc<H>,
    clock: Arc<Cl>,
    /// Required for the generative strategy only
    text_generator: Option<Arc<dyn TextGenerator>>,
    persona: Persona,
    config: PostOnceConfig,
}

impl<P, H, Cl> PostOnce<P, H, Cl>
where
    P: Publisher + ?Sized,
    H: HistoryStore + ?Sized,
    Cl: Clock + ?Sized,
{
    pub fn new(
        publisher: Arc<P>,
        history_store: Arc<H>,
        clock: Arc<Cl>,
        text_generator: Option<Arc<dyn TextGenerator>>,
        persona: Persona,
        config: PostOnceConfig,
    ) -> Self {
        Self {
            publisher,
            history_store,
            clock,
            text_generator,
            persona,
            config,
        }
    }

    /// Execute one run: load history, compose, publish, persist.
    pub async fn execute(&self) -> Result<RunReport, PostError> {
        let history = self.load_history_or_empty().await;

        let post = self.compose(&history).await?;

        tracing::info!(
            attempts = post.attempts,
            used_fallback = post.used_fallback,
            chars = post.text.chars().count(),
            "Composed final text"
        );

        if self.config.dry_run || !self.publisher.is_enabled() {
            tracing::info!(text = %post.text, "[DRY RUN] Would publish");
            return Ok(RunReport {
                post,
                receipt: None,
            });
        }

        let receipt = self.publisher.publish(&post.text).await?;
        tracing::info!(
            post_id = %receipt.id,
            platform = self.publisher.platform(),
            "Published"
        );

        self.append_history(history, &post.text).await;

        Ok(RunReport {
            post,
            receipt: Some(receipt),
        })
    }

    /// Compose the final text per the configured strategy
    pub async fn compose(&self, history: &[String]) -> Result<ComposedPost, PostError> {
        let seed = u64::from(derive_daily_seed(&self.day_stamp(), &self.config.repo_id));

        match self.config.strategy {
            StrategyKind::Template => {
                let sanitizer = Sanitizer::template(&self.persona.guardrails);
                let mut composer = super::compose::TemplateComposer::new(
                    TemplateGenerator::from_seed(seed),
                    &sanitizer,
                    self.config.similarity.clone(),
                    self.config.max_attempts,
                );
                Ok(composer.compose(history, &self.persona.example_posts))
            }
            StrategyKind::Generative => {
                let generator = self.text_generator.as_deref().ok_or_else(|| {
                    GenerateError::Config(
                        "generative strategy requires a text generator".to_string(),
                    )
                })?;

                let mut rng = StdRng::seed_from_u64(seed);
                let prompt = build_generation_prompt(&self.persona, &mut rng);

                let sanitizer = Sanitizer::generative(&self.persona.guardrails);
                let composer = super::compose::GenerativeComposer::new(
                    generator,
                    &sanitizer,
                    self.config.similarity.clone(),
                );
                Ok(composer.compose(&prompt, history).await?)
            }
        }
    }

    /// `YYYYMMDD` in UTC+9, the timezone the daily seed is anchored to
    fn day_stamp(&self) -> String {
        let jst = UtcOffset::from_hms(9, 0, 0).expect("Valid offset");
        let date = self.clock.now().to_offset(jst).date();
        format!(
            "{:04}{:02}{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        )
    }

    async fn load_history_or_empty(&self) -> Vec<String> {
        match self.history_store.load().await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load history, starting empty");
                vec![]
            }
        }
    }

    /// Append the posted text and persist the capped tail. Save failures
    /// only degrade future duplicate detection, so they are logged and
    /// swallowed here.
    async fn append_history(&self, mut history: Vec<String>, text: &str) {
        history.push(text.to_string());
        if let Err(e) = self
            .history_store
            .save(&history, self.config.history_cap)
            .await
        {
            tracing::warn!(error = %e, "Failed to save history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::HistoryError;
    use crate::prompt::GenerationPrompt;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    struct FakePublisher {
        enabled: bool,
        published: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakePublisher {
        fn enabled() -> Self {
            Self {
                enabled: true,
                published: Mutex::new(vec![]),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                enabled: true,
                published: Mutex::new(vec![]),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl Publisher for FakePublisher {
        async fn publish(&self, text: &str) -> Result<PublishReceipt, PublishError> {
            if self.fail {
                return Err(PublishError::Api("down".to_string()));
            }
            self.published.lock().unwrap().push(text.to_string());
            Ok(PublishReceipt {
                id: "post_1".to_string(),
                url: None,
            })
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn platform(&self) -> &'static str {
            "x"
        }
    }

    struct FakeHistoryStore {
        entries: Mutex<Vec<String>>,
        saved_cap: Mutex<Option<usize>>,
        fail_load: bool,
        fail_save: bool,
    }

    impl FakeHistoryStore {
        fn new(entries: Vec<String>) -> Self {
            Self {
                entries: Mutex::new(entries),
                saved_cap: Mutex::new(None),
                fail_load: false,
                fail_save: false,
            }
        }
    }

    #[async_trait]
    impl HistoryStore for FakeHistoryStore {
        async fn load(&self) -> Result<Vec<String>, HistoryError> {
            if self.fail_load {
                return Err(HistoryError::Parse("corrupt".to_string()));
            }
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn save(&self, entries: &[String], cap: usize) -> Result<(), HistoryError> {
            if self.fail_save {
                return Err(HistoryError::Serialization("disk full".to_string()));
            }
            let tail = if entries.len() > cap {
                entries[entries.len() - cap..].to_vec()
            } else {
                entries.to_vec()
            };
            *self.entries.lock().unwrap() = tail;
            *self.saved_cap.lock().unwrap() = Some(cap);
            Ok(())
        }
    }

    struct FakeClock;

    impl Clock for FakeClock {
        fn now(&self) -> OffsetDateTime {
            OffsetDateTime::from_unix_timestamp(1_704_067_200).unwrap() // 2024-01-01 UTC
        }
    }

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &GenerationPrompt) -> Result<String, GenerateError> {
            Ok(self.0.clone())
        }
    }

    fn run(
        publisher: Arc<FakePublisher>,
        history: Arc<FakeHistoryStore>,
        config: PostOnceConfig,
    ) -> PostOnce<FakePublisher, FakeHistoryStore, FakeClock> {
        PostOnce::new(
            publisher,
            history,
            Arc::new(FakeClock),
            None,
            Persona::default(),
            config,
        )
    }

    #[tokio::test]
    async fn test_template_run_publishes_and_appends_history() {
        let publisher = Arc::new(FakePublisher::enabled());
        let history = Arc::new(FakeHistoryStore::new(vec![]));

        let config = PostOnceConfig {
            dry_run: false,
            ..Default::default()
        };

        let report = run(Arc::clone(&publisher), Arc::clone(&history), config)
            .execute()
            .await
            .unwrap();

        assert_eq!(report.receipt.as_ref().unwrap().id, "post_1");
        assert_eq!(report.post.attempts, 1);

        let stored = history.entries.lock().unwrap().clone();
        assert_eq!(stored, vec![report.post.text.clone()]);
        assert_eq!(*history.saved_cap.lock().unwrap(), Some(100));
    }

    #[tokio::test]
    async fn test_dry_run_skips_publish_and_history() {
        let publisher = Arc::new(FakePublisher::enabled());
        let history = Arc::new(FakeHistoryStore::new(vec![]));

        let report = run(
            Arc::clone(&publisher),
            Arc::clone(&history),
            PostOnceConfig::default(),
        )
        .execute()
        .await
        .unwrap();

        assert!(report.receipt.is_none());
        assert!(publisher.published.lock().unwrap().is_empty());
        assert!(history.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_load_failure_degrades_to_empty() {
        let publisher = Arc::new(FakePublisher::enabled());
        let history = Arc::new(FakeHistoryStore {
            fail_load: true,
            ..FakeHistoryStore::new(vec![])
        });

        // With history unreadable the first candidate must go through
        let report = run(publisher, history, PostOnceConfig::default())
            .execute()
            .await
            .unwrap();
        assert_eq!(report.post.attempts, 1);
        assert!(!report.post.used_fallback);
    }

    #[tokio::test]
    async fn test_history_save_failure_is_not_fatal() {
        let publisher = Arc::new(FakePublisher::enabled());
        let history = Arc::new(FakeHistoryStore {
            fail_save: true,
            ..FakeHistoryStore::new(vec![])
        });

        let config = PostOnceConfig {
            dry_run: false,
            ..Default::default()
        };

        let report = run(publisher, history, config).execute().await;
        assert!(report.is_ok());
    }

    #[tokio::test]
    async fn test_publish_failure_aborts_run_without_history_write() {
        let publisher = Arc::new(FakePublisher::failing());
        let history = Arc::new(FakeHistoryStore::new(vec![]));

        let config = PostOnceConfig {
            dry_run: false,
            ..Default::default()
        };

        let result = run(Arc::clone(&publisher), Arc::clone(&history), config)
            .execute()
            .await;

        assert!(matches!(result, Err(PostError::Publish(_))));
        assert!(history.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generative_without_generator_is_config_error() {
        let publisher = Arc::new(FakePublisher::enabled());
        let history = Arc::new(FakeHistoryStore::new(vec![]));

        let config = PostOnceConfig {
            strategy: StrategyKind::Generative,
            ..Default::default()
        };

        let result = run(publisher, history, config).execute().await;
        assert!(matches!(
            result,
            Err(PostError::Generate(GenerateError::Config(_)))
        ));
    }

    #[tokio::test]
    async fn test_generative_run_uses_injected_generator() {
        let publisher = Arc::new(FakePublisher::enabled());
        let history = Arc::new(FakeHistoryStore::new(vec![]));

        let config = PostOnceConfig {
            strategy: StrategyKind::Generative,
            dry_run: false,
            history_cap: 50,
            ..Default::default()
        };

        let post_once = PostOnce::new(
            Arc::clone(&publisher),
            Arc::clone(&history),
            Arc::new(FakeClock),
            Some(Arc::new(FixedGenerator("生成されたメモ。".to_string()))),
            Persona::default(),
            config,
        );

        let report = post_once.execute().await.unwrap();
        assert_eq!(report.post.text, "生成されたメモ。");
        assert_eq!(*history.saved_cap.lock().unwrap(), Some(50));
    }

    #[tokio::test]
    async fn test_same_day_runs_compose_identically() {
        let publisher = Arc::new(FakePublisher::enabled());
        let history = Arc::new(FakeHistoryStore::new(vec![]));

        let first = run(
            Arc::clone(&publisher),
            Arc::clone(&history),
            PostOnceConfig::default(),
        )
        .execute()
        .await
        .unwrap();

        let second = run(publisher, history, PostOnceConfig::default())
            .execute()
            .await
            .unwrap();

        assert_eq!(first.post.text, second.post.text);
    }
}
