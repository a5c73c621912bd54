//! Prompt generation and status bookkeeping on top of a `PromptStore`.
//!
//! Every read-modify-write of the store happens under `write_lock`, so
//! requests served by the same process do not lose each other's updates.
//! Model calls are made before the lock is taken.
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::{Mutex, MutexGuard};

use crate::azure::Generator;
use crate::error::AppResult;
use crate::store::{next_id, PromptMap, PromptRecord, PromptStatus, PromptStore};

pub struct PromptService {
    store: Arc<dyn PromptStore>,
    generator: Arc<dyn Generator>,
    write_lock: Mutex<()>,
}

impl PromptService {
    pub fn new(store: Arc<dyn PromptStore>, generator: Arc<dyn Generator>) -> Self {
        PromptService {
            store,
            generator,
            write_lock: Mutex::new(()),
        }
    }

    /// Hold this while loading, mutating and saving the store.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub async fn load(&self) -> AppResult<PromptMap> {
        self.store.load().await
    }

    pub async fn save(&self, prompts: &PromptMap) -> AppResult<()> {
        self.store.save(prompts).await
    }

    pub async fn get(&self, prompt_id: &str) -> AppResult<Option<PromptRecord>> {
        Ok(self.store.load().await?.remove(prompt_id))
    }

    /// Records, optionally restricted to one status.
    pub async fn list(&self, status: Option<PromptStatus>) -> AppResult<PromptMap> {
        let mut prompts = self.store.load().await?;
        if let Some(status) = status {
            prompts.retain(|_, record| record.status == status);
        }
        Ok(prompts)
    }

    /// Ask the generator for `count` prompts about `topic`, append them as
    /// pending records with fresh sequential IDs, and return the whole store.
    pub async fn generate_prompts(&self, topic: &str, count: usize) -> AppResult<PromptMap> {
        let generated = self.generator.generate_prompts(topic, count).await?;

        let _guard = self.lock().await;
        let mut prompts = self.store.load().await?;
        let first_id = next_id(&prompts);
        let created_at = Local::now().naive_local();

        for (id, text) in (first_id..).zip(generated) {
            prompts.insert(id.to_string(), PromptRecord::pending(text, topic, created_at));
        }
        self.store.save(&prompts).await?;

        tracing::info!(topic, first_id, total = prompts.len(), "Stored generated prompts");
        Ok(prompts)
    }

    /// Set `status` (and `image_path` when given) on an existing record.
    /// Unknown IDs are left alone and reported as `false`.
    pub async fn update_status(
        &self,
        prompt_id: &str,
        status: PromptStatus,
        image_path: Option<&Path>,
    ) -> AppResult<bool> {
        let _guard = self.lock().await;
        let mut prompts = self.store.load().await?;
        let Some(record) = prompts.get_mut(prompt_id) else {
            tracing::warn!(prompt_id, %status, "Status update for unknown prompt ignored");
            return Ok(false);
        };

        record.status = status;
        if let Some(path) = image_path {
            record.image_path = Some(path.display().to_string());
        }
        self.store.save(&prompts).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{FakeGenerator, MemoryStore};
    use crate::store::JsonFileStore;
    use std::collections::BTreeSet;

    fn service(store: Arc<MemoryStore>, prompts: &[&str]) -> PromptService {
        PromptService::new(store, Arc::new(FakeGenerator::with_prompts(prompts)))
    }

    #[tokio::test]
    async fn ids_start_at_one_for_empty_store() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone(), &["a", "b"]);

        let all = svc.generate_prompts("volcanoes", 2).await.unwrap();
        let keys: Vec<&str> = all.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "2"]);
        assert!(all.values().all(|r| r.status == PromptStatus::Pending && !r.approved));
        assert_eq!(all["2"].topic, "volcanoes");
        assert_eq!(store.saves(), 1);
    }

    #[tokio::test]
    async fn ids_continue_after_highest_existing_key() {
        let store = Arc::new(MemoryStore::with_ids(&["1", "2", "5"]));
        let svc = service(store.clone(), &["x", "y", "z"]);

        let all = svc.generate_prompts("deserts", 3).await.unwrap();
        assert_eq!(all.len(), 6);
        for (id, text) in [("6", "x"), ("7", "y"), ("8", "z")] {
            assert_eq!(all[id].prompt, text);
        }
        // existing records survive untouched
        assert_eq!(all["5"].topic, "seed");
    }

    #[tokio::test]
    async fn generator_failure_leaves_store_untouched() {
        let store = Arc::new(MemoryStore::with_ids(&["1"]));
        let svc = PromptService::new(store.clone(), Arc::new(FakeGenerator::failing()));

        assert!(svc.generate_prompts("rivers", 2).await.is_err());
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn update_status_sets_path() {
        let store = Arc::new(MemoryStore::with_ids(&["3"]));
        let svc = service(store.clone(), &[]);

        let updated = svc
            .update_status("3", PromptStatus::Generated, Some(Path::new("images/ingest/image_3.png")))
            .await
            .unwrap();
        assert!(updated);

        let rec = svc.get("3").await.unwrap().unwrap();
        assert_eq!(rec.status, PromptStatus::Generated);
        assert_eq!(rec.image_path.as_deref(), Some("images/ingest/image_3.png"));
    }

    #[tokio::test]
    async fn update_status_for_unknown_id_does_not_save() {
        let store = Arc::new(MemoryStore::with_ids(&["1"]));
        let svc = service(store.clone(), &[]);

        assert!(!svc.update_status("42", PromptStatus::Generated, None).await.unwrap());
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let store = Arc::new(MemoryStore::with_ids(&["1", "2"]));
        let svc = service(store.clone(), &[]);
        svc.update_status("2", PromptStatus::Rejected, None).await.unwrap();

        let rejected = svc.list(Some(PromptStatus::Rejected)).await.unwrap();
        assert_eq!(rejected.keys().collect::<Vec<_>>(), vec!["2"]);
        assert_eq!(svc.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_generation_against_one_file_keeps_every_record() {
        const TASKS: usize = 10;
        const PER_TASK: usize = 2;

        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(tmp.path().join("prompts.json")));
        let svc = Arc::new(PromptService::new(
            store.clone(),
            Arc::new(FakeGenerator::with_prompts(&["a", "b"])),
        ));

        let handles: Vec<_> = (0..TASKS)
            .map(|i| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.generate_prompts(&format!("topic {i}"), PER_TASK).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.load().await.unwrap();
        assert_eq!(stored.len(), TASKS * PER_TASK);
        let ids: BTreeSet<String> = stored.keys().cloned().collect();
        let expected: BTreeSet<String> = (1..=TASKS * PER_TASK).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
    }
}
