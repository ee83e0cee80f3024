//! Technical-test storage behind a trait, so handlers never see the backend.
//!
//! Default: `InMemoryTestRepository` (a `tokio::sync::RwLock` over a map).
//! `AppState` holds an `Arc<dyn TestRepository>`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::technical_test::TechnicalTest;

/// A mutation applied to one test while the repository holds it exclusively.
pub type TestMutation = Box<dyn FnOnce(&mut TechnicalTest) -> Result<(), AppError> + Send>;

#[async_trait]
pub trait TestRepository: Send + Sync {
    async fn insert(&self, test: TechnicalTest) -> Result<TechnicalTest, AppError>;

    async fn get(&self, id: Uuid) -> Result<TechnicalTest, AppError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<TechnicalTest>, AppError>;

    /// Applies `mutation` atomically. On error the stored test is unchanged.
    async fn update(&self, id: Uuid, mutation: TestMutation) -> Result<TechnicalTest, AppError>;
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Technical test {id} not found"))
}

#[derive(Default)]
pub struct InMemoryTestRepository {
    tests: RwLock<HashMap<Uuid, TechnicalTest>>,
}

impl InMemoryTestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TestRepository for InMemoryTestRepository {
    async fn insert(&self, test: TechnicalTest) -> Result<TechnicalTest, AppError> {
        let mut tests = self.tests.write().await;
        if tests.contains_key(&test.id) {
            return Err(AppError::Conflict(format!(
                "Technical test {} already exists",
                test.id
            )));
        }
        debug!(test_id = %test.id, "stored technical test");
        tests.insert(test.id, test.clone());
        Ok(test)
    }

    async fn get(&self, id: Uuid) -> Result<TechnicalTest, AppError> {
        self.tests
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self) -> Result<Vec<TechnicalTest>, AppError> {
        let mut all: Vec<TechnicalTest> = self.tests.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update(&self, id: Uuid, mutation: TestMutation) -> Result<TechnicalTest, AppError> {
        let mut tests = self.tests.write().await;
        let stored = tests.get_mut(&id).ok_or_else(|| not_found(id))?;

        // Mutate a copy so a failed transition leaves the stored test intact.
        let mut draft = stored.clone();
        mutation(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }
}
