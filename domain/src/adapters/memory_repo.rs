use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::{CoreError, NewTestimonial, Testimonial, TestimonialPatch, TestimonialRepository};

/// Simple in-memory repository for tests. Not thread-safe for high concurrency
/// beyond the internal mutex guarding the records.
pub struct InMemoryRepo {
    inner: Mutex<Vec<Testimonial>>,
    next_id: AtomicU64,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    // 24 hex chars, shaped like the document store's object ids.
    fn assign_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{:024x}", n)
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TestimonialRepository for InMemoryRepo {
    async fn list(&self) -> Result<Vec<Testimonial>, CoreError> {
        let records = self
            .inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        let mut out: Vec<_> = records.clone();
        // Newest first; stable sort keeps insertion order among equal times.
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn create(
        &self,
        new: NewTestimonial,
        created_at: SystemTime,
    ) -> Result<Testimonial, CoreError> {
        let record = new.into_testimonial(self.assign_id(), created_at);
        let mut records = self
            .inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        records.push(record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), CoreError> {
        let mut records = self
            .inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        // Absent target is fine: delete-if-present semantics.
        records.retain(|t| t.id != id);
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: TestimonialPatch,
    ) -> Result<Option<Testimonial>, CoreError> {
        let mut records = self
            .inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))?;
        match records.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.review = patch.review;
                t.rating = patch.rating;
                Ok(Some(t.clone()))
            }
            None => Ok(None),
        }
    }
}
