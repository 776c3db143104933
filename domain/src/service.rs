use crate::validate::validate_new_testimonial;
use crate::{
    Clock, CoreError, NewTestimonial, Testimonial, TestimonialPatch, TestimonialRepository,
};

/// Application service exposing the four testimonial operations with the
/// single global authorization rule for delete and update.
///
/// It remains generic over repository and clock, so the operations can be
/// tested against the in-memory adapter without external dependencies. The
/// admin email is injected once at construction instead of living in a
/// process-wide constant, keeping the service testable without recompilation.
pub struct TestimonialService<R: TestimonialRepository, C: Clock> {
    repo: R,
    clock: C,
    admin_email: String,
}

impl<R: TestimonialRepository, C: Clock> TestimonialService<R, C> {
    pub fn new(repo: R, clock: C, admin_email: impl Into<String>) -> Self {
        Self {
            repo,
            clock,
            admin_email: admin_email.into(),
        }
    }

    /// Exact, case-sensitive equality against the configured admin email.
    fn authorize(&self, supplied: &str) -> Result<(), CoreError> {
        if supplied == self.admin_email {
            Ok(())
        } else {
            Err(CoreError::AccessDenied)
        }
    }

    /// All testimonials, newest first.
    pub async fn list(&self) -> Result<Vec<Testimonial>, CoreError> {
        self.repo.list().await
    }

    /// Validate and persist a new testimonial; no write happens on
    /// validation failure.
    pub async fn create(&self, input: NewTestimonial) -> Result<Testimonial, CoreError> {
        validate_new_testimonial(&input)?;
        self.repo.create(input, self.clock.now()).await
    }

    /// Delete a testimonial if the supplied admin email matches. Deleting an
    /// id that does not exist still succeeds.
    pub async fn delete(&self, id: &str, admin_email: &str) -> Result<(), CoreError> {
        self.authorize(admin_email)?;
        self.repo.delete_by_id(id).await
    }

    /// Overwrite review and rating on a testimonial if the supplied admin
    /// email matches. Returns `None` when the target does not exist.
    pub async fn update(
        &self,
        id: &str,
        admin_email: &str,
        patch: TestimonialPatch,
    ) -> Result<Option<Testimonial>, CoreError> {
        self.authorize(admin_email)?;
        self.repo.update_by_id(id, patch).await
    }
}
