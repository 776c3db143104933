//! Domain library for the Testimonial Store.
//!
//! This crate stays dependency-light (async-trait for the repository port
//! only) and holds the domain types, ports (traits), and error definitions.
//! Keep adapters and IO concerns out of this crate.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::SystemTime;

use async_trait::async_trait;

/// Stored testimonial record.
///
/// `id` and `created_at` are assigned by the repository at creation and are
/// immutable afterwards. Only `review` and `rating` may change via update.
#[derive(Clone, Debug, PartialEq)]
pub struct Testimonial {
    pub id: String,
    pub user_name: String,
    /// Real contact address, stored verbatim if supplied. Never redacted by
    /// the service; masking is a caller concern.
    pub user_email: Option<String>,
    /// Display-masked address supplied by the caller. Not derived or
    /// validated here.
    pub user_email_masked: Option<String>,
    /// Base64-encoded image payload, stored inline on the record.
    pub photo: Option<String>,
    pub rating: f64,
    pub review: String,
    pub created_at: SystemTime,
}

/// Candidate record for the create operation (no id / created_at yet).
#[derive(Clone, Debug, PartialEq)]
pub struct NewTestimonial {
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_email_masked: Option<String>,
    pub photo: Option<String>,
    pub rating: f64,
    pub review: String,
}

impl NewTestimonial {
    /// Materialize a stored record from this candidate with store-assigned
    /// id and creation time.
    pub fn into_testimonial(self, id: String, created_at: SystemTime) -> Testimonial {
        Testimonial {
            id,
            user_name: self.user_name,
            user_email: self.user_email,
            user_email_masked: self.user_email_masked,
            photo: self.photo,
            rating: self.rating,
            review: self.review,
            created_at,
        }
    }
}

/// The only fields an update may overwrite.
#[derive(Clone, Debug, PartialEq)]
pub struct TestimonialPatch {
    pub review: String,
    pub rating: f64,
}

/// Time source abstraction to make code testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Repository port for persisting and loading testimonials.
///
/// Each operation is a single call to the backing store; consistency under
/// concurrent writes is the store's problem (last write wins).
#[async_trait]
pub trait TestimonialRepository: Send + Sync {
    /// All records, ordered by `created_at` descending (newest first).
    async fn list(&self) -> Result<Vec<Testimonial>, CoreError>;

    /// Assign id, persist, and return the full stored record.
    async fn create(
        &self,
        new: NewTestimonial,
        created_at: SystemTime,
    ) -> Result<Testimonial, CoreError>;

    /// Delete if present; an absent target is still Ok (idempotent).
    async fn delete_by_id(&self, id: &str) -> Result<(), CoreError>;

    /// Overwrite `review` and `rating` only, leaving every other field
    /// untouched. Returns `None` when no record has the given id.
    async fn update_by_id(
        &self,
        id: &str,
        patch: TestimonialPatch,
    ) -> Result<Option<Testimonial>, CoreError>;
}

/// Core domain errors (no external error crates to keep deps light).
#[derive(Debug)]
pub enum CoreError {
    /// A required creation field was missing or empty.
    MissingFields,
    /// Supplied admin identity does not match the configured one.
    AccessDenied,
    /// Failure surfaced by the storage layer, message passed through.
    Repository(String),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::MissingFields => write!(f, "missing required fields"),
            CoreError::AccessDenied => write!(f, "access denied"),
            CoreError::Repository(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for CoreError {}

/// Return a short about/version line for binaries to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - domain library loaded", pkg, ver)
}

pub mod adapters;
pub mod service;
pub mod validate;
