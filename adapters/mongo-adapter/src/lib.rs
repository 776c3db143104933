//! MongoDB adapter implementing the `TestimonialRepository` port.
//!
//! Production implementation backed by the `mongodb` driver.
//! - Stores testimonials as documents in a single collection with the
//!   driver-assigned `_id` as the record identifier.
//! - Field names on the wire stay camelCase (`userName`, `createdAt`, ...),
//!   so the collection is interchangeable with the documents written by
//!   earlier deployments.
//! - Provides `MongoConfig::from_env()` wiring via `MONGODB_URI`,
//!   `MONGODB_DATABASE`, and `MONGODB_COLLECTION`.
//!
//! Every operation is a single driver call; errors carry the driver's
//! message through verbatim so the HTTP layer can surface it unchanged.

use std::time::SystemTime;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use domain::{CoreError, NewTestimonial, Testimonial, TestimonialPatch, TestimonialRepository};

/// Connection settings for the testimonial collection.
#[derive(Clone, Debug)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl MongoConfig {
    /// Build from environment variables, with local-dev defaults matching
    /// the original deployment.
    pub fn from_env() -> Self {
        Self {
            uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".into()),
            database: std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "tokoryven".into()),
            collection: std::env::var("MONGODB_COLLECTION")
                .unwrap_or_else(|_| "testimonials".into()),
        }
    }
}

/// On-disk document shape. Kept separate from the domain type so the bson
/// field names and `_id`/`createdAt` representations stay an adapter concern.
#[derive(Debug, Serialize, Deserialize)]
struct TestimonialDoc {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "userName")]
    user_name: String,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    user_email: Option<String>,
    #[serde(
        rename = "userEmailMasked",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    user_email_masked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
    rating: f64,
    review: String,
    #[serde(rename = "createdAt")]
    created_at: BsonDateTime,
}

fn doc_to_domain(doc: TestimonialDoc) -> Testimonial {
    Testimonial {
        id: doc.id.to_hex(),
        user_name: doc.user_name,
        user_email: doc.user_email,
        user_email_masked: doc.user_email_masked,
        photo: doc.photo,
        rating: doc.rating,
        review: doc.review,
        created_at: doc.created_at.to_system_time(),
    }
}

fn new_to_doc(new: NewTestimonial, created_at: SystemTime) -> TestimonialDoc {
    TestimonialDoc {
        id: ObjectId::new(),
        user_name: new.user_name,
        user_email: new.user_email,
        user_email_masked: new.user_email_masked,
        photo: new.photo,
        rating: new.rating,
        review: new.review,
        created_at: BsonDateTime::from_system_time(created_at),
    }
}

/// A malformed identifier is a storage-layer failure, not a not-found: the
/// driver's parse message passes through to the caller as-is.
fn parse_object_id(id: &str) -> Result<ObjectId, CoreError> {
    ObjectId::parse_str(id).map_err(|e| CoreError::Repository(e.to_string()))
}

fn storage_err(e: mongodb::error::Error) -> CoreError {
    CoreError::Repository(e.to_string())
}

/// Repository backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoRepo {
    collection: Collection<TestimonialDoc>,
}

impl MongoRepo {
    /// Connect with explicit settings.
    pub async fn connect(cfg: MongoConfig) -> Result<Self, CoreError> {
        let client = Client::with_uri_str(&cfg.uri).await.map_err(storage_err)?;
        let collection = client.database(&cfg.database).collection(&cfg.collection);
        Ok(Self { collection })
    }

    /// Connect using the `MONGODB_*` environment variables.
    pub async fn from_env() -> Result<Self, CoreError> {
        Self::connect(MongoConfig::from_env()).await
    }
}

#[async_trait]
impl TestimonialRepository for MongoRepo {
    async fn list(&self) -> Result<Vec<Testimonial>, CoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(storage_err)?;
        let docs: Vec<TestimonialDoc> = cursor.try_collect().await.map_err(storage_err)?;
        Ok(docs.into_iter().map(doc_to_domain).collect())
    }

    async fn create(
        &self,
        new: NewTestimonial,
        created_at: SystemTime,
    ) -> Result<Testimonial, CoreError> {
        // Assign the id client-side so the stored record can be returned
        // without a second read.
        let doc = new_to_doc(new, created_at);
        self.collection
            .insert_one(&doc)
            .await
            .map_err(storage_err)?;
        Ok(doc_to_domain(doc))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), CoreError> {
        let oid = parse_object_id(id)?;
        // deleted_count is deliberately ignored: delete if present.
        self.collection
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: TestimonialPatch,
    ) -> Result<Option<Testimonial>, CoreError> {
        let oid = parse_object_id(id)?;
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": oid },
                doc! { "$set": { "review": &patch.review, "rating": patch.rating } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(storage_err)?;
        Ok(updated.map(doc_to_domain))
    }
}
