//! Persistent-store collaborator interface.
//!
//! The services only ever talk to `RequestStore`, so the backing engine can
//! be swapped (or stubbed in tests) without touching domain logic. The store
//! owns two invariants the services rely on: the access-code uniqueness
//! constraint on insert/update, and cascade deletion of a request's owned
//! documents, destinations and letters.

mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::destination::models::SubmissionDestination;
use crate::letter::models::Letter;
use crate::request::models::{LetterRequest, RequestStatus};
use crate::template::models::Template;
use crate::upload::models::Document;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness constraint violation on the access code.
    #[error("access code already in use")]
    CodeTaken,
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Listing filter for requests: optional status plus a free-text needle
/// matched against student, professor and notes fields.
#[derive(Debug, Default, Clone)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub search: Option<String>,
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    // -- requests --------------------------------------------------------
    async fn insert_request(&self, request: &LetterRequest) -> Result<(), StoreError>;
    async fn update_request(&self, request: &LetterRequest) -> Result<(), StoreError>;
    async fn find_request(&self, id: &Uuid) -> Result<Option<LetterRequest>, StoreError>;
    async fn find_request_by_code(&self, code: &str) -> Result<Option<LetterRequest>, StoreError>;
    async fn access_code_in_use(&self, code: &str) -> Result<bool, StoreError>;
    async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<LetterRequest>, StoreError>;
    /// Deletes the request and everything it owns.
    async fn delete_request(&self, id: &Uuid) -> Result<Option<LetterRequest>, StoreError>;

    // -- documents -------------------------------------------------------
    async fn insert_document(&self, document: &Document) -> Result<(), StoreError>;
    async fn find_document(&self, id: &Uuid) -> Result<Option<Document>, StoreError>;
    async fn documents_for_request(&self, request_id: &Uuid) -> Result<Vec<Document>, StoreError>;
    async fn delete_document(&self, id: &Uuid) -> Result<Option<Document>, StoreError>;

    // -- destinations ----------------------------------------------------
    async fn insert_destination(
        &self,
        destination: &SubmissionDestination,
    ) -> Result<(), StoreError>;
    async fn update_destination(
        &self,
        destination: &SubmissionDestination,
    ) -> Result<(), StoreError>;
    async fn find_destination(&self, id: &Uuid)
        -> Result<Option<SubmissionDestination>, StoreError>;
    async fn destinations_for_request(
        &self,
        request_id: &Uuid,
    ) -> Result<Vec<SubmissionDestination>, StoreError>;
    async fn delete_destination(
        &self,
        id: &Uuid,
    ) -> Result<Option<SubmissionDestination>, StoreError>;

    // -- letters ---------------------------------------------------------
    async fn insert_letter(&self, letter: &Letter) -> Result<(), StoreError>;
    async fn find_letter(&self, id: &Uuid) -> Result<Option<Letter>, StoreError>;
    async fn letters_for_request(&self, request_id: &Uuid) -> Result<Vec<Letter>, StoreError>;
    /// Next monotonic letter version for the request (1 for the first).
    async fn next_letter_version(&self, request_id: &Uuid) -> Result<u32, StoreError>;
    async fn delete_letter(&self, id: &Uuid) -> Result<Option<Letter>, StoreError>;

    // -- templates -------------------------------------------------------
    async fn insert_template(&self, template: &Template) -> Result<(), StoreError>;
    async fn update_template(&self, template: &Template) -> Result<(), StoreError>;
    async fn find_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError>;
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError>;
    async fn delete_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError>;
    /// Marks `id` as the default template and unsets any previous default in
    /// the same operation.
    async fn set_default_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError>;
}

pub type StoreObject = Arc<dyn RequestStore>;
