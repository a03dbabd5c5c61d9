//! In-memory `RequestStore` backed by `parking_lot` maps.
//!
//! Uniqueness checks and cascade deletes run under a single write lock per
//! entity map, which is the atomicity the trait promises its callers.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{RequestFilter, RequestStore, StoreError};
use crate::destination::models::SubmissionDestination;
use crate::letter::models::Letter;
use crate::request::models::LetterRequest;
use crate::template::models::Template;
use crate::upload::models::Document;

#[derive(Default)]
pub struct MemoryStore {
    requests: RwLock<HashMap<Uuid, LetterRequest>>,
    documents: RwLock<HashMap<Uuid, Document>>,
    destinations: RwLock<HashMap<Uuid, SubmissionDestination>>,
    letters: RwLock<HashMap<Uuid, Letter>>,
    templates: RwLock<HashMap<Uuid, Template>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn code_taken_by_other(requests: &HashMap<Uuid, LetterRequest>, code: &str, id: &Uuid) -> bool {
        requests
            .values()
            .any(|r| r.access_code == code && &r.id != id)
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn insert_request(&self, request: &LetterRequest) -> Result<(), StoreError> {
        let mut requests = self.requests.write();
        if Self::code_taken_by_other(&requests, &request.access_code, &request.id) {
            return Err(StoreError::CodeTaken);
        }
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn update_request(&self, request: &LetterRequest) -> Result<(), StoreError> {
        let mut requests = self.requests.write();
        if Self::code_taken_by_other(&requests, &request.access_code, &request.id) {
            return Err(StoreError::CodeTaken);
        }
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_request(&self, id: &Uuid) -> Result<Option<LetterRequest>, StoreError> {
        Ok(self.requests.read().get(id).cloned())
    }

    async fn find_request_by_code(&self, code: &str) -> Result<Option<LetterRequest>, StoreError> {
        Ok(self
            .requests
            .read()
            .values()
            .find(|r| r.access_code == code)
            .cloned())
    }

    async fn access_code_in_use(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.requests.read().values().any(|r| r.access_code == code))
    }

    async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<LetterRequest>, StoreError> {
        let needle = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut matches: Vec<LetterRequest> = self
            .requests
            .read()
            .values()
            .filter(|r| filter.status.map_or(true, |status| r.status == status))
            .filter(|r| {
                let Some(needle) = &needle else {
                    return true;
                };
                [&r.student_name, &r.professor_name, &r.professor_notes]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(needle))
            })
            .cloned()
            .collect();
        matches.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(matches)
    }

    async fn delete_request(&self, id: &Uuid) -> Result<Option<LetterRequest>, StoreError> {
        let removed = self.requests.write().remove(id);
        if removed.is_some() {
            self.documents.write().retain(|_, d| &d.request_id != id);
            self.destinations.write().retain(|_, d| &d.request_id != id);
            self.letters.write().retain(|_, l| &l.request_id != id);
        }
        Ok(removed)
    }

    async fn insert_document(&self, document: &Document) -> Result<(), StoreError> {
        self.documents.write().insert(document.id, document.clone());
        Ok(())
    }

    async fn find_document(&self, id: &Uuid) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.read().get(id).cloned())
    }

    async fn documents_for_request(&self, request_id: &Uuid) -> Result<Vec<Document>, StoreError> {
        let mut documents: Vec<Document> = self
            .documents
            .read()
            .values()
            .filter(|d| &d.request_id == request_id)
            .cloned()
            .collect();
        documents.sort_by_key(|d| d.uploaded_at);
        Ok(documents)
    }

    async fn delete_document(&self, id: &Uuid) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.write().remove(id))
    }

    async fn insert_destination(
        &self,
        destination: &SubmissionDestination,
    ) -> Result<(), StoreError> {
        self.destinations
            .write()
            .insert(destination.id, destination.clone());
        Ok(())
    }

    async fn update_destination(
        &self,
        destination: &SubmissionDestination,
    ) -> Result<(), StoreError> {
        self.destinations
            .write()
            .insert(destination.id, destination.clone());
        Ok(())
    }

    async fn find_destination(
        &self,
        id: &Uuid,
    ) -> Result<Option<SubmissionDestination>, StoreError> {
        Ok(self.destinations.read().get(id).cloned())
    }

    async fn destinations_for_request(
        &self,
        request_id: &Uuid,
    ) -> Result<Vec<SubmissionDestination>, StoreError> {
        let mut destinations: Vec<SubmissionDestination> = self
            .destinations
            .read()
            .values()
            .filter(|d| &d.request_id == request_id)
            .cloned()
            .collect();
        destinations.sort_by_key(|d| d.created_at);
        Ok(destinations)
    }

    async fn delete_destination(
        &self,
        id: &Uuid,
    ) -> Result<Option<SubmissionDestination>, StoreError> {
        Ok(self.destinations.write().remove(id))
    }

    async fn insert_letter(&self, letter: &Letter) -> Result<(), StoreError> {
        self.letters.write().insert(letter.id, letter.clone());
        Ok(())
    }

    async fn find_letter(&self, id: &Uuid) -> Result<Option<Letter>, StoreError> {
        Ok(self.letters.read().get(id).cloned())
    }

    async fn letters_for_request(&self, request_id: &Uuid) -> Result<Vec<Letter>, StoreError> {
        let mut letters: Vec<Letter> = self
            .letters
            .read()
            .values()
            .filter(|l| &l.request_id == request_id)
            .cloned()
            .collect();
        letters.sort_by_key(|l| l.version);
        Ok(letters)
    }

    async fn next_letter_version(&self, request_id: &Uuid) -> Result<u32, StoreError> {
        Ok(self
            .letters
            .read()
            .values()
            .filter(|l| &l.request_id == request_id)
            .map(|l| l.version)
            .max()
            .unwrap_or(0)
            + 1)
    }

    async fn delete_letter(&self, id: &Uuid) -> Result<Option<Letter>, StoreError> {
        Ok(self.letters.write().remove(id))
    }

    async fn insert_template(&self, template: &Template) -> Result<(), StoreError> {
        let mut templates = self.templates.write();
        if template.is_default {
            for other in templates.values_mut() {
                other.is_default = false;
            }
        }
        templates.insert(template.id, template.clone());
        Ok(())
    }

    async fn update_template(&self, template: &Template) -> Result<(), StoreError> {
        let mut templates = self.templates.write();
        if template.is_default {
            for other in templates.values_mut() {
                if other.id != template.id {
                    other.is_default = false;
                }
            }
        }
        templates.insert(template.id, template.clone());
        Ok(())
    }

    async fn find_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError> {
        Ok(self.templates.read().get(id).cloned())
    }

    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        let mut templates: Vec<Template> = self.templates.read().values().cloned().collect();
        templates.sort_by_key(|t| t.created_at);
        Ok(templates)
    }

    async fn delete_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError> {
        Ok(self.templates.write().remove(id))
    }

    async fn set_default_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError> {
        let mut templates = self.templates.write();
        if !templates.contains_key(id) {
            return Ok(None);
        }
        for template in templates.values_mut() {
            template.is_default = template.id == *id;
        }
        Ok(templates.get(id).cloned())
    }
}
