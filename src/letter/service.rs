use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::letter::models::{CreateLetterPayload, Letter};
use crate::store::StoreObject;
use crate::template::interpolate::interpolate;

pub struct LetterService {
    store: StoreObject,
}

impl LetterService {
    pub fn new(store: StoreObject) -> Self {
        Self { store }
    }

    /// Materialize a letter body for the request, either by interpolating a
    /// template with the supplied variables or from raw content.
    pub async fn create(&self, request_id: &Uuid, payload: CreateLetterPayload) -> Result<Letter> {
        if self.store.find_request(request_id).await?.is_none() {
            return Err(ServiceError::not_found("request", request_id));
        }

        let content = match payload.template_id {
            Some(template_id) => {
                let template = self
                    .store
                    .find_template(&template_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("template", template_id))?;
                interpolate(&template.content, &payload.variables)
            }
            None => payload.content.ok_or_else(|| {
                ServiceError::Validation(
                    "either a template_id or raw content is required".to_string(),
                )
            })?,
        };

        let letter = Letter {
            id: Uuid::new_v4(),
            request_id: *request_id,
            content,
            version: self.store.next_letter_version(request_id).await?,
            template_id: payload.template_id,
            created_at: Utc::now(),
        };
        self.store.insert_letter(&letter).await?;
        log::info!(
            "created letter {} v{} for request {request_id}",
            letter.id,
            letter.version
        );
        Ok(letter)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Letter> {
        self.store
            .find_letter(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("letter", id))
    }

    pub async fn list_for_request(&self, request_id: &Uuid) -> Result<Vec<Letter>> {
        Ok(self.store.letters_for_request(request_id).await?)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<Letter> {
        self.store
            .delete_letter(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("letter", id))
    }
}
