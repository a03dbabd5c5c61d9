use chrono::Utc;
use uuid::Uuid;

use crate::access_code::{generate_access_code, MAX_CODE_ATTEMPTS};
use crate::error::{Result, ServiceError};
use crate::request::models::{
    CreateRequestPayload, LetterRequest, RequestStatus, UpdateRequestPayload,
};
use crate::store::{RequestFilter, StoreError, StoreObject};

pub const MAX_NOTES_LENGTH: usize = 5000;

pub struct RequestService {
    store: StoreObject,
}

impl RequestService {
    pub fn new(store: StoreObject) -> Self {
        Self { store }
    }

    /// Create a request and allocate its access code.
    ///
    /// Generation is check-then-insert: a candidate already present in the
    /// store counts as a collision, and so does a uniqueness violation
    /// raised by the insert itself (two issuances racing). Both retry
    /// against the same attempt cap; exhausting it is a terminal error,
    /// never an infinite loop.
    pub async fn create(&self, payload: CreateRequestPayload) -> Result<LetterRequest> {
        validate_notes(payload.professor_notes.as_deref())?;

        let now = Utc::now();
        let mut request = LetterRequest {
            id: Uuid::new_v4(),
            access_code: String::new(),
            code_generated_at: now,
            status: RequestStatus::Pending,
            student_name: payload.student_name,
            student_email: payload.student_email,
            professor_name: payload.professor_name,
            deadline: payload.deadline,
            professor_notes: payload.professor_notes,
            created_at: now,
            updated_at: now,
        };

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_access_code();
            if self.store.access_code_in_use(&code).await? {
                log::debug!("access code collision, drawing a new candidate");
                continue;
            }
            request.access_code = code;
            match self.store.insert_request(&request).await {
                Ok(()) => {
                    log::info!("created letter request {}", request.id);
                    return Ok(request);
                }
                Err(StoreError::CodeTaken) => {
                    log::debug!("access code raced by a concurrent insert, retrying");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ServiceError::CodeExhausted(MAX_CODE_ATTEMPTS))
    }

    /// Replace the access code with a freshly allocated one and stamp
    /// `code_generated_at`. Same bounded collision protocol as `create`.
    pub async fn regenerate_code(&self, id: &Uuid) -> Result<LetterRequest> {
        let mut request = self.get(id).await?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_access_code();
            if self.store.access_code_in_use(&code).await? {
                continue;
            }
            let now = Utc::now();
            request.access_code = code;
            request.code_generated_at = now;
            request.updated_at = now;
            match self.store.update_request(&request).await {
                Ok(()) => {
                    log::info!("regenerated access code for request {id}");
                    return Ok(request);
                }
                Err(StoreError::CodeTaken) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Err(ServiceError::CodeExhausted(MAX_CODE_ATTEMPTS))
    }

    pub async fn get(&self, id: &Uuid) -> Result<LetterRequest> {
        self.store
            .find_request(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("request", id))
    }

    /// Student-facing lookup by access code.
    pub async fn get_by_code(&self, code: &str) -> Result<LetterRequest> {
        self.store
            .find_request_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::not_found("request", code))
    }

    pub async fn list(&self, filter: &RequestFilter) -> Result<Vec<LetterRequest>> {
        Ok(self.store.list_requests(filter).await?)
    }

    pub async fn update(&self, id: &Uuid, payload: UpdateRequestPayload) -> Result<LetterRequest> {
        if let crate::patch::Patch::Value(notes) = payload.professor_notes.as_ref() {
            validate_notes(Some(notes.as_str()))?;
        }

        let mut request = self.get(id).await?;
        payload.student_name.apply_to(&mut request.student_name);
        payload.student_email.apply_to(&mut request.student_email);
        payload.professor_name.apply_to(&mut request.professor_name);
        payload.deadline.apply_to(&mut request.deadline);
        payload
            .professor_notes
            .apply_to(&mut request.professor_notes);
        request.updated_at = Utc::now();

        self.store.update_request(&request).await?;
        Ok(request)
    }

    /// Direct status change by the professor. Completion aggregation may
    /// overwrite this the next time a destination changes; both writers are
    /// allowed and the last one wins.
    pub async fn set_status(&self, id: &Uuid, status: RequestStatus) -> Result<LetterRequest> {
        let mut request = self.get(id).await?;
        request.status = status;
        request.updated_at = Utc::now();
        self.store.update_request(&request).await?;
        log::info!("request {id} status set to {status:?}");
        Ok(request)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<LetterRequest> {
        self.store
            .delete_request(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("request", id))
    }
}

fn validate_notes(notes: Option<&str>) -> Result<()> {
    match notes {
        Some(notes) if notes.chars().count() > MAX_NOTES_LENGTH => Err(ServiceError::Validation(
            format!("professor notes exceed {MAX_NOTES_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}
