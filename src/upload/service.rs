use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::store::StoreObject;
use crate::upload::models::{BatchUploadReport, Document, InvalidUpload, UploadedFile};
use crate::upload::storage::UploadStorage;
use crate::upload::validate::{content_matches_declared, sniff_kind, FileKind};

pub struct UploadService {
    store: StoreObject,
    storage: UploadStorage,
}

impl UploadService {
    pub fn new(store: StoreObject, storage: UploadStorage) -> Self {
        Self { store, storage }
    }

    /// Validate and persist a batch of uploads for one request.
    ///
    /// Phase one checks the declared MIME against the allow-list before
    /// anything touches disk. Phase two re-reads the stored file's leading
    /// bytes and requires the sniffed type to agree with the declared one;
    /// files that fail are deleted again (best-effort) and reported under
    /// their original name. Every input file ends up in exactly one of the
    /// two result lists, in input order.
    pub async fn validate_and_store(
        &self,
        request_id: &Uuid,
        files: Vec<UploadedFile>,
    ) -> Result<BatchUploadReport> {
        if self.store.find_request(request_id).await?.is_none() {
            return Err(ServiceError::not_found("request", request_id));
        }

        let mut report = BatchUploadReport {
            valid: Vec::new(),
            invalid: Vec::new(),
        };

        for file in files {
            let display_name = sanitize_filename::sanitize(&file.original_filename);

            let Some(declared) = FileKind::from_declared_mime(&file.declared_mime) else {
                log::warn!(
                    "rejected upload '{display_name}': declared type {} is not allowed",
                    file.declared_mime
                );
                report.invalid.push(InvalidUpload {
                    original_filename: display_name,
                    reason: format!("declared type {} is not allowed", file.declared_mime),
                });
                continue;
            };

            let (stored_filename, path) =
                self.storage.store(request_id, &display_name, &file.bytes)?;

            let prefix = UploadStorage::read_sniff_prefix(&path)?;
            let verdict = match sniff_kind(&prefix) {
                None => Some("file content is not a recognized type".to_string()),
                Some(sniffed) if !content_matches_declared(declared, sniffed) => {
                    Some("file content does not match its declared type".to_string())
                }
                Some(_) => None,
            };

            if let Some(reason) = verdict {
                // Cleanup must not mask the validation outcome.
                if let Err(err) = UploadStorage::remove(&path) {
                    log::warn!("could not remove rejected upload {}: {err}", path.display());
                }
                log::warn!("rejected upload '{display_name}': {reason}");
                report.invalid.push(InvalidUpload {
                    original_filename: display_name,
                    reason,
                });
                continue;
            }

            let document = Document {
                id: Uuid::new_v4(),
                request_id: *request_id,
                original_filename: display_name,
                stored_filename,
                content_type: declared.canonical_mime().to_string(),
                size: file.bytes.len() as u64,
                uploaded_at: Utc::now(),
            };
            self.store.insert_document(&document).await?;
            report.valid.push(document);
        }

        log::info!(
            "validated upload batch for request {request_id}: {} kept, {} rejected",
            report.valid.len(),
            report.invalid.len()
        );
        Ok(report)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Document> {
        self.store
            .find_document(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("document", id))
    }

    pub async fn list_for_request(&self, request_id: &Uuid) -> Result<Vec<Document>> {
        Ok(self.store.documents_for_request(request_id).await?)
    }

    pub fn stored_path(&self, document: &Document) -> std::path::PathBuf {
        self.storage
            .path_of(&document.request_id, &document.stored_filename)
    }

    /// Delete the record and its stored file. The file delete is
    /// idempotent, so a path that is already gone does not fail the call.
    pub async fn delete(&self, id: &Uuid) -> Result<Document> {
        let document = self
            .store
            .delete_document(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("document", id))?;
        UploadStorage::remove(&self.stored_path(&document))?;
        Ok(document)
    }
}
