#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::request::models::CreateRequestPayload;
    use crate::request::service::RequestService;
    use crate::store::{MemoryStore, StoreObject};
    use crate::upload::models::UploadedFile;
    use crate::upload::service::UploadService;
    use crate::upload::storage::UploadStorage;

    const PNG_HEAD: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const JPG_HEAD: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    struct Fixture {
        _dir: tempfile::TempDir,
        storage: UploadStorage,
        service: UploadService,
        requests: RequestService,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path());
        let store: StoreObject = Arc::new(MemoryStore::new());
        Fixture {
            storage: storage.clone(),
            service: UploadService::new(store.clone(), storage),
            requests: RequestService::new(store),
            _dir: dir,
        }
    }

    fn file(name: &str, mime: &str, bytes: Vec<u8>) -> UploadedFile {
        UploadedFile {
            original_filename: name.to_string(),
            declared_mime: mime.to_string(),
            bytes,
        }
    }

    fn pdf_bytes() -> Vec<u8> {
        b"%PDF-1.7 minimal".to_vec()
    }

    #[tokio::test]
    async fn test_consistent_pdf_is_accepted_and_stored() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        let report = f
            .service
            .validate_and_store(
                &request.id,
                vec![file("letter.pdf", "application/pdf", pdf_bytes())],
            )
            .await
            .unwrap();

        assert!(report.invalid.is_empty());
        assert_eq!(report.valid.len(), 1);
        let document = &report.valid[0];
        assert_eq!(document.original_filename, "letter.pdf");
        assert_eq!(document.content_type, "application/pdf");
        // Stored under a token name, not the original one.
        assert_ne!(document.stored_filename, "letter.pdf");
        assert!(document.stored_filename.ends_with(".pdf"));
        assert!(f
            .storage
            .path_of(&request.id, &document.stored_filename)
            .exists());
    }

    #[tokio::test]
    async fn test_mismatched_content_is_rejected_and_removed() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        // Declared PNG, JPEG bytes inside.
        let report = f
            .service
            .validate_and_store(
                &request.id,
                vec![file("photo.png", "image/png", JPG_HEAD.to_vec())],
            )
            .await
            .unwrap();

        assert!(report.valid.is_empty());
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].original_filename, "photo.png");

        // Nothing survives on disk for the request.
        let dir = f.storage.request_dir(&request.id);
        let leftovers = std::fs::read_dir(&dir)
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_disallowed_declared_mime_never_touches_disk() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        let report = f
            .service
            .validate_and_store(
                &request.id,
                vec![file("script.html", "text/html", b"<html></html>".to_vec())],
            )
            .await
            .unwrap();

        assert!(report.valid.is_empty());
        assert_eq!(report.invalid.len(), 1);
        assert!(!f.storage.request_dir(&request.id).exists());
    }

    #[tokio::test]
    async fn test_unrecognized_content_is_invalid() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        let report = f
            .service
            .validate_and_store(
                &request.id,
                vec![file("notes.pdf", "application/pdf", b"plain text".to_vec())],
            )
            .await
            .unwrap();

        assert!(report.valid.is_empty());
        assert_eq!(report.invalid.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_partitions_all_inputs_in_order() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        let report = f
            .service
            .validate_and_store(
                &request.id,
                vec![
                    file("a.pdf", "application/pdf", pdf_bytes()),
                    file("b.png", "image/png", JPG_HEAD.to_vec()),
                    file("c.png", "image/png", PNG_HEAD.to_vec()),
                    file("d.exe", "application/octet-stream", vec![0x4D, 0x5A]),
                ],
            )
            .await
            .unwrap();

        let valid: Vec<&str> = report
            .valid
            .iter()
            .map(|d| d.original_filename.as_str())
            .collect();
        let invalid: Vec<&str> = report
            .invalid
            .iter()
            .map(|i| i.original_filename.as_str())
            .collect();

        assert_eq!(valid, vec!["a.pdf", "c.png"]);
        assert_eq!(invalid, vec!["b.png", "d.exe"]);
        assert_eq!(valid.len() + invalid.len(), 4);
    }

    #[tokio::test]
    async fn test_delete_document_is_idempotent_about_the_file() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        let report = f
            .service
            .validate_and_store(
                &request.id,
                vec![file("letter.pdf", "application/pdf", pdf_bytes())],
            )
            .await
            .unwrap();
        let document = report.valid[0].clone();
        let path = f.storage.path_of(&request.id, &document.stored_filename);

        // Remove the file out from under the service first.
        std::fs::remove_file(&path).unwrap();
        let deleted = f.service.delete(&document.id).await.unwrap();
        assert_eq!(deleted.id, document.id);
    }
}
