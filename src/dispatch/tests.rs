#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use uuid::Uuid;

    use crate::destination::models::{
        CreateDestinationPayload, DestinationMethod, DestinationStatus,
    };
    use crate::destination::service::DestinationService;
    use crate::dispatch::mailer::{Mailer, MailerError, OutgoingEmail};
    use crate::dispatch::renderer::{LetterRenderer, RendererError};
    use crate::dispatch::service::DispatchService;
    use crate::error::ServiceError;
    use crate::letter::models::{CreateLetterPayload, Letter};
    use crate::letter::service::LetterService;
    use crate::request::models::{CreateRequestPayload, RequestStatus};
    use crate::request::service::RequestService;
    use crate::store::{MemoryStore, RequestStore, StoreObject};

    /// Mailer double: records what it was asked to send, optionally
    /// failing every send with a fixed transport error.
    #[derive(Default)]
    struct StubMailer {
        fail_with: Option<String>,
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for StubMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
            if let Some(reason) = &self.fail_with {
                return Err(MailerError::Transport(reason.clone()));
            }
            self.sent.lock().push(email.clone());
            Ok(())
        }
    }

    /// Renderer double: writes the letter body next to the test and
    /// pretends it is a PDF.
    struct StubRenderer {
        dir: PathBuf,
    }

    #[async_trait]
    impl LetterRenderer for StubRenderer {
        async fn existing_artifact(
            &self,
            _letter_id: &Uuid,
        ) -> Result<Option<PathBuf>, RendererError> {
            Ok(None)
        }

        async fn render_artifact(&self, letter: &Letter) -> Result<PathBuf, RendererError> {
            let path = self.dir.join(format!("letter-{}.pdf", letter.id));
            std::fs::write(&path, letter.content.as_bytes())
                .map_err(RendererError::WriteSource)?;
            Ok(path)
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        store: StoreObject,
        mailer: Arc<StubMailer>,
        dispatch: DispatchService,
        requests: RequestService,
        destinations: DestinationService,
        letters: LetterService,
    }

    fn fixture(fail_with: Option<&str>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store: StoreObject = Arc::new(MemoryStore::new());
        let mailer = Arc::new(StubMailer {
            fail_with: fail_with.map(str::to_string),
            sent: Mutex::new(Vec::new()),
        });
        let renderer = Arc::new(StubRenderer {
            dir: dir.path().to_path_buf(),
        });
        Fixture {
            store: store.clone(),
            mailer: mailer.clone(),
            dispatch: DispatchService::new(store.clone(), mailer, renderer),
            requests: RequestService::new(store.clone()),
            destinations: DestinationService::new(store.clone()),
            letters: LetterService::new(store),
            _dir: dir,
        }
    }

    async fn seeded(f: &Fixture) -> (Uuid, Uuid, Uuid) {
        let request = f
            .requests
            .create(CreateRequestPayload {
                student_name: Some("Ada Lovelace".to_string()),
                professor_name: Some("Prof. Babbage".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let letter = f
            .letters
            .create(
                &request.id,
                CreateLetterPayload {
                    template_id: None,
                    variables: Default::default(),
                    content: Some("I recommend Ada.".to_string()),
                },
            )
            .await
            .unwrap();
        let destination = f
            .destinations
            .create(
                &request.id,
                CreateDestinationPayload {
                    method: DestinationMethod::Email,
                    recipient_email: Some("admissions@example.edu".to_string()),
                    recipient_name: None,
                    institution_name: Some("Example University".to_string()),
                    program_name: None,
                },
            )
            .await
            .unwrap();
        (request.id, letter.id, destination.id)
    }

    #[tokio::test]
    async fn test_successful_dispatch_sends_and_marks_sent() {
        let f = fixture(None);
        let (request_id, letter_id, destination_id) = seeded(&f).await;

        let destination = f
            .dispatch
            .send_letter(&letter_id, &destination_id)
            .await
            .unwrap();

        assert_eq!(destination.status, DestinationStatus::Sent);
        assert!(destination.sent_at.is_some());

        let sent = f.mailer.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "admissions@example.edu");
        assert!(sent[0].subject.contains("Ada Lovelace"));
        assert!(sent[0].attachment.is_some());

        // Sole destination delivered, so the request completed.
        let request = f.store.find_request(&request_id).await.unwrap().unwrap();
        assert_eq!(request.status, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn test_transport_failure_records_reason_verbatim() {
        let f = fixture(Some("connection refused by relay"));
        let (_, letter_id, destination_id) = seeded(&f).await;

        let err = f
            .dispatch
            .send_letter(&letter_id, &destination_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));

        let destination = f.destinations.get(&destination_id).await.unwrap();
        assert_eq!(destination.status, DestinationStatus::Failed);
        assert_eq!(
            destination.failure_reason.as_deref(),
            Some("connection refused by relay")
        );
        assert_eq!(destination.sent_at, None);
    }

    #[tokio::test]
    async fn test_precondition_letter_and_destination_must_exist() {
        let f = fixture(None);
        let (_, letter_id, destination_id) = seeded(&f).await;

        let err = f
            .dispatch
            .send_letter(&Uuid::new_v4(), &destination_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "letter", .. }));

        let err = f
            .dispatch
            .send_letter(&letter_id, &Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "destination",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_precondition_same_request_and_email_method() {
        let f = fixture(None);
        let (_, letter_id, _) = seeded(&f).await;

        // Destination on a different request.
        let other = f
            .requests
            .create(CreateRequestPayload::default())
            .await
            .unwrap();
        let foreign = f
            .destinations
            .create(
                &other.id,
                CreateDestinationPayload {
                    method: DestinationMethod::Email,
                    recipient_email: Some("a@b.c".to_string()),
                    recipient_name: None,
                    institution_name: None,
                    program_name: None,
                },
            )
            .await
            .unwrap();
        let err = f
            .dispatch
            .send_letter(&letter_id, &foreign.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Precondition(_)));

        // Wrong method on the right request.
        let letter = f.letters.get(&letter_id).await.unwrap();
        let download = f
            .destinations
            .create(
                &letter.request_id,
                CreateDestinationPayload {
                    method: DestinationMethod::Download,
                    recipient_email: None,
                    recipient_name: None,
                    institution_name: None,
                    program_name: None,
                },
            )
            .await
            .unwrap();
        let err = f
            .dispatch
            .send_letter(&letter_id, &download.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_missing_recipient_email_is_a_validation_error() {
        let f = fixture(None);
        let (request_id, letter_id, _) = seeded(&f).await;

        let no_email = f
            .destinations
            .create(
                &request_id,
                CreateDestinationPayload {
                    method: DestinationMethod::Email,
                    recipient_email: None,
                    recipient_name: None,
                    institution_name: None,
                    program_name: None,
                },
            )
            .await
            .unwrap();

        let err = f
            .dispatch
            .send_letter(&letter_id, &no_email.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // Nothing was sent and the destination is untouched.
        assert!(f.mailer.sent.lock().is_empty());
        assert_eq!(
            f.destinations.get(&no_email.id).await.unwrap().status,
            DestinationStatus::Pending
        );
    }
}
