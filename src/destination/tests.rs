#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::destination::models::{
        CreateDestinationPayload, DestinationMethod, DestinationStatus,
    };
    use crate::destination::service::DestinationService;
    use crate::request::models::{CreateRequestPayload, RequestStatus};
    use crate::request::service::RequestService;
    use crate::store::{MemoryStore, RequestStore, StoreObject};

    struct Fixture {
        store: StoreObject,
        requests: RequestService,
        destinations: DestinationService,
    }

    fn fixture() -> Fixture {
        let store: StoreObject = Arc::new(MemoryStore::new());
        Fixture {
            requests: RequestService::new(store.clone()),
            destinations: DestinationService::new(store.clone()),
            store,
        }
    }

    fn email_payload() -> CreateDestinationPayload {
        CreateDestinationPayload {
            method: DestinationMethod::Email,
            recipient_email: Some("admissions@example.edu".to_string()),
            recipient_name: None,
            institution_name: Some("Example University".to_string()),
            program_name: None,
        }
    }

    async fn request_status(store: &StoreObject, id: &Uuid) -> RequestStatus {
        store.find_request(id).await.unwrap().unwrap().status
    }

    #[tokio::test]
    async fn test_new_destination_starts_pending() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        let destination = f
            .destinations
            .create(&request.id, email_payload())
            .await
            .unwrap();

        assert_eq!(destination.status, DestinationStatus::Pending);
        assert_eq!(destination.sent_at, None);
    }

    #[tokio::test]
    async fn test_mark_sent_stamps_and_completes_single_destination() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();
        let destination = f
            .destinations
            .create(&request.id, email_payload())
            .await
            .unwrap();

        let sent = f.destinations.mark_sent(&destination.id).await.unwrap();
        assert_eq!(sent.status, DestinationStatus::Sent);
        assert!(sent.sent_at.is_some());

        // Sole destination delivered -> request completed.
        assert_eq!(
            request_status(&f.store, &request.id).await,
            RequestStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_confirm_requires_sent() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();
        let destination = f
            .destinations
            .create(&request.id, email_payload())
            .await
            .unwrap();

        assert!(f.destinations.mark_confirmed(&destination.id).await.is_err());

        f.destinations.mark_sent(&destination.id).await.unwrap();
        let confirmed = f.destinations.mark_confirmed(&destination.id).await.unwrap();
        assert_eq!(confirmed.status, DestinationStatus::Confirmed);
        assert!(confirmed.confirmed_at.is_some());
    }

    #[tokio::test]
    async fn test_mixed_sent_confirmed_completes_but_pending_blocks() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        let first = f.destinations.create(&request.id, email_payload()).await.unwrap();
        let second = f.destinations.create(&request.id, email_payload()).await.unwrap();

        f.destinations.mark_sent(&first.id).await.unwrap();
        f.destinations.mark_sent(&second.id).await.unwrap();
        f.destinations.mark_confirmed(&second.id).await.unwrap();
        assert_eq!(
            request_status(&f.store, &request.id).await,
            RequestStatus::Completed
        );

        // A third pending destination keeps a later re-evaluation from
        // reporting completion.
        let third = f.destinations.create(&request.id, email_payload()).await.unwrap();
        f.requests
            .set_status(&request.id, RequestStatus::InProgress)
            .await
            .unwrap();
        f.destinations
            .reevaluate_completion(&request.id)
            .await
            .unwrap();
        assert_eq!(
            request_status(&f.store, &request.id).await,
            RequestStatus::InProgress
        );
        assert_eq!(
            f.destinations.get(&third.id).await.unwrap().status,
            DestinationStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_zero_destinations_never_complete() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();

        f.destinations
            .reevaluate_completion(&request.id)
            .await
            .unwrap();
        assert_eq!(
            request_status(&f.store, &request.id).await,
            RequestStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_failure_records_reason_and_skips_aggregation() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();
        let destination = f
            .destinations
            .create(&request.id, email_payload())
            .await
            .unwrap();

        let failed = f
            .destinations
            .mark_failed(&destination.id, "SMTP connection refused".to_string())
            .await
            .unwrap();
        assert_eq!(failed.status, DestinationStatus::Failed);
        assert_eq!(
            failed.failure_reason.as_deref(),
            Some("SMTP connection refused")
        );
        assert_eq!(
            request_status(&f.store, &request.id).await,
            RequestStatus::Pending
        );

        // Resubmission after a failure is allowed and clears nothing but
        // the state itself.
        let resent = f.destinations.mark_sent(&destination.id).await.unwrap();
        assert_eq!(resent.status, DestinationStatus::Sent);
    }

    #[tokio::test]
    async fn test_reset_clears_stamps_and_reverts_completed_request() {
        let f = fixture();
        let request = f.requests.create(CreateRequestPayload::default()).await.unwrap();
        let destination = f
            .destinations
            .create(&request.id, email_payload())
            .await
            .unwrap();

        f.destinations.mark_sent(&destination.id).await.unwrap();
        f.destinations.mark_confirmed(&destination.id).await.unwrap();
        assert_eq!(
            request_status(&f.store, &request.id).await,
            RequestStatus::Completed
        );

        let reset = f.destinations.reset(&destination.id).await.unwrap();
        assert_eq!(reset.status, DestinationStatus::Pending);
        assert_eq!(reset.sent_at, None);
        assert_eq!(reset.confirmed_at, None);
        assert_eq!(reset.failure_reason, None);
        assert_eq!(
            request_status(&f.store, &request.id).await,
            RequestStatus::InProgress
        );
    }
}
