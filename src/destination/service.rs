//! Per-destination delivery state machine and the completion rule that
//! derives a request's status from all of its destinations.

use chrono::Utc;
use uuid::Uuid;

use crate::destination::models::{
    CreateDestinationPayload, DestinationStatus, SubmissionDestination, UpdateDestinationPayload,
};
use crate::error::{Result, ServiceError};
use crate::request::models::RequestStatus;
use crate::store::StoreObject;

pub struct DestinationService {
    store: StoreObject,
}

impl DestinationService {
    pub fn new(store: StoreObject) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        request_id: &Uuid,
        payload: CreateDestinationPayload,
    ) -> Result<SubmissionDestination> {
        if self.store.find_request(request_id).await?.is_none() {
            return Err(ServiceError::not_found("request", request_id));
        }

        let mut destination = SubmissionDestination::new(*request_id, payload.method);
        destination.recipient_email = payload.recipient_email;
        destination.recipient_name = payload.recipient_name;
        destination.institution_name = payload.institution_name;
        destination.program_name = payload.program_name;

        self.store.insert_destination(&destination).await?;
        Ok(destination)
    }

    pub async fn get(&self, id: &Uuid) -> Result<SubmissionDestination> {
        self.store
            .find_destination(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("destination", id))
    }

    pub async fn list_for_request(&self, request_id: &Uuid) -> Result<Vec<SubmissionDestination>> {
        Ok(self.store.destinations_for_request(request_id).await?)
    }

    pub async fn update(
        &self,
        id: &Uuid,
        payload: UpdateDestinationPayload,
    ) -> Result<SubmissionDestination> {
        let mut destination = self.get(id).await?;
        payload
            .recipient_email
            .apply_to(&mut destination.recipient_email);
        payload
            .recipient_name
            .apply_to(&mut destination.recipient_name);
        payload
            .institution_name
            .apply_to(&mut destination.institution_name);
        payload
            .program_name
            .apply_to(&mut destination.program_name);
        self.store.update_destination(&destination).await?;
        Ok(destination)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<SubmissionDestination> {
        let removed = self
            .store
            .delete_destination(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("destination", id))?;
        // Removing a pending destination can be what finally completes the
        // request, so the rule runs here too.
        self.reevaluate_completion(&removed.request_id).await?;
        Ok(removed)
    }

    /// PENDING (or a FAILED resubmission, or a repeat send) -> SENT.
    /// Confirmed destinations stay confirmed.
    pub async fn mark_sent(&self, id: &Uuid) -> Result<SubmissionDestination> {
        let mut destination = self.get(id).await?;
        if destination.status == DestinationStatus::Confirmed {
            return Err(ServiceError::Precondition(format!(
                "destination {id} is already confirmed"
            )));
        }
        destination.status = DestinationStatus::Sent;
        destination.sent_at = Some(Utc::now());
        self.store.update_destination(&destination).await?;
        log::info!("destination {id} marked sent");

        self.reevaluate_completion(&destination.request_id).await?;
        Ok(destination)
    }

    /// SENT -> CONFIRMED, manual confirmation only.
    pub async fn mark_confirmed(&self, id: &Uuid) -> Result<SubmissionDestination> {
        let mut destination = self.get(id).await?;
        if destination.status != DestinationStatus::Sent {
            return Err(ServiceError::Precondition(format!(
                "destination {id} must be sent before it can be confirmed"
            )));
        }
        destination.status = DestinationStatus::Confirmed;
        destination.confirmed_at = Some(Utc::now());
        self.store.update_destination(&destination).await?;
        log::info!("destination {id} confirmed");

        self.reevaluate_completion(&destination.request_id).await?;
        Ok(destination)
    }

    /// Record a delivery failure. Terminal until resubmitted or reset;
    /// never triggers completion aggregation and never retries.
    pub async fn mark_failed(&self, id: &Uuid, reason: String) -> Result<SubmissionDestination> {
        let mut destination = self.get(id).await?;
        if destination.status == DestinationStatus::Confirmed {
            return Err(ServiceError::Precondition(format!(
                "destination {id} is already confirmed"
            )));
        }
        destination.status = DestinationStatus::Failed;
        destination.failure_reason = Some(reason);
        self.store.update_destination(&destination).await?;
        log::warn!(
            "destination {id} failed: {}",
            destination.failure_reason.as_deref().unwrap_or_default()
        );
        Ok(destination)
    }

    /// Return any state to PENDING, clearing delivery stamps and the
    /// failure reason. A completed request owning the destination drops
    /// back to IN_PROGRESS.
    pub async fn reset(&self, id: &Uuid) -> Result<SubmissionDestination> {
        let mut destination = self.get(id).await?;
        destination.status = DestinationStatus::Pending;
        destination.sent_at = None;
        destination.confirmed_at = None;
        destination.failure_reason = None;
        self.store.update_destination(&destination).await?;
        log::info!("destination {id} reset to pending");

        if let Some(mut request) = self.store.find_request(&destination.request_id).await? {
            if request.status == RequestStatus::Completed {
                request.status = RequestStatus::InProgress;
                request.updated_at = Utc::now();
                self.store.update_request(&request).await?;
                log::info!(
                    "request {} reverted to in-progress after destination reset",
                    request.id
                );
            }
        }
        Ok(destination)
    }

    /// Completion rule: a request with at least one destination, all of
    /// them sent or confirmed, is complete. Reads the destination list at
    /// call time; concurrent updates converge because every destination
    /// change runs the rule again.
    pub async fn reevaluate_completion(&self, request_id: &Uuid) -> Result<()> {
        let destinations = self.store.destinations_for_request(request_id).await?;
        if destinations.is_empty() {
            return Ok(());
        }
        if !destinations
            .iter()
            .all(|d| d.status.counts_as_delivered())
        {
            return Ok(());
        }

        let Some(mut request) = self.store.find_request(request_id).await? else {
            return Ok(());
        };
        if request.status != RequestStatus::Completed {
            request.status = RequestStatus::Completed;
            request.updated_at = Utc::now();
            self.store.update_request(&request).await?;
            log::info!("request {request_id} completed, all destinations delivered");
        }
        Ok(())
    }
}
