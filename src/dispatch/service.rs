//! Email dispatch workflow: render the letter, mail it, and advance the
//! destination's delivery state.

use uuid::Uuid;

use crate::destination::models::{DestinationMethod, SubmissionDestination};
use crate::destination::service::DestinationService;
use crate::dispatch::mailer::{EmailAttachment, MailerObject, OutgoingEmail};
use crate::dispatch::renderer::RendererObject;
use crate::error::{Result, ServiceError};
use crate::letter::models::Letter;
use crate::request::models::LetterRequest;
use crate::store::StoreObject;

pub struct DispatchService {
    store: StoreObject,
    mailer: MailerObject,
    renderer: RendererObject,
}

impl DispatchService {
    pub fn new(store: StoreObject, mailer: MailerObject, renderer: RendererObject) -> Self {
        Self {
            store,
            mailer,
            renderer,
        }
    }

    /// Send `letter_id` to `destination_id` over email.
    ///
    /// Preconditions are checked in order and each failure is its own
    /// error: the letter exists, the destination exists, they belong to the
    /// same request, the destination method is EMAIL, and a recipient
    /// address is present. On transport failure the destination is marked
    /// failed with the transport's error text before the error is returned;
    /// there is no automatic retry.
    pub async fn send_letter(
        &self,
        letter_id: &Uuid,
        destination_id: &Uuid,
    ) -> Result<SubmissionDestination> {
        let letter = self
            .store
            .find_letter(letter_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("letter", letter_id))?;
        let destination = self
            .store
            .find_destination(destination_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("destination", destination_id))?;

        if destination.request_id != letter.request_id {
            return Err(ServiceError::Precondition(format!(
                "destination {destination_id} does not belong to the same request as letter {letter_id}"
            )));
        }
        if destination.method != DestinationMethod::Email {
            return Err(ServiceError::Precondition(format!(
                "destination {destination_id} is not an email destination"
            )));
        }
        let Some(recipient) = destination.recipient_email.clone() else {
            return Err(ServiceError::Validation(format!(
                "destination {destination_id} has no recipient email address"
            )));
        };

        let request = self
            .store
            .find_request(&letter.request_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("request", letter.request_id))?;

        let artifact = match self.renderer.existing_artifact(&letter.id).await? {
            Some(path) => path,
            None => self.renderer.render_artifact(&letter).await?,
        };
        let artifact_bytes = std::fs::read(&artifact)?;

        let email = compose_email(&request, &destination, &letter, recipient, artifact_bytes);

        let destinations = DestinationService::new(self.store.clone());
        match self.mailer.send(&email).await {
            Ok(()) => {
                log::info!("letter {letter_id} emailed to destination {destination_id}");
                destinations.mark_sent(destination_id).await
            }
            Err(err) => {
                let reason = err.to_string();
                // The reason has to land on the destination even though the
                // call still fails.
                if let Err(record_err) = destinations
                    .mark_failed(destination_id, reason.clone())
                    .await
                {
                    log::error!(
                        "could not record failure on destination {destination_id}: {record_err}"
                    );
                }
                Err(ServiceError::Transport(reason))
            }
        }
    }
}

/// Build the outgoing message, falling back to neutral wording for any
/// optional field that is missing.
fn compose_email(
    request: &LetterRequest,
    destination: &SubmissionDestination,
    letter: &Letter,
    recipient: String,
    artifact_bytes: Vec<u8>,
) -> OutgoingEmail {
    let student = request.student_name.as_deref().unwrap_or("the student");
    let professor = request
        .professor_name
        .as_deref()
        .unwrap_or("the recommending professor");
    let greeting = destination
        .recipient_name
        .as_deref()
        .unwrap_or("Admissions Committee");
    let institution = destination
        .institution_name
        .as_deref()
        .unwrap_or("your institution");

    let program_line = match destination.program_name.as_deref() {
        Some(program) => format!(" in support of the application to {program}"),
        None => String::new(),
    };

    OutgoingEmail {
        to: recipient,
        subject: format!("Letter of recommendation for {student}"),
        body: format!(
            "Dear {greeting},\n\n\
             Please find attached a letter of recommendation for {student}, \
             written by {professor} and submitted to {institution}{program_line}.\n\n\
             Kind regards,\n{professor}"
        ),
        attachment: Some(EmailAttachment {
            filename: format!("recommendation-letter-v{}.pdf", letter.version),
            content_type: String::from("application/pdf"),
            bytes: artifact_bytes,
        }),
    }
}
