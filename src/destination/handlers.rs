use actix_web::{
    web::{self, Json, Path},
    HttpResponse,
};
use uuid::Uuid;

use crate::destination::models::{
    CreateDestinationPayload, DispatchPayload, FailDestinationPayload, SubmissionDestination,
    UpdateDestinationPayload,
};
use crate::destination::service::DestinationService;
use crate::dispatch::service::DispatchService;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::ErrorResponse;

fn service(data: &web::Data<AppState>) -> DestinationService {
    DestinationService::new(data.store.clone())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    post,
    path = "/requests/{id}/destinations",
    params(("id" = Uuid, Path, description = "Owning request ID")),
    request_body = CreateDestinationPayload,
    responses(
        (status = 201, description = "Destination created in pending state", body = SubmissionDestination),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
pub async fn create_destination(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Json<CreateDestinationPayload>,
) -> Result<HttpResponse, ServiceError> {
    let destination = service(&data)
        .create(&id.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(destination))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    get,
    path = "/requests/{id}/destinations",
    params(("id" = Uuid, Path, description = "Owning request ID")),
    responses(
        (status = 200, description = "Destinations for the request", body = [SubmissionDestination])
    )
)]
pub async fn list_destinations(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let destinations = service(&data).list_for_request(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(destinations))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    put,
    path = "/destinations/{id}",
    params(("id" = Uuid, Path, description = "Destination ID")),
    request_body = UpdateDestinationPayload,
    responses(
        (status = 200, description = "Destination updated", body = SubmissionDestination),
        (status = 404, description = "Destination not found", body = ErrorResponse)
    )
)]
pub async fn update_destination(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Json<UpdateDestinationPayload>,
) -> Result<HttpResponse, ServiceError> {
    let destination = service(&data)
        .update(&id.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(destination))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    delete,
    path = "/destinations/{id}",
    params(("id" = Uuid, Path, description = "Destination ID")),
    responses(
        (status = 204, description = "Destination deleted"),
        (status = 404, description = "Destination not found", body = ErrorResponse)
    )
)]
pub async fn delete_destination(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    service(&data).delete(&id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    post,
    path = "/destinations/{id}/sent",
    params(("id" = Uuid, Path, description = "Destination ID")),
    responses(
        (status = 200, description = "Destination marked sent", body = SubmissionDestination),
        (status = 404, description = "Destination not found", body = ErrorResponse),
        (status = 409, description = "Destination already confirmed", body = ErrorResponse)
    )
)]
pub async fn mark_destination_sent(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let destination = service(&data).mark_sent(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(destination))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    post,
    path = "/destinations/{id}/confirmed",
    params(("id" = Uuid, Path, description = "Destination ID")),
    responses(
        (status = 200, description = "Destination confirmed", body = SubmissionDestination),
        (status = 404, description = "Destination not found", body = ErrorResponse),
        (status = 409, description = "Destination is not in sent state", body = ErrorResponse)
    )
)]
pub async fn mark_destination_confirmed(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let destination = service(&data).mark_confirmed(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(destination))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    post,
    path = "/destinations/{id}/failed",
    params(("id" = Uuid, Path, description = "Destination ID")),
    request_body = FailDestinationPayload,
    responses(
        (status = 200, description = "Failure recorded", body = SubmissionDestination),
        (status = 404, description = "Destination not found", body = ErrorResponse)
    )
)]
pub async fn mark_destination_failed(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Json<FailDestinationPayload>,
) -> Result<HttpResponse, ServiceError> {
    let destination = service(&data)
        .mark_failed(&id.into_inner(), payload.into_inner().reason)
        .await?;
    Ok(HttpResponse::Ok().json(destination))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    post,
    path = "/destinations/{id}/reset",
    params(("id" = Uuid, Path, description = "Destination ID")),
    responses(
        (status = 200, description = "Destination reset to pending", body = SubmissionDestination),
        (status = 404, description = "Destination not found", body = ErrorResponse)
    )
)]
pub async fn reset_destination(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let destination = service(&data).reset(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(destination))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Destination Service",
    post,
    path = "/destinations/{id}/dispatch",
    params(("id" = Uuid, Path, description = "Destination ID")),
    request_body = DispatchPayload,
    responses(
        (status = 200, description = "Letter emailed and destination marked sent", body = SubmissionDestination),
        (status = 404, description = "Letter or destination not found", body = ErrorResponse),
        (status = 409, description = "Letter and destination do not line up", body = ErrorResponse),
        (status = 502, description = "Transport failure, recorded on the destination", body = ErrorResponse)
    )
)]
pub async fn dispatch_destination(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Json<DispatchPayload>,
) -> Result<HttpResponse, ServiceError> {
    let dispatch = DispatchService::new(
        data.store.clone(),
        data.mailer.clone(),
        data.renderer.clone(),
    );
    let destination = dispatch
        .send_letter(&payload.letter_id, &id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(destination))
}
