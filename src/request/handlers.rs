use actix_web::{
    web::{self, Json, Path, Query},
    HttpResponse,
};
use log::info;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::request::models::{
    CreateRequestPayload, LetterRequest, RequestQuery, UpdateRequestPayload, UpdateStatusPayload,
};
use crate::request::service::RequestService;
use crate::state::AppState;
use crate::store::RequestFilter;
use crate::ErrorResponse;

fn service(data: &web::Data<AppState>) -> RequestService {
    RequestService::new(data.store.clone())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Request Service",
    post,
    path = "/requests",
    request_body = CreateRequestPayload,
    responses(
        (status = 201, description = "Request created with a fresh access code", body = LetterRequest),
        (status = 409, description = "Unique access code could not be allocated", body = ErrorResponse)
    )
)]
pub async fn create_request(
    data: web::Data<AppState>,
    payload: Json<CreateRequestPayload>,
) -> Result<HttpResponse, ServiceError> {
    let request = service(&data).create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(request))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Request Service",
    get,
    path = "/requests",
    params(
        ("status" = Option<String>, Query, description = "Filter by request status"),
        ("search" = Option<String>, Query, description = "Free-text match on student, professor and notes")
    ),
    responses(
        (status = 200, description = "List of requests", body = [LetterRequest])
    )
)]
pub async fn list_requests(
    data: web::Data<AppState>,
    query: Query<RequestQuery>,
) -> Result<HttpResponse, ServiceError> {
    let query = query.into_inner();
    let filter = RequestFilter {
        status: query.status,
        search: query.search,
    };
    let requests = service(&data).list(&filter).await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Request Service",
    get,
    path = "/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request found", body = LetterRequest),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
pub async fn get_request(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let request = service(&data).get(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Request Service",
    get,
    path = "/requests/code/{code}",
    params(("code" = String, Path, description = "Student access code")),
    responses(
        (status = 200, description = "Request found", body = LetterRequest),
        (status = 404, description = "No request for this code", body = ErrorResponse)
    )
)]
pub async fn get_request_by_code(
    data: web::Data<AppState>,
    code: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let request = service(&data).get_by_code(&code.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Request Service",
    put,
    path = "/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateRequestPayload,
    responses(
        (status = 200, description = "Request updated", body = LetterRequest),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
pub async fn update_request(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Json<UpdateRequestPayload>,
) -> Result<HttpResponse, ServiceError> {
    let request = service(&data)
        .update(&id.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Request Service",
    put,
    path = "/requests/{id}/status",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = LetterRequest),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
pub async fn set_request_status(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Json<UpdateStatusPayload>,
) -> Result<HttpResponse, ServiceError> {
    let request = service(&data)
        .set_status(&id.into_inner(), payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Request Service",
    post,
    path = "/requests/{id}/regenerate-code",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "New access code issued", body = LetterRequest),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Unique access code could not be allocated", body = ErrorResponse)
    )
)]
pub async fn regenerate_access_code(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let request = service(&data).regenerate_code(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Request Service",
    delete,
    path = "/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 204, description = "Request and everything it owns deleted"),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
pub async fn delete_request(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    service(&data).delete(&id).await?;
    // Stored uploads for the request go with it; losing the directory is
    // not worth failing the delete over.
    if let Err(err) = data.uploads.remove_request_dir(&id) {
        log::warn!("could not remove upload directory for request {id}: {err}");
    }
    info!("deleted request {id}");
    Ok(HttpResponse::NoContent().finish())
}
