use actix_files::NamedFile;
use actix_web::{
    web::{self, Json, Path},
    HttpRequest, HttpResponse,
};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::letter::models::{CreateLetterPayload, Letter};
use crate::letter::service::LetterService;
use crate::state::AppState;
use crate::ErrorResponse;

fn service(data: &web::Data<AppState>) -> LetterService {
    LetterService::new(data.store.clone())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letter Service",
    post,
    path = "/requests/{id}/letters",
    params(("id" = Uuid, Path, description = "Owning request ID")),
    request_body = CreateLetterPayload,
    responses(
        (status = 201, description = "Letter created", body = Letter),
        (status = 400, description = "Neither template nor content supplied", body = ErrorResponse),
        (status = 404, description = "Request or template not found", body = ErrorResponse)
    )
)]
pub async fn create_letter(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Json<CreateLetterPayload>,
) -> Result<HttpResponse, ServiceError> {
    let letter = service(&data)
        .create(&id.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(letter))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letter Service",
    get,
    path = "/requests/{id}/letters",
    params(("id" = Uuid, Path, description = "Owning request ID")),
    responses(
        (status = 200, description = "Letter versions for the request", body = [Letter])
    )
)]
pub async fn list_letters(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let letters = service(&data).list_for_request(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(letters))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letter Service",
    get,
    path = "/letters/{id}",
    params(("id" = Uuid, Path, description = "Letter ID")),
    responses(
        (status = 200, description = "Letter found", body = Letter),
        (status = 404, description = "Letter not found", body = ErrorResponse)
    )
)]
pub async fn get_letter(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let letter = service(&data).get(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(letter))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letter Service",
    get,
    path = "/letters/{id}/download",
    params(("id" = Uuid, Path, description = "Letter ID")),
    responses(
        (status = 200, description = "Rendered letter artifact"),
        (status = 404, description = "Letter not found", body = ErrorResponse)
    )
)]
pub async fn download_letter(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, ServiceError> {
    let letter = service(&data).get(&id.into_inner()).await?;

    let path = match data.renderer.existing_artifact(&letter.id).await? {
        Some(path) => path,
        None => data.renderer.render_artifact(&letter).await?,
    };

    let file = NamedFile::open_async(&path).await?;
    Ok(file.into_response(&req))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Letter Service",
    delete,
    path = "/letters/{id}",
    params(("id" = Uuid, Path, description = "Letter ID")),
    responses(
        (status = 204, description = "Letter deleted"),
        (status = 404, description = "Letter not found", body = ErrorResponse)
    )
)]
pub async fn delete_letter(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    service(&data).delete(&id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
