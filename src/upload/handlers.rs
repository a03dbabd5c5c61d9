use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::{
    web::{self, Path},
    HttpRequest, HttpResponse,
};
use futures_util::TryStreamExt;
use log::{debug, info};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::state::AppState;
use crate::upload::models::{BatchUploadReport, Document, UploadedFile};
use crate::upload::service::UploadService;
use crate::ErrorResponse;

fn service(data: &web::Data<AppState>) -> UploadService {
    UploadService::new(data.store.clone(), data.uploads.clone())
}

/// Drain every file field of the multipart payload into memory.
async fn collect_files(mut payload: Multipart) -> Result<Vec<UploadedFile>, ServiceError> {
    let mut files = Vec::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| ServiceError::Validation(err.to_string()))?
    {
        let Some(original_filename) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
        else {
            // Non-file form fields are ignored.
            continue;
        };

        let declared_mime = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| String::from("application/octet-stream"));

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|err| ServiceError::Validation(err.to_string()))?
        {
            bytes.extend_from_slice(&chunk);
        }

        debug!(
            "received upload field '{original_filename}' ({declared_mime}, {} bytes)",
            bytes.len()
        );
        files.push(UploadedFile {
            original_filename,
            declared_mime,
            bytes,
        });
    }

    if files.is_empty() {
        return Err(ServiceError::Validation(
            "no file was uploaded".to_string(),
        ));
    }
    Ok(files)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Document Service",
    post,
    path = "/requests/{id}/documents",
    params(("id" = Uuid, Path, description = "Owning request ID")),
    responses(
        (status = 200, description = "Batch validated; every file is in exactly one list", body = BatchUploadReport),
        (status = 400, description = "Empty or malformed multipart payload", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
pub async fn upload_documents(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let request_id = id.into_inner();
    let files = collect_files(payload).await?;
    info!(
        "validating {} uploaded file(s) for request {request_id}",
        files.len()
    );
    let report = service(&data).validate_and_store(&request_id, files).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Document Service",
    get,
    path = "/requests/{id}/documents",
    params(("id" = Uuid, Path, description = "Owning request ID")),
    responses(
        (status = 200, description = "Documents stored for the request", body = [Document])
    )
)]
pub async fn list_documents(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let documents = service(&data).list_for_request(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Document Service",
    get,
    path = "/documents/{id}/file",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Stored file contents"),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn serve_document(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, ServiceError> {
    let service = service(&data);
    let document = service.get(&id.into_inner()).await?;
    let file = NamedFile::open_async(service.stored_path(&document)).await?;
    Ok(file.into_response(&req))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Document Service",
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document and stored file removed"),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn delete_document(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    service(&data).delete(&id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
