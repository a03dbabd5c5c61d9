use actix_web::{
    web::{self, Json, Path},
    HttpResponse,
};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::state::AppState;
use crate::template::models::{CreateTemplatePayload, Template, UpdateTemplatePayload};
use crate::template::service::TemplateService;
use crate::ErrorResponse;

fn service(data: &web::Data<AppState>) -> TemplateService {
    TemplateService::new(data.store.clone())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Template Service",
    post,
    path = "/templates",
    request_body = CreateTemplatePayload,
    responses(
        (status = 201, description = "Template created", body = Template)
    )
)]
pub async fn create_template(
    data: web::Data<AppState>,
    payload: Json<CreateTemplatePayload>,
) -> Result<HttpResponse, ServiceError> {
    let template = service(&data).create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(template))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Template Service",
    get,
    path = "/templates",
    responses(
        (status = 200, description = "All letter templates", body = [Template])
    )
)]
pub async fn list_templates(data: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let templates = service(&data).list().await?;
    Ok(HttpResponse::Ok().json(templates))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Template Service",
    get,
    path = "/templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template found", body = Template),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn get_template(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let template = service(&data).get(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(template))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Template Service",
    put,
    path = "/templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    request_body = UpdateTemplatePayload,
    responses(
        (status = 200, description = "Template updated", body = Template),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn update_template(
    data: web::Data<AppState>,
    id: Path<Uuid>,
    payload: Json<UpdateTemplatePayload>,
) -> Result<HttpResponse, ServiceError> {
    let template = service(&data)
        .update(&id.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(template))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Template Service",
    put,
    path = "/templates/{id}/default",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template is now the single default", body = Template),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn set_default_template(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let template = service(&data).set_default(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(template))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Template Service",
    delete,
    path = "/templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn delete_template(
    data: web::Data<AppState>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    service(&data).delete(&id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
