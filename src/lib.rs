use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod access_code;
pub mod config;
pub mod destination;
pub mod dispatch;
pub mod error;
pub mod letter;
pub mod patch;
pub mod request;
pub mod state;
pub mod store;
pub mod template;
pub mod upload;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("ValidationFailure", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Register every `/api` route. `run()` and the HTTP tests share this.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/requests")
                    .route(web::get().to(request::handlers::list_requests))
                    .route(web::post().to(request::handlers::create_request)),
            )
            .service(
                web::resource("/requests/code/{code}")
                    .route(web::get().to(request::handlers::get_request_by_code)),
            )
            .service(
                web::resource("/requests/{id}")
                    .route(web::get().to(request::handlers::get_request))
                    .route(web::put().to(request::handlers::update_request))
                    .route(web::delete().to(request::handlers::delete_request)),
            )
            .service(
                web::resource("/requests/{id}/status")
                    .route(web::put().to(request::handlers::set_request_status)),
            )
            .service(
                web::resource("/requests/{id}/regenerate-code")
                    .route(web::post().to(request::handlers::regenerate_access_code)),
            )
            .service(
                web::resource("/requests/{id}/documents")
                    .route(web::get().to(upload::handlers::list_documents))
                    .route(web::post().to(upload::handlers::upload_documents)),
            )
            .service(
                web::resource("/requests/{id}/destinations")
                    .route(web::get().to(destination::handlers::list_destinations))
                    .route(web::post().to(destination::handlers::create_destination)),
            )
            .service(
                web::resource("/requests/{id}/letters")
                    .route(web::get().to(letter::handlers::list_letters))
                    .route(web::post().to(letter::handlers::create_letter)),
            )
            .service(
                web::resource("/documents/{id}")
                    .route(web::delete().to(upload::handlers::delete_document)),
            )
            .service(
                web::resource("/documents/{id}/file")
                    .route(web::get().to(upload::handlers::serve_document)),
            )
            .service(
                web::resource("/destinations/{id}")
                    .route(web::put().to(destination::handlers::update_destination))
                    .route(web::delete().to(destination::handlers::delete_destination)),
            )
            .service(
                web::resource("/destinations/{id}/sent")
                    .route(web::post().to(destination::handlers::mark_destination_sent)),
            )
            .service(
                web::resource("/destinations/{id}/confirmed")
                    .route(web::post().to(destination::handlers::mark_destination_confirmed)),
            )
            .service(
                web::resource("/destinations/{id}/failed")
                    .route(web::post().to(destination::handlers::mark_destination_failed)),
            )
            .service(
                web::resource("/destinations/{id}/reset")
                    .route(web::post().to(destination::handlers::reset_destination)),
            )
            .service(
                web::resource("/destinations/{id}/dispatch")
                    .route(web::post().to(destination::handlers::dispatch_destination)),
            )
            .service(
                web::resource("/letters/{id}")
                    .route(web::get().to(letter::handlers::get_letter))
                    .route(web::delete().to(letter::handlers::delete_letter)),
            )
            .service(
                web::resource("/letters/{id}/download")
                    .route(web::get().to(letter::handlers::download_letter)),
            )
            .service(
                web::resource("/templates")
                    .route(web::get().to(template::handlers::list_templates))
                    .route(web::post().to(template::handlers::create_template)),
            )
            .service(
                web::resource("/templates/{id}")
                    .route(web::get().to(template::handlers::get_template))
                    .route(web::put().to(template::handlers::update_template))
                    .route(web::delete().to(template::handlers::delete_template)),
            )
            .service(
                web::resource("/templates/{id}/default")
                    .route(web::put().to(template::handlers::set_default_template)),
            ),
    );
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::request::handlers::create_request,
            crate::request::handlers::list_requests,
            crate::request::handlers::get_request,
            crate::request::handlers::get_request_by_code,
            crate::request::handlers::update_request,
            crate::request::handlers::set_request_status,
            crate::request::handlers::regenerate_access_code,
            crate::request::handlers::delete_request,
            crate::upload::handlers::upload_documents,
            crate::upload::handlers::list_documents,
            crate::upload::handlers::serve_document,
            crate::upload::handlers::delete_document,
            crate::destination::handlers::create_destination,
            crate::destination::handlers::list_destinations,
            crate::destination::handlers::update_destination,
            crate::destination::handlers::delete_destination,
            crate::destination::handlers::mark_destination_sent,
            crate::destination::handlers::mark_destination_confirmed,
            crate::destination::handlers::mark_destination_failed,
            crate::destination::handlers::reset_destination,
            crate::destination::handlers::dispatch_destination,
            crate::letter::handlers::create_letter,
            crate::letter::handlers::list_letters,
            crate::letter::handlers::get_letter,
            crate::letter::handlers::download_letter,
            crate::letter::handlers::delete_letter,
            crate::template::handlers::create_template,
            crate::template::handlers::list_templates,
            crate::template::handlers::get_template,
            crate::template::handlers::update_template,
            crate::template::handlers::set_default_template,
            crate::template::handlers::delete_template,
        ),
        components(
            schemas(
                request::models::LetterRequest,
                request::models::RequestStatus,
                request::models::CreateRequestPayload,
                request::models::UpdateRequestPayload,
                request::models::UpdateStatusPayload,
                upload::models::Document,
                upload::models::InvalidUpload,
                upload::models::BatchUploadReport,
                destination::models::SubmissionDestination,
                destination::models::DestinationMethod,
                destination::models::DestinationStatus,
                destination::models::CreateDestinationPayload,
                destination::models::UpdateDestinationPayload,
                destination::models::FailDestinationPayload,
                destination::models::DispatchPayload,
                letter::models::Letter,
                letter::models::CreateLetterPayload,
                template::models::Template,
                template::models::TemplateVariable,
                template::models::CreateTemplatePayload,
                template::models::UpdateTemplatePayload,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Request Service", description = "Letter request lifecycle and access codes."),
            (name = "Document Service", description = "Student document uploads and validation."),
            (name = "Destination Service", description = "Submission destinations and delivery tracking."),
            (name = "Letter Service", description = "Letter versions, rendering and download."),
            (name = "Template Service", description = "Reusable letter templates.")
        )
    )]
    struct ApiDoc;

    let config = AppConfig::from_env()?;
    let app_state = web::Data::new(AppState::from_config(&config)?);

    let prometheus = PrometheusMetricsBuilder::new("recletter_server")
        .endpoint("/metrics")
        .build()
        .map_err(|err| anyhow::anyhow!("failed to create metrics middleware: {err}"))?;

    log::info!("starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure_api)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
