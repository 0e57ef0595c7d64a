//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{book_instances, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library Catalog API",
        version = "0.1.0",
        description = "Book copy (BookInstance) management"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Copies
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance_form,
        book_instances::create_book_instance,
        book_instances::update_book_instance_form,
        book_instances::update_book_instance,
        book_instances::delete_book_instance_form,
        book_instances::delete_book_instance,
    ),
    components(
        schemas(
            crate::models::book::BookSummary,
            crate::models::book::BookRef,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceDraft,
            crate::models::book_instance::BookInstanceForm,
            crate::models::book_instance::DeleteBookInstanceForm,
            crate::models::book_instance::BookInstanceView,
            crate::models::book_instance::BookInstanceListView,
            crate::models::book_instance::BookInstanceDetailView,
            crate::models::book_instance::BookInstanceDeleteView,
            crate::models::book_instance::BookInstanceFormView,
            crate::validation::FieldError,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "bookinstances", description = "Book copy management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
