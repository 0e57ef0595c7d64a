//! Copy (BookInstance) endpoints
//!
//! GET handlers answer with the JSON view model a page would be rendered
//! from. Successful form posts answer with a redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};

use crate::{
    error::AppResult,
    models::{
        book_instance::{
            BookInstanceDeleteView, BookInstanceDetailView, BookInstanceFormView,
            BookInstanceListView, LIST_URL,
        },
        BookInstanceForm, DeleteBookInstanceForm,
    },
    services::book_instances::{DeleteFormOutcome, FormOutcome},
};

impl IntoResponse for FormOutcome {
    fn into_response(self) -> Response {
        match self {
            FormOutcome::Saved(instance) => Redirect::to(&instance.url()).into_response(),
            FormOutcome::Invalid(view) => Json(view).into_response(),
        }
    }
}

/// List all copies
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Copy list", body = BookInstanceListView)
    )
)]
pub async fn list_book_instances(
    State(state): State<crate::AppState>,
) -> AppResult<Json<BookInstanceListView>> {
    let view = state.services.book_instances.list().await?;
    Ok(Json(view))
}

/// Get a copy by ID
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = String, Path, description = "BookInstance ID")),
    responses(
        (status = 200, description = "Copy details", body = BookInstanceDetailView),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstanceDetailView>> {
    let view = state.services.book_instances.detail(&id).await?;
    Ok(Json(view))
}

/// Blank create form
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Create form", body = BookInstanceFormView)
    )
)]
pub async fn create_book_instance_form(
    State(state): State<crate::AppState>,
) -> AppResult<Json<BookInstanceFormView>> {
    let view = state.services.book_instances.create_form().await?;
    Ok(Json(view))
}

/// Submit the create form
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to the new copy"),
        (status = 200, description = "Form re-rendered with validation errors", body = BookInstanceFormView)
    )
)]
pub async fn create_book_instance(
    State(state): State<crate::AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<FormOutcome> {
    state.services.book_instances.submit_create(&form).await
}

/// Pre-filled update form
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = String, Path, description = "BookInstance ID")),
    responses(
        (status = 200, description = "Update form", body = BookInstanceFormView),
        (status = 400, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance_form(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstanceFormView>> {
    let view = state.services.book_instances.update_form(&id).await?;
    Ok(Json(view))
}

/// Submit the update form
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = String, Path, description = "BookInstance ID")),
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirect to the copy"),
        (status = 200, description = "Form re-rendered with validation errors", body = BookInstanceFormView),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<FormOutcome> {
    state.services.book_instances.submit_update(&id, &form).await
}

/// Delete confirmation page
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = String, Path, description = "BookInstance ID")),
    responses(
        (status = 200, description = "Delete confirmation", body = BookInstanceDeleteView),
        (status = 303, description = "Copy not found, redirect to the list")
    )
)]
pub async fn delete_book_instance_form(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let response = match state.services.book_instances.delete_form(&id).await? {
        DeleteFormOutcome::Confirm(view) => Json(view).into_response(),
        DeleteFormOutcome::Missing => Redirect::to(LIST_URL).into_response(),
    };
    Ok(response)
}

/// Submit the delete form. The copy to delete is the `id` in the body.
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = String, Path, description = "BookInstance ID (unused, the body decides)")),
    request_body(content = DeleteBookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the list")
    )
)]
pub async fn delete_book_instance(
    State(state): State<crate::AppState>,
    Path(_id): Path<String>,
    Form(form): Form<DeleteBookInstanceForm>,
) -> AppResult<Redirect> {
    state.services.book_instances.submit_delete(&form.id).await?;
    Ok(Redirect::to(LIST_URL))
}
