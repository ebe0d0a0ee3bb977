//! Contact-form and admin submission handlers.

use actix_web::{HttpResponse, web};

use aegis_core::domain::ContactSubmissionCreate;
use aegis_shared::dto::IdResponse;

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MESSAGE_MAX_CHARS: usize = 5000;

/// POST /api/contact - the public contact form.
pub async fn submit(
    state: web::Data<AppState>,
    body: web::Json<ContactSubmissionCreate>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();

    // Form-boundary validation; the service layer assumes it already ran.
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if input.email.is_empty() || !input.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if input.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }
    if input.message.chars().count() > MESSAGE_MAX_CHARS {
        return Err(AppError::BadRequest("Message is too long".to_string()));
    }

    let id = state.contacts.create(input).await?;
    Ok(HttpResponse::Created().json(IdResponse { id }))
}

/// GET /api/admin/contacts
pub async fn admin_list(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let submissions = state.contacts.list().await?;
    Ok(HttpResponse::Ok().json(submissions))
}

/// GET /api/admin/contacts/feed - SSE stream carrying the full submission
/// list, re-sent on every change. Client disconnect drops the stream,
/// which drops the guard and detaches the underlying watch.
pub async fn admin_feed(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<web::Bytes>();

    let guard = state
        .contacts
        .subscribe(move |submissions| match serde_json::to_string(&submissions) {
            Ok(json) => {
                let _ = tx.send(web::Bytes::from(format!("data: {json}\n\n")));
            }
            Err(err) => tracing::error!(error = %err, "Failed to serialize feed event"),
        })
        .await?;

    // The stream owns the guard for its whole lifetime.
    let stream = futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        rx.recv()
            .await
            .map(|chunk| (Ok::<_, std::convert::Infallible>(chunk), (rx, guard)))
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream))
}

/// DELETE /api/admin/contacts/{id}
pub async fn admin_delete(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.contacts.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
