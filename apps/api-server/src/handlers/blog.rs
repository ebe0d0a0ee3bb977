//! Blog handlers: public reads plus the admin editor surface.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use aegis_core::domain::{BlogPatch, BlogStatus};
use aegis_shared::dto::{CreateBlogRequest, IdResponse, UploadResponse};

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    status: Option<String>,
}

/// GET /api/blog?status=published
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => Some(
            BlogStatus::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{raw}'")))?,
        ),
    };

    let posts = state.blogs.list(status).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/blog/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    match state.blogs.get_by_slug(&slug).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("No post with slug '{slug}'"))),
    }
}

/// POST /api/blog/{id}/view - reader click-through from a listing. Never
/// fails the caller; a broken counter is logged server-side.
pub async fn record_view(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    state.blogs.increment_view(&path.into_inner()).await;
    HttpResponse::NoContent().finish()
}

/// POST /api/admin/blog
pub async fn admin_create(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();

    if request.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if request.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    let id = state.blogs.create(request.into_post()).await?;
    Ok(HttpResponse::Created().json(IdResponse { id }))
}

/// GET /api/admin/blog/{id}
pub async fn admin_get(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    match state.blogs.get_by_id(&id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("No post with id '{id}'"))),
    }
}

/// PATCH /api/admin/blog/{id}
pub async fn admin_update(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BlogPatch>,
) -> AppResult<HttpResponse> {
    state
        .blogs
        .update(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/admin/blog/{id}
pub async fn admin_delete(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.blogs.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /api/admin/blog/images/{file_name} - raw image bytes in the body.
pub async fn admin_upload_image(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
    bytes: web::Bytes,
) -> AppResult<HttpResponse> {
    let file_name = path.into_inner();
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Empty upload".to_string()));
    }

    let content_type = req
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let url = state
        .blogs
        .upload_image(bytes.to_vec(), &file_name, &content_type)
        .await?;
    Ok(HttpResponse::Ok().json(UploadResponse { url }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::json;

    use aegis_core::domain::BlogPost;

    use crate::handlers::{configure_routes, test_support};

    macro_rules! test_app {
        () => {{
            let tokens = test_support::token_service();
            let app = test::init_service(
                App::new()
                    .app_data(web::Data::new(test_support::test_state()))
                    .app_data(web::Data::new(tokens.clone()))
                    .configure(configure_routes),
            )
            .await;
            (app, tokens)
        }};
    }

    #[actix_rt::test]
    async fn create_derives_slug_then_serves_it_publicly() {
        let (app, tokens) = test_app!();
        let auth = (
            header::AUTHORIZATION,
            test_support::bearer(&tokens, test_support::ADMIN_EMAIL),
        );

        let create = test::TestRequest::post()
            .uri("/api/admin/blog")
            .insert_header(auth.clone())
            .set_json(json!({
                "title": "Hello, World!",
                "content": "<p>Body text</p>",
                "status": "published",
            }))
            .to_request();
        let created: IdResponse = test::call_and_read_body_json(&app, create).await;

        let fetch = test::TestRequest::get()
            .uri("/api/blog/slug/hello-world")
            .to_request();
        let post: BlogPost = test::call_and_read_body_json(&app, fetch).await;

        assert_eq!(post.id, created.id);
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.excerpt, "Body text");
        assert_eq!(post.views, 0);
        assert!(post.published_at.is_some());

        // Reader click-through bumps the counter without ever failing.
        let view = test::TestRequest::post()
            .uri(&format!("/api/blog/{}/view", created.id))
            .to_request();
        let response = test::call_service(&app, view).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let refetch = test::TestRequest::get()
            .uri(&format!("/api/admin/blog/{}", created.id))
            .insert_header(auth)
            .to_request();
        let viewed: BlogPost = test::call_and_read_body_json(&app, refetch).await;
        assert_eq!(viewed.views, 1);
    }

    #[actix_rt::test]
    async fn unknown_slug_is_a_404() {
        let (app, _tokens) = test_app!();

        let request = test::TestRequest::get()
            .uri("/api/blog/slug/missing")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn list_rejects_unknown_status_values() {
        let (app, _tokens) = test_app!();

        let request = test::TestRequest::get()
            .uri("/api/blog?status=archived")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn image_upload_round_trips_a_url() {
        let (app, tokens) = test_app!();

        let upload = test::TestRequest::put()
            .uri("/api/admin/blog/images/cover.png")
            .insert_header((
                header::AUTHORIZATION,
                test_support::bearer(&tokens, test_support::ADMIN_EMAIL),
            ))
            .insert_header((header::CONTENT_TYPE, "image/png"))
            .set_payload(vec![1u8, 2, 3])
            .to_request();
        let body: UploadResponse = test::call_and_read_body_json(&app, upload).await;

        assert!(body.url.starts_with("memory://blog-images/"));
        assert!(body.url.ends_with("_cover.png"));
    }
}
