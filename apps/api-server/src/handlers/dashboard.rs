//! Admin dashboard and identity probe.

use actix_web::{HttpResponse, web};

use aegis_shared::dto::MeResponse;

use crate::middleware::auth::AdminIdentity;
use crate::state::AppState;

/// GET /api/admin/dashboard
///
/// Infallible by design: broken queries degrade to zeros inside the
/// service instead of failing the page.
pub async fn summary(_admin: AdminIdentity, state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.dashboard.snapshot().await)
}

/// GET /api/admin/me
pub async fn me(admin: AdminIdentity) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        email: admin.0.email,
    })
}
