//! HTTP handlers and route configuration.

mod blog;
mod contact;
mod dashboard;
mod health;

use actix_web::web;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use aegis_core::domain::AllowList;
    use aegis_core::ports::TokenService;
    use aegis_infra::{JwtConfig, JwtTokenService};

    use crate::config::AppConfig;
    use crate::state::AppState;

    pub(crate) const ADMIN_EMAIL: &str = "admin@aegis.dev";

    /// State wired to the in-memory stores with a one-entry allow-list.
    pub(crate) fn test_state() -> AppState {
        AppState::new(&AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            firestore: None,
            storage: None,
            allow_list: AllowList::from_csv(ADMIN_EMAIL),
        })
    }

    pub(crate) fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }))
    }

    pub(crate) fn bearer(tokens: &Arc<dyn TokenService>, email: &str) -> String {
        format!("Bearer {}", tokens.generate_token(email).unwrap())
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Public site surface
            .route("/contact", web::post().to(contact::submit))
            .service(
                web::scope("/blog")
                    .route("", web::get().to(blog::list))
                    .route("/slug/{slug}", web::get().to(blog::get_by_slug))
                    .route("/{id}/view", web::post().to(blog::record_view)),
            )
            // Admin console, gated by the allow-list via AdminIdentity
            .service(
                web::scope("/admin")
                    .route("/me", web::get().to(dashboard::me))
                    .route("/dashboard", web::get().to(dashboard::summary))
                    .route("/contacts", web::get().to(contact::admin_list))
                    .route("/contacts/feed", web::get().to(contact::admin_feed))
                    .route("/contacts/{id}", web::delete().to(contact::admin_delete))
                    .route("/blog", web::post().to(blog::admin_create))
                    // Registered before /blog/{id} so file names are not
                    // captured as post ids.
                    .route(
                        "/blog/images/{file_name}",
                        web::put().to(blog::admin_upload_image),
                    )
                    .route("/blog/{id}", web::get().to(blog::admin_get))
                    .route("/blog/{id}", web::patch().to(blog::admin_update))
                    .route("/blog/{id}", web::delete().to(blog::admin_delete)),
            ),
    );
}
